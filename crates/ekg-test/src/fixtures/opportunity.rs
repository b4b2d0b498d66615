// Dweve EKG - Enterprise Knowledge Graph
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The reviewed-opportunity model.
//!
//! A sales opportunity review with a customer and its contacts, the internal
//! team, partners, risks, a technical approach and the competitive landscape.
//! Financial metrics and the competitive landscape are flattened into the
//! root row.

use ekg_core::{
    EnumDef, FieldType, ModelCatalog, NodeDeclaration, Object, PropertyMap, RelationDeclaration,
    Result, Schema, Subgraph, TypeDef, Value,
};
use serde_json::json;

/// Every type of the reviewed-opportunity model.
pub fn opportunity_catalog() -> ModelCatalog {
    ModelCatalog::builder()
        .model(
            TypeDef::new("ReviewedOpportunity")
                .describe("A reviewed sales opportunity")
                .field("start_date", FieldType::string())
                .field("end_date", FieldType::optional(FieldType::string()))
                .field("review_status", FieldType::enumeration("ReviewStatus"))
                .field("opportunity", FieldType::model("Opportunity"))
                .field("team", FieldType::list_of(FieldType::model("Person")))
                .field("partners", FieldType::list_of(FieldType::model("Partner")))
                .field("risks", FieldType::list_of(FieldType::model("RiskAnalysis")))
                .field(
                    "technical_approach",
                    FieldType::optional(FieldType::model("TechnicalApproach")),
                )
                .field(
                    "financial_metrics",
                    FieldType::optional(FieldType::model("FinancialMetrics")),
                )
                .field(
                    "competition",
                    FieldType::optional(FieldType::model("CompetitiveLandscape")),
                ),
        )
        .model(
            TypeDef::new("Opportunity")
                .field("name", FieldType::string())
                .field("status", FieldType::enumeration("OpportunityStatus"))
                .field("description", FieldType::optional(FieldType::string()))
                .field("industry", FieldType::optional(FieldType::string()))
                .field("customer", FieldType::model("Customer")),
        )
        .model(
            TypeDef::new("Customer")
                .field("name", FieldType::string())
                .field("segment", FieldType::optional(FieldType::string()))
                .field("contacts", FieldType::list_of(FieldType::deferred("Person"))),
        )
        .model(
            TypeDef::new("Person")
                .field("name", FieldType::string())
                .field("role", FieldType::optional(FieldType::string()))
                .field("email", FieldType::optional(FieldType::string())),
        )
        .model(
            TypeDef::new("Partner")
                .field("name", FieldType::string())
                .field("role", FieldType::optional(FieldType::string())),
        )
        .model(
            TypeDef::new("RiskAnalysis")
                .field("risk_category", FieldType::string())
                .field("risk_description", FieldType::string())
                .field("impact_level", FieldType::enumeration("ImpactLevel"))
                .field("mitigation", FieldType::optional(FieldType::string())),
        )
        .model(
            TypeDef::new("TechnicalApproach")
                .field("architecture", FieldType::optional(FieldType::string()))
                .field("technical_stack", FieldType::optional(FieldType::string()))
                .field("tools", FieldType::list_of(FieldType::string())),
        )
        .model(
            TypeDef::new("FinancialMetrics")
                .field("tcv", FieldType::float())
                .field("annual_revenue", FieldType::optional(FieldType::float()))
                .field("margin", FieldType::optional(FieldType::float()))
                .field("currency", FieldType::string()),
        )
        .model(
            TypeDef::new("CompetitiveLandscape")
                .field("competitive_position", FieldType::optional(FieldType::string()))
                .field("competitors", FieldType::list_of(FieldType::model("Competitor"))),
        )
        .model(
            TypeDef::new("Competitor")
                .field("name", FieldType::string())
                .field("known_as", FieldType::optional(FieldType::string()))
                .field("strengths", FieldType::list_of(FieldType::string())),
        )
        .enumeration(
            EnumDef::new("ReviewStatus")
                .variant("Draft", "draft")
                .variant("Approved", "approved")
                .variant("Rejected", "rejected"),
        )
        .enumeration(
            EnumDef::new("OpportunityStatus")
                .variant("Qualified", "qualified")
                .variant("Proposal", "proposal")
                .variant("Won", "won")
                .variant("Lost", "lost"),
        )
        .enumeration(
            EnumDef::new("ImpactLevel")
                .variant("Low", "low")
                .variant("Medium", "medium")
                .variant("High", "high"),
        )
        .build()
        .expect("opportunity catalog is valid")
}

fn first_present(data: &PropertyMap, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| data.get(*f))
        .find(|v| !v.is_blank())
        .map(Value::to_string)
}

/// Node declarations for the reviewed-opportunity model.
pub fn opportunity_nodes() -> Vec<NodeDeclaration> {
    vec![
        NodeDeclaration::with_name_fn("ReviewedOpportunity", |data, _| {
            Some(format!(
                "Rainbow:{}",
                data.get("start_date").cloned().unwrap_or_default()
            ))
        })
        .describe("Root node containing the complete reviewed opportunity")
        .embed("financial_metrics", "FinancialMetrics")
        .embed("competition", "CompetitiveLandscape"),
        NodeDeclaration::new("Opportunity", "name")
            .describe("Core opportunity information")
            .index(["name", "status"]),
        NodeDeclaration::new("Customer", "name")
            .describe("Customer organization details")
            .index(["name"]),
        NodeDeclaration::new("Person", "name")
            .dedup_by("name")
            .describe("Individual contacts and team members"),
        NodeDeclaration::new("Partner", "name").describe("Partner organization information"),
        NodeDeclaration::new("RiskAnalysis", "risk_category")
            .describe("Risk assessment and mitigation details")
            .index(["risk_description"]),
        NodeDeclaration::with_name_fn("TechnicalApproach", |data, base| {
            first_present(data, &["technical_stack", "architecture"])
                .or_else(|| Some(format!("{}_default", base)))
        })
        .describe("Technical implementation approach and stack")
        .index(["architecture", "technical_stack"]),
        NodeDeclaration::with_name_fn("Competitor", |data, base| {
            first_present(data, &["known_as", "name"])
                .or_else(|| Some(format!("{}_competitor", base)))
        })
        .describe("Competitor"),
    ]
}

/// Relation declarations for the reviewed-opportunity model.
pub fn opportunity_relations() -> Vec<RelationDeclaration> {
    vec![
        RelationDeclaration::new("ReviewedOpportunity", "Opportunity", "REVIEWS")
            .describe("Review relationship to core opportunity"),
        RelationDeclaration::new("Opportunity", "Customer", "HAS_CUSTOMER")
            .describe("Opportunity belongs to customer"),
        RelationDeclaration::new("Customer", "Person", "HAS_CONTACT")
            .describe("Customer contact persons"),
        RelationDeclaration::new("ReviewedOpportunity", "Person", "HAS_TEAM_MEMBER")
            .describe("Internal team members"),
        RelationDeclaration::new("ReviewedOpportunity", "Partner", "HAS_PARTNER")
            .describe("Partner organizations involved"),
        RelationDeclaration::new("ReviewedOpportunity", "RiskAnalysis", "HAS_RISK")
            .describe("Identified risks and mitigations"),
        RelationDeclaration::new("ReviewedOpportunity", "TechnicalApproach", "HAS_TECH_STACK")
            .describe("Technical implementation approach"),
        RelationDeclaration::new("ReviewedOpportunity", "Competitor", "HAS_COMPETITOR")
            .describe("Known competitors"),
    ]
}

/// The deduced reviewed-opportunity schema.
pub fn opportunity_schema() -> Schema {
    Schema::deduce(
        &opportunity_catalog(),
        "ReviewedOpportunity",
        opportunity_nodes(),
        opportunity_relations(),
    )
    .expect("opportunity schema is valid")
}

/// A reviewed opportunity as persisted by the upstream extraction pipeline.
pub fn opportunity_json() -> serde_json::Value {
    json!({
        "start_date": "2024-03-01",
        "end_date": "2024-06-30",
        "review_status": "Approved",
        "opportunity": {
            "name": "Globex Data Platform",
            "status": "proposal",
            "description": "Consolidate regional data warehouses",
            "industry": "Manufacturing",
            "customer": {
                "name": "Globex",
                "segment": "Enterprise",
                "contacts": [
                    {"name": "Carol", "role": "CIO", "email": "carol@globex.example"},
                    {"name": "Dan", "role": "Procurement"}
                ]
            }
        },
        "team": [
            {"name": "Alice", "role": "Account Executive"},
            {"name": "Bob", "role": "Solution Architect"}
        ],
        "partners": [
            {"name": "Initech", "role": "Integrator"}
        ],
        "risks": [
            {
                "risk_category": "Budget",
                "risk_description": "Customer budget not yet approved",
                "impact_level": "High",
                "mitigation": "Phase the delivery"
            },
            {
                "risk_category": "Delivery",
                "risk_description": "Tight migration window",
                "impact_level": "medium"
            }
        ],
        "technical_approach": {
            "architecture": "Lakehouse",
            "technical_stack": "Rust + Kuzu",
            "tools": ["dbt", "Airflow"]
        },
        "financial_metrics": {
            "tcv": 1250000.0,
            "margin": 0.32,
            "currency": "EUR"
        },
        "competition": {
            "competitive_position": "Challenger",
            "competitors": [
                {"name": "Umbrella Analytics", "known_as": "Umbrella", "strengths": ["price"]},
                {"name": "Hooli", "strengths": []}
            ]
        }
    })
}

/// [`opportunity_json`] decoded against [`opportunity_catalog`].
pub fn opportunity_instance() -> Object {
    opportunity_catalog()
        .decode("ReviewedOpportunity", &opportunity_json())
        .expect("opportunity sample decodes")
}

/// The reviewed-opportunity subgraph.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpportunitySubgraph;

impl Subgraph for OpportunitySubgraph {
    fn name(&self) -> &str {
        "opportunity"
    }

    fn build_schema(&self) -> Result<Schema> {
        Schema::deduce(
            &opportunity_catalog(),
            "ReviewedOpportunity",
            opportunity_nodes(),
            opportunity_relations(),
        )
    }

    fn sample_queries(&self) -> Vec<String> {
        [
            "MATCH (n) RETURN labels(n)[0] as NodeType, count(n) as Count",
            "MATCH (o:Opportunity) RETURN o.name, o.status LIMIT 5",
            "MATCH (c:Customer)-[:HAS_CONTACT]->(p:Person) RETURN c.name, p.name, p.role LIMIT 5",
            "MATCH (ro:ReviewedOpportunity)-[:HAS_RISK]->(r:RiskAnalysis) RETURN r.risk_description, r.impact_level LIMIT 3",
            "MATCH (ro:ReviewedOpportunity)-[:HAS_PARTNER]->(partner:Partner) RETURN ro.start_date, partner.name, partner.role",
            "MATCH (o:Opportunity)-[:HAS_CUSTOMER]->(c:Customer) RETURN o.name, c.name, c.segment",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn entity_name(&self, instance: &Object) -> String {
        instance
            .get("opportunity")
            .and_then(Value::as_object)
            .and_then(|o| o.get("name"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| "Unknown Entity".to_string())
    }
}
