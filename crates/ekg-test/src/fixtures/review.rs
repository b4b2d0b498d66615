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

//! The small review scenario.

use ekg_core::{
    FieldType, ModelCatalog, NodeDeclaration, Object, RelationDeclaration, Schema, TypeDef, Value,
};

/// `Review { date, opportunity: Opportunity, people: [Person] }`.
pub fn review_catalog() -> ModelCatalog {
    ModelCatalog::builder()
        .model(
            TypeDef::new("Review")
                .field("date", FieldType::string())
                .field("opportunity", FieldType::model("Opportunity"))
                .field("people", FieldType::list_of(FieldType::model("Person"))),
        )
        .model(TypeDef::new("Opportunity").field("name", FieldType::string()))
        .model(TypeDef::new("Person").field("name", FieldType::string()))
        .build()
        .expect("review catalog is valid")
}

/// Node declarations: Review named from its date, the others by `name`.
pub fn review_nodes() -> Vec<NodeDeclaration> {
    vec![
        NodeDeclaration::with_name_fn("Review", |data, _| {
            data.get("date").map(|d| format!("Review:{}", d))
        }),
        NodeDeclaration::new("Opportunity", "name"),
        NodeDeclaration::new("Person", "name"),
    ]
}

/// `REVIEWS` and `HAS_PERSON`.
pub fn review_relations() -> Vec<RelationDeclaration> {
    vec![
        RelationDeclaration::new("Review", "Opportunity", "REVIEWS"),
        RelationDeclaration::new("Review", "Person", "HAS_PERSON"),
    ]
}

/// The deduced review schema.
pub fn review_schema() -> Schema {
    Schema::deduce(&review_catalog(), "Review", review_nodes(), review_relations())
        .expect("review schema is valid")
}

/// A review of the "Acme Deal" with the given people.
pub fn review(people: &[&str]) -> Object {
    Object::new("Review")
        .with("date", "2024-01-01")
        .with("opportunity", Object::new("Opportunity").with("name", "Acme Deal"))
        .with(
            "people",
            people
                .iter()
                .map(|name| Value::from(Object::new("Person").with("name", *name)))
                .collect::<Vec<_>>(),
        )
}

/// A model where `Deal` and `Ticket` live on unrelated branches.
///
/// `Portfolio { sales: Sales { deals: [Deal] }, support: Support { tickets: [Ticket] } }`
pub fn disconnected_catalog() -> ModelCatalog {
    ModelCatalog::builder()
        .model(
            TypeDef::new("Portfolio")
                .field("name", FieldType::string())
                .field("sales", FieldType::model("Sales"))
                .field("support", FieldType::model("Support")),
        )
        .model(TypeDef::new("Sales").field("deals", FieldType::list_of(FieldType::model("Deal"))))
        .model(
            TypeDef::new("Support").field("tickets", FieldType::list_of(FieldType::model("Ticket"))),
        )
        .model(TypeDef::new("Deal").field("title", FieldType::string()))
        .model(TypeDef::new("Ticket").field("subject", FieldType::string()))
        .build()
        .expect("disconnected catalog is valid")
}

/// Deal, Ticket and a `Deal -> Ticket` relation no path can satisfy.
pub fn disconnected_schema() -> Schema {
    Schema::deduce(
        &disconnected_catalog(),
        "Portfolio",
        vec![
            NodeDeclaration::new("Portfolio", "name"),
            NodeDeclaration::new("Deal", "title"),
            NodeDeclaration::new("Ticket", "subject"),
        ],
        vec![RelationDeclaration::new("Deal", "Ticket", "ESCALATED_TO")],
    )
    .expect("disconnected schema is valid")
}

/// A portfolio with two deals and one ticket.
pub fn portfolio() -> Object {
    Object::new("Portfolio")
        .with("name", "Q3")
        .with(
            "sales",
            Object::new("Sales").with(
                "deals",
                vec![
                    Value::from(Object::new("Deal").with("title", "Renewal")),
                    Value::from(Object::new("Deal").with("title", "Upsell")),
                ],
            ),
        )
        .with(
            "support",
            Object::new("Support").with(
                "tickets",
                vec![Value::from(Object::new("Ticket").with("subject", "Outage"))],
            ),
        )
}
