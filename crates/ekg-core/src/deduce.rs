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

//! Schema deduction.
//!
//! Runs in a fixed order:
//!
//! 1. Validate declarations against the catalog (the only fatal step).
//! 2. Build the field map from the root.
//! 3. Find every path at which each node type occurs.
//! 4. Keep every plausible `(from, to)` path pair per relation.
//! 5. Compute excluded fields from relations and embeddings.
//! 6. Record coherence warnings.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::declaration::{NodeDeclaration, RelationDeclaration};
use crate::error::{EkgError, Result};
use crate::introspect::{build_field_map, FieldMap};
use crate::model::ModelCatalog;
use crate::path::{first_segment, is_plausible_pair, relative_to};
use crate::schema::{NodeSchema, RelationSchema, Schema, SchemaWarning};

impl Schema {
    /// Validate the declarations and deduce every derived attribute.
    ///
    /// # Errors
    ///
    /// Fails only on configuration errors: an unknown root, node, relation
    /// endpoint or embedded type, an embedded field the node type does not
    /// declare or declares with another type, an empty relation name, or a
    /// legacy parent that is not a declared node. Coherence problems are
    /// recorded as [`SchemaWarning`]s instead.
    pub fn deduce(
        catalog: &ModelCatalog,
        root: &str,
        nodes: Vec<NodeDeclaration>,
        relations: Vec<RelationDeclaration>,
    ) -> Result<Schema> {
        validate(catalog, root, &nodes, &relations)?;

        let field_map = build_field_map(catalog, root)?;

        let mut node_schemas: Vec<NodeSchema> = nodes
            .into_iter()
            .map(|decl| node_paths(&field_map, root, decl))
            .collect();

        let relation_schemas: Vec<RelationSchema> = relations
            .into_iter()
            .map(|decl| relation_pairs(&node_schemas, decl))
            .collect();

        let excluded: Vec<BTreeSet<String>> = node_schemas
            .iter()
            .map(|node| excluded_fields(node, &node_schemas, &relation_schemas))
            .collect();
        for (node, excluded) in node_schemas.iter_mut().zip(excluded) {
            node.excluded = excluded;
        }

        let warnings = coherence(root, &node_schemas, &relation_schemas);
        for warning in &warnings {
            warn!(root = %root, "graph schema validation: {}", warning);
        }

        debug!(
            root = %root,
            nodes = node_schemas.len(),
            relations = relation_schemas.len(),
            warnings = warnings.len(),
            "deduced graph schema"
        );

        Ok(Schema {
            catalog: catalog.clone(),
            root: root.to_string(),
            field_map,
            nodes: node_schemas,
            relations: relation_schemas,
            warnings,
        })
    }
}

fn validate(
    catalog: &ModelCatalog,
    root: &str,
    nodes: &[NodeDeclaration],
    relations: &[RelationDeclaration],
) -> Result<()> {
    catalog.require(root)?;

    for node in nodes {
        let def = catalog.require(&node.type_name)?;

        for embedded in &node.embedded {
            catalog.require(&embedded.type_name)?;
            let field = def
                .get_field(&embedded.field)
                .ok_or_else(|| EkgError::UnknownEmbeddedField {
                    node: node.type_name.clone(),
                    field: embedded.field.clone(),
                })?;
            match catalog.element_model(&field.ty) {
                Some((found, false)) if found == embedded.type_name => {}
                _ => {
                    return Err(EkgError::EmbeddedTypeMismatch {
                        node: node.type_name.clone(),
                        field: embedded.field.clone(),
                        expected: embedded.type_name.clone(),
                        found: field.ty.to_string(),
                    })
                }
            }
        }

        if let Some(legacy) = &node.embed_in_parent {
            let parent_declared = nodes
                .iter()
                .any(|n| n.type_name == legacy.parent && !n.is_embedded_in_parent());
            if !parent_declared {
                return Err(EkgError::UnknownParent {
                    node: node.type_name.clone(),
                    parent: legacy.parent.clone(),
                });
            }
        }
    }

    for relation in relations {
        if relation.name.trim().is_empty() {
            return Err(EkgError::InvalidName {
                kind: "relation",
                name: relation.name.clone(),
            });
        }
        catalog.require(&relation.from)?;
        catalog.require(&relation.to)?;
    }

    Ok(())
}

fn node_paths(field_map: &FieldMap, root: &str, declaration: NodeDeclaration) -> NodeSchema {
    let mut field_paths = Vec::new();
    let mut plural_at = BTreeMap::new();

    if declaration.type_name == root {
        field_paths.push(String::new());
        plural_at.insert(String::new(), false);
    } else {
        for (_, info) in field_map.fields() {
            if info.target.model() == Some(declaration.type_name.as_str()) {
                field_paths.push(info.path.clone());
                plural_at.insert(info.path.clone(), info.plural);
            }
        }
    }

    NodeSchema {
        declaration,
        field_paths,
        plural_at,
        excluded: BTreeSet::new(),
    }
}

fn paths_of<'a>(nodes: &'a [NodeSchema], type_name: &str) -> &'a [String] {
    nodes
        .iter()
        .find(|n| n.type_name() == type_name)
        .map(NodeSchema::field_paths)
        .unwrap_or(&[])
}

fn relation_pairs(nodes: &[NodeSchema], declaration: RelationDeclaration) -> RelationSchema {
    let from_paths = paths_of(nodes, &declaration.from);
    let to_paths = paths_of(nodes, &declaration.to);

    let path_pairs = from_paths
        .iter()
        .flat_map(|from| to_paths.iter().map(move |to| (from, to)))
        .filter(|(from, to)| is_plausible_pair(from, to))
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect();

    RelationSchema {
        declaration,
        path_pairs,
    }
}

fn excluded_fields(
    node: &NodeSchema,
    nodes: &[NodeSchema],
    relations: &[RelationSchema],
) -> BTreeSet<String> {
    let mut excluded = BTreeSet::new();

    for relation in relations.iter().filter(|r| r.from() == node.type_name()) {
        for (from, to) in relation.path_pairs() {
            if let Some(rest) = relative_to(to, from) {
                excluded.insert(first_segment(rest).to_string());
            }
        }
    }

    for embedded in &node.declaration().embedded {
        excluded.insert(embedded.field.clone());
    }

    for child in nodes {
        let Some(legacy) = &child.declaration().embed_in_parent else {
            continue;
        };
        if legacy.parent != node.type_name() {
            continue;
        }
        for child_path in child.field_paths() {
            for parent_path in node.field_paths() {
                if let Some(rest) = relative_to(child_path, parent_path) {
                    excluded.insert(first_segment(rest).to_string());
                }
            }
        }
    }

    excluded
}

fn coherence(root: &str, nodes: &[NodeSchema], relations: &[RelationSchema]) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();

    let declared: BTreeSet<&str> = nodes.iter().map(NodeSchema::type_name).collect();
    let mut reported = BTreeSet::new();
    for relation in relations {
        for endpoint in [relation.from(), relation.to()] {
            if !declared.contains(endpoint) && reported.insert(endpoint) {
                warnings.push(SchemaWarning::MissingNodeDeclaration {
                    type_name: endpoint.to_string(),
                });
            }
        }
    }

    let mut by_pair: Vec<((&str, &str), Vec<String>)> = Vec::new();
    for relation in relations {
        let key = (relation.from(), relation.to());
        match by_pair.iter_mut().find(|(k, _)| *k == key) {
            Some((_, names)) => names.push(relation.name().to_string()),
            None => by_pair.push((key, vec![relation.name().to_string()])),
        }
    }
    for ((from, to), names) in by_pair {
        if names.len() > 1 {
            warnings.push(SchemaWarning::DuplicateRelation {
                from: from.to_string(),
                to: to.to_string(),
                names,
            });
        }
    }

    for node in nodes {
        if node.field_paths().is_empty() && node.type_name() != root {
            warnings.push(SchemaWarning::NoFieldPaths {
                type_name: node.type_name().to_string(),
            });
        }
    }

    for relation in relations {
        if relation.path_pairs().is_empty() {
            warnings.push(SchemaWarning::NoRelationPaths {
                relation: relation.name().to_string(),
                from: relation.from().to_string(),
                to: relation.to().to_string(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, TypeDef};

    fn catalog() -> ModelCatalog {
        ModelCatalog::builder()
            .model(
                TypeDef::new("Review")
                    .field("date", FieldType::string())
                    .field("opportunity", FieldType::model("Opportunity"))
                    .field("people", FieldType::list_of(FieldType::model("Person")))
                    .field("metrics", FieldType::optional(FieldType::model("Metrics"))),
            )
            .model(
                TypeDef::new("Opportunity")
                    .field("name", FieldType::string())
                    .field("customer", FieldType::model("Customer")),
            )
            .model(
                TypeDef::new("Customer")
                    .field("name", FieldType::string())
                    .field("contacts", FieldType::list_of(FieldType::model("Person"))),
            )
            .model(TypeDef::new("Person").field("name", FieldType::string()))
            .model(TypeDef::new("Metrics").field("tcv", FieldType::float()))
            .model(TypeDef::new("Island").field("name", FieldType::string()))
            .build()
            .unwrap()
    }

    fn nodes() -> Vec<NodeDeclaration> {
        vec![
            NodeDeclaration::new("Review", "date").embed("metrics", "Metrics"),
            NodeDeclaration::new("Opportunity", "name"),
            NodeDeclaration::new("Customer", "name"),
            NodeDeclaration::new("Person", "name"),
        ]
    }

    #[test]
    fn test_root_gets_synthetic_path() {
        let schema = Schema::deduce(&catalog(), "Review", nodes(), vec![]).unwrap();
        let review = schema.node("Review").unwrap();
        assert_eq!(review.field_paths(), &["".to_string()]);
        assert!(!review.is_plural_at(""));
    }

    #[test]
    fn test_node_paths_across_owners() {
        let schema = Schema::deduce(&catalog(), "Review", nodes(), vec![]).unwrap();
        let person = schema.node("Person").unwrap();
        assert_eq!(
            person.field_paths(),
            &["people".to_string(), "opportunity.customer.contacts".to_string()]
        );
        assert!(person.is_plural_at("people"));
        assert!(person.is_plural_at("opportunity.customer.contacts"));
    }

    #[test]
    fn test_relation_pairs_and_exclusions() {
        let schema = Schema::deduce(
            &catalog(),
            "Review",
            nodes(),
            vec![
                RelationDeclaration::new("Review", "Opportunity", "REVIEWS"),
                RelationDeclaration::new("Customer", "Person", "HAS_CONTACT"),
            ],
        )
        .unwrap();

        let contact = schema.relation("HAS_CONTACT").unwrap();
        assert_eq!(
            contact.path_pairs(),
            &[(
                "opportunity.customer".to_string(),
                "opportunity.customer.contacts".to_string()
            )]
        );

        let customer = schema.node("Customer").unwrap();
        assert!(customer.is_excluded("contacts"));

        let review = schema.node("Review").unwrap();
        assert!(review.is_excluded("opportunity"));
        assert!(review.is_excluded("metrics"));
        assert!(!review.is_excluded("people"));
        assert!(schema.warnings().is_empty());
    }

    #[test]
    fn test_warnings_are_collected() {
        let mut decls = nodes();
        decls.push(NodeDeclaration::new("Island", "name"));
        let schema = Schema::deduce(
            &catalog(),
            "Review",
            decls,
            vec![
                RelationDeclaration::new("Review", "Person", "HAS_PERSON"),
                RelationDeclaration::new("Review", "Person", "KNOWS"),
                RelationDeclaration::new("Review", "Metrics", "HAS_METRICS"),
                RelationDeclaration::new("Person", "Island", "VISITS"),
            ],
        )
        .unwrap();

        let warnings = schema.warnings();
        assert!(warnings.contains(&SchemaWarning::MissingNodeDeclaration {
            type_name: "Metrics".to_string()
        }));
        assert!(warnings.contains(&SchemaWarning::DuplicateRelation {
            from: "Review".to_string(),
            to: "Person".to_string(),
            names: vec!["HAS_PERSON".to_string(), "KNOWS".to_string()],
        }));
        assert!(warnings.contains(&SchemaWarning::NoFieldPaths {
            type_name: "Island".to_string()
        }));
        assert!(warnings.contains(&SchemaWarning::NoRelationPaths {
            relation: "VISITS".to_string(),
            from: "Person".to_string(),
            to: "Island".to_string(),
        }));
    }

    #[test]
    fn test_configuration_errors() {
        let unknown_node = Schema::deduce(
            &catalog(),
            "Review",
            vec![NodeDeclaration::new("Ghost", "name")],
            vec![],
        );
        assert!(matches!(unknown_node, Err(EkgError::UnknownType(_))));

        let bad_embed = Schema::deduce(
            &catalog(),
            "Review",
            vec![NodeDeclaration::new("Review", "date").embed("people", "Person")],
            vec![],
        );
        assert!(matches!(bad_embed, Err(EkgError::EmbeddedTypeMismatch { .. })));

        let missing_embed = Schema::deduce(
            &catalog(),
            "Review",
            vec![NodeDeclaration::new("Review", "date").embed("budget", "Metrics")],
            vec![],
        );
        assert!(matches!(missing_embed, Err(EkgError::UnknownEmbeddedField { .. })));

        let empty_name = Schema::deduce(
            &catalog(),
            "Review",
            nodes(),
            vec![RelationDeclaration::new("Review", "Person", " ")],
        );
        assert!(matches!(empty_name, Err(EkgError::InvalidName { .. })));

        let orphan = Schema::deduce(
            &catalog(),
            "Review",
            vec![NodeDeclaration::new("Metrics", "tcv").embed_in_parent("Opportunity")],
            vec![],
        );
        assert!(matches!(orphan, Err(EkgError::UnknownParent { .. })));
    }

    #[test]
    fn test_legacy_embedding_excludes_parent_field() {
        let schema = Schema::deduce(
            &catalog(),
            "Review",
            vec![
                NodeDeclaration::new("Review", "date"),
                NodeDeclaration::new("Metrics", "tcv").embed_in_parent("Review"),
            ],
            vec![],
        )
        .unwrap();
        assert!(schema.node("Review").unwrap().is_excluded("metrics"));
        assert!(!schema.has_table("Metrics"));
    }
}
