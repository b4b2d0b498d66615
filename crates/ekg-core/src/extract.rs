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

//! Instance-to-graph extraction.
//!
//! Extraction runs in two passes over one instance:
//!
//! 1. **Nodes**: every declared node type is looked up at each of its
//!    deduced paths. Each object found becomes a row with a fresh UUID, a
//!    display name, flattened embedded fields and timestamps. Rows are
//!    deduplicated per type (first wins) and their identities recorded in an
//!    [`IdentityRegistry`].
//! 2. **Edges**: every relation path pair is walked again and both endpoints
//!    are looked up in the registry. Unresolved endpoints are skipped.
//!
//! The second pass depends on the registry being complete, since a relation
//! may point at an entity first seen under a different path.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::ExtractConfig;
use crate::error::{EkgError, Result};
use crate::path::{relative_to, resolve};
use crate::schema::{NodeSchema, Schema};
use crate::value::{Object, PropertyMap, Value};

/// Node rows keyed by node type.
pub type NodeTable = BTreeMap<String, Vec<PropertyMap>>;

/// A directed edge between two extracted nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node type.
    pub from_type: String,
    /// Source node identity.
    pub from_id: String,
    /// Target node type.
    pub to_type: String,
    /// Target node identity.
    pub to_id: String,
    /// Relation name.
    pub relation: String,
}

/// The result of an extraction: node rows and edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphData {
    /// Node rows by type.
    pub nodes: NodeTable,
    /// Edge tuples.
    pub edges: Vec<Edge>,
}

impl GraphData {
    /// Rows of a node type; empty if the type has none.
    pub fn rows(&self, node_type: &str) -> &[PropertyMap] {
        self.nodes.get(node_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of node rows.
    pub fn node_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges of one relation.
    pub fn edges_named<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.relation == relation)
    }

    /// Whether a row with the given identity exists for a node type.
    pub fn contains_id(&self, node_type: &str, id_column: &str, id: &str) -> bool {
        self.rows(node_type)
            .iter()
            .any(|row| row.get(id_column).and_then(Value::as_str) == Some(id))
    }
}

/// Per-type map from deduplication value to assigned identity.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    ids: HashMap<String, HashMap<String, String>>,
}

impl IdentityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity. Returns `false` if the key was already taken,
    /// in which case the existing identity is kept.
    pub fn register(&mut self, node_type: &str, key: String, id: String) -> bool {
        let ids = self.ids.entry(node_type.to_string()).or_default();
        if ids.contains_key(&key) {
            return false;
        }
        ids.insert(key, id);
        true
    }

    /// Look up an identity.
    pub fn lookup(&self, node_type: &str, key: &str) -> Option<&str> {
        self.ids.get(node_type)?.get(key).map(String::as_str)
    }

    /// Number of registered identities for a type.
    pub fn len(&self, node_type: &str) -> usize {
        self.ids.get(node_type).map(HashMap::len).unwrap_or(0)
    }
}

/// Extract node rows and edges with the default configuration.
///
/// # Errors
///
/// Returns [`EkgError::RootMismatch`] if the instance is not of the schema's
/// root type.
pub fn extract(instance: &Object, schema: &Schema) -> Result<GraphData> {
    extract_with_config(instance, schema, &ExtractConfig::default())
}

/// Extract node rows and edges.
///
/// # Errors
///
/// Returns [`EkgError::RootMismatch`] if the instance is not of the schema's
/// root type and [`EkgError::NodeCountExceeded`] if `max_nodes` is set and
/// exceeded.
pub fn extract_with_config(
    instance: &Object,
    schema: &Schema,
    config: &ExtractConfig,
) -> Result<GraphData> {
    if instance.type_name != schema.root() {
        return Err(EkgError::RootMismatch {
            expected: schema.root().to_string(),
            found: instance.type_name.clone(),
        });
    }

    let mut extractor = Extractor {
        instance,
        schema,
        config,
        timestamp: Utc::now().to_rfc3339(),
        registry: IdentityRegistry::new(),
        unkeyed: HashMap::new(),
        data: GraphData::default(),
    };
    extractor.extract_nodes()?;
    extractor.extract_edges();

    debug!(
        root = %schema.root(),
        nodes = extractor.data.node_count(),
        edges = extractor.data.edge_count(),
        "extracted graph data"
    );
    Ok(extractor.data)
}

struct Extractor<'a> {
    instance: &'a Object,
    schema: &'a Schema,
    config: &'a ExtractConfig,
    timestamp: String,
    registry: IdentityRegistry,
    /// Identities of rows without a dedup value, keyed by type and the
    /// address of the instance object they were built from.
    unkeyed: HashMap<(String, usize), String>,
    data: GraphData,
}

impl<'a> Extractor<'a> {
    fn extract_nodes(&mut self) -> Result<()> {
        let mut count = 0;

        for node in self.schema.nodes() {
            if node.is_embedded_in_parent() {
                continue;
            }
            let type_name = node.type_name();
            self.data.nodes.entry(type_name.to_string()).or_default();

            for path in node.field_paths() {
                for item in resolve(self.instance, path) {
                    let id = Uuid::new_v4().to_string();
                    let row = self.build_row(node, path, item, &id);

                    let keep = match node.declaration().dedup_value(&item.fields) {
                        Some(key) => self.registry.register(type_name, key, id),
                        None => {
                            let slot = (type_name.to_string(), address(item));
                            if self.unkeyed.contains_key(&slot) {
                                false
                            } else {
                                self.unkeyed.insert(slot, id);
                                true
                            }
                        }
                    };
                    if !keep {
                        continue;
                    }

                    count += 1;
                    if let Some(max) = self.config.max_nodes {
                        if count > max {
                            return Err(EkgError::NodeCountExceeded {
                                count,
                                max_count: max,
                            });
                        }
                    }
                    if let Some(rows) = self.data.nodes.get_mut(type_name) {
                        rows.push(row);
                    }
                }
            }
        }
        Ok(())
    }

    fn build_row(&self, node: &NodeSchema, path: &str, item: &Object, id: &str) -> PropertyMap {
        let declaration = node.declaration();
        let columns = &self.config.columns;
        let name = declaration.display_name(&item.fields);

        let mut row: PropertyMap = item
            .fields
            .iter()
            .filter(|(field, _)| !node.is_excluded(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();

        for embedded in &declaration.embedded {
            if let Some(Value::Object(sub)) = item.get(&embedded.field) {
                flatten_into(&mut row, &embedded.prefix(), sub);
            }
        }

        for child in self.schema.nodes() {
            let Some(legacy) = &child.declaration().embed_in_parent else {
                continue;
            };
            if legacy.parent != node.type_name() {
                continue;
            }
            let prefix = child.declaration().legacy_prefix().unwrap_or_default();
            let found = child
                .field_paths()
                .iter()
                .filter_map(|child_path| relative_to(child_path, path))
                .find_map(|rest| resolve(item, rest).into_iter().next());
            if let Some(sub) = found {
                flatten_into(&mut row, &prefix, sub);
            }
        }

        row.insert(columns.id.clone(), Value::from(id));
        row.insert(columns.name.clone(), Value::from(name));
        row.insert(columns.created_at.clone(), Value::from(self.timestamp.as_str()));
        row.insert(columns.updated_at.clone(), Value::from(self.timestamp.as_str()));
        row
    }

    fn extract_edges(&mut self) {
        let mut seen = HashSet::new();

        for relation in self.schema.relations() {
            let (Some(from_node), Some(to_node)) = (
                self.schema.node(relation.from()),
                self.schema.node(relation.to()),
            ) else {
                continue;
            };
            if from_node.is_embedded_in_parent() || to_node.is_embedded_in_parent() {
                continue;
            }

            for (from_path, to_path) in relation.path_pairs() {
                for source in resolve(self.instance, from_path) {
                    let Some(from_id) = self.identity_of(from_node, source) else {
                        continue;
                    };

                    let targets = match relative_to(to_path, from_path) {
                        Some(rest) => resolve(source, rest),
                        None => resolve(self.instance, to_path),
                    };
                    for target in targets {
                        let Some(to_id) = self.identity_of(to_node, target) else {
                            continue;
                        };
                        let edge = Edge {
                            from_type: relation.from().to_string(),
                            from_id: from_id.clone(),
                            to_type: relation.to().to_string(),
                            to_id,
                            relation: relation.name().to_string(),
                        };
                        if seen.insert(edge.clone()) {
                            self.data.edges.push(edge);
                        }
                    }
                }
            }
        }
    }

    fn identity_of(&self, node: &NodeSchema, item: &Object) -> Option<String> {
        match node.declaration().dedup_value(&item.fields) {
            Some(key) => self
                .registry
                .lookup(node.type_name(), &key)
                .map(str::to_string),
            None => self
                .unkeyed
                .get(&(node.type_name().to_string(), address(item)))
                .cloned(),
        }
    }
}

/// Both passes resolve paths against the same borrowed instance, so an
/// object's address identifies it for the duration of one extraction.
fn address(item: &Object) -> usize {
    item as *const Object as usize
}

fn flatten_into(row: &mut PropertyMap, prefix: &str, sub: &Object) {
    for (field, value) in &sub.fields {
        row.insert(format!("{}{}", prefix, field), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{NodeDeclaration, RelationDeclaration};
    use crate::model::{FieldType, ModelCatalog, TypeDef};

    fn catalog() -> ModelCatalog {
        ModelCatalog::builder()
            .model(
                TypeDef::new("Account")
                    .field("name", FieldType::string())
                    .field("customers", FieldType::list_of(FieldType::model("Customer")))
                    .field("metrics", FieldType::optional(FieldType::model("Metrics"))),
            )
            .model(
                TypeDef::new("Customer")
                    .field("name", FieldType::string())
                    .field("contacts", FieldType::list_of(FieldType::model("Person"))),
            )
            .model(
                TypeDef::new("Person")
                    .field("name", FieldType::string())
                    .field("email", FieldType::optional(FieldType::string())),
            )
            .model(
                TypeDef::new("Metrics")
                    .field("tcv", FieldType::float())
                    .field("margin", FieldType::float()),
            )
            .build()
            .unwrap()
    }

    fn schema(person: NodeDeclaration) -> Schema {
        Schema::deduce(
            &catalog(),
            "Account",
            vec![
                NodeDeclaration::new("Account", "name").embed("metrics", "Metrics"),
                NodeDeclaration::new("Customer", "name"),
                person,
            ],
            vec![
                RelationDeclaration::new("Account", "Customer", "HAS_CUSTOMER"),
                RelationDeclaration::new("Customer", "Person", "HAS_CONTACT"),
            ],
        )
        .unwrap()
    }

    fn person(name: &str, email: &str) -> Value {
        Value::from(
            Object::new("Person")
                .with("name", name)
                .with("email", email),
        )
    }

    fn account() -> Object {
        Object::new("Account")
            .with("name", "Acme")
            .with(
                "metrics",
                Object::new("Metrics").with("tcv", 1.5).with("margin", 0.2),
            )
            .with(
                "customers",
                vec![
                    Value::from(
                        Object::new("Customer")
                            .with("name", "North")
                            .with("contacts", vec![person("Alice", "a@x.io")]),
                    ),
                    Value::from(
                        Object::new("Customer")
                            .with("name", "South")
                            .with("contacts", vec![person("Bob", "b@x.io"), person("Carol", "")]),
                    ),
                ],
            )
    }

    #[test]
    fn test_rows_carry_system_and_embedded_fields() {
        let data = extract(&account(), &schema(NodeDeclaration::new("Person", "name"))).unwrap();

        let rows = data.rows("Account");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("_name"), Some(&Value::from("Acme")));
        assert_eq!(row.get("metrics_tcv"), Some(&Value::Float(1.5)));
        assert!(row.get("metrics").is_none());
        assert!(row.get("customers").is_none());
        assert_eq!(row.get("_created_at"), row.get("_updated_at"));
        assert!(row.get("id").and_then(Value::as_str).is_some());
    }

    #[test]
    fn test_targets_resolved_relative_to_source() {
        let data = extract(&account(), &schema(NodeDeclaration::new("Person", "name"))).unwrap();
        assert_eq!(data.rows("Person").len(), 3);

        let north_id = data.rows("Customer")[0]
            .get("id")
            .and_then(Value::as_str)
            .unwrap()
            .to_string();
        let north_contacts: Vec<_> = data
            .edges_named("HAS_CONTACT")
            .filter(|e| e.from_id == north_id)
            .collect();
        assert_eq!(north_contacts.len(), 1);
        assert_eq!(data.edges_named("HAS_CONTACT").count(), 3);
        assert_eq!(data.edges_named("HAS_CUSTOMER").count(), 2);
    }

    #[test]
    fn test_blank_dedup_value_row_is_still_an_endpoint() {
        let data = extract(
            &account(),
            &schema(NodeDeclaration::new("Person", "name").dedup_by("email")),
        )
        .unwrap();
        // Carol has an empty email and keeps her own identity
        assert_eq!(data.rows("Person").len(), 3);
        assert_eq!(data.edges_named("HAS_CONTACT").count(), 3);

        let carol_id = data
            .rows("Person")
            .iter()
            .find(|row| row.get("_name") == Some(&Value::from("Carol")))
            .and_then(|row| row.get("id"))
            .and_then(Value::as_str)
            .unwrap()
            .to_string();
        let south_id = data.rows("Customer")[1]
            .get("id")
            .and_then(Value::as_str)
            .unwrap()
            .to_string();
        assert!(data
            .edges_named("HAS_CONTACT")
            .any(|e| e.from_id == south_id && e.to_id == carol_id));
    }

    #[test]
    fn test_blank_dedup_values_are_not_merged() {
        let instance = account().with(
            "customers",
            vec![Value::from(
                Object::new("Customer")
                    .with("name", "West")
                    .with("contacts", vec![person("Carol", ""), person("Dan", "")]),
            )],
        );
        let data = extract(
            &instance,
            &schema(NodeDeclaration::new("Person", "name").dedup_by("email")),
        )
        .unwrap();
        assert_eq!(data.rows("Person").len(), 2);
        assert_eq!(data.edges_named("HAS_CONTACT").count(), 2);
        for edge in &data.edges {
            assert!(data.contains_id(&edge.to_type, "id", &edge.to_id));
        }
    }

    #[test]
    fn test_every_edge_references_extracted_rows() {
        let data = extract(&account(), &schema(NodeDeclaration::new("Person", "name"))).unwrap();
        for edge in &data.edges {
            assert!(data.contains_id(&edge.from_type, "id", &edge.from_id));
            assert!(data.contains_id(&edge.to_type, "id", &edge.to_id));
        }
    }

    #[test]
    fn test_root_mismatch() {
        let s = schema(NodeDeclaration::new("Person", "name"));
        let err = extract(&Object::new("Customer"), &s).unwrap_err();
        assert!(matches!(err, EkgError::RootMismatch { .. }));
    }

    #[test]
    fn test_max_nodes() {
        let s = schema(NodeDeclaration::new("Person", "name"));
        let config = ExtractConfig::new().with_max_nodes(2);
        let err = extract_with_config(&account(), &s, &config).unwrap_err();
        assert!(matches!(err, EkgError::NodeCountExceeded { max_count: 2, .. }));
    }

    #[test]
    fn test_registry_first_wins() {
        let mut registry = IdentityRegistry::new();
        assert!(registry.register("Person", "Alice".into(), "1".into()));
        assert!(!registry.register("Person", "Alice".into(), "2".into()));
        assert_eq!(registry.lookup("Person", "Alice"), Some("1"));
        assert_eq!(registry.len("Person"), 1);
        assert_eq!(registry.lookup("Customer", "Alice"), None);
    }
}
