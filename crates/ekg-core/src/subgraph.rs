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

//! Named subgraphs and their registry.
//!
//! A [`Subgraph`] bundles one data model with its declarations and some
//! descriptive material for query front-ends. Hosts build a
//! [`SubgraphRegistry`] once at start-up and pass it to whatever needs to
//! pick a subgraph by name.

use std::collections::BTreeMap;

use crate::error::{EkgError, Result};
use crate::schema::Schema;
use crate::value::Object;

/// A named, self-describing graph schema source.
pub trait Subgraph: Send + Sync {
    /// Registry name.
    fn name(&self) -> &str;

    /// Deduce the schema for this subgraph.
    fn build_schema(&self) -> Result<Schema>;

    /// Example queries against the loaded graph.
    fn sample_queries(&self) -> Vec<String>;

    /// Node type to description.
    fn node_labels(&self) -> Result<BTreeMap<String, String>> {
        let schema = self.build_schema()?;
        Ok(schema
            .nodes()
            .iter()
            .map(|n| (n.type_name().to_string(), n.declaration().description.clone()))
            .collect())
    }

    /// Relation name to `(direction, description)`.
    fn relationship_labels(&self) -> Result<BTreeMap<String, (String, String)>> {
        let schema = self.build_schema()?;
        Ok(schema
            .relations()
            .iter()
            .map(|r| {
                (
                    r.name().to_string(),
                    (
                        format!("{} → {}", r.from(), r.to()),
                        r.declaration().description.clone(),
                    ),
                )
            })
            .collect())
    }

    /// A human-readable name for an instance.
    fn entity_name(&self, _instance: &Object) -> String {
        "Unknown Entity".to_string()
    }
}

/// Name to subgraph lookup.
#[derive(Default)]
pub struct SubgraphRegistry {
    subgraphs: BTreeMap<String, Box<dyn Subgraph>>,
}

impl SubgraphRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subgraph under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`EkgError::DuplicateSubgraph`] if the name is taken.
    pub fn register(&mut self, subgraph: Box<dyn Subgraph>) -> Result<()> {
        let name = subgraph.name().to_string();
        if self.subgraphs.contains_key(&name) {
            return Err(EkgError::DuplicateSubgraph(name));
        }
        self.subgraphs.insert(name, subgraph);
        Ok(())
    }

    /// Register a subgraph, builder style.
    pub fn with(mut self, subgraph: Box<dyn Subgraph>) -> Result<Self> {
        self.register(subgraph)?;
        Ok(self)
    }

    /// Look up a subgraph.
    ///
    /// # Errors
    ///
    /// Returns [`EkgError::UnknownSubgraph`] listing the registered names.
    pub fn get(&self, name: &str) -> Result<&dyn Subgraph> {
        self.subgraphs
            .get(name)
            .map(|s| &**s)
            .ok_or_else(|| EkgError::UnknownSubgraph {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names in order.
    pub fn names(&self) -> Vec<&str> {
        self.subgraphs.keys().map(String::as_str).collect()
    }

    /// Number of registered subgraphs.
    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }
}

impl std::fmt::Debug for SubgraphRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubgraphRegistry")
            .field("subgraphs", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{NodeDeclaration, RelationDeclaration};
    use crate::model::{FieldType, ModelCatalog, TypeDef};

    struct Tiny;

    impl Subgraph for Tiny {
        fn name(&self) -> &str {
            "tiny"
        }

        fn build_schema(&self) -> Result<Schema> {
            let catalog = ModelCatalog::builder()
                .model(
                    TypeDef::new("Team")
                        .field("name", FieldType::string())
                        .field("members", FieldType::list_of(FieldType::model("Person"))),
                )
                .model(TypeDef::new("Person").field("name", FieldType::string()))
                .build()?;
            Schema::deduce(
                &catalog,
                "Team",
                vec![
                    NodeDeclaration::new("Team", "name").describe("A team"),
                    NodeDeclaration::new("Person", "name").describe("A member"),
                ],
                vec![RelationDeclaration::new("Team", "Person", "HAS_MEMBER").describe("Membership")],
            )
        }

        fn sample_queries(&self) -> Vec<String> {
            vec!["MATCH (t:Team) RETURN t.name".to_string()]
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SubgraphRegistry::new().with(Box::new(Tiny)).unwrap();
        assert_eq!(registry.names(), vec!["tiny"]);
        assert_eq!(registry.get("tiny").unwrap().name(), "tiny");

        let err = registry.get("opportunity").err().unwrap();
        assert_eq!(
            err.to_string(),
            "unknown subgraph 'opportunity'. Available: tiny"
        );
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = SubgraphRegistry::new();
        registry.register(Box::new(Tiny)).unwrap();
        assert!(matches!(
            registry.register(Box::new(Tiny)),
            Err(EkgError::DuplicateSubgraph(_))
        ));
    }

    #[test]
    fn test_default_labels() {
        let labels = Tiny.node_labels().unwrap();
        assert_eq!(labels.get("Person").map(String::as_str), Some("A member"));

        let rels = Tiny.relationship_labels().unwrap();
        assert_eq!(
            rels.get("HAS_MEMBER"),
            Some(&("Team → Person".to_string(), "Membership".to_string()))
        );
        assert_eq!(Tiny.entity_name(&Object::new("Team")), "Unknown Entity");
    }
}
