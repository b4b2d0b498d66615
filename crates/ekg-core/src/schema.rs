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

//! The deduced graph schema.
//!
//! A [`Schema`] is only ever produced by [`Schema::deduce`], which validates
//! the declarations and fills in every derived attribute in one pass. It is
//! read-only afterwards and can be reused for any number of extractions of
//! the same root type.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::declaration::{NodeDeclaration, RelationDeclaration};
use crate::introspect::FieldMap;
use crate::model::ModelCatalog;

/// A node declaration with its deduced attributes.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    pub(crate) declaration: NodeDeclaration,
    pub(crate) field_paths: Vec<String>,
    pub(crate) plural_at: BTreeMap<String, bool>,
    pub(crate) excluded: BTreeSet<String>,
}

impl NodeSchema {
    /// The original declaration.
    pub fn declaration(&self) -> &NodeDeclaration {
        &self.declaration
    }

    /// Target type name.
    pub fn type_name(&self) -> &str {
        &self.declaration.type_name
    }

    /// Every path at which the type occurs, in discovery order. The root
    /// type has the single path `""`.
    pub fn field_paths(&self) -> &[String] {
        &self.field_paths
    }

    /// Whether the type is held in a list at `path`.
    pub fn is_plural_at(&self, path: &str) -> bool {
        self.plural_at.get(path).copied().unwrap_or(false)
    }

    /// Fields left out of this node's rows.
    pub fn excluded_fields(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Whether a field is left out of this node's rows.
    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }

    /// Whether the type is flattened into a parent under the legacy form.
    pub fn is_embedded_in_parent(&self) -> bool {
        self.declaration.is_embedded_in_parent()
    }
}

/// A relation declaration with its deduced path pairs.
#[derive(Debug, Clone)]
pub struct RelationSchema {
    pub(crate) declaration: RelationDeclaration,
    pub(crate) path_pairs: Vec<(String, String)>,
}

impl RelationSchema {
    /// The original declaration.
    pub fn declaration(&self) -> &RelationDeclaration {
        &self.declaration
    }

    /// Relation name.
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    /// Source node type.
    pub fn from(&self) -> &str {
        &self.declaration.from
    }

    /// Target node type.
    pub fn to(&self) -> &str {
        &self.declaration.to
    }

    /// Structurally plausible `(from_path, to_path)` pairs.
    pub fn path_pairs(&self) -> &[(String, String)] {
        &self.path_pairs
    }
}

/// A coherence problem found during deduction.
///
/// Warnings never stop deduction; the schema runs degraded instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    /// A relation endpoint type has no node declaration.
    MissingNodeDeclaration {
        /// The undeclared type.
        type_name: String,
    },
    /// More than one relation connects the same ordered pair of types.
    DuplicateRelation {
        /// Source type.
        from: String,
        /// Target type.
        to: String,
        /// Names of the competing relations.
        names: Vec<String>,
    },
    /// A non-root node type does not occur anywhere under the root.
    NoFieldPaths {
        /// The unreachable type.
        type_name: String,
    },
    /// A relation kept no path pair.
    NoRelationPaths {
        /// Relation name.
        relation: String,
        /// Source type.
        from: String,
        /// Target type.
        to: String,
    },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::MissingNodeDeclaration { type_name } => write!(
                f,
                "type {} is referenced in relationships but has no node declaration",
                type_name
            ),
            SchemaWarning::DuplicateRelation { from, to, names } => write!(
                f,
                "multiple relationships defined between {} and {}: {}",
                from,
                to,
                names.join(", ")
            ),
            SchemaWarning::NoFieldPaths { type_name } => {
                write!(f, "no field paths found for {} in the model structure", type_name)
            }
            SchemaWarning::NoRelationPaths { relation, from, to } => write!(
                f,
                "no valid field paths found for relationship {} between {} and {}",
                relation, from, to
            ),
        }
    }
}

/// A validated, fully deduced graph schema.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) catalog: ModelCatalog,
    pub(crate) root: String,
    pub(crate) field_map: FieldMap,
    pub(crate) nodes: Vec<NodeSchema>,
    pub(crate) relations: Vec<RelationSchema>,
    pub(crate) warnings: Vec<SchemaWarning>,
}

impl Schema {
    /// The root type.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The catalog the schema was deduced from.
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The introspected field map.
    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// Node schemas in declaration order.
    pub fn nodes(&self) -> &[NodeSchema] {
        &self.nodes
    }

    /// Relation schemas in declaration order.
    pub fn relations(&self) -> &[RelationSchema] {
        &self.relations
    }

    /// Coherence warnings.
    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }

    /// The first node schema declared for a type.
    pub fn node(&self, type_name: &str) -> Option<&NodeSchema> {
        self.nodes.iter().find(|n| n.type_name() == type_name)
    }

    /// A relation schema by name.
    pub fn relation(&self, name: &str) -> Option<&RelationSchema> {
        self.relations.iter().find(|r| r.name() == name)
    }

    /// Whether a type has a node declaration that gets its own table.
    pub fn has_table(&self, type_name: &str) -> bool {
        self.nodes
            .iter()
            .any(|n| n.type_name() == type_name && !n.is_embedded_in_parent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        let w = SchemaWarning::DuplicateRelation {
            from: "Review".to_string(),
            to: "Person".to_string(),
            names: vec!["HAS_PERSON".to_string(), "KNOWS".to_string()],
        };
        assert_eq!(
            w.to_string(),
            "multiple relationships defined between Review and Person: HAS_PERSON, KNOWS"
        );

        let w = SchemaWarning::NoFieldPaths {
            type_name: "Ghost".to_string(),
        };
        assert!(w.to_string().contains("Ghost"));
    }

    #[test]
    fn test_schema_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Schema>();
    }
}
