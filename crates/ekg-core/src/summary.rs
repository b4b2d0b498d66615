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

//! Human-readable schema summary.

use std::fmt;

use crate::schema::Schema;

/// A plain-text view of a deduced schema.
#[derive(Debug, Clone)]
pub struct SchemaSummary<'a> {
    schema: &'a Schema,
}

impl Schema {
    /// Summarize node paths, exclusions, relation pairs and warnings.
    ///
    /// ```
    /// # use ekg_core::{FieldType, ModelCatalog, NodeDeclaration, Schema, TypeDef};
    /// let catalog = ModelCatalog::builder()
    ///     .model(TypeDef::new("Team").field("name", FieldType::string()))
    ///     .build()
    ///     .unwrap();
    /// let schema = Schema::deduce(&catalog, "Team", vec![NodeDeclaration::new("Team", "name")], vec![])
    ///     .unwrap();
    /// assert!(schema.summary().to_string().contains("Team"));
    /// ```
    pub fn summary(&self) -> SchemaSummary<'_> {
        SchemaSummary { schema: self }
    }
}

impl fmt::Display for SchemaSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.schema;
        writeln!(f, "Graph schema summary for {}", schema.root())?;

        writeln!(f)?;
        writeln!(f, "Nodes:")?;
        for node in schema.nodes() {
            let paths = if node.field_paths().is_empty() {
                "None".to_string()
            } else if node.field_paths().iter().all(String::is_empty) {
                "ROOT".to_string()
            } else {
                node.field_paths().join(", ")
            };
            let excluded = if node.excluded_fields().is_empty() {
                "None".to_string()
            } else {
                node.excluded_fields()
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            write!(
                f,
                "  {:<24} key=id  paths: {}  excluded: {}",
                node.type_name(),
                paths,
                excluded
            )?;
            if let Some(legacy) = &node.declaration().embed_in_parent {
                write!(f, "  (embedded in {})", legacy.parent)?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "Relationships:")?;
        for relation in schema.relations() {
            let pairs = if relation.path_pairs().is_empty() {
                "None".to_string()
            } else {
                relation
                    .path_pairs()
                    .iter()
                    .map(|(from, to)| format!("{} → {}", from, to))
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            writeln!(
                f,
                "  {:<24} {} → {}  pairs: {}",
                relation.name(),
                relation.from(),
                relation.to(),
                pairs
            )?;
        }

        if !schema.warnings().is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in schema.warnings() {
                writeln!(f, "  - {}", warning)?;
            }
        }
        Ok(())
    }
}
