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

//! Table planning: node and relationship table definitions for a schema.
//!
//! Every declared node type (other than legacy embedded children) gets one
//! node table whose columns are, in order:
//!
//! 1. the four system columns (identity, display name, timestamps),
//! 2. the type's own fields minus its excluded fields,
//! 3. `{field}_`-prefixed fields of every embedded sub-object,
//! 4. prefixed fields of legacy children embedded into this type.
//!
//! Column types follow the model's field shapes after unwrapping optionals.

use std::collections::BTreeSet;
use std::fmt;

use ekg_core::{FieldType, ModelCatalog, ScalarType, Schema, SystemColumns};
use serde::{Deserialize, Serialize};

/// Column types of the Kuzu dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// `INT64`.
    Int64,
    /// `DOUBLE`.
    Double,
    /// `BOOLEAN`.
    Boolean,
    /// `STRING`.
    String,
    /// `STRING[]`.
    StringList,
}

impl ColumnType {
    /// Map a field shape to a column type.
    pub fn of(ty: &FieldType) -> Self {
        match ty.unwrap_optional() {
            FieldType::List(_) => ColumnType::StringList,
            FieldType::Scalar(ScalarType::Int) => ColumnType::Int64,
            FieldType::Scalar(ScalarType::Float) => ColumnType::Double,
            FieldType::Scalar(ScalarType::Bool) => ColumnType::Boolean,
            _ => ColumnType::String,
        }
    }

    /// The type name as written in DDL.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "INT64",
            ColumnType::Double => "DOUBLE",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::String => "STRING",
            ColumnType::StringList => "STRING[]",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub ty: ColumnType,
}

impl ColumnDef {
    /// Create a column definition.
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A node table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTablePlan {
    /// Table name (the node type).
    pub name: String,
    /// Columns in creation order.
    pub columns: Vec<ColumnDef>,
    /// Primary key column.
    pub primary_key: String,
}

impl NodeTablePlan {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A relationship table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelTablePlan {
    /// Table name (the relation name).
    pub name: String,
    /// Source node table.
    pub from: String,
    /// Target node table.
    pub to: String,
}

/// Every table to drop and create for one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlan {
    /// Tables to drop before creating, relationship tables first.
    pub drops: Vec<String>,
    /// Node tables in declaration order.
    pub nodes: Vec<NodeTablePlan>,
    /// Relationship tables whose endpoints both have node tables.
    pub relations: Vec<RelTablePlan>,
    /// Relations left out because an endpoint has no node table.
    pub skipped_relations: Vec<String>,
}

impl TablePlan {
    /// Look up a node table by name.
    pub fn node(&self, name: &str) -> Option<&NodeTablePlan> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Look up a relationship table by name.
    pub fn relation(&self, name: &str) -> Option<&RelTablePlan> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// Plan the tables of a schema.
pub fn plan_tables(schema: &Schema, columns: &SystemColumns) -> TablePlan {
    let catalog = schema.catalog();
    let mut plan = TablePlan::default();

    let mut dropped = BTreeSet::new();
    for relation in schema.relations() {
        if dropped.insert(relation.name().to_string()) {
            plan.drops.push(relation.name().to_string());
        }
    }
    for node in schema.nodes() {
        if dropped.insert(node.type_name().to_string()) {
            plan.drops.push(node.type_name().to_string());
        }
    }

    for node in schema.nodes() {
        if node.is_embedded_in_parent() || plan.node(node.type_name()).is_some() {
            continue;
        }
        let mut table = ColumnsBuilder::new(columns);

        if let Some(def) = catalog.get(node.type_name()) {
            for field in &def.fields {
                if !node.is_excluded(&field.name) {
                    table.push(field.name.clone(), ColumnType::of(&field.ty));
                }
            }
        }

        for embedded in &node.declaration().embedded {
            table.push_type(catalog, &embedded.prefix(), &embedded.type_name);
        }

        for child in schema.nodes() {
            let Some(legacy) = &child.declaration().embed_in_parent else {
                continue;
            };
            if legacy.parent == node.type_name() {
                let prefix = child.declaration().legacy_prefix().unwrap_or_default();
                table.push_type(catalog, &prefix, child.type_name());
            }
        }

        plan.nodes.push(NodeTablePlan {
            name: node.type_name().to_string(),
            columns: table.columns,
            primary_key: columns.id.clone(),
        });
    }

    for relation in schema.relations() {
        if schema.has_table(relation.from()) && schema.has_table(relation.to()) {
            plan.relations.push(RelTablePlan {
                name: relation.name().to_string(),
                from: relation.from().to_string(),
                to: relation.to().to_string(),
            });
        } else {
            plan.skipped_relations.push(relation.name().to_string());
        }
    }

    plan
}

struct ColumnsBuilder {
    columns: Vec<ColumnDef>,
    seen: BTreeSet<String>,
}

impl ColumnsBuilder {
    fn new(system: &SystemColumns) -> Self {
        let mut builder = Self {
            columns: Vec::new(),
            seen: BTreeSet::new(),
        };
        for name in system.all() {
            builder.push(name.to_string(), ColumnType::String);
        }
        builder
    }

    fn push(&mut self, name: String, ty: ColumnType) {
        if self.seen.insert(name.clone()) {
            self.columns.push(ColumnDef { name, ty });
        }
    }

    fn push_type(&mut self, catalog: &ModelCatalog, prefix: &str, type_name: &str) {
        if let Some(def) = catalog.get(type_name) {
            for field in &def.fields {
                self.push(format!("{}{}", prefix, field.name), ColumnType::of(&field.ty));
            }
        }
    }
}
