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

//! In-process property graph.
//!
//! Tables follow the rules of the embedded engine: node and relationship
//! tables share one namespace, node rows are typed and keyed by their
//! primary key, relationship tables are bound to one source and one target
//! node table, and a node table cannot be dropped while a relationship
//! table refers to it. A relationship insert whose endpoints are not found
//! creates nothing, like a `MATCH .. CREATE` that matches no rows.

use std::collections::{BTreeMap, HashMap};

use ekg_core::{PropertyMap, Value};
use tracing::debug;

use super::{GraphBackend, QueryOutput};
use crate::cypher::flatten;
use crate::error::{GraphError, Result};
use crate::plan::{ColumnDef, ColumnType};

#[derive(Debug, Clone)]
struct NodeTableData {
    columns: Vec<ColumnDef>,
    primary_key: String,
    rows: Vec<PropertyMap>,
    index: HashMap<String, usize>,
}

impl NodeTableData {
    fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone)]
struct StoredEdge {
    from: String,
    to: String,
    properties: PropertyMap,
}

#[derive(Debug, Clone)]
struct RelTableData {
    from: String,
    to: String,
    properties: Vec<ColumnDef>,
    edges: Vec<StoredEdge>,
}

/// An embedded in-process graph store.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    connected: bool,
    nodes: BTreeMap<String, NodeTableData>,
    relations: BTreeMap<String, RelTableData>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty, connected store.
    pub fn new() -> Self {
        Self {
            connected: true,
            nodes: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Names of all node and relationship tables, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .nodes
            .keys()
            .chain(self.relations.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Columns of a node table.
    pub fn columns(&self, table: &str) -> Option<&[ColumnDef]> {
        self.nodes.get(table).map(|t| t.columns.as_slice())
    }

    /// Primary key column of a node table.
    pub fn primary_key(&self, table: &str) -> Option<&str> {
        self.nodes.get(table).map(|t| t.primary_key.as_str())
    }

    /// Endpoint tables of a relationship table.
    pub fn endpoints(&self, relation: &str) -> Option<(&str, &str)> {
        self.relations
            .get(relation)
            .map(|r| (r.from.as_str(), r.to.as_str()))
    }

    /// Rows of a node table, in insertion order.
    pub fn rows(&self, table: &str) -> &[PropertyMap] {
        self.nodes
            .get(table)
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[])
    }

    /// A node row by primary key.
    pub fn row(&self, table: &str, key: &str) -> Option<&PropertyMap> {
        let data = self.nodes.get(table)?;
        data.index.get(key).and_then(|&i| data.rows.get(i))
    }

    /// Number of rows in a node table.
    pub fn node_count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    /// Number of edges in a relationship table.
    pub fn edge_count(&self, relation: &str) -> usize {
        self.relations
            .get(relation)
            .map(|r| r.edges.len())
            .unwrap_or(0)
    }

    /// Rows across all node tables.
    pub fn total_nodes(&self) -> usize {
        self.nodes.values().map(|t| t.rows.len()).sum()
    }

    /// Edges across all relationship tables.
    pub fn total_edges(&self) -> usize {
        self.relations.values().map(|r| r.edges.len()).sum()
    }

    /// Every node as `(identity, properties)`, with the table name under
    /// `_label`.
    pub fn nodes(&self) -> Vec<(String, PropertyMap)> {
        let mut out = Vec::new();
        for (table, data) in &self.nodes {
            for row in &data.rows {
                let id = row
                    .get(&data.primary_key)
                    .map(Value::to_string)
                    .unwrap_or_default();
                let mut properties = row.clone();
                properties.insert("_label".to_string(), Value::from(table.as_str()));
                out.push((id, properties));
            }
        }
        out
    }

    /// Every edge as `(source, target, relation, properties)`.
    pub fn edges(&self) -> Vec<(String, String, String, PropertyMap)> {
        let mut out = Vec::new();
        for (relation, data) in &self.relations {
            for edge in &data.edges {
                out.push((
                    edge.from.clone(),
                    edge.to.clone(),
                    relation.clone(),
                    edge.properties.clone(),
                ));
            }
        }
        out
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(GraphError::NotConnected)
        }
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.nodes.contains_key(name) || self.relations.contains_key(name) {
            Err(GraphError::TableExists(name.to_string()))
        } else {
            Ok(())
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Enum(_) => "enum",
        Value::List(_) => "list",
        Value::Object(_) => "object",
    }
}

fn coerce(table: &str, column: &ColumnDef, value: &Value) -> Result<Value> {
    let coerced = match (column.ty, value) {
        (_, Value::Null) => Some(Value::Null),
        (ColumnType::Int64, Value::Int(n)) => Some(Value::Int(*n)),
        (ColumnType::Double, Value::Float(f)) => Some(Value::Float(*f)),
        (ColumnType::Double, Value::Int(n)) => Some(Value::Float(*n as f64)),
        (ColumnType::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
        (ColumnType::String, Value::String(s)) => Some(Value::String(s.clone())),
        (ColumnType::String, Value::Enum(e)) => Some(Value::from(e.underlying_value())),
        (ColumnType::String, Value::Object(_)) => Some(Value::String(flatten(value))),
        (ColumnType::StringList, Value::List(items)) => Some(Value::List(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Value::Null,
                    other => Value::String(flatten(other)),
                })
                .collect(),
        )),
        _ => None,
    };
    coerced.ok_or_else(|| GraphError::TypeMismatch {
        table: table.to_string(),
        column: column.name.clone(),
        expected: column.ty.to_string(),
        found: kind(value).to_string(),
    })
}

impl GraphBackend for MemoryBackend {
    fn connect(&mut self, _connection_string: &str) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn execute(&mut self, query: &str, _parameters: &PropertyMap) -> Result<QueryOutput> {
        self.ensure_connected()?;
        Err(GraphError::UnsupportedQuery {
            backend: "memory",
            query: query.to_string(),
        })
    }

    fn create_node_table(
        &mut self,
        name: &str,
        columns: &[ColumnDef],
        primary_key: &str,
    ) -> Result<()> {
        self.ensure_connected()?;
        self.ensure_free(name)?;
        if !columns.iter().any(|c| c.name == primary_key) {
            return Err(GraphError::InvalidPrimaryKey {
                table: name.to_string(),
                column: primary_key.to_string(),
            });
        }
        self.nodes.insert(
            name.to_string(),
            NodeTableData {
                columns: columns.to_vec(),
                primary_key: primary_key.to_string(),
                rows: Vec::new(),
                index: HashMap::new(),
            },
        );
        Ok(())
    }

    fn create_relationship_table(
        &mut self,
        name: &str,
        from_table: &str,
        to_table: &str,
        properties: &[ColumnDef],
    ) -> Result<()> {
        self.ensure_connected()?;
        self.ensure_free(name)?;
        for endpoint in [from_table, to_table] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::UnknownTable(endpoint.to_string()));
            }
        }
        self.relations.insert(
            name.to_string(),
            RelTableData {
                from: from_table.to_string(),
                to: to_table.to_string(),
                properties: properties.to_vec(),
                edges: Vec::new(),
            },
        );
        Ok(())
    }

    fn drop_table(&mut self, name: &str) -> Result<()> {
        self.ensure_connected()?;
        if self.relations.remove(name).is_some() {
            return Ok(());
        }
        if !self.nodes.contains_key(name) {
            return Err(GraphError::UnknownTable(name.to_string()));
        }
        if let Some((relation, _)) = self
            .relations
            .iter()
            .find(|(_, r)| r.from == name || r.to == name)
        {
            return Err(GraphError::TableInUse {
                table: name.to_string(),
                relation: relation.clone(),
            });
        }
        self.nodes.remove(name);
        Ok(())
    }

    fn insert_node(&mut self, table: &str, data: &PropertyMap) -> Result<()> {
        self.ensure_connected()?;
        let target = self
            .nodes
            .get_mut(table)
            .ok_or_else(|| GraphError::UnknownTable(table.to_string()))?;

        let mut row: PropertyMap = target
            .columns
            .iter()
            .map(|c| (c.name.clone(), Value::Null))
            .collect();
        for (name, value) in data {
            let column = target.column(name).ok_or_else(|| GraphError::UnknownColumn {
                table: table.to_string(),
                column: name.clone(),
            })?;
            row.insert(name.clone(), coerce(table, column, value)?);
        }

        let key = match row.get(&target.primary_key) {
            Some(Value::Null) | None => {
                return Err(GraphError::NullPrimaryKey {
                    table: table.to_string(),
                })
            }
            Some(value) => value.to_string(),
        };
        if target.index.contains_key(&key) {
            return Err(GraphError::DuplicatePrimaryKey {
                table: table.to_string(),
                key,
            });
        }
        target.index.insert(key, target.rows.len());
        target.rows.push(row);
        Ok(())
    }

    fn insert_relationship(
        &mut self,
        relation: &str,
        from_table: &str,
        from_key: &str,
        to_table: &str,
        to_key: &str,
        properties: &PropertyMap,
    ) -> Result<()> {
        self.ensure_connected()?;
        let rel = self
            .relations
            .get(relation)
            .ok_or_else(|| GraphError::UnknownTable(relation.to_string()))?;
        if rel.from != from_table || rel.to != to_table {
            return Err(GraphError::EndpointMismatch {
                relation: relation.to_string(),
                expected: format!("{} -> {}", rel.from, rel.to),
                found: format!("{} -> {}", from_table, to_table),
            });
        }

        let mut stored = PropertyMap::new();
        for (name, value) in properties {
            let column = rel
                .properties
                .iter()
                .find(|c| &c.name == name)
                .ok_or_else(|| GraphError::UnknownColumn {
                    table: relation.to_string(),
                    column: name.clone(),
                })?;
            stored.insert(name.clone(), coerce(relation, column, value)?);
        }

        let found = |table: &str, key: &str| {
            self.nodes
                .get(table)
                .map(|t| t.index.contains_key(key))
                .unwrap_or(false)
        };
        if !found(from_table, from_key) || !found(to_table, to_key) {
            debug!(
                relation = %relation,
                from = %from_key,
                to = %to_key,
                "relationship endpoints not found, nothing created"
            );
            return Ok(());
        }

        if let Some(rel) = self.relations.get_mut(relation) {
            rel.edges.push(StoredEdge {
                from: from_key.to_string(),
                to: to_key.to_string(),
                properties: stored,
            });
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn query_language(&self) -> &str {
        "Cypher"
    }
}
