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

//! Graph backend abstraction.
//!
//! The loader talks to a store only through [`GraphBackend`]. Three
//! implementations ship with this crate:
//!
//! - [`KuzuBackend`]: renders Kuzu DDL/DML and runs it through a
//!   host-supplied [`CypherConnector`]
//! - [`Neo4jBackend`]: placeholder, every operation is not implemented
//! - [`MemoryBackend`]: an in-process property graph with the same table
//!   rules, used for tests and for reading a loaded graph back

mod kuzu;
mod memory;
mod neo4j;

pub use kuzu::{CypherConnection, CypherConnector, KuzuBackend};
pub use memory::MemoryBackend;
pub use neo4j::Neo4jBackend;

use std::fmt;
use std::str::FromStr;

use ekg_core::{PropertyMap, Value};

use crate::error::{GraphError, Result};
use crate::plan::ColumnDef;

/// Tabular result of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Column names.
    pub columns: Vec<String>,
    /// Rows, one value per column.
    pub rows: Vec<Vec<Value>>,
}

impl QueryOutput {
    /// A result with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Capability interface of a property-graph store.
pub trait GraphBackend: Send {
    /// Open the store.
    fn connect(&mut self, connection_string: &str) -> Result<()>;

    /// Run a query in the backend's language with `$name` parameters.
    fn execute(&mut self, query: &str, parameters: &PropertyMap) -> Result<QueryOutput>;

    /// Create a node table.
    fn create_node_table(&mut self, name: &str, columns: &[ColumnDef], primary_key: &str)
        -> Result<()>;

    /// Create a relationship table between two node tables.
    fn create_relationship_table(
        &mut self,
        name: &str,
        from_table: &str,
        to_table: &str,
        properties: &[ColumnDef],
    ) -> Result<()>;

    /// Drop a node or relationship table.
    fn drop_table(&mut self, name: &str) -> Result<()>;

    /// Insert one node row.
    fn insert_node(&mut self, table: &str, data: &PropertyMap) -> Result<()>;

    /// Connect two nodes identified by their primary keys.
    fn insert_relationship(
        &mut self,
        relation: &str,
        from_table: &str,
        from_key: &str,
        to_table: &str,
        to_key: &str,
        properties: &PropertyMap,
    ) -> Result<()>;

    /// Close the store.
    fn close(&mut self) -> Result<()>;

    /// Name of the query language, e.g. `Cypher`.
    fn query_language(&self) -> &str;
}

/// Backends known to [`create_backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Kuzu embedded engine.
    Kuzu,
    /// Neo4j (placeholder).
    Neo4j,
    /// In-process memory graph.
    Memory,
}

impl BackendKind {
    /// Every kind, in display order.
    pub const ALL: [BackendKind; 3] = [BackendKind::Kuzu, BackendKind::Neo4j, BackendKind::Memory];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Kuzu => "kuzu",
            BackendKind::Neo4j => "neo4j",
            BackendKind::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| GraphError::UnknownBackend {
                name: s.to_string(),
                available: Self::ALL
                    .iter()
                    .map(BackendKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Create a backend that needs no host-supplied engine binding.
///
/// # Errors
///
/// Returns [`GraphError::ConnectorRequired`] for [`BackendKind::Kuzu`];
/// build a [`KuzuBackend`] with a connector instead.
///
/// # Examples
///
/// ```
/// # use ekg_graph::{create_backend, BackendKind};
/// let backend = create_backend("memory".parse().unwrap()).unwrap();
/// assert_eq!(backend.query_language(), "Cypher");
/// ```
pub fn create_backend(kind: BackendKind) -> Result<Box<dyn GraphBackend>> {
    match kind {
        BackendKind::Memory => Ok(Box::new(MemoryBackend::new())),
        BackendKind::Neo4j => Ok(Box::new(Neo4jBackend::new())),
        BackendKind::Kuzu => Err(GraphError::ConnectorRequired("kuzu")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("kuzu".parse::<BackendKind>().unwrap(), BackendKind::Kuzu);
        assert_eq!("Neo4j".parse::<BackendKind>().unwrap(), BackendKind::Neo4j);
        assert_eq!(" MEMORY ".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    }

    #[test]
    fn test_backend_kind_unknown_lists_available() {
        match "oracle".parse::<BackendKind>() {
            Err(GraphError::UnknownBackend { name, available }) => {
                assert_eq!(name, "oracle");
                assert_eq!(available, "kuzu, neo4j, memory");
            }
            other => panic!("expected UnknownBackend, got {:?}", other),
        }
    }

    #[test]
    fn test_create_backend() {
        assert!(create_backend(BackendKind::Memory).is_ok());
        assert!(create_backend(BackendKind::Neo4j).is_ok());
        assert!(matches!(
            create_backend(BackendKind::Kuzu),
            Err(GraphError::ConnectorRequired("kuzu"))
        ));
    }

    #[test]
    fn test_query_output() {
        let output = QueryOutput {
            columns: vec!["n".to_string()],
            rows: vec![vec![Value::Int(1)]],
        };
        assert_eq!(output.len(), 1);
        assert!(QueryOutput::empty().is_empty());
    }
}
