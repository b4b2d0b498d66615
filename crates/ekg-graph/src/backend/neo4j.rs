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

//! Neo4j backend placeholder.

use ekg_core::PropertyMap;

use super::{GraphBackend, QueryOutput};
use crate::error::{GraphError, Result};
use crate::plan::ColumnDef;

/// Neo4j backend. Not implemented: every operation fails with
/// [`GraphError::NotImplemented`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Neo4jBackend;

impl Neo4jBackend {
    /// Create the placeholder backend.
    pub fn new() -> Self {
        Self
    }
}

fn not_implemented<T>(operation: &'static str) -> Result<T> {
    Err(GraphError::NotImplemented {
        backend: "neo4j",
        operation,
    })
}

impl GraphBackend for Neo4jBackend {
    fn connect(&mut self, _connection_string: &str) -> Result<()> {
        not_implemented("connect")
    }

    fn execute(&mut self, _query: &str, _parameters: &PropertyMap) -> Result<QueryOutput> {
        not_implemented("execute")
    }

    fn create_node_table(
        &mut self,
        _name: &str,
        _columns: &[ColumnDef],
        _primary_key: &str,
    ) -> Result<()> {
        not_implemented("create_node_table")
    }

    fn create_relationship_table(
        &mut self,
        _name: &str,
        _from_table: &str,
        _to_table: &str,
        _properties: &[ColumnDef],
    ) -> Result<()> {
        not_implemented("create_relationship_table")
    }

    fn drop_table(&mut self, _name: &str) -> Result<()> {
        not_implemented("drop_table")
    }

    fn insert_node(&mut self, _table: &str, _data: &PropertyMap) -> Result<()> {
        not_implemented("insert_node")
    }

    fn insert_relationship(
        &mut self,
        _relation: &str,
        _from_table: &str,
        _from_key: &str,
        _to_table: &str,
        _to_key: &str,
        _properties: &PropertyMap,
    ) -> Result<()> {
        not_implemented("insert_relationship")
    }

    fn close(&mut self) -> Result<()> {
        not_implemented("close")
    }

    fn query_language(&self) -> &str {
        "Cypher"
    }
}
