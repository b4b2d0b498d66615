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

//! Kuzu backend.
//!
//! Statements are rendered here and handed to the embedded engine through
//! a [`CypherConnection`]. The engine binding itself lives in the host
//! process, which supplies a [`CypherConnector`] able to open a database
//! directory.

use std::collections::HashMap;

use ekg_core::PropertyMap;
use tracing::debug;

use super::{GraphBackend, QueryOutput};
use crate::cypher::{CypherStatement, EdgeEndpoint};
use crate::error::{GraphError, Result};
use crate::plan::ColumnDef;

/// An open connection to the embedded engine.
pub trait CypherConnection: Send {
    /// Run one fully rendered statement.
    fn execute(&mut self, statement: &str) -> std::result::Result<QueryOutput, String>;
}

/// Opens [`CypherConnection`]s.
pub trait CypherConnector: Send {
    /// Open the database at `connection_string`.
    fn open(&self, connection_string: &str) -> std::result::Result<Box<dyn CypherConnection>, String>;
}

/// Kuzu-dialect backend over a host-supplied connection.
pub struct KuzuBackend {
    connector: Box<dyn CypherConnector>,
    connection: Option<Box<dyn CypherConnection>>,
    primary_keys: HashMap<String, String>,
}

impl KuzuBackend {
    /// Create a disconnected backend.
    pub fn new(connector: Box<dyn CypherConnector>) -> Self {
        Self {
            connector,
            connection: None,
            primary_keys: HashMap::new(),
        }
    }

    /// Whether a connection is open.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Primary key column of a node table created through this backend,
    /// `id` for tables it has not seen.
    pub fn primary_key_of(&self, table: &str) -> &str {
        self.primary_keys.get(table).map(String::as_str).unwrap_or("id")
    }

    fn run(&mut self, statement: &CypherStatement) -> Result<QueryOutput> {
        let connection = self.connection.as_mut().ok_or(GraphError::NotConnected)?;
        let text = statement.render_inline();
        debug!(statement = %text, "executing statement");
        connection
            .execute(&text)
            .map_err(|message| GraphError::Statement {
                statement: text,
                message,
            })
    }
}

impl std::fmt::Debug for KuzuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KuzuBackend")
            .field("connected", &self.is_connected())
            .field("tables", &self.primary_keys.len())
            .finish()
    }
}

impl GraphBackend for KuzuBackend {
    fn connect(&mut self, connection_string: &str) -> Result<()> {
        let connection =
            self.connector
                .open(connection_string)
                .map_err(|message| GraphError::Connection {
                    target: connection_string.to_string(),
                    message,
                })?;
        self.connection = Some(connection);
        Ok(())
    }

    fn execute(&mut self, query: &str, parameters: &PropertyMap) -> Result<QueryOutput> {
        self.run(&CypherStatement::query(query).with_params(parameters))
    }

    fn create_node_table(
        &mut self,
        name: &str,
        columns: &[ColumnDef],
        primary_key: &str,
    ) -> Result<()> {
        self.run(&CypherStatement::create_node_table(name, columns, primary_key))?;
        self.primary_keys
            .insert(name.to_string(), primary_key.to_string());
        Ok(())
    }

    fn create_relationship_table(
        &mut self,
        name: &str,
        from_table: &str,
        to_table: &str,
        properties: &[ColumnDef],
    ) -> Result<()> {
        self.run(&CypherStatement::create_rel_table(
            name, from_table, to_table, properties,
        ))
        .map(|_| ())
    }

    fn drop_table(&mut self, name: &str) -> Result<()> {
        self.run(&CypherStatement::drop_table(name))?;
        self.primary_keys.remove(name);
        Ok(())
    }

    fn insert_node(&mut self, table: &str, data: &PropertyMap) -> Result<()> {
        self.run(&CypherStatement::create_node(table, data)).map(|_| ())
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
        let statement = CypherStatement::create_relationship(
            relation,
            &EdgeEndpoint::new(from_table, self.primary_key_of(from_table), from_key),
            &EdgeEndpoint::new(to_table, self.primary_key_of(to_table), to_key),
            properties,
        );
        self.run(&statement).map(|_| ())
    }

    fn close(&mut self) -> Result<()> {
        self.connection = None;
        Ok(())
    }

    fn query_language(&self) -> &str {
        "Cypher"
    }
}
