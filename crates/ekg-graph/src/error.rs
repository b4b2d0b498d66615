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

//! Error types for graph backends and loading.

use ekg_core::EkgError;
use thiserror::Error;

/// Error type for backend and loader operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The backend does not implement this operation yet.
    #[error("{backend} backend not yet implemented: {operation}")]
    NotImplemented {
        /// Backend name.
        backend: &'static str,
        /// The attempted operation.
        operation: &'static str,
    },

    /// An operation was attempted before `connect` or after `close`.
    #[error("not connected to database")]
    NotConnected,

    /// Opening a connection failed.
    #[error("failed to connect to '{target}': {message}")]
    Connection {
        /// The connection string.
        target: String,
        /// Reason reported by the engine.
        message: String,
    },

    /// A statement was rejected by the engine.
    #[error("statement failed: {message} (statement: {statement})")]
    Statement {
        /// The rendered statement text.
        statement: String,
        /// Reason reported by the engine.
        message: String,
    },

    /// A table with this name already exists.
    #[error("table '{0}' already exists")]
    TableExists(String),

    /// No table with this name exists.
    #[error("table '{0}' does not exist")]
    UnknownTable(String),

    /// A node table cannot be dropped while a relationship table uses it.
    #[error("cannot drop table '{table}': relationship table '{relation}' depends on it")]
    TableInUse {
        /// The node table.
        table: String,
        /// The dependent relationship table.
        relation: String,
    },

    /// A property that is not a column of the table.
    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn {
        /// The table.
        table: String,
        /// The missing column.
        column: String,
    },

    /// The primary key is not one of the table's columns.
    #[error("primary key '{column}' is not a column of table '{table}'")]
    InvalidPrimaryKey {
        /// The table.
        table: String,
        /// The primary key column.
        column: String,
    },

    /// A node row whose primary key is null or missing.
    #[error("node row for table '{table}' has a null primary key")]
    NullPrimaryKey {
        /// The table.
        table: String,
    },

    /// A second node row with an existing primary key.
    #[error("duplicate primary key '{key}' in table '{table}'")]
    DuplicatePrimaryKey {
        /// The table.
        table: String,
        /// The key value.
        key: String,
    },

    /// A value that does not fit the column type.
    #[error("column '{table}.{column}' expects {expected}, found {found}")]
    TypeMismatch {
        /// The table.
        table: String,
        /// The column.
        column: String,
        /// Declared column type.
        expected: String,
        /// Kind of the offending value.
        found: String,
    },

    /// A relationship inserted between tables it is not bound to.
    #[error("relationship '{relation}' connects {expected}, not {found}")]
    EndpointMismatch {
        /// The relationship table.
        relation: String,
        /// Bound endpoints, `FROM -> TO`.
        expected: String,
        /// Requested endpoints, `FROM -> TO`.
        found: String,
    },

    /// A free-form query the backend cannot run.
    #[error("{backend} backend cannot execute query: {query}")]
    UnsupportedQuery {
        /// Backend name.
        backend: &'static str,
        /// The query text.
        query: String,
    },

    /// Backend lookup by an unknown name.
    #[error("unknown backend type '{name}'. Available: {available}")]
    UnknownBackend {
        /// The requested name.
        name: String,
        /// Comma-separated list of backend names.
        available: String,
    },

    /// The backend needs a host-supplied engine binding.
    #[error("{0} backend requires a host-supplied connector")]
    ConnectorRequired(&'static str),

    /// String length limit exceeded.
    #[error("string length {length} exceeds maximum allowed length {max_length} for property '{property}'")]
    StringLengthExceeded {
        /// Actual length of the string.
        length: usize,
        /// Maximum allowed length.
        max_length: usize,
        /// Property name where the violation occurred.
        property: String,
    },

    /// Schema or extraction error.
    #[error(transparent)]
    Core(#[from] EkgError),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_implemented() {
        let err = GraphError::NotImplemented {
            backend: "neo4j",
            operation: "connect",
        };
        assert_eq!(err.to_string(), "neo4j backend not yet implemented: connect");
    }

    #[test]
    fn test_error_display_statement_includes_text() {
        let err = GraphError::Statement {
            statement: "DROP TABLE Person".to_string(),
            message: "table does not exist".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DROP TABLE Person"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_error_display_unknown_backend() {
        let err = GraphError::UnknownBackend {
            name: "oracle".to_string(),
            available: "kuzu, neo4j, memory".to_string(),
        };
        assert!(err.to_string().contains("Available: kuzu, neo4j, memory"));
    }

    #[test]
    fn test_error_from_core_error() {
        let err: GraphError = EkgError::UnknownType("Ghost".to_string()).into();
        assert!(matches!(err, GraphError::Core(_)));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
