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

//! Error types for schema deduction and extraction.
//!
//! Only configuration problems are errors. Coherence problems found while
//! deducing a schema are reported as [`SchemaWarning`](crate::SchemaWarning)s
//! instead, and resolution misses during extraction are silent skips.

use thiserror::Error;

/// Error type for catalog, schema and extraction operations.
#[derive(Debug, Error)]
pub enum EkgError {
    /// A type name that is not registered in the model catalog.
    #[error("unknown model type '{0}'")]
    UnknownType(String),

    /// The same type name was registered twice.
    #[error("model type '{0}' is registered more than once")]
    DuplicateType(String),

    /// A direct model reference that points at an unregistered type.
    #[error("field '{field}' of '{owner}' references unknown model type '{target}'")]
    UnresolvedField {
        /// The owning type.
        owner: String,
        /// The field name.
        field: String,
        /// The missing target type.
        target: String,
    },

    /// An embedded field that does not exist on the node type.
    #[error("node '{node}' embeds field '{field}' which '{node}' does not declare")]
    UnknownEmbeddedField {
        /// The embedding node type.
        node: String,
        /// The missing field.
        field: String,
    },

    /// An embedded field whose declared type differs from the model.
    #[error("node '{node}' embeds field '{field}' as '{expected}' but the field holds '{found}'")]
    EmbeddedTypeMismatch {
        /// The embedding node type.
        node: String,
        /// The embedded field.
        field: String,
        /// The type named in the declaration.
        expected: String,
        /// The type found in the model.
        found: String,
    },

    /// A legacy `embed_in_parent` declaration whose parent is not a declared node.
    #[error("node '{node}' is embedded in '{parent}' which has no node declaration")]
    UnknownParent {
        /// The embedded node type.
        node: String,
        /// The parent type.
        parent: String,
    },

    /// An empty or otherwise unusable declaration name.
    #[error("invalid {kind} name '{name}'")]
    InvalidName {
        /// What kind of name (relation, node, ...).
        kind: &'static str,
        /// The offending name.
        name: String,
    },

    /// The instance handed to the extractor is not of the schema's root type.
    #[error("instance of '{found}' does not match schema root '{expected}'")]
    RootMismatch {
        /// The schema root type.
        expected: String,
        /// The instance type.
        found: String,
    },

    /// A JSON document that does not fit the catalog.
    #[error("decode error at '{path}': {message}")]
    Decode {
        /// Dotted path of the offending value.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// Node count limit exceeded.
    #[error("node count {count} exceeds maximum allowed count {max_count}")]
    NodeCountExceeded {
        /// Number of nodes extracted so far.
        count: usize,
        /// Maximum allowed nodes.
        max_count: usize,
    },

    /// Subgraph lookup by an unknown name.
    #[error("unknown subgraph '{name}'. Available: {available}")]
    UnknownSubgraph {
        /// The requested name.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },

    /// A subgraph registered under an already taken name.
    #[error("subgraph '{0}' is already registered")]
    DuplicateSubgraph(String),

    /// Serialization error from serde_json.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EkgError {
    pub(crate) fn decode(path: &str, message: impl Into<String>) -> Self {
        EkgError::Decode {
            path: if path.is_empty() {
                "root".to_string()
            } else {
                path.to_string()
            },
            message: message.into(),
        }
    }
}

/// Result type alias for ekg-core operations.
pub type Result<T> = std::result::Result<T, EkgError>;
