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

//! # EKG - Enterprise Knowledge Graph
//!
//! Turns tree-shaped business documents into property graphs. A handful of
//! node and relation declarations is enough: where each node type lives in
//! the document, which edges connect them and which fields stay on the
//! parent row are all deduced from the model.
//!
//! ## Quick Start
//!
//! ```rust
//! use ekg::{
//!     build_graph, FieldType, MemoryBackend, ModelCatalog, NodeDeclaration, Object,
//!     RelationDeclaration, Schema, TypeDef, Value,
//! };
//!
//! let catalog = ModelCatalog::builder()
//!     .model(
//!         TypeDef::new("Review")
//!             .field("date", FieldType::string())
//!             .field("people", FieldType::list_of(FieldType::model("Person"))),
//!     )
//!     .model(TypeDef::new("Person").field("name", FieldType::string()))
//!     .build()
//!     .unwrap();
//!
//! let schema = Schema::deduce(
//!     &catalog,
//!     "Review",
//!     vec![NodeDeclaration::new("Review", "date"), NodeDeclaration::new("Person", "name")],
//!     vec![RelationDeclaration::new("Review", "Person", "HAS_PERSON")],
//! )
//! .unwrap();
//!
//! let review = Object::new("Review").with("date", "2024-01-01").with(
//!     "people",
//!     vec![
//!         Value::from(Object::new("Person").with("name", "Alice")),
//!         Value::from(Object::new("Person").with("name", "Bob")),
//!     ],
//! );
//!
//! let mut store = MemoryBackend::new();
//! let build = build_graph(&mut store, &review, &schema).unwrap();
//! assert_eq!(build.report.edges_inserted, 2);
//! assert_eq!(store.node_count("Person"), 2);
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: model catalog, schema deduction and extraction
//! - [`graph`]: backends, Cypher rendering and the loader

// Re-export the main types
pub use ekg_core::{
    extract, extract_with_config, index_entries, Edge, EkgError, EnumDef, EnumValue,
    ExtractConfig, FieldType, GraphData, IndexEntry, ModelCatalog, NodeDeclaration, Object,
    PropertyMap, RelationDeclaration, Schema, SchemaWarning, Subgraph, SubgraphRegistry,
    SystemColumns, TypeDef, Value,
};
pub use ekg_graph::{
    create_backend, load, load_with_config, BackendKind, CypherConnection, CypherConnector,
    GraphBackend, GraphError, KuzuBackend, LoadConfig, LoadReport, MemoryBackend, Neo4jBackend,
};

mod pipeline;
pub use pipeline::{build_graph, build_graph_with_config, GraphBuild};

pub mod schema {
    //! Model catalog, schema deduction and extraction
    pub use ekg_core::*;
}

pub mod graph {
    //! Graph backends and loading
    pub use ekg_graph::*;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_module_reexports() {
        let kind: graph::BackendKind = "memory".parse().unwrap();
        assert_eq!(kind, BackendKind::Memory);
        assert_eq!(schema::SystemColumns::default().id, "id");
    }
}
