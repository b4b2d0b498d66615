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

//! Loading extracted knowledge graphs into property graph stores.
//!
//! This crate takes the [`GraphData`](ekg_core::GraphData) produced by
//! `ekg-core` and writes it to a store:
//!
//! - [`plan_tables`] turns a deduced schema into node and relationship table
//!   definitions
//! - [`load`] drops, creates and fills those tables through a
//!   [`GraphBackend`]
//! - the [`cypher`] module renders the Kuzu dialect (DDL, `CREATE` and
//!   `MATCH .. CREATE` statements, escaped literals)
//!
//! # Mapping Strategy
//!
//! | Graph Concept | Store Representation |
//! |---------------|---------------------|
//! | Node type | `CREATE NODE TABLE T(.., PRIMARY KEY(id))` |
//! | Node row | `CREATE (:T {..})` |
//! | Relation | `CREATE REL TABLE R(FROM A TO B)` |
//! | Edge | `MATCH (a:A), (b:B) WHERE a.id = .. AND b.id = .. CREATE (a)-[:R]->(b)` |
//! | List field | `STRING[]` column |
//! | Enum / object field | `STRING` column (underlying value / JSON) |
//!
//! # Example
//!
//! ```rust
//! use ekg_core::{extract, FieldType, ModelCatalog, NodeDeclaration, Object, RelationDeclaration,
//!     Schema, TypeDef, Value};
//! use ekg_graph::{create_backend, load, BackendKind, MemoryBackend};
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
//! let schema = Schema::deduce(
//!     &catalog,
//!     "Review",
//!     vec![NodeDeclaration::new("Review", "date"), NodeDeclaration::new("Person", "name")],
//!     vec![RelationDeclaration::new("Review", "Person", "HAS_PERSON")],
//! )
//! .unwrap();
//! let review = Object::new("Review").with("date", "2024-01-01").with(
//!     "people",
//!     vec![Value::from(Object::new("Person").with("name", "Alice"))],
//! );
//! let data = extract(&review, &schema).unwrap();
//!
//! let mut store = MemoryBackend::new();
//! let report = load(&data, &mut store, &schema);
//! assert_eq!(report.edges_inserted, 1);
//! assert_eq!(store.edge_count("HAS_PERSON"), 1);
//!
//! assert!(create_backend(BackendKind::Memory).is_ok());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backend;
pub mod config;
pub mod cypher;
pub mod error;
pub mod loader;
pub mod plan;

// Re-export main types at crate root for convenience
pub use backend::{
    create_backend, BackendKind, CypherConnection, CypherConnector, GraphBackend, KuzuBackend,
    MemoryBackend, Neo4jBackend, QueryOutput,
};
pub use config::{LoadConfig, LoadConfigBuilder};
pub use error::{GraphError, Result};
pub use loader::{load, load_with_config, LoadFailure, LoadReport, LoadStage};
pub use plan::{plan_tables, ColumnDef, ColumnType, NodeTablePlan, RelTablePlan, TablePlan};
