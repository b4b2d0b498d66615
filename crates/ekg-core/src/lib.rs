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

//! Graph schema deduction and instance-to-graph extraction.
//!
//! This crate turns a tree-shaped business document (for example a reviewed
//! sales opportunity with nested customers, people and risks) into a
//! node/edge dataset ready to be loaded into a property graph store.
//!
//! The pipeline has three stages:
//!
//! 1. **Introspection**: [`build_field_map`] walks a [`ModelCatalog`] from a
//!    root type and records where every field lives.
//! 2. **Deduction**: [`Schema::deduce`] combines the field map with a few
//!    [`NodeDeclaration`]s and [`RelationDeclaration`]s and works out every
//!    path at which each node type occurs, every plausible path pair per
//!    relation and which fields each node table must exclude.
//! 3. **Extraction**: [`extract`] walks a concrete [`Object`] instance and
//!    produces a [`GraphData`] of deduplicated node rows and edge tuples.
//!
//! # Mapping Strategy
//!
//! | Document Concept | Graph Representation |
//! |------------------|---------------------|
//! | Declared node type | Node table |
//! | Object at a discovered path | Node row with synthetic `id` |
//! | `name_from` field or function | `_name` property |
//! | Embedded sub-object | `{field}_` prefixed columns on the parent |
//! | Relation declaration | Relationship table + edge tuples |
//!
//! # Example
//!
//! ```rust
//! use ekg_core::{
//!     extract, FieldType, ModelCatalog, NodeDeclaration, Object, RelationDeclaration, Schema,
//!     TypeDef, Value,
//! };
//!
//! fn example() -> ekg_core::Result<()> {
//!     let catalog = ModelCatalog::builder()
//!         .model(
//!             TypeDef::new("Review")
//!                 .field("date", FieldType::string())
//!                 .field("people", FieldType::list_of(FieldType::model("Person"))),
//!         )
//!         .model(TypeDef::new("Person").field("name", FieldType::string()))
//!         .build()?;
//!
//!     let schema = Schema::deduce(
//!         &catalog,
//!         "Review",
//!         vec![
//!             NodeDeclaration::with_name_fn("Review", |data, _| {
//!                 data.get("date").map(|d| format!("Review:{}", d))
//!             }),
//!             NodeDeclaration::new("Person", "name"),
//!         ],
//!         vec![RelationDeclaration::new("Review", "Person", "HAS_PERSON")],
//!     )?;
//!
//!     let review = Object::new("Review")
//!         .with("date", "2024-01-01")
//!         .with(
//!             "people",
//!             vec![
//!                 Value::from(Object::new("Person").with("name", "Alice")),
//!                 Value::from(Object::new("Person").with("name", "Bob")),
//!             ],
//!         );
//!
//!     let graph = extract(&review, &schema)?;
//!     assert_eq!(graph.rows("Person").len(), 2);
//!     assert_eq!(graph.edges.len(), 2);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod declaration;
pub mod decode;
pub mod deduce;
pub mod error;
pub mod extract;
pub mod index;
pub mod introspect;
pub mod model;
pub mod path;
pub mod schema;
pub mod subgraph;
pub mod summary;
pub mod value;

// Re-export main types at crate root for convenience
pub use config::{ExtractConfig, ExtractConfigBuilder, SystemColumns};
pub use declaration::{
    EmbeddedField, LegacyEmbedding, NameFn, NameSource, NodeDeclaration, RelationDeclaration,
};
pub use error::{EkgError, Result};
pub use extract::{extract, extract_with_config, Edge, GraphData, IdentityRegistry, NodeTable};
pub use index::{index_entries, IndexEntry};
pub use introspect::{build_field_map, FieldInfo, FieldMap, FieldTarget, OwnerFields};
pub use model::{
    EnumDef, FieldDef, FieldType, ModelCatalog, ModelCatalogBuilder, ScalarType, TypeDef,
};
pub use schema::{NodeSchema, RelationSchema, Schema, SchemaWarning};
pub use subgraph::{Subgraph, SubgraphRegistry};
pub use summary::SchemaSummary;
pub use value::{EnumValue, Object, PropertyMap, Value};
