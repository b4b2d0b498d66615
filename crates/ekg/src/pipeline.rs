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

//! Extract-then-load orchestration.

use ekg_core::{extract_with_config, ExtractConfig, GraphData, Object, Schema};
use ekg_graph::{load_with_config, GraphBackend, LoadConfig, LoadReport, Result};
use tracing::info;

/// The outcome of [`build_graph`]: the extracted data and the load report.
#[derive(Debug, Clone)]
pub struct GraphBuild {
    /// Extracted node rows and edges.
    pub data: GraphData,
    /// What the loader did with them.
    pub report: LoadReport,
}

impl GraphBuild {
    /// True if every row and edge was written.
    pub fn is_complete(&self) -> bool {
        self.report.is_clean()
    }
}

/// Extract `instance` and load the result into `backend`.
///
/// Extraction errors abort the build; load failures are collected in the
/// returned [`LoadReport`].
///
/// # Examples
///
/// ```rust
/// use ekg::{build_graph, FieldType, MemoryBackend, ModelCatalog, NodeDeclaration, Object, Schema, TypeDef};
///
/// let catalog = ModelCatalog::builder()
///     .model(TypeDef::new("Person").field("name", FieldType::string()))
///     .build()
///     .unwrap();
/// let schema = Schema::deduce(&catalog, "Person", vec![NodeDeclaration::new("Person", "name")], vec![])
///     .unwrap();
///
/// let mut store = MemoryBackend::new();
/// let build = build_graph(&mut store, &Object::new("Person").with("name", "Ada"), &schema).unwrap();
/// assert!(build.is_complete());
/// assert_eq!(store.node_count("Person"), 1);
/// ```
pub fn build_graph(
    backend: &mut dyn GraphBackend,
    instance: &Object,
    schema: &Schema,
) -> Result<GraphBuild> {
    build_graph_with_config(
        backend,
        instance,
        schema,
        &ExtractConfig::default(),
        &LoadConfig::default(),
    )
}

/// [`build_graph`] with explicit configuration.
///
/// The loader uses the system columns of `extract_config`, whatever
/// `load_config` says, so rows are always keyed by the column they carry.
pub fn build_graph_with_config(
    backend: &mut dyn GraphBackend,
    instance: &Object,
    schema: &Schema,
    extract_config: &ExtractConfig,
    load_config: &LoadConfig,
) -> Result<GraphBuild> {
    let data = extract_with_config(instance, schema, extract_config)?;
    let load_config = load_config
        .clone()
        .with_columns(extract_config.columns.clone());
    let report = load_with_config(&data, backend, schema, &load_config);

    if report.failures.is_empty() {
        info!(
            root = %schema.root(),
            nodes = report.nodes_inserted,
            edges = report.edges_inserted,
            "graph build complete"
        );
    } else {
        info!(
            root = %schema.root(),
            nodes = report.nodes_inserted,
            edges = report.edges_inserted,
            failures = report.failures.len(),
            "graph build completed with errors"
        );
    }
    Ok(GraphBuild { data, report })
}
