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

//! Loading extracted graph data into a backend.
//!
//! A load runs in four steps:
//!
//! 1. drop every planned table (when [`LoadConfig::drop_existing`] is set),
//! 2. create node tables, then relationship tables,
//! 3. insert node rows,
//! 4. insert edges, matching endpoints by primary key.
//!
//! Drop failures are expected on a fresh store and only logged. Every other
//! failure is logged, recorded in the [`LoadReport`] and skipped, so one bad
//! row never aborts the rest of the load.

use ekg_core::{GraphData, PropertyMap, Schema, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::GraphBackend;
use crate::config::LoadConfig;
use crate::cypher::validate_string_length;
use crate::error::Result;
use crate::plan::{plan_tables, TablePlan};

/// The load step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStage {
    /// Creating a node or relationship table.
    CreateTable,
    /// Inserting a node row.
    InsertNode,
    /// Inserting an edge.
    InsertEdge,
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    /// Where it happened.
    pub stage: LoadStage,
    /// Table or relation involved.
    pub table: String,
    /// Error message.
    pub message: String,
}

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Tables dropped before creation.
    pub tables_dropped: usize,
    /// Node and relationship tables created.
    pub tables_created: usize,
    /// Node rows inserted.
    pub nodes_inserted: usize,
    /// Edges inserted.
    pub edges_inserted: usize,
    /// Rows skipped for a missing primary key.
    pub rows_skipped: usize,
    /// Every failure, in load order.
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// True if nothing failed and nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.rows_skipped == 0
    }

    /// Failures recorded in one stage.
    pub fn failures_in(&self, stage: LoadStage) -> impl Iterator<Item = &LoadFailure> + '_ {
        self.failures.iter().filter(move |f| f.stage == stage)
    }

    fn fail(&mut self, stage: LoadStage, table: &str, message: String) {
        warn!(stage = ?stage, table = %table, "{}", message);
        self.failures.push(LoadFailure {
            stage,
            table: table.to_string(),
            message,
        });
    }
}

/// Load `data` with the default configuration.
///
/// # Examples
///
/// ```
/// use ekg_core::{extract, FieldType, ModelCatalog, NodeDeclaration, Object, Schema, TypeDef};
/// use ekg_graph::{load, MemoryBackend};
///
/// let catalog = ModelCatalog::builder()
///     .model(TypeDef::new("Person").field("name", FieldType::string()))
///     .build()
///     .unwrap();
/// let schema = Schema::deduce(&catalog, "Person", vec![NodeDeclaration::new("Person", "name")], vec![])
///     .unwrap();
/// let data = extract(&Object::new("Person").with("name", "Alice"), &schema).unwrap();
///
/// let mut store = MemoryBackend::new();
/// let report = load(&data, &mut store, &schema);
/// assert!(report.is_clean());
/// assert_eq!(store.node_count("Person"), 1);
/// ```
pub fn load(data: &GraphData, backend: &mut dyn GraphBackend, schema: &Schema) -> LoadReport {
    load_with_config(data, backend, schema, &LoadConfig::default())
}

/// Load `data` into `backend` following the tables planned for `schema`.
pub fn load_with_config(
    data: &GraphData,
    backend: &mut dyn GraphBackend,
    schema: &Schema,
    config: &LoadConfig,
) -> LoadReport {
    let plan = plan_tables(schema, &config.columns);
    let mut report = LoadReport::default();

    if config.drop_existing {
        drop_tables(backend, &plan, &mut report);
    }
    create_tables(backend, &plan, &mut report);
    insert_nodes(data, backend, &plan, config, &mut report);
    insert_edges(data, backend, &plan, &mut report);

    info!(
        nodes = report.nodes_inserted,
        edges = report.edges_inserted,
        skipped = report.rows_skipped,
        failures = report.failures.len(),
        "loaded {} nodes and {} relationships",
        report.nodes_inserted,
        report.edges_inserted
    );
    report
}

fn drop_tables(backend: &mut dyn GraphBackend, plan: &TablePlan, report: &mut LoadReport) {
    for name in &plan.drops {
        match backend.drop_table(name) {
            Ok(()) => report.tables_dropped += 1,
            Err(e) => debug!(table = %name, error = %e, "drop skipped"),
        }
    }
}

fn create_tables(backend: &mut dyn GraphBackend, plan: &TablePlan, report: &mut LoadReport) {
    for node in &plan.nodes {
        match backend.create_node_table(&node.name, &node.columns, &node.primary_key) {
            Ok(()) => report.tables_created += 1,
            Err(e) => report.fail(LoadStage::CreateTable, &node.name, e.to_string()),
        }
    }
    for rel in &plan.relations {
        match backend.create_relationship_table(&rel.name, &rel.from, &rel.to, &[]) {
            Ok(()) => report.tables_created += 1,
            Err(e) => report.fail(LoadStage::CreateTable, &rel.name, e.to_string()),
        }
    }
    for name in &plan.skipped_relations {
        debug!(relation = %name, "no relationship table, endpoint has no node table");
    }
}

fn check_lengths(row: &PropertyMap, config: &LoadConfig) -> Result<()> {
    for (property, value) in row {
        match value {
            Value::String(s) => validate_string_length(s, property, config)?,
            Value::List(items) => {
                for item in items {
                    if let Value::String(s) = item {
                        validate_string_length(s, property, config)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn insert_nodes(
    data: &GraphData,
    backend: &mut dyn GraphBackend,
    plan: &TablePlan,
    config: &LoadConfig,
    report: &mut LoadReport,
) {
    for table in &plan.nodes {
        for row in data.rows(&table.name) {
            match row.get(&table.primary_key) {
                None | Some(Value::Null) => {
                    warn!(table = %table.name, "skipping row with null primary key");
                    report.rows_skipped += 1;
                    continue;
                }
                Some(_) => {}
            }
            if let Err(e) = check_lengths(row, config) {
                report.fail(LoadStage::InsertNode, &table.name, e.to_string());
                continue;
            }
            match backend.insert_node(&table.name, row) {
                Ok(()) => report.nodes_inserted += 1,
                Err(e) => report.fail(LoadStage::InsertNode, &table.name, e.to_string()),
            }
        }
    }
}

fn insert_edges(
    data: &GraphData,
    backend: &mut dyn GraphBackend,
    plan: &TablePlan,
    report: &mut LoadReport,
) {
    let no_properties = PropertyMap::new();
    for edge in &data.edges {
        if plan.relation(&edge.relation).is_none() {
            report.fail(
                LoadStage::InsertEdge,
                &edge.relation,
                format!("no relationship table for {}", edge.relation),
            );
            continue;
        }
        let result = backend.insert_relationship(
            &edge.relation,
            &edge.from_type,
            &edge.from_id,
            &edge.to_type,
            &edge.to_id,
            &no_properties,
        );
        match result {
            Ok(()) => report.edges_inserted += 1,
            Err(e) => report.fail(LoadStage::InsertEdge, &edge.relation, e.to_string()),
        }
    }
}
