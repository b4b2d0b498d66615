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

//! Integration tests for planning and loading the shared fixtures.
//!
//! Covers:
//! - Table plans for the reviewed-opportunity schema
//! - Loading into the in-process store and reading the graph back
//! - Reloading the same data and comparing the read-back
//! - The statement stream sent to a Kuzu connection
//! - Failure reporting (missing keys, oversize strings, placeholder backend)

use std::sync::{Arc, Mutex};

use ekg_core::{extract, PropertyMap, SystemColumns, Value};
use ekg_graph::{
    create_backend, load, load_with_config, plan_tables, BackendKind, ColumnType, CypherConnection,
    CypherConnector, GraphBackend, GraphError, KuzuBackend, LoadConfig, LoadStage, MemoryBackend,
    Neo4jBackend, QueryOutput,
};
use ekg_test::{edge_counts, fixtures, row_counts};

#[derive(Clone, Default)]
struct Recorder {
    statements: Arc<Mutex<Vec<String>>>,
}

struct RecordingConnection {
    statements: Arc<Mutex<Vec<String>>>,
}

impl CypherConnection for RecordingConnection {
    fn execute(&mut self, statement: &str) -> Result<QueryOutput, String> {
        self.statements.lock().unwrap().push(statement.to_string());
        Ok(QueryOutput::empty())
    }
}

impl CypherConnector for Recorder {
    fn open(&self, _connection_string: &str) -> Result<Box<dyn CypherConnection>, String> {
        Ok(Box::new(RecordingConnection {
            statements: Arc::clone(&self.statements),
        }))
    }
}

impl Recorder {
    fn count(&self, prefix: &str) -> usize {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.starts_with(prefix))
            .count()
    }
}

// ============================================================================
// Table Planning
// ============================================================================

#[test]
fn test_opportunity_plan() {
    let schema = fixtures::opportunity_schema();
    let plan = plan_tables(&schema, &SystemColumns::default());

    assert_eq!(plan.nodes.len(), 8);
    assert_eq!(plan.relations.len(), 8);
    assert!(plan.skipped_relations.is_empty());
    assert_eq!(plan.drops.len(), 16);
    assert_eq!(plan.drops[0], "REVIEWS");

    let root = plan.node("ReviewedOpportunity").unwrap();
    assert_eq!(
        root.column("financial_metrics_tcv").map(|c| c.ty),
        Some(ColumnType::Double)
    );
    assert_eq!(
        root.column("competition_competitors").map(|c| c.ty),
        Some(ColumnType::StringList)
    );
    assert!(root.column("team").is_none());
    assert!(root.column("financial_metrics").is_none());

    let contact = plan.relation("HAS_CONTACT").unwrap();
    assert_eq!((contact.from.as_str(), contact.to.as_str()), ("Customer", "Person"));
}

// ============================================================================
// In-Process Store
// ============================================================================

#[test]
fn test_load_opportunity_into_memory() {
    let schema = fixtures::opportunity_schema();
    let data = extract(&fixtures::opportunity_instance(), &schema).unwrap();
    let mut store = MemoryBackend::new();

    let report = load(&data, &mut store, &schema);
    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.tables_created, 16);
    assert_eq!(report.nodes_inserted, data.node_count());
    assert_eq!(report.edges_inserted, data.edge_count());

    for (table, count) in row_counts(&data) {
        assert_eq!(store.node_count(&table), count, "{}", table);
    }
    for (relation, count) in edge_counts(&data) {
        assert_eq!(store.edge_count(&relation), count, "{}", relation);
    }

    let root = &store.rows("ReviewedOpportunity")[0];
    assert_eq!(root.get("review_status"), Some(&Value::from("approved")));
    assert_eq!(root.get("financial_metrics_currency"), Some(&Value::from("EUR")));

    let tech = &store.rows("TechnicalApproach")[0];
    assert_eq!(
        tech.get("tools"),
        Some(&Value::List(vec![Value::from("dbt"), Value::from("Airflow")]))
    );
}

#[test]
fn test_read_back_edges_reference_loaded_nodes() {
    let schema = fixtures::review_schema();
    let data = extract(&fixtures::review(&["Alice", "Bob"]), &schema).unwrap();
    let mut store = MemoryBackend::new();
    load(&data, &mut store, &schema);

    let nodes = store.nodes();
    assert_eq!(nodes.len(), 4);
    for (from, to, relation, _) in store.edges() {
        assert!(nodes.iter().any(|(id, _)| *id == from), "{} source", relation);
        assert!(nodes.iter().any(|(id, _)| *id == to), "{} target", relation);
    }

    let people: Vec<_> = nodes
        .iter()
        .filter(|(_, p)| p.get("_label") == Some(&Value::from("Person")))
        .filter_map(|(_, p)| p.get("_name").and_then(Value::as_str))
        .collect();
    assert_eq!(people, vec!["Alice", "Bob"]);
}

#[test]
fn test_reload_rebuilds_graph() {
    let schema = fixtures::review_schema();
    let mut store = MemoryBackend::new();

    let first = extract(&fixtures::review(&["Alice", "Bob"]), &schema).unwrap();
    load(&first, &mut store, &schema);
    let second = extract(&fixtures::review(&["Carol"]), &schema).unwrap();
    let report = load(&second, &mut store, &schema);

    assert_eq!(report.tables_dropped, 5);
    assert_eq!(store.node_count("Person"), 1);
    assert_eq!(store.edge_count("HAS_PERSON"), 1);
}

#[test]
fn test_reload_is_idempotent() {
    let schema = fixtures::opportunity_schema();
    let data = extract(&fixtures::opportunity_instance(), &schema).unwrap();
    let columns = SystemColumns::default();

    let mut once = MemoryBackend::new();
    load(&data, &mut once, &schema);

    let mut twice = MemoryBackend::new();
    load(&data, &mut twice, &schema);
    let report = load(&data, &mut twice, &schema);

    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.tables_dropped, 16);
    assert_eq!(plan_tables(&schema, &columns), plan_tables(&schema, &columns));
    assert_eq!(twice.table_names(), once.table_names());
    for table in once.table_names() {
        assert_eq!(twice.columns(table), once.columns(table), "{}", table);
        assert_eq!(twice.primary_key(table), once.primary_key(table), "{}", table);
        assert_eq!(twice.endpoints(table), once.endpoints(table), "{}", table);
    }
    assert_eq!(twice.nodes(), once.nodes());
    assert_eq!(twice.edges(), once.edges());
    assert_eq!(twice.primary_key("Person"), Some("id"));
    assert_eq!(twice.endpoints("HAS_CONTACT"), Some(("Customer", "Person")));
}

#[test]
fn test_missing_primary_key_is_skipped() {
    let schema = fixtures::review_schema();
    let mut data = extract(&fixtures::review(&["Alice", "Bob"]), &schema).unwrap();
    if let Some(rows) = data.nodes.get_mut("Person") {
        rows[1].remove("id");
    }
    let mut store = MemoryBackend::new();

    let report = load(&data, &mut store, &schema);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(store.node_count("Person"), 1);
    assert_eq!(store.edge_count("HAS_PERSON"), 1);
}

#[test]
fn test_oversize_strings_reported() {
    let schema = fixtures::opportunity_schema();
    let mut data = extract(&fixtures::opportunity_instance(), &schema).unwrap();
    if let Some(rows) = data.nodes.get_mut("Opportunity") {
        rows[0].insert("description".to_string(), Value::from("x".repeat(200)));
    }
    let mut store = MemoryBackend::new();
    let config = LoadConfig::builder().max_string_length(64).build();

    let report = load_with_config(&data, &mut store, &schema, &config);
    let failures: Vec<_> = report.failures_in(LoadStage::InsertNode).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].table, "Opportunity");
    assert!(failures[0].message.contains("description"));
    assert_eq!(store.node_count("Opportunity"), 0);
    assert_eq!(store.node_count("Customer"), 1);
}

// ============================================================================
// Kuzu Statement Stream
// ============================================================================

#[test]
fn test_kuzu_statement_stream() {
    let schema = fixtures::opportunity_schema();
    let data = extract(&fixtures::opportunity_instance(), &schema).unwrap();
    let recorder = Recorder::default();
    let mut backend = KuzuBackend::new(Box::new(recorder.clone()));
    backend.connect("/tmp/opportunity.kuzu").unwrap();

    let report = load(&data, &mut backend, &schema);
    assert!(report.is_clean(), "{:?}", report.failures);

    assert_eq!(recorder.count("DROP TABLE "), 16);
    assert_eq!(recorder.count("CREATE NODE TABLE "), 8);
    assert_eq!(recorder.count("CREATE REL TABLE "), 8);
    assert_eq!(recorder.count("CREATE (:"), data.node_count());
    assert_eq!(recorder.count("MATCH (a:"), data.edge_count());

    let statements = recorder.statements.lock().unwrap();
    assert!(statements
        .iter()
        .any(|s| s == "CREATE REL TABLE HAS_CONTACT(FROM Customer TO Person)"));
    assert!(statements
        .iter()
        .filter(|s| s.starts_with("CREATE NODE TABLE "))
        .all(|s| s.ends_with("PRIMARY KEY(id))")));
    assert!(statements
        .iter()
        .any(|s| s.starts_with("CREATE (:Person {") && s.contains("name: 'Carol'")));
}

#[test]
fn test_kuzu_execute_inlines_parameters_once() {
    let recorder = Recorder::default();
    let mut backend = KuzuBackend::new(Box::new(recorder.clone()));
    backend.connect("/tmp/opportunity.kuzu").unwrap();

    let mut params = PropertyMap::new();
    params.insert("note".to_string(), Value::from("costs $id"));
    params.insert("id".to_string(), Value::from("p1"));
    backend
        .execute("MATCH (p:Person) WHERE p.note = $note AND p.id = $id RETURN $identity", &params)
        .unwrap();

    assert_eq!(
        recorder.statements.lock().unwrap()[0],
        "MATCH (p:Person) WHERE p.note = 'costs $id' AND p.id = 'p1' RETURN $identity"
    );
}

// ============================================================================
// Backend Selection
// ============================================================================

#[test]
fn test_backend_selection() {
    assert!(matches!(
        create_backend(BackendKind::Kuzu),
        Err(GraphError::ConnectorRequired("kuzu"))
    ));
    let backend = create_backend("Memory".parse().unwrap()).unwrap();
    assert_eq!(backend.query_language(), "Cypher");
    assert!("sqlite".parse::<BackendKind>().is_err());
}

#[test]
fn test_neo4j_load_fails_gracefully() {
    let schema = fixtures::review_schema();
    let data = extract(&fixtures::review(&["Alice"]), &schema).unwrap();
    let mut backend = Neo4jBackend::new();

    let report = load(&data, &mut backend, &schema);
    assert_eq!(report.nodes_inserted, 0);
    assert_eq!(report.edges_inserted, 0);
    assert_eq!(report.failures.len(), 5 + 3 + 2);
    assert!(report
        .failures
        .iter()
        .all(|f| f.message.contains("not yet implemented")));
}
