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

//! Build the reviewed-opportunity graph in the in-process store and print it.
//!
//! ```text
//! RUST_LOG=ekg_graph=debug cargo run -p ekg --example opportunity_graph
//! ```

use ekg::{build_graph, index_entries, MemoryBackend, SubgraphRegistry};
use ekg_test::fixtures;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ekg=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = SubgraphRegistry::new().with(Box::new(fixtures::OpportunitySubgraph))?;
    let subgraph = registry.get("opportunity")?;
    let schema = subgraph.build_schema()?;
    println!("{}", schema.summary());

    let instance = fixtures::opportunity_instance();
    println!("Entity: {}", subgraph.entity_name(&instance));

    let mut store = MemoryBackend::new();
    let build = build_graph(&mut store, &instance, &schema)?;
    println!(
        "Loaded {} nodes and {} relationships",
        build.report.nodes_inserted, build.report.edges_inserted
    );
    for failure in &build.report.failures {
        println!("  failed {:?} {}: {}", failure.stage, failure.table, failure.message);
    }

    println!("\nNodes:");
    for (id, properties) in store.nodes() {
        let label = properties.get("_label").map(|v| v.to_string()).unwrap_or_default();
        let name = properties.get("_name").map(|v| v.to_string()).unwrap_or_default();
        println!("  {:<20} {:<24} {}", label, name, id);
    }

    println!("\nRelationships:");
    for (from, to, relation, _) in store.edges() {
        println!("  {} -[{}]-> {}", from, relation, to);
    }

    println!("\nIndex entries:");
    for entry in index_entries(&schema, &instance) {
        println!("  {}.{} = {}", entry.node_type, entry.field_name, entry.content);
    }

    println!("\nSample queries:");
    for query in subgraph.sample_queries() {
        println!("  {}", query);
    }
    Ok(())
}
