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

//! Counting utilities for comparing extraction results.
//!
//! Identities and timestamps differ between runs, so tests compare counts
//! and business properties rather than whole rows.

use ekg_core::{GraphData, PropertyMap, SystemColumns};
use std::collections::BTreeMap;

/// Number of rows per node type, types with zero rows included.
pub fn row_counts(data: &GraphData) -> BTreeMap<String, usize> {
    data.nodes
        .iter()
        .map(|(node_type, rows)| (node_type.clone(), rows.len()))
        .collect()
}

/// Number of edges per relation.
pub fn edge_counts(data: &GraphData) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for edge in &data.edges {
        *counts.entry(edge.relation.clone()).or_insert(0) += 1;
    }
    counts
}

/// A row without its system-assigned identity and timestamps.
pub fn business_properties(row: &PropertyMap, columns: &SystemColumns) -> PropertyMap {
    row.iter()
        .filter(|(k, _)| {
            k.as_str() != columns.id && k.as_str() != columns.created_at && k.as_str() != columns.updated_at
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Business properties of every row of a node type, in table order.
pub fn business_rows(data: &GraphData, node_type: &str) -> Vec<PropertyMap> {
    let columns = SystemColumns::default();
    data.rows(node_type)
        .iter()
        .map(|row| business_properties(row, &columns))
        .collect()
}
