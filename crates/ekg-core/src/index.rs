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

//! Text index entries for declared `index_fields`.
//!
//! The graph store is not the only consumer of an instance: selected text
//! fields are also pushed to an external vector store. This module only
//! collects the records; storing them is the caller's business.

use serde::{Deserialize, Serialize};

use crate::path::resolve;
use crate::schema::Schema;
use crate::value::Object;

/// One field value to index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Node type owning the field.
    pub node_type: String,
    /// Field name.
    pub field_name: String,
    /// Field value rendered as text.
    pub content: String,
    /// Display name of the owning item.
    pub node_name: String,
    /// Path of the owning item, `root` for the root.
    pub field_path: String,
}

/// Collect index entries from an instance.
///
/// Null and missing values are skipped. The same item reached through two
/// paths yields entries for both.
pub fn index_entries(schema: &Schema, instance: &Object) -> Vec<IndexEntry> {
    let mut entries = Vec::new();

    for node in schema.nodes() {
        let declaration = node.declaration();
        if declaration.index_fields.is_empty() {
            continue;
        }
        for path in node.field_paths() {
            for item in resolve(instance, path) {
                let node_name = declaration.display_name(&item.fields);
                for field in &declaration.index_fields {
                    let Some(value) = item.get(field).filter(|v| !v.is_null()) else {
                        continue;
                    };
                    entries.push(IndexEntry {
                        node_type: node.type_name().to_string(),
                        field_name: field.clone(),
                        content: value.to_string(),
                        node_name: node_name.clone(),
                        field_path: if path.is_empty() {
                            "root".to_string()
                        } else {
                            path.clone()
                        },
                    });
                }
            }
        }
    }

    entries
}
