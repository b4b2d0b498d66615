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

//! Property-based tests for literal rendering and identifier escaping.
//!
//! Covers:
//! - No unescaped quote ever ends a rendered string early
//! - Plain identifiers pass through unchanged
//! - Escaped identifiers are always plain or back-tick quoted
//! - The in-process store keeps one row per primary key

use ekg_core::{PropertyMap, Value};
use ekg_graph::cypher::{escape_identifier, is_valid_identifier, quote_string, to_literal};
use ekg_graph::{ColumnDef, ColumnType, GraphBackend, MemoryBackend};
use proptest::prelude::*;

/// True if `literal` is one single-quoted string with every inner quote escaped.
fn is_closed_literal(literal: &str) -> bool {
    let Some(inner) = literal
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return false;
                }
            }
            '\'' => return false,
            _ => {}
        }
    }
    true
}

// ============================================================================
// Literal Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_quoted_strings_stay_closed(s in any::<String>()) {
        prop_assert!(is_closed_literal(&quote_string(&s)));
        prop_assert!(is_closed_literal(&to_literal(&Value::from(s.as_str()))));
    }

    #[test]
    fn prop_list_elements_stay_closed(items in prop::collection::vec(".*", 0..6)) {
        let list = Value::List(items.iter().map(|s| Value::from(s.as_str())).collect());
        let literal = to_literal(&list);
        prop_assert!(literal.starts_with('[') && literal.ends_with(']'));
        if items.len() == 1 {
            prop_assert!(is_closed_literal(&literal[1..literal.len() - 1]));
        }
    }

    #[test]
    fn prop_finite_floats_render_with_decimal_point(f in -1.0e12f64..1.0e12f64) {
        let literal = to_literal(&Value::Float(f));
        prop_assert!(literal.contains('.') || literal.contains('e'), "{}", literal);
    }
}

// ============================================================================
// Identifier Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_plain_identifiers_unchanged(name in "[a-z_][a-z0-9_]{2,12}_x") {
        prop_assert_eq!(escape_identifier(&name), name);
    }

    #[test]
    fn prop_escaped_identifiers_are_plain_or_quoted(name in ".{0,16}") {
        let escaped = escape_identifier(&name);
        let quoted = escaped.len() > 2 && escaped.starts_with('`') && escaped.ends_with('`');
        prop_assert!(quoted || is_valid_identifier(&escaped), "{}", escaped);
    }
}

// ============================================================================
// Store Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_one_row_per_key(keys in prop::collection::vec("[a-d]", 0..20)) {
        let mut store = MemoryBackend::new();
        store
            .create_node_table("Item", &[ColumnDef::new("id", ColumnType::String)], "id")
            .unwrap();

        let mut accepted = 0;
        for key in &keys {
            let mut row = PropertyMap::new();
            row.insert("id".to_string(), Value::from(key.as_str()));
            if store.insert_node("Item", &row).is_ok() {
                accepted += 1;
            }
        }

        let mut distinct = keys.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(accepted, distinct.len());
        prop_assert_eq!(store.node_count("Item"), distinct.len());
    }
}
