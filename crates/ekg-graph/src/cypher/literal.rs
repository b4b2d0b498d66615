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

//! Rendering property values as Cypher literals.
//!
//! | Value | Literal |
//! |-------|---------|
//! | Null | `NULL` |
//! | Bool, Int | as written |
//! | Float | shortest round-trip form with a decimal point; non-finite as `NULL` |
//! | String | single-quoted, escaped |
//! | Enum | its underlying value, quoted |
//! | Object | its JSON form, quoted |
//! | List | `[..]` of quoted display strings (columns are `STRING[]`) |

use ekg_core::Value;

use super::escape::quote_string;

/// Render a value as a literal.
///
/// ```
/// # use ekg_core::{EnumValue, Value};
/// # use ekg_graph::cypher::to_literal;
/// assert_eq!(to_literal(&Value::Null), "NULL");
/// assert_eq!(to_literal(&Value::from("O'Brien")), "'O\\'Brien'");
/// assert_eq!(to_literal(&Value::from(EnumValue::new("Level", "High", "high"))), "'high'");
/// assert_eq!(to_literal(&Value::from(vec![1, 2])), "['1','2']");
/// ```
pub fn to_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => float_literal(*f),
        Value::String(s) => quote_string(s),
        Value::Enum(e) => quote_string(e.underlying_value()),
        Value::Object(_) => quote_string(&flatten(value)),
        Value::List(items) => {
            let inner: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::Null => "NULL".to_string(),
                    other => quote_string(&flatten(other)),
                })
                .collect();
            format!("[{}]", inner.join(","))
        }
    }
}

/// The display form of a value stored in a `STRING` or `STRING[]` column.
///
/// Enums flatten to their underlying value and objects to compact JSON.
pub fn flatten(value: &Value) -> String {
    match value {
        Value::Object(o) => o.to_json().to_string(),
        Value::List(_) => value.to_json().to_string(),
        other => other.to_string(),
    }
}

fn float_literal(f: f64) -> String {
    if !f.is_finite() {
        return "NULL".to_string();
    }
    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{}.0", s)
    }
}
