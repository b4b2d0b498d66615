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

//! Dotted field paths.
//!
//! A path is a `.`-separated list of field names; the empty path denotes
//! the root. Resolution never fails: missing fields, nulls and scalars
//! along the way simply produce no objects.

use crate::value::{Object, Value};

/// Resolve `path` against `root`, fanning out through lists.
///
/// Every object reached by the path is returned, in document order. A list
/// crossed anywhere along the path contributes all of its object elements.
pub fn resolve<'a>(root: &'a Object, path: &str) -> Vec<&'a Object> {
    let mut current = vec![root];
    if path.is_empty() {
        return current;
    }

    for segment in path.split('.') {
        let mut next = Vec::new();
        for object in current {
            if let Some(value) = object.get(segment) {
                collect_objects(value, &mut next);
            }
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }
    current
}

fn collect_objects<'a>(value: &'a Value, out: &mut Vec<&'a Object>) {
    match value {
        Value::Object(object) => out.push(object),
        Value::List(items) => {
            for item in items {
                collect_objects(item, out);
            }
        }
        _ => {}
    }
}

/// Join a parent path and a field name.
pub fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

/// The part of `path` below `ancestor`, if `path` lies strictly under it.
///
/// Every non-empty path lies under the root.
pub fn relative_to<'a>(path: &'a str, ancestor: &str) -> Option<&'a str> {
    if ancestor.is_empty() {
        return (!path.is_empty()).then_some(path);
    }
    path.strip_prefix(ancestor)?.strip_prefix('.')
}

/// The first segment of a path.
pub fn first_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Number of leading segments two paths share.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    a.split('.')
        .zip(b.split('.'))
        .take_while(|(x, y)| x == y)
        .count()
}

/// Structural plausibility of a `(from, to)` path pair.
///
/// A pair is kept when the source is the root, when one path lies under
/// the other, or when both share at least one leading segment.
pub fn is_plausible_pair(from: &str, to: &str) -> bool {
    from.is_empty()
        || relative_to(to, from).is_some()
        || relative_to(from, to).is_some()
        || common_prefix_len(from, to) > 0
}
