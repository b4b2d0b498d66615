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

//! Shared test fixtures and utilities for the EKG crates.
//!
//! This crate provides canonical data models, declarations and instances so
//! that the core, graph and facade crates test against the same inputs.
//!
//! # Quick Start
//!
//! ```rust
//! use ekg_test::fixtures;
//!
//! // The small review scenario
//! let schema = fixtures::review_schema();
//! let review = fixtures::review(&["Alice", "Bob"]);
//!
//! // The full reviewed-opportunity model
//! let schema = fixtures::opportunity_schema();
//! let instance = fixtures::opportunity_instance();
//! ```
//!
//! Fixture constructors panic on invalid input; they are meant for tests.

/// Canonical test fixtures.
pub mod fixtures;

/// Row and edge counting utilities.
pub mod counts;

pub use counts::{edge_counts, row_counts};
pub use fixtures::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_fixture_shape() {
        let review = fixtures::review(&["Alice", "Bob"]);
        assert_eq!(review.type_name, "Review");
        let people = review.get("people").and_then(|v| v.as_list()).unwrap();
        assert_eq!(people.len(), 2);
    }

    #[test]
    fn test_opportunity_fixture_decodes() {
        let instance = fixtures::opportunity_instance();
        assert_eq!(instance.type_name, "ReviewedOpportunity");
        assert!(instance.get("opportunity").and_then(|v| v.as_object()).is_some());
    }

    #[test]
    fn test_fixture_schemas_are_clean() {
        assert!(fixtures::review_schema().warnings().is_empty());
        assert!(fixtures::opportunity_schema().warnings().is_empty());
    }
}
