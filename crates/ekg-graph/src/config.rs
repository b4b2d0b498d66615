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

//! Configuration types for loading extracted graphs.

use ekg_core::SystemColumns;
use serde::{Deserialize, Serialize};

/// Configuration for loading node and edge data into a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// System column names; must match the ones used for extraction.
    pub columns: SystemColumns,

    /// Drop existing tables before creating them (default: true).
    ///
    /// Dropping makes repeated loads rebuild the same graph.
    pub drop_existing: bool,

    /// Maximum length of a string property in bytes (default: None = unlimited).
    ///
    /// Rows carrying a longer string are reported as failures and not inserted.
    pub max_string_length: Option<usize>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            columns: SystemColumns::default(),
            drop_existing: true,
            max_string_length: None,
        }
    }
}

impl LoadConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for LoadConfig.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ekg_graph::LoadConfig;
    /// let config = LoadConfig::builder()
    ///     .max_string_length(4096)
    ///     .drop_existing(false)
    ///     .build();
    /// assert_eq!(config.max_string_length, Some(4096));
    /// assert!(!config.drop_existing);
    /// ```
    pub fn builder() -> LoadConfigBuilder {
        LoadConfigBuilder::default()
    }

    /// Set the system column names.
    pub fn with_columns(mut self, columns: SystemColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Set whether existing tables are dropped first.
    pub fn with_drop_existing(mut self, drop: bool) -> Self {
        self.drop_existing = drop;
        self
    }

    /// Set the maximum string property length.
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(max);
        self
    }
}

/// Builder for LoadConfig.
#[derive(Debug, Default)]
pub struct LoadConfigBuilder {
    columns: Option<SystemColumns>,
    drop_existing: Option<bool>,
    max_string_length: Option<Option<usize>>,
}

impl LoadConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the system column names.
    pub fn columns(mut self, columns: SystemColumns) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set whether existing tables are dropped first.
    pub fn drop_existing(mut self, drop: bool) -> Self {
        self.drop_existing = Some(drop);
        self
    }

    /// Set the maximum string property length.
    pub fn max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(Some(max));
        self
    }

    /// Build the LoadConfig instance.
    ///
    /// All unset fields will use their default values.
    pub fn build(self) -> LoadConfig {
        let defaults = LoadConfig::default();
        LoadConfig {
            columns: self.columns.unwrap_or(defaults.columns),
            drop_existing: self.drop_existing.unwrap_or(defaults.drop_existing),
            max_string_length: self.max_string_length.unwrap_or(defaults.max_string_length),
        }
    }
}
