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

//! Configuration types for extraction.

use serde::{Deserialize, Serialize};

/// Names of the system-assigned properties on every node row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemColumns {
    /// Synthetic identity, also the primary key (default: `id`).
    pub id: String,
    /// Display name (default: `_name`).
    pub name: String,
    /// Creation timestamp (default: `_created_at`).
    pub created_at: String,
    /// Update timestamp (default: `_updated_at`).
    pub updated_at: String,
}

impl Default for SystemColumns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            name: "_name".to_string(),
            created_at: "_created_at".to_string(),
            updated_at: "_updated_at".to_string(),
        }
    }
}

impl SystemColumns {
    /// All four column names, identity first.
    pub fn all(&self) -> [&str; 4] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.created_at.as_str(),
            self.updated_at.as_str(),
        ]
    }
}

/// Configuration for turning an instance into node and edge data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// System column names.
    pub columns: SystemColumns,

    /// Maximum number of node rows to keep (default: None = unlimited).
    ///
    /// Exceeding the limit aborts the extraction.
    pub max_nodes: Option<usize>,
}

impl ExtractConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for ExtractConfig.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ekg_core::ExtractConfig;
    /// let config = ExtractConfig::builder()
    ///     .id_column("uid")
    ///     .max_nodes(10_000)
    ///     .build();
    /// assert_eq!(config.columns.id, "uid");
    /// ```
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }

    /// Set the system column names.
    pub fn with_columns(mut self, columns: SystemColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Set the maximum number of node rows.
    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = Some(max);
        self
    }
}

/// Builder for ExtractConfig.
#[derive(Debug, Default)]
pub struct ExtractConfigBuilder {
    id_column: Option<String>,
    name_column: Option<String>,
    max_nodes: Option<Option<usize>>,
}

impl ExtractConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity column name.
    pub fn id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = Some(name.into());
        self
    }

    /// Set the display-name column name.
    pub fn name_column(mut self, name: impl Into<String>) -> Self {
        self.name_column = Some(name.into());
        self
    }

    /// Set the maximum number of node rows.
    pub fn max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = Some(Some(max));
        self
    }

    /// Build the ExtractConfig instance.
    ///
    /// All unset fields will use their default values.
    pub fn build(self) -> ExtractConfig {
        let defaults = ExtractConfig::default();
        let mut columns = defaults.columns;
        if let Some(id) = self.id_column {
            columns.id = id;
        }
        if let Some(name) = self.name_column {
            columns.name = name;
        }
        ExtractConfig {
            columns,
            max_nodes: self.max_nodes.unwrap_or(defaults.max_nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let columns = SystemColumns::default();
        assert_eq!(columns.all(), ["id", "_name", "_created_at", "_updated_at"]);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ExtractConfig::builder()
            .id_column("uid")
            .name_column("label")
            .max_nodes(5)
            .build();
        assert_eq!(config.columns.id, "uid");
        assert_eq!(config.columns.name, "label");
        assert_eq!(config.columns.created_at, "_created_at");
        assert_eq!(config.max_nodes, Some(5));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ExtractConfig::new().with_max_nodes(100);
        let json = serde_json::to_string(&config).unwrap();
        let back: ExtractConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
