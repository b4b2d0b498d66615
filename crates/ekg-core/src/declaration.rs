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

//! Node and relation declarations.
//!
//! Declarations say only what cannot be deduced: which types become nodes,
//! how a node is named, which sub-objects are flattened into it, and which
//! pairs of node types are connected. Paths and excluded fields are worked
//! out by [`Schema::deduce`](crate::Schema::deduce).

use std::fmt;
use std::sync::Arc;

use crate::value::{PropertyMap, Value};

/// Signature of a computed display name.
///
/// Receives the item's property map and the node type name. Returning
/// `None` falls back to `{type}_unnamed`.
pub type NameFn = dyn Fn(&PropertyMap, &str) -> Option<String> + Send + Sync;

/// Where a node's display name comes from.
#[derive(Clone)]
pub enum NameSource {
    /// Value of a field of the item.
    Field(String),
    /// Result of a function over the item.
    Computed(Arc<NameFn>),
}

impl NameSource {
    /// Compute the display name of an item.
    pub fn resolve(&self, data: &PropertyMap, type_name: &str) -> String {
        let name = match self {
            NameSource::Field(field) => data
                .get(field)
                .filter(|v| !v.is_null())
                .map(Value::to_string),
            NameSource::Computed(f) => f(data, type_name),
        };
        name.unwrap_or_else(|| format!("{}_unnamed", type_name))
    }

    /// The field name, for field-based sources.
    pub fn field(&self) -> Option<&str> {
        match self {
            NameSource::Field(field) => Some(field),
            NameSource::Computed(_) => None,
        }
    }
}

impl fmt::Debug for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameSource::Field(field) => f.debug_tuple("Field").field(field).finish(),
            NameSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for NameSource {
    fn from(field: &str) -> Self {
        NameSource::Field(field.to_string())
    }
}

impl From<String> for NameSource {
    fn from(field: String) -> Self {
        NameSource::Field(field)
    }
}

/// A sub-object flattened into its parent's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedField {
    /// Field of the parent holding the sub-object.
    pub field: String,
    /// Declared type of the sub-object.
    pub type_name: String,
}

impl EmbeddedField {
    /// Column prefix for the flattened properties.
    pub fn prefix(&self) -> String {
        format!("{}_", self.field)
    }
}

/// Per-child embedding, kept for declarations written against the older
/// form. The parent must be named explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEmbedding {
    /// Parent node type.
    pub parent: String,
    /// Column prefix; defaults to the lowercased child type name plus `_`.
    pub prefix: Option<String>,
}

/// Declares that a type becomes a node table.
#[derive(Debug, Clone)]
pub struct NodeDeclaration {
    /// Target type name.
    pub type_name: String,
    /// Display name source.
    pub name_from: NameSource,
    /// Human description.
    pub description: String,
    /// Sub-objects flattened into this node's row.
    pub embedded: Vec<EmbeddedField>,
    /// Field used for deduplication; the display name when absent.
    pub dedup_key: Option<String>,
    /// Fields handed to an external text index.
    pub index_fields: Vec<String>,
    /// Older per-child embedding.
    pub embed_in_parent: Option<LegacyEmbedding>,
}

impl NodeDeclaration {
    /// Declare a node named from a field.
    pub fn new(type_name: impl Into<String>, name_from: impl Into<NameSource>) -> Self {
        Self {
            type_name: type_name.into(),
            name_from: name_from.into(),
            description: String::new(),
            embedded: Vec::new(),
            dedup_key: None,
            index_fields: Vec::new(),
            embed_in_parent: None,
        }
    }

    /// Declare a node named by a function.
    pub fn with_name_fn<F>(type_name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&PropertyMap, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(type_name, NameSource::Computed(Arc::new(f)))
    }

    /// Set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Flatten the sub-object in `field` (of type `type_name`) into this row.
    pub fn embed(mut self, field: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.embedded.push(EmbeddedField {
            field: field.into(),
            type_name: type_name.into(),
        });
        self
    }

    /// Deduplicate by this field instead of the display name.
    pub fn dedup_by(mut self, field: impl Into<String>) -> Self {
        self.dedup_key = Some(field.into());
        self
    }

    /// Hand these fields to the external text index.
    pub fn index<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Flatten this type into `parent`'s row instead of giving it a table.
    pub fn embed_in_parent(mut self, parent: impl Into<String>) -> Self {
        self.embed_in_parent = Some(LegacyEmbedding {
            parent: parent.into(),
            prefix: None,
        });
        self
    }

    /// Override the legacy embedding prefix.
    pub fn with_embed_prefix(mut self, prefix: impl Into<String>) -> Self {
        if let Some(legacy) = self.embed_in_parent.as_mut() {
            legacy.prefix = Some(prefix.into());
        }
        self
    }

    /// Whether this type is flattened into a parent under the legacy form.
    pub fn is_embedded_in_parent(&self) -> bool {
        self.embed_in_parent.is_some()
    }

    /// The legacy embedding prefix.
    pub fn legacy_prefix(&self) -> Option<String> {
        self.embed_in_parent.as_ref().map(|legacy| {
            legacy
                .prefix
                .clone()
                .unwrap_or_else(|| format!("{}_", self.type_name.to_lowercase()))
        })
    }

    /// Display name of an item.
    pub fn display_name(&self, data: &PropertyMap) -> String {
        self.name_from.resolve(data, &self.type_name)
    }

    /// Deduplication value of an item; `None` when it is blank.
    pub fn dedup_value(&self, data: &PropertyMap) -> Option<String> {
        match &self.dedup_key {
            Some(key) => data
                .get(key)
                .filter(|v| !v.is_blank())
                .map(Value::to_string),
            None => Some(self.display_name(data)).filter(|name| !name.is_empty()),
        }
    }
}

/// Declares a named connection between two node types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDeclaration {
    /// Source node type.
    pub from: String,
    /// Target node type.
    pub to: String,
    /// Relation name, used as the relationship table name.
    pub name: String,
    /// Human description.
    pub description: String,
}

impl RelationDeclaration {
    /// Declare a relation.
    pub fn new(from: impl Into<String>, to: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
