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

//! Type introspection: where does every field of every reachable type live?
//!
//! [`build_field_map`] walks the catalog depth-first from a root type. Each
//! owning type is expanded once, at the first path it is reached by, so the
//! walk is bounded by the number of distinct types rather than by the shape
//! of any instance. Fields that point at an already expanded type are still
//! recorded.

use std::collections::HashSet;

use crate::error::Result;
use crate::model::{FieldType, ModelCatalog};

/// What a field resolves to after unwrapping optional, list and deferred
/// wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTarget {
    /// A structured type registered in the catalog.
    Model(String),
    /// Anything else, with its declared shape.
    Opaque(FieldType),
}

impl FieldTarget {
    /// The structured type name, if the target is a model.
    pub fn model(&self) -> Option<&str> {
        match self {
            FieldTarget::Model(name) => Some(name),
            FieldTarget::Opaque(_) => None,
        }
    }
}

/// Location and shape of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Dotted path from the root.
    pub path: String,
    /// Resolved target.
    pub target: FieldTarget,
    /// Whether the field holds a list.
    pub plural: bool,
}

/// The recorded fields of one owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerFields {
    /// Owning type name.
    pub type_name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldInfo>,
}

/// Owning type to field information, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    owners: Vec<OwnerFields>,
}

impl FieldMap {
    /// Fields recorded for an owning type.
    pub fn get(&self, type_name: &str) -> Option<&OwnerFields> {
        self.owners.iter().find(|o| o.type_name == type_name)
    }

    /// A single field of an owning type.
    pub fn field(&self, type_name: &str, field: &str) -> Option<&FieldInfo> {
        self.get(type_name)?.fields.iter().find(|f| f.name == field)
    }

    /// Owning types in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &OwnerFields> {
        self.owners.iter()
    }

    /// Every `(owner, field)` pair in discovery order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldInfo)> {
        self.owners
            .iter()
            .flat_map(|o| o.fields.iter().map(move |f| (o.type_name.as_str(), f)))
    }

    /// Whether a type was reached from the root.
    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    /// Number of owning types.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Walk the catalog from `root` and record every reachable field.
///
/// # Errors
///
/// Returns [`EkgError::UnknownType`](crate::EkgError::UnknownType) if the
/// root type is not registered.
pub fn build_field_map(catalog: &ModelCatalog, root: &str) -> Result<FieldMap> {
    catalog.require(root)?;

    let mut map = FieldMap::default();
    let mut visited = HashSet::new();
    explore(catalog, root, "", &mut visited, &mut map);
    Ok(map)
}

fn explore(
    catalog: &ModelCatalog,
    type_name: &str,
    path: &str,
    visited: &mut HashSet<String>,
    map: &mut FieldMap,
) {
    if !visited.insert(type_name.to_string()) {
        return;
    }
    let Some(def) = catalog.get(type_name) else {
        return;
    };

    let slot = map.owners.len();
    map.owners.push(OwnerFields {
        type_name: type_name.to_string(),
        fields: Vec::with_capacity(def.fields.len()),
    });

    for field in &def.fields {
        let field_path = if path.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", path, field.name)
        };

        let (target, plural) = classify(catalog, &field.ty);
        let next = target.model().map(str::to_string);

        map.owners[slot].fields.push(FieldInfo {
            name: field.name.clone(),
            path: field_path.clone(),
            target,
            plural,
        });

        if let Some(next) = next {
            explore(catalog, &next, &field_path, visited, map);
        }
    }
}

fn classify(catalog: &ModelCatalog, ty: &FieldType) -> (FieldTarget, bool) {
    match catalog.element_model(ty) {
        Some((name, plural)) => (FieldTarget::Model(name.to_string()), plural),
        None => (FieldTarget::Opaque(ty.clone()), ty.is_list()),
    }
}
