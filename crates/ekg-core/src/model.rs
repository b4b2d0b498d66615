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

//! Model catalog: an explicit description of the document data model.
//!
//! The catalog plays the role a reflection facility would play elsewhere:
//! it lists every structured type, its fields and their declared shapes.
//! Field-path discovery and instance decoding both read from it.
//!
//! # Example
//!
//! ```
//! use ekg_core::{FieldType, ModelCatalog, TypeDef};
//!
//! let catalog = ModelCatalog::builder()
//!     .model(
//!         TypeDef::new("Customer")
//!             .field("name", FieldType::string())
//!             .field("contacts", FieldType::list_of(FieldType::model("Person"))),
//!     )
//!     .model(TypeDef::new("Person").field("name", FieldType::string()))
//!     .build()
//!     .unwrap();
//!
//! assert!(catalog.contains("Person"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EkgError, Result};

/// Scalar field kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// UTF-8 string.
    String,
    /// 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Boolean.
    Bool,
    /// Value of the named enum type.
    Enum(String),
}

/// The declared shape of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// A scalar.
    Scalar(ScalarType),
    /// A nested structured type, by name. The type must be registered.
    Model(String),
    /// A list of the inner shape.
    List(Box<FieldType>),
    /// An optional wrapper around the inner shape.
    Optional(Box<FieldType>),
    /// A forward reference resolved against the catalog on use. Unresolvable
    /// references are treated as opaque values.
    Deferred(String),
}

impl FieldType {
    /// String scalar.
    pub fn string() -> Self {
        FieldType::Scalar(ScalarType::String)
    }

    /// Integer scalar.
    pub fn int() -> Self {
        FieldType::Scalar(ScalarType::Int)
    }

    /// Float scalar.
    pub fn float() -> Self {
        FieldType::Scalar(ScalarType::Float)
    }

    /// Boolean scalar.
    pub fn bool() -> Self {
        FieldType::Scalar(ScalarType::Bool)
    }

    /// Value of the named enum type.
    pub fn enumeration(name: impl Into<String>) -> Self {
        FieldType::Scalar(ScalarType::Enum(name.into()))
    }

    /// Nested structured type.
    pub fn model(name: impl Into<String>) -> Self {
        FieldType::Model(name.into())
    }

    /// Forward reference.
    pub fn deferred(name: impl Into<String>) -> Self {
        FieldType::Deferred(name.into())
    }

    /// List of `inner`.
    pub fn list_of(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    /// Optional `inner`.
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// The type with one optional wrapper removed, if any.
    pub fn unwrap_optional(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner,
            other => other,
        }
    }

    /// Whether the field holds a list, after unwrapping an optional.
    pub fn is_list(&self) -> bool {
        matches!(self.unwrap_optional(), FieldType::List(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(ScalarType::String) => write!(f, "string"),
            FieldType::Scalar(ScalarType::Int) => write!(f, "int"),
            FieldType::Scalar(ScalarType::Float) => write!(f, "float"),
            FieldType::Scalar(ScalarType::Bool) => write!(f, "bool"),
            FieldType::Scalar(ScalarType::Enum(name)) => write!(f, "{}", name),
            FieldType::Model(name) | FieldType::Deferred(name) => write!(f, "{}", name),
            FieldType::List(inner) => write!(f, "[{}]", inner),
            FieldType::Optional(inner) => write!(f, "{}?", inner),
        }
    }
}

/// A field of a structured type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared shape.
    pub ty: FieldType,
}

/// A structured type: an ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Type name.
    pub name: String,
    /// Human description.
    pub description: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    /// Create a type with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
        });
        self
    }

    /// Set the type description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An enum type: variant names and their underlying values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Enum type name.
    pub name: String,
    /// `(variant, underlying value)` pairs.
    pub variants: Vec<(String, String)>,
}

impl EnumDef {
    /// Create an enum type with no variants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Add a variant.
    pub fn variant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variants.push((name.into(), value.into()));
        self
    }

    /// Find a variant by name or underlying value.
    pub fn lookup(&self, raw: &str) -> Option<(&str, &str)> {
        self.variants
            .iter()
            .find(|(variant, value)| variant == raw || value == raw)
            .map(|(variant, value)| (variant.as_str(), value.as_str()))
    }
}

/// Registry of every structured and enum type of a data model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    types: BTreeMap<String, TypeDef>,
    enums: BTreeMap<String, EnumDef>,
}

impl ModelCatalog {
    /// Create a builder.
    pub fn builder() -> ModelCatalogBuilder {
        ModelCatalogBuilder::default()
    }

    /// Look up a structured type.
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Look up a structured type, failing with [`EkgError::UnknownType`].
    pub fn require(&self, name: &str) -> Result<&TypeDef> {
        self.types
            .get(name)
            .ok_or_else(|| EkgError::UnknownType(name.to_string()))
    }

    /// Look up an enum type.
    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Whether a structured type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Iterate over structured types in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// The structured type a field shape refers to, if any.
    ///
    /// Direct and deferred references resolve to their type; lists and
    /// optionals do not (see [`ModelCatalog::element_model`]).
    pub fn model_of<'a>(&'a self, ty: &'a FieldType) -> Option<&'a str> {
        match ty {
            FieldType::Model(name) | FieldType::Deferred(name) if self.contains(name) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    /// The structured type a field holds after unwrapping one optional and
    /// one list level, plus whether a list was unwrapped.
    pub fn element_model<'a>(&'a self, ty: &'a FieldType) -> Option<(&'a str, bool)> {
        match ty.unwrap_optional() {
            FieldType::List(inner) => self.model_of(inner).map(|name| (name, true)),
            other => self.model_of(other).map(|name| (name, false)),
        }
    }
}

/// Builder for [`ModelCatalog`].
///
/// Validation happens in [`ModelCatalogBuilder::build`]: duplicate type
/// names and direct references to unregistered types are configuration
/// errors.
#[derive(Debug, Default)]
pub struct ModelCatalogBuilder {
    types: Vec<TypeDef>,
    enums: Vec<EnumDef>,
}

impl ModelCatalogBuilder {
    /// Create a builder with no types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a structured type.
    pub fn model(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    /// Register an enum type.
    pub fn enumeration(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    /// Validate and build the catalog.
    pub fn build(self) -> Result<ModelCatalog> {
        let mut catalog = ModelCatalog::default();

        for def in self.types {
            if catalog.types.contains_key(&def.name) || catalog.enums.contains_key(&def.name) {
                return Err(EkgError::DuplicateType(def.name));
            }
            catalog.types.insert(def.name.clone(), def);
        }
        for def in self.enums {
            if catalog.types.contains_key(&def.name) || catalog.enums.contains_key(&def.name) {
                return Err(EkgError::DuplicateType(def.name));
            }
            catalog.enums.insert(def.name.clone(), def);
        }

        for def in catalog.types.values() {
            for field in &def.fields {
                check_references(&catalog, &def.name, &field.name, &field.ty)?;
            }
        }

        Ok(catalog)
    }
}

fn check_references(catalog: &ModelCatalog, owner: &str, field: &str, ty: &FieldType) -> Result<()> {
    match ty {
        FieldType::Model(target) if !catalog.contains(target) => Err(EkgError::UnresolvedField {
            owner: owner.to_string(),
            field: field.to_string(),
            target: target.clone(),
        }),
        FieldType::Scalar(ScalarType::Enum(target)) if catalog.get_enum(target).is_none() => {
            Err(EkgError::UnresolvedField {
                owner: owner.to_string(),
                field: field.to_string(),
                target: target.clone(),
            })
        }
        FieldType::List(inner) | FieldType::Optional(inner) => {
            check_references(catalog, owner, field, inner)
        }
        _ => Ok(()),
    }
}
