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

//! Catalog-guided JSON decoding.
//!
//! Upstream extraction pipelines persist instances as JSON documents. This
//! module turns such a document into a typed [`Object`] tree, checking each
//! value against the declared field shape.
//!
//! Decoding rules:
//!
//! - A missing or `null` optional field decodes to [`Value::Null`].
//! - A missing list field decodes to an empty list.
//! - Any other missing field is an error.
//! - Enum values match a variant name or an underlying value.
//! - Deferred references to unregistered types decode generically.
//! - Keys not declared by the type are ignored.

use serde_json::Value as Json;

use crate::error::{EkgError, Result};
use crate::model::{FieldType, ModelCatalog, ScalarType};
use crate::value::{EnumValue, Object, Value};

impl ModelCatalog {
    /// Decode a JSON document as an instance of `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`EkgError::UnknownType`] if the type is not registered and
    /// [`EkgError::Decode`] if the document does not fit the type.
    pub fn decode(&self, type_name: &str, json: &Json) -> Result<Object> {
        self.decode_object(type_name, json, "")
    }

    /// Parse and decode a JSON string.
    pub fn decode_str(&self, type_name: &str, input: &str) -> Result<Object> {
        let json: Json = serde_json::from_str(input)?;
        self.decode(type_name, &json)
    }

    fn decode_object(&self, type_name: &str, json: &Json, path: &str) -> Result<Object> {
        let def = self.require(type_name)?;
        let map = json
            .as_object()
            .ok_or_else(|| EkgError::decode(path, format!("expected {} object", type_name)))?;

        let mut object = Object::new(type_name);
        for field in &def.fields {
            let field_path = join(path, &field.name);
            let value = match map.get(&field.name) {
                Some(raw) => self.decode_value(&field.ty, raw, &field_path)?,
                None => match &field.ty {
                    FieldType::Optional(_) => Value::Null,
                    FieldType::List(_) => Value::List(Vec::new()),
                    _ => return Err(EkgError::decode(&field_path, "missing required field")),
                },
            };
            object.fields.insert(field.name.clone(), value);
        }
        Ok(object)
    }

    fn decode_value(&self, ty: &FieldType, json: &Json, path: &str) -> Result<Value> {
        match ty {
            FieldType::Optional(inner) => {
                if json.is_null() {
                    Ok(Value::Null)
                } else {
                    self.decode_value(inner, json, path)
                }
            }
            FieldType::List(inner) => {
                let items = json
                    .as_array()
                    .ok_or_else(|| EkgError::decode(path, "expected list"))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.decode_value(inner, item, &format!("{}[{}]", path, i)))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List)
            }
            FieldType::Model(name) => self.decode_object(name, json, path).map(Value::Object),
            FieldType::Deferred(name) => {
                if self.contains(name) {
                    self.decode_object(name, json, path).map(Value::Object)
                } else {
                    Ok(generic(name, json))
                }
            }
            FieldType::Scalar(scalar) => self.decode_scalar(scalar, json, path),
        }
    }

    fn decode_scalar(&self, scalar: &ScalarType, json: &Json, path: &str) -> Result<Value> {
        let mismatch = |expected: &str| {
            EkgError::decode(path, format!("expected {}, found {}", expected, kind(json)))
        };
        match scalar {
            ScalarType::String => json
                .as_str()
                .map(Value::from)
                .ok_or_else(|| mismatch("string")),
            ScalarType::Int => json.as_i64().map(Value::Int).ok_or_else(|| mismatch("int")),
            ScalarType::Float => json
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| mismatch("float")),
            ScalarType::Bool => json
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| mismatch("bool")),
            ScalarType::Enum(name) => {
                let raw = json.as_str().ok_or_else(|| mismatch(name))?;
                let def = self
                    .get_enum(name)
                    .ok_or_else(|| EkgError::UnknownType(name.clone()))?;
                let (variant, value) = def.lookup(raw).ok_or_else(|| {
                    EkgError::decode(path, format!("'{}' is not a variant of {}", raw, name))
                })?;
                Ok(Value::Enum(EnumValue::new(name.clone(), variant, value)))
            }
        }
    }
}

/// Decode JSON with no type guidance.
fn generic(type_name: &str, json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(|i| generic(type_name, i)).collect()),
        Json::Object(map) => {
            let mut object = Object::new(type_name);
            for (k, v) in map {
                object.fields.insert(k.clone(), generic(type_name, v));
            }
            Value::Object(object)
        }
    }
}

fn kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "list",
        Json::Object(_) => "object",
    }
}

fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumDef, TypeDef};
    use serde_json::json;

    fn catalog() -> ModelCatalog {
        ModelCatalog::builder()
            .model(
                TypeDef::new("Risk")
                    .field("description", FieldType::string())
                    .field("level", FieldType::enumeration("Level"))
                    .field("probability", FieldType::optional(FieldType::float()))
                    .field("owners", FieldType::list_of(FieldType::model("Person")))
                    .field("extra", FieldType::optional(FieldType::deferred("Unknown"))),
            )
            .model(
                TypeDef::new("Person")
                    .field("name", FieldType::string())
                    .field("age", FieldType::optional(FieldType::int())),
            )
            .enumeration(EnumDef::new("Level").variant("High", "high").variant("Low", "low"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_decode_full_document() {
        let risk = catalog()
            .decode(
                "Risk",
                &json!({
                    "description": "Budget overrun",
                    "level": "High",
                    "probability": 0.4,
                    "owners": [{"name": "Alice", "age": 41}],
                    "extra": {"note": "n/a"}
                }),
            )
            .unwrap();

        assert_eq!(risk.type_name, "Risk");
        assert_eq!(
            risk.get("level"),
            Some(&Value::Enum(EnumValue::new("Level", "High", "high")))
        );
        let owners = risk.get("owners").and_then(Value::as_list).unwrap();
        let alice = owners[0].as_object().unwrap();
        assert_eq!(alice.type_name, "Person");
        assert_eq!(alice.get("age"), Some(&Value::Int(41)));
        assert!(risk.get("extra").and_then(Value::as_object).is_some());
    }

    #[test]
    fn test_decode_missing_optional_and_list() {
        let risk = catalog()
            .decode("Risk", &json!({"description": "d", "level": "low"}))
            .unwrap();
        assert_eq!(risk.get("probability"), Some(&Value::Null));
        assert_eq!(risk.get("owners"), Some(&Value::List(vec![])));
    }

    #[test]
    fn test_decode_missing_required_reports_path() {
        let err = catalog()
            .decode(
                "Risk",
                &json!({"description": "d", "level": "low", "owners": [{"age": 3}]}),
            )
            .unwrap_err();
        assert!(err.to_string().contains("owners[0].name"));
    }

    #[test]
    fn test_decode_unknown_enum_value() {
        let err = catalog()
            .decode("Risk", &json!({"description": "d", "level": "medium"}))
            .unwrap_err();
        assert!(matches!(err, EkgError::Decode { .. }));
    }

    #[test]
    fn test_decode_type_mismatch() {
        let err = catalog()
            .decode("Person", &json!({"name": 12}))
            .unwrap_err();
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn test_decode_str_invalid_json() {
        let err = catalog().decode_str("Person", "{not json").unwrap_err();
        assert!(matches!(err, EkgError::Json(_)));
    }
}
