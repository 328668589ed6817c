//! Schema normalization - turns a JSON schema description into a [`Schema`].
//!
//! Accepted rule forms:
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | Type name | `"age": "number"` | Optional field of that type |
//! | Array shorthand | `"tags": ["string"]` | Optional array of that item type |
//! | Rule object | `"name": { "type": "string", "required": true }` | Full rule |
//! | Nested path | `"address": { "street": "string" }` | Optional object with those fields |
//!
//! Rule objects may carry `properties` (object fields) and `items` or
//! `itemType` (array fields). A document whose only key is `schema` is
//! treated as a wrapper and unwrapped, unless its value reads as a rule
//! object: a string or array `type` and nothing but rule keys.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::SchemaError;
use crate::types::{join_path, json_type_name, FieldRule, Schema, TypeDescriptor};

/// Key of the optional wrapper object around a schema document.
const WRAPPER_KEY: &str = "schema";

/// Keys a rule object may carry.
const RULE_KEYS: &[&str] = &["type", "required", "properties", "items", "itemType"];

impl Schema {
    /// Normalize a JSON schema description.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the description is not a mapping of field
    /// names to rules, or a rule's type cannot be determined.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let map = match unwrap_wrapper(value) {
            Value::Object(map) => map,
            other => {
                return Err(SchemaError::NotAnObject {
                    actual: json_type_name(other).to_string(),
                })
            }
        };
        parse_fields(map, "")
    }

    /// Render the schema in canonical rule-object form.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields()
                .map(|(name, rule)| (name.to_string(), rule_to_value(rule)))
                .collect(),
        )
    }
}

fn unwrap_wrapper(value: &Value) -> &Value {
    if let Value::Object(map) = value {
        if map.len() == 1 {
            if let Some(inner) = map.get(WRAPPER_KEY) {
                if inner.as_object().is_some_and(|fields| !is_rule_object(fields)) {
                    return inner;
                }
            }
        }
    }
    value
}

fn is_rule_object(map: &Map<String, Value>) -> bool {
    matches!(map.get("type"), Some(Value::String(_) | Value::Array(_)))
        && map.keys().all(|key| RULE_KEYS.contains(&key.as_str()))
}

/// A type-less object whose values are all rules declares a nested path.
fn is_field_mapping(map: &Map<String, Value>) -> bool {
    map.values()
        .all(|value| matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_)))
}

fn parse_fields(map: &Map<String, Value>, base: &str) -> Result<Schema, SchemaError> {
    let mut schema = Schema::new();
    for (name, rule) in map {
        let path = join_path(base, name);
        schema.insert(name.clone(), parse_rule(rule, &path)?);
    }
    Ok(schema)
}

fn parse_rule(value: &Value, path: &str) -> Result<FieldRule, SchemaError> {
    match value {
        Value::String(name) => Ok(FieldRule::new(TypeDescriptor::parse(name))),
        Value::Array(items) => array_rule(items, path),
        Value::Object(map) => parse_rule_object(map, path),
        other => Err(SchemaError::InvalidRule {
            path: path.to_string(),
            actual: json_type_name(other).to_string(),
        }),
    }
}

fn parse_rule_object(map: &Map<String, Value>, path: &str) -> Result<FieldRule, SchemaError> {
    let mut rule = match map.get("type") {
        Some(Value::String(name)) => FieldRule::new(TypeDescriptor::parse(name)),
        Some(Value::Array(items)) => array_rule(items, path)?,
        Some(other) => {
            return Err(SchemaError::InvalidType {
                path: path.to_string(),
                actual: json_type_name(other).to_string(),
            })
        }
        None if map.is_empty() => return Ok(FieldRule::new(TypeDescriptor::Object)),
        None if is_field_mapping(map) => {
            let properties = parse_fields(map, path)?;
            return Ok(FieldRule::new(TypeDescriptor::Object).properties(properties));
        }
        None => {
            return Err(SchemaError::MissingType {
                path: path.to_string(),
            })
        }
    };

    match map.get("required") {
        None => {}
        Some(Value::Bool(required)) => rule.required = *required,
        Some(other) => {
            return Err(SchemaError::InvalidRequired {
                path: path.to_string(),
                actual: json_type_name(other).to_string(),
            })
        }
    }

    match rule.field_type {
        TypeDescriptor::Object => match map.get("properties") {
            Some(Value::Object(properties)) => {
                rule.properties = Some(parse_fields(properties, path)?);
            }
            Some(other) => {
                warn!(
                    path,
                    actual = json_type_name(other),
                    "ignoring non-object properties, nested fields will not be validated"
                );
            }
            None => {}
        },
        TypeDescriptor::Array => {
            if let Some(items) = map.get("items").or_else(|| map.get("itemType")) {
                rule.item_type = Some(parse_item_type(items, path)?);
            }
        }
        _ => {}
    }

    Ok(rule)
}

/// `[]` declares an array without item type, `[T]` an array of `T`.
fn array_rule(items: &[Value], path: &str) -> Result<FieldRule, SchemaError> {
    let rule = FieldRule::new(TypeDescriptor::Array);
    match items.first() {
        Some(item) => Ok(rule.items(parse_item_type(item, path)?)),
        None => Ok(rule),
    }
}

fn parse_item_type(value: &Value, path: &str) -> Result<TypeDescriptor, SchemaError> {
    match value {
        Value::String(name) => Ok(TypeDescriptor::parse(name)),
        Value::Object(map) => match map.get("type") {
            Some(Value::String(name)) => Ok(TypeDescriptor::parse(name)),
            Some(Value::Array(_)) => Ok(TypeDescriptor::Array),
            Some(other) => Err(SchemaError::InvalidItemType {
                path: path.to_string(),
                actual: json_type_name(other).to_string(),
            }),
            // Sub-document without a type: items are objects
            None => Ok(TypeDescriptor::Object),
        },
        Value::Array(_) => Ok(TypeDescriptor::Array),
        other => Err(SchemaError::InvalidItemType {
            path: path.to_string(),
            actual: json_type_name(other).to_string(),
        }),
    }
}

fn rule_to_value(rule: &FieldRule) -> Value {
    let mut map = Map::new();
    map.insert(
        "type".to_string(),
        Value::String(rule.field_type.name().to_string()),
    );
    map.insert("required".to_string(), Value::Bool(rule.required));
    if let Some(properties) = &rule.properties {
        map.insert("properties".to_string(), properties.to_value());
    }
    if let Some(item_type) = &rule.item_type {
        map.insert(
            "items".to_string(),
            Value::String(item_type.name().to_string()),
        );
    }
    Value::Object(map)
}
