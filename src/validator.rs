//! Payload validation against field schemas.

use serde_json::{Map, Value};
use tracing::debug;

use crate::checker::{check_array_items, check_type};
use crate::error::{ValidateError, Violation};
use crate::types::{join_path, json_type_name, Schema, TypeDescriptor, ValidateOptions};

/// Validate a payload against a schema, rejecting undeclared keys.
///
/// # Errors
///
/// Returns `ValidateError::EmptyPayload` or `ValidateError::PayloadNotObject`
/// if the payload is not a non-empty object, or `ValidateError::Invalid`
/// with every violation found.
pub fn validate(schema: &Schema, payload: &Value) -> Result<(), ValidateError> {
    validate_with(schema, payload, &ValidateOptions::default())
}

/// Validate a payload against a schema with explicit options.
pub fn validate_with(
    schema: &Schema,
    payload: &Value,
    options: &ValidateOptions,
) -> Result<(), ValidateError> {
    let fields = match payload {
        Value::Null => return Err(ValidateError::EmptyPayload),
        Value::Object(map) if map.is_empty() => return Err(ValidateError::EmptyPayload),
        Value::Object(map) => map,
        other => {
            return Err(ValidateError::PayloadNotObject {
                actual: json_type_name(other).to_string(),
            })
        }
    };

    let violations = collect_violations(fields, schema, "", options);
    debug!(
        fields = schema.len(),
        violations = violations.len(),
        "validated payload"
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { violations })
    }
}

/// Normalize a JSON schema description, then validate the payload against it.
///
/// Use [`Schema::from_value`] once and [`validate`] when checking many
/// payloads against the same schema.
///
/// # Errors
///
/// Returns `ValidateError::Schema` if the schema is malformed; no field is
/// checked in that case.
pub fn validate_value(schema: &Value, payload: &Value) -> Result<(), ValidateError> {
    let schema = Schema::from_value(schema)?;
    validate(&schema, payload)
}

/// Collect every violation of one object level and the levels below it.
///
/// `base_path` is the dot-delimited path of `payload`, empty at the root.
/// Declared fields are checked in declaration order, each followed by the
/// violations of its nested object, then undeclared keys of this level are
/// reported in payload order.
pub fn collect_violations(
    payload: &Map<String, Value>,
    schema: &Schema,
    base_path: &str,
    options: &ValidateOptions,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (key, rule) in schema.fields() {
        let path = join_path(base_path, key);

        let Some(value) = payload.get(key) else {
            if rule.required {
                violations.push(Violation::new(
                    path,
                    format!("must have required property '{}'", key),
                ));
            }
            continue;
        };

        violations.extend(check_type(value, &rule.field_type, &path));

        match (&rule.field_type, value) {
            (TypeDescriptor::Object, Value::Object(nested)) => {
                if let Some(properties) = &rule.properties {
                    violations.extend(collect_violations(nested, properties, &path, options));
                }
            }
            (TypeDescriptor::Array, Value::Array(items)) => {
                if let Some(item_type) = &rule.item_type {
                    violations.extend(check_array_items(items, item_type, &path));
                }
            }
            _ => {}
        }
    }

    if !options.allow_additional {
        violations.extend(
            payload
                .keys()
                .filter(|key| !schema.contains(key))
                .map(|key| {
                    Violation::new(
                        join_path(base_path, key),
                        "must NOT have additional properties",
                    )
                }),
        );
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldRule;
    use serde_json::json;

    fn person_schema() -> Schema {
        Schema::new()
            .field("name", FieldRule::new(TypeDescriptor::String).required(true))
            .field("age", FieldRule::new(TypeDescriptor::Number))
    }

    fn violations_of(result: Result<(), ValidateError>) -> Vec<Violation> {
        match result {
            Err(ValidateError::Invalid { violations }) => violations,
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn validate_valid_payload() {
        let payload = json!({ "name": "Ada", "age": 36 });
        assert!(validate(&person_schema(), &payload).is_ok());
    }

    #[test]
    fn validate_rejects_empty_payload() {
        assert!(matches!(
            validate(&person_schema(), &json!({})),
            Err(ValidateError::EmptyPayload)
        ));
        assert!(matches!(
            validate(&person_schema(), &Value::Null),
            Err(ValidateError::EmptyPayload)
        ));
    }

    #[test]
    fn validate_rejects_non_object_payload() {
        let result = validate(&person_schema(), &json!(["Ada"]));
        assert!(matches!(
            result,
            Err(ValidateError::PayloadNotObject { actual }) if actual == "array"
        ));
    }

    #[test]
    fn validate_missing_and_wrong_type() {
        let violations = violations_of(validate(&person_schema(), &json!({ "age": "5" })));
        assert_eq!(
            violations,
            vec![
                Violation::new("name", "must have required property 'name'"),
                Violation::new("age", "'age' must be of type 'number', received 'string'"),
            ]
        );
    }

    #[test]
    fn validate_null_counts_as_present() {
        let violations = violations_of(validate(&person_schema(), &json!({ "name": null })));
        assert_eq!(
            violations,
            vec![Violation::new(
                "name",
                "'name' must be of type 'string', received 'null'"
            )]
        );
    }

    #[test]
    fn validate_value_reports_malformed_schema() {
        let result = validate_value(&json!({ "name": { "required": true } }), &json!({ "a": 1 }));
        assert!(matches!(result, Err(ValidateError::Schema(_))));
    }

    #[test]
    fn collect_violations_nested_level_alone() {
        let schema = Schema::new().field("zipcode", FieldRule::new(TypeDescriptor::String));
        let payload = json!({ "zipcode": 1234, "plus4": "0000" });
        let violations = collect_violations(
            payload.as_object().unwrap(),
            &schema,
            "address",
            &ValidateOptions::default(),
        );
        assert_eq!(
            violations,
            vec![
                Violation::new(
                    "address.zipcode",
                    "'address.zipcode' must be of type 'string', received 'number'"
                ),
                Violation::new("address.plus4", "must NOT have additional properties"),
            ]
        );
    }

    #[test]
    fn collect_violations_empty_level_is_valid() {
        let schema = Schema::new().field("note", FieldRule::new(TypeDescriptor::String));
        let violations =
            collect_violations(&Map::new(), &schema, "meta", &ValidateOptions::default());
        assert!(violations.is_empty());
    }

    #[test]
    fn allow_additional_skips_unknown_keys() {
        let payload = json!({ "name": "Ada", "nickname": "countess" });
        let options = ValidateOptions::new().allow_additional(true);
        assert!(validate_with(&person_schema(), &payload, &options).is_ok());
        assert!(validate(&person_schema(), &payload).is_err());
    }

    #[test]
    fn object_rule_without_properties_is_not_descended() {
        let schema = Schema::new().field("meta", FieldRule::new(TypeDescriptor::Object));
        let payload = json!({ "meta": { "anything": [1, 2, 3] } });
        assert!(validate(&schema, &payload).is_ok());
    }
}
