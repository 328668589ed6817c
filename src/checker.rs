//! Per-value type checks.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::Violation;
use crate::types::{json_type_name, TypeDescriptor};

/// Length of a hex-encoded object identifier.
const OBJECT_ID_LEN: usize = 24;

/// Naive date-time layouts accepted for `Date` fields, besides RFC 3339/2822.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Check a single field value against its declared type.
///
/// Returns at most one violation. A `null` value passes the `ObjectId`
/// check; whether the field may be absent is decided by the caller.
/// Values of an [`TypeDescriptor::Unknown`] type always pass.
pub fn check_type(value: &Value, expected: &TypeDescriptor, path: &str) -> Option<Violation> {
    let conforms = match expected {
        TypeDescriptor::ObjectId => value.is_null() || is_object_id(value),
        TypeDescriptor::Unknown(_) => true,
        other => matches_kind(value, other),
    };

    if conforms {
        return None;
    }

    Some(Violation::new(
        path,
        format!(
            "'{}' must be of type '{}', received '{}'",
            path,
            expected,
            json_type_name(value)
        ),
    ))
}

/// Check every item of an array field against the declared item type.
///
/// Only scalar item types are checked; `object`, `array` and unknown item
/// types accept anything. Violations are reported in index order and carry
/// the array field's path.
pub fn check_array_items(
    items: &[Value],
    item_type: &TypeDescriptor,
    path: &str,
) -> Vec<Violation> {
    let checked = match item_type {
        TypeDescriptor::String
        | TypeDescriptor::Number
        | TypeDescriptor::Boolean
        | TypeDescriptor::Date
        | TypeDescriptor::ObjectId => true,
        TypeDescriptor::Object | TypeDescriptor::Array | TypeDescriptor::Unknown(_) => false,
    };
    if !checked {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| !matches_kind(item, item_type))
        .map(|item| {
            Violation::new(
                path,
                format!(
                    "each item in '{}' must be of type '{}', received '{}'",
                    path,
                    item_type,
                    json_type_name(item)
                ),
            )
        })
        .collect()
}

/// Returns true if the value is a 24-character hexadecimal string.
pub fn is_object_id(value: &Value) -> bool {
    match value {
        Value::String(s) => s.len() == OBJECT_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()),
        _ => false,
    }
}

/// Returns true if the value can be read as a calendar date.
///
/// Strings are parsed as RFC 3339, RFC 2822, `YYYY-MM-DD` or a naive
/// date-time; numbers are epoch milliseconds.
pub fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => parses_as_date(s.trim()),
        Value::Number(n) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
            .is_some(),
        _ => false,
    }
}

/// Strict kind match, no coercion.
fn matches_kind(value: &Value, expected: &TypeDescriptor) -> bool {
    match expected {
        TypeDescriptor::String => value.is_string(),
        TypeDescriptor::Number => value.is_number(),
        TypeDescriptor::Boolean => value.is_boolean(),
        TypeDescriptor::Date => is_date(value),
        TypeDescriptor::ObjectId => is_object_id(value),
        TypeDescriptor::Object => value.is_object(),
        TypeDescriptor::Array => value.is_array(),
        TypeDescriptor::Unknown(_) => true,
    }
}

fn parses_as_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
}
