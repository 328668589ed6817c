//! Payload Schema Validator
//!
//! Validates request payloads against declarative field schemas and reports
//! every violation at once instead of stopping at the first.
//!
//! # Example
//!
//! ```
//! use payload_schema::{validate, Schema, ValidateError};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "name": { "type": "string", "required": true },
//!     "age": "number",
//!     "tags": ["string"]
//! }))
//! .unwrap();
//!
//! let payload = json!({ "age": "5", "tags": [1, "a"], "extra": true });
//!
//! match validate(&schema, &payload) {
//!     Err(ValidateError::Invalid { violations }) => {
//!         assert_eq!(violations.len(), 4);
//!         assert_eq!(violations[0].message, "must have required property 'name'");
//!         assert_eq!(violations[3].path, "extra");
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! # Failure Surfaces
//!
//! | Failure | Error | Status | Exit code |
//! |---------|-------|--------|-----------|
//! | Schema cannot be normalized | `ValidateError::Schema` | 500 | 2 |
//! | Payload missing, empty or not an object | `EmptyPayload` / `PayloadNotObject` | 400 | 2 |
//! | Field-level violations | `ValidateError::Invalid` | 422 | 1 |
//!
//! # Violation Messages
//!
//! | Check | Message |
//! |-------|---------|
//! | Missing required field | `must have required property '<key>'` |
//! | Wrong field type | `'<path>' must be of type '<type>', received '<kind>'` |
//! | Wrong array item type | `each item in '<path>' must be of type '<type>', received '<kind>'` |
//! | Undeclared key | `must NOT have additional properties` |

mod checker;
mod error;
mod linter;
mod loader;
mod schema;
mod types;
mod validator;

pub use checker::{check_array_items, check_type, is_date, is_object_id};
pub use error::{LoadError, SchemaError, ValidateError, Violation};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{is_url, load_json, load_json_auto, load_json_str};
pub use types::{json_type_name, FieldRule, Schema, TypeDescriptor, ValidateOptions};
pub use validator::{collect_violations, validate, validate_value, validate_with};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
