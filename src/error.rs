//! Error types for schema loading, normalization and payload validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading JSON documents (schemas or payloads).
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// The schema description does not have the shape of a field rule mapping.
///
/// `path` is the dot-delimited field path of the offending rule, empty for
/// the document root.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("schema must be an object, got {actual}")]
    NotAnObject { actual: String },

    #[error("invalid rule at {path}: expected type name, array or object, got {actual}")]
    InvalidRule { path: String, actual: String },

    #[error("invalid rule at {path}: missing \"type\"")]
    MissingType { path: String },

    #[error("invalid type at {path}: expected string or array, got {actual}")]
    InvalidType { path: String, actual: String },

    #[error("invalid item type at {path}: expected string, got {actual}")]
    InvalidItemType { path: String, actual: String },

    #[error("invalid \"required\" at {path}: expected boolean, got {actual}")]
    InvalidRequired { path: String, actual: String },
}

/// Errors during validation.
///
/// Each variant is a distinct failure surface: a misconfigured schema, a
/// request that is shaped wrong, or a request with field-level problems.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("malformed schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("bad request: payload is missing or empty")]
    EmptyPayload,

    #[error("bad request: payload must be an object, got {actual}")]
    PayloadNotObject { actual: String },

    #[error("validation failed with {} error(s)", violations.len())]
    Invalid { violations: Vec<Violation> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Invalid { .. } => 1,
            _ => 2,
        }
    }

    /// HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ValidateError::Schema(_) => 500,
            ValidateError::EmptyPayload | ValidateError::PayloadNotObject { .. } => 400,
            ValidateError::Invalid { .. } => 422,
        }
    }

    /// The accumulated violations, empty for the short-circuiting variants.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidateError::Invalid { violations } => violations,
            _ => &[],
        }
    }
}

/// Single conformance failure with path context.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Violation {
    /// Dot-delimited path from the payload root (e.g. `address.zipcode`).
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
