//! Schema linting - static analysis of payload schema files.
//!
//! Checks schema files for:
//! - JSON syntax errors
//! - Rule descriptions that cannot be normalized
//! - Rules that silently accept more than they appear to (unknown types,
//!   object fields without nested rules, arrays without an item type)

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::loader::load_json;
use crate::types::{join_path, Schema, TypeDescriptor};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// Dot-delimited field path (empty for the whole document)
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, files with warnings count as failed.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_schema_files(path);
    let results: Vec<FileResult> = files.iter().map(|file| lint_file(file, path)).collect();

    let count = |severity: Severity| {
        results
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors,
        warnings,
        results,
    }
}

/// Lint a single schema file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut diagnostics = Vec::new();
    let display_file = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();

    let document = match load_json(file) {
        Ok(document) => document,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                file: file.to_path_buf(),
                path: String::new(),
                message: format!("syntax error: {}", e),
            });
            return FileResult {
                file: display_file,
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    match Schema::from_value(&document) {
        Ok(schema) => check_rules(&schema, file, "", &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            code: "E002".to_string(),
            file: file.to_path_buf(),
            path: String::new(),
            message: format!("malformed schema: {}", e),
        }),
    }

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: display_file,
        status,
        diagnostics,
    }
}

/// Recursively flag rules that accept more than they declare.
fn check_rules(schema: &Schema, file: &Path, base: &str, diagnostics: &mut Vec<Diagnostic>) {
    let mut warn = |code: &str, path: String, message: String| {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: code.to_string(),
            file: file.to_path_buf(),
            path,
            message,
        })
    };

    let mut nested = Vec::new();
    for (name, rule) in schema.fields() {
        let path = join_path(base, name);

        if let TypeDescriptor::Unknown(type_name) = &rule.field_type {
            warn(
                "W002",
                path.clone(),
                format!("unrecognized type \"{}\" accepts any value", type_name),
            );
        }

        match (&rule.field_type, &rule.properties, &rule.item_type) {
            (TypeDescriptor::Object, Some(properties), _) => nested.push((properties, path)),
            (TypeDescriptor::Object, None, _) => warn(
                "W001",
                path,
                "object field has no nested rules, its contents are not validated".to_string(),
            ),
            (TypeDescriptor::Array, _, None) => warn(
                "W003",
                path,
                "array field has no item type, its items are not validated".to_string(),
            ),
            (TypeDescriptor::Array, _, Some(TypeDescriptor::Unknown(type_name))) => warn(
                "W002",
                path,
                format!("unrecognized item type \"{}\" accepts any value", type_name),
            ),
            _ => {}
        }
    }

    for (properties, path) in nested {
        check_rules(properties, file, &path, diagnostics);
    }
}

/// Collect .json files under a path, sorted. A single file is kept only if
/// it has a .json extension.
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![path.to_path_buf()];

    while let Some(current) = pending.pop() {
        if current.is_dir() {
            if let Ok(entries) = std::fs::read_dir(&current) {
                pending.extend(entries.flatten().map(|entry| entry.path()));
            }
        } else if current.extension().is_some_and(|ext| ext == "json") {
            files.push(current);
        }
    }

    files.sort();
    files
}
