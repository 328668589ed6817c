//! Payload Schema CLI
//!
//! Command-line interface for validating payloads and checking schema files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use payload_schema::{
    lint, load_json, load_json_auto, validate_with, Schema, Severity, ValidateError, ValidateOptions,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "payload-schema")]
#[command(about = "Validate request payloads against field schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload against a schema
    Validate {
        /// Payload file to validate
        payload: PathBuf,

        /// Schema source: file path or URL (http:// or https://)
        #[arg(long, short)]
        schema: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Accept payload keys the schema does not declare
        #[arg(long)]
        allow_additional: bool,
    },

    /// Print the canonical form of a schema
    Normalize {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Lint schema files for errors (syntax, malformed rules, loose rules)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            payload,
            schema,
            json,
            allow_additional,
        } => run_validate(&payload, &schema, json, allow_additional),

        Commands::Normalize {
            schema,
            output,
            pretty,
        } => run_normalize(&schema, output, pretty),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_validate(
    payload_path: &Path,
    schema_source: &str,
    json_output: bool,
    allow_additional: bool,
) -> Result<(), u8> {
    let schema = load_json_auto(schema_source).map_err(|e| {
        report_error(json_output, None, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let payload = load_json(payload_path).map_err(|e| {
        report_error(json_output, None, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let options = ValidateOptions::new().allow_additional(allow_additional);
    let result = Schema::from_value(&schema)
        .map_err(ValidateError::from)
        .and_then(|schema| validate_with(&schema, &payload, &options));

    match result {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(e @ ValidateError::Invalid { .. }) => {
            if json_output {
                let output = json!({
                    "valid": false,
                    "status": e.status_code(),
                    "errors": e.violations()
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for violation in e.violations() {
                    eprintln!("  {}", violation);
                }
            }
            Err(e.exit_code() as u8)
        }
        Err(e) => {
            report_error(json_output, Some(e.status_code()), &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, status: Option<u16>, msg: &str) {
    if json_output {
        let mut output = json!({ "valid": false, "error": msg });
        if let Some(status) = status {
            output["status"] = json!(status);
        }
        println!("{}", output);
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn run_normalize(schema_source: &str, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let document = load_json_auto(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let schema = Schema::from_value(&document).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;

    let canonical = schema.to_value();
    let json_output = if pretty {
        serde_json::to_string_pretty(&canonical)
    } else {
        serde_json::to_string(&canonical)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);
    let passed = result.is_ok() && (!strict || result.warnings == 0);

    if format == "json" {
        let rendered = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", rendered);
    } else {
        for diag in result.results.iter().flat_map(|r| &r.diagnostics) {
            if quiet && diag.severity == Severity::Warning {
                continue;
            }
            let label = match diag.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            let field = if diag.path.is_empty() {
                String::new()
            } else {
                format!(" {}:", diag.path)
            };
            println!(
                "{}:{} {}[{}] {}",
                diag.file.display(),
                field,
                label,
                diag.code,
                diag.message
            );
        }

        if !quiet || !passed {
            println!(
                "{} file(s) checked: {} passed, {} failed ({} error(s), {} warning(s))",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if passed {
        Ok(())
    } else {
        Err(1)
    }
}
