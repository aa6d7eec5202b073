//! Check command implementation
//!
//! This module implements the `formrules check` command, which:
//! - Loads configuration from formrules.toml
//! - Builds a validator and compiles the configured field rules
//! - Validates every input document in parallel
//! - Formats output (human or JSONL)
//! - Returns appropriate exit code

use crate::cli::args::OutputFormat;
use crate::cli::common::{EXIT_ERROR, EXIT_FAILED, EXIT_PARSE_ERROR, EXIT_SUCCESS};
use crate::compiler::CompiledRules;
use crate::engine::{ExecutionEngine, RunMode};
use crate::error::{CompileError, ConfigError};
use crate::output::{CheckReport, DocumentReport, HumanFormatter, JsonlFormatter};
use crate::types::TriggerEvent;
use rayon::prelude::*;
use serde_json::Value;
use std::fs;

/// Error type specific to check command
#[derive(Debug, thiserror::Error)]
pub(crate) enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Failed to read {input}: {source}")]
    Io {
        input: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {input}: {source}")]
    Json {
        input: String,
        source: serde_json::Error,
    },

    #[error("{input} must contain a JSON object")]
    NotAnObject { input: String },
}

/// Options of one check run
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub config: String,
    pub trigger: Option<TriggerEvent>,
    pub first_failure: bool,
    /// Overrides the config file's output format
    pub format: Option<OutputFormat>,
}

/// Run the check command
///
/// # Returns
///
/// Exit code:
/// - 0: Success (every document passed)
/// - 1: Failed (one or more documents failed validation)
/// - 2: Error (configuration, compile or I/O error)
/// - 3: Parse error (invalid TOML configuration or JSON input)
pub fn run_check(inputs: &[String], options: &CheckOptions) -> i32 {
    match run_check_inner(inputs, options) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FAILED,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                CheckError::Config(ConfigError::Parse(_))
                | CheckError::Json { .. }
                | CheckError::NotAnObject { .. } => EXIT_PARSE_ERROR,
                _ => EXIT_ERROR,
            }
        }
    }
}

/// Internal implementation of check command
fn run_check_inner(inputs: &[String], options: &CheckOptions) -> Result<bool, CheckError> {
    let config = super::common::load_config(&options.config)?;
    let validator = config.build_validator()?;
    let compiled = validator.compile(&config.form_rules()?)?;

    if compiled.is_empty() {
        eprintln!("Warning: No fields are configured. Nothing to check.");
    }

    let mode = if options.first_failure {
        RunMode::FirstFailure
    } else {
        RunMode::CollectAll
    };

    let documents = inputs
        .par_iter()
        .map(|input| check_document(input, &compiled, mode, options.trigger))
        .collect::<Result<Vec<_>, _>>()?;

    let report = CheckReport {
        documents,
        warnings: compiled.warnings().to_vec(),
    };

    match options.format.unwrap_or(config.output.format) {
        OutputFormat::Human => HumanFormatter::new().write_to_stdout(&report),
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format(&report)),
    }

    Ok(report.passed())
}

/// Read, parse and validate one input document
fn check_document(
    input: &str,
    compiled: &CompiledRules,
    mode: RunMode,
    trigger: Option<TriggerEvent>,
) -> Result<DocumentReport, CheckError> {
    let content = fs::read_to_string(input).map_err(|source| CheckError::Io {
        input: input.to_string(),
        source,
    })?;
    let form: Value = serde_json::from_str(&content).map_err(|source| CheckError::Json {
        input: input.to_string(),
        source,
    })?;
    if !form.is_object() {
        return Err(CheckError::NotAnObject {
            input: input.to_string(),
        });
    }

    let mut engine = ExecutionEngine::new(compiled).with_mode(mode);
    if let Some(event) = trigger {
        engine = engine.on_event(event);
    }

    Ok(DocumentReport::new(input, engine.run_blocking(&form)))
}
