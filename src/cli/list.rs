//! List command implementation
//!
//! This module implements the `formrules list` command, which lists every
//! registered rule (built-in plus configured pattern rules) with its default
//! trigger, inject flag and templates.

use crate::cli::args::OutputFormat;
use crate::cli::common::{EXIT_ERROR, EXIT_SUCCESS};
use crate::output::{RuleListing, RuleListingHumanFormatter, RuleListingJsonlFormatter};
use crate::rules::builtin::BUILTIN_RULE_NAMES;
use crate::validator::Validator;

/// Error type specific to list command
#[derive(Debug, thiserror::Error)]
enum ListError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::error::ConfigError),
}

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
pub fn run_list(config: Option<&str>, format: OutputFormat) -> i32 {
    match run_list_inner(config, format) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_list_inner(config: Option<&str>, format: OutputFormat) -> Result<(), ListError> {
    let config = super::common::load_optional_config(config)?;

    let (validator, configured) = match &config {
        Some(config) => (
            config.build_validator()?,
            // A clashing rule without `replace` leaves the built-in in place
            config
                .rules
                .iter()
                .filter(|(name, rule)| rule.replace || !BUILTIN_RULE_NAMES.contains(&name.as_str()))
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>(),
        ),
        None => (Validator::new(), Vec::new()),
    };

    let listings = RuleListing::from_registry(validator.registry(), &configured);

    match format {
        OutputFormat::Human => RuleListingHumanFormatter::new().write_to_stdout(&listings),
        OutputFormat::Jsonl => RuleListingJsonlFormatter::new().write_to_stdout(&listings),
    }

    Ok(())
}
