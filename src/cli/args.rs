//! CLI argument parsing using clap

use crate::types::TriggerEvent;
use clap::{Parser, Subcommand};

pub use crate::config::OutputFormat;

/// formrules CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "formrules")]
#[command(about = "Declarative form validation rules, compiled and checked")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available formrules subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON form documents against the configured field rules
    Check {
        /// JSON documents to validate
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Configuration file
        #[arg(short, long, default_value = "formrules.toml")]
        config: String,

        /// Only run rules that fire on this event
        #[arg(long)]
        trigger: Option<TriggerEvent>,

        /// Stop at the first failure of each field
        #[arg(long)]
        first_failure: bool,

        /// Output format (defaults to the config file's setting)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Write a starter formrules.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List all registered rules
    List {
        /// Configuration file (built-in rules only when absent)
        #[arg(short, long)]
        config: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },
}
