//! formrules CLI entry point

use clap::Parser;
use formrules::cli::common::{EXIT_ERROR, EXIT_SUCCESS};
use formrules::cli::{CheckOptions, Command, args::Cli};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Rule warnings are logged; FORMRULES_LOG overrides the level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FORMRULES_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Init { force } => match formrules::cli::init::run_init(force) {
            Ok(result) if result.skipped.is_empty() => {
                println!("Created formrules.toml. Edit [fields] to describe your form.");
                EXIT_SUCCESS
            }
            Ok(_) => {
                println!("formrules.toml already exists. Use --force to overwrite it.");
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Command::Check {
            inputs,
            config,
            trigger,
            first_failure,
            format,
        } => formrules::cli::check::run_check(
            &inputs,
            &CheckOptions {
                config,
                trigger,
                first_failure,
                format,
            },
        ),
        Command::List { config, format } => {
            formrules::cli::list::run_list(config.as_deref(), format)
        }
    };

    process::exit(exit_code);
}
