//! Configuration file parsing and validation

pub mod rules_toml;

pub use rules_toml::{Config, OutputConfig, OutputFormat, ValidatorSection};
