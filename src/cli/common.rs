//! Common helper functions shared across CLI commands

use crate::config::Config;
use crate::error::ConfigError;
use std::path::Path;

/// Process exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Configuration file looked up when none is given
pub const DEFAULT_CONFIG_PATH: &str = "formrules.toml";

/// Load a formrules.toml configuration
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file does not exist or cannot be read.
/// Returns `ConfigError::Parse` if the file is invalid.
pub(crate) fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_path = Path::new(path);
    if !config_path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found. Run 'formrules init' to create it.", path),
        )));
    }

    Config::load(config_path)
}

/// Load the given configuration, or the default one if it exists
///
/// Returns `None` when no path is given and formrules.toml is absent.
pub(crate) fn load_optional_config(path: Option<&str>) -> Result<Option<Config>, ConfigError> {
    match path {
        Some(path) => load_config(path).map(Some),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(DEFAULT_CONFIG_PATH).map(Some)
        }
        None => Ok(None),
    }
}
