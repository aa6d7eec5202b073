//! Error types for formrules
//!
//! This module defines the error types used throughout formrules, following
//! a hierarchical structure with specific error variants for different
//! error categories. Validation failures are not errors in this sense; they
//! travel through the futures returned by compiled validators as
//! [`ValidationFailure`](crate::compiler::ValidationFailure).

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but is semantically invalid
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Rule error raised while applying configured rule definitions
    #[error("Rule error in configuration: {0}")]
    Rule(#[from] RuleError),
}

/// Rule-definition errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Rule name is empty or contains invalid characters
    #[error("Invalid rule name: {0:?}")]
    InvalidName(String),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    /// Multi-variant template without a `default` entry
    #[error("Template for rule '{0}' has no 'default' variant")]
    MissingDefaultTemplate(String),
}

/// Fatal errors raised while compiling field rules
///
/// These abort compilation; soft problems are reported as
/// [`Warning`](crate::diagnostics::Warning)s instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The rule document for a form is not an object
    #[error("Form rules must be an object")]
    InvalidFormRules,

    /// The rule object of a field is not an object
    #[error("\"{field}\" must be an object")]
    InvalidFieldRules { field: String },

    /// A reserved key (`label`, `trigger`, `type`, `custom`) has the wrong shape
    #[error("\"{field}\" has an invalid \"{key}\": {message}")]
    InvalidReservedKey {
        field: String,
        key: String,
        message: String,
    },

    /// A custom entry has no `validator`
    #[error("\"{field}\" custom validation {index} must have a \"validator\"")]
    MissingCustomValidator { field: String, index: usize },

    /// A custom entry's `validator` does not resolve to a callable validator
    #[error("\"{field}\" custom validation [{index}] validator must be callable: {reason}")]
    NotCallable {
        field: String,
        index: usize,
        reason: String,
    },
}

/// Top-level error type for formrules
#[derive(Debug, thiserror::Error)]
pub enum FormRulesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Compile error
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// Invalid JSON input document
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
