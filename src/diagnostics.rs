#![forbid(unsafe_code)]

//! Soft warnings raised while registering and compiling rules
//!
//! Warnings never change control flow beyond skipping the offending rule.
//! Each one is logged through `tracing` when raised and also handed back to
//! the caller, so it stays observable without a subscriber installed.

/// A non-fatal diagnostic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// A field references a rule that is not registered; the rule is skipped
    #[error("\"{rule}\" rule does not exist (field \"{field}\"), register it with add_rule")]
    UnknownRule { field: String, rule: String },

    /// A `type` hint that the rule's template has no variant for
    #[error(
        "\"{rule}\" does not support template type \"{type_hint}\" (field \"{field}\"), using the default template"
    )]
    UnsupportedTemplateType {
        field: String,
        rule: String,
        type_hint: String,
    },

    /// An expanded rule entry without a `value`
    #[error("\"{rule}\" rule \"value\" must not be empty (field \"{field}\")")]
    MissingValue { field: String, rule: String },

    /// A rule registered twice without `replace`; the first definition is kept
    #[error("\"{rule}\" rule already exists, set replace to true to replace it")]
    DuplicateRule { rule: String },
}

impl Warning {
    /// Logs the warning and returns it
    pub(crate) fn emit(self) -> Self {
        match &self {
            Warning::UnknownRule { field, rule } => {
                tracing::warn!(field = %field, rule = %rule, "{}", self);
            }
            Warning::UnsupportedTemplateType {
                field,
                rule,
                type_hint,
            } => {
                tracing::warn!(field = %field, rule = %rule, type_hint = %type_hint, "{}", self);
            }
            Warning::MissingValue { field, rule } => {
                tracing::warn!(field = %field, rule = %rule, "{}", self);
            }
            Warning::DuplicateRule { rule } => {
                tracing::warn!(rule = %rule, "{}", self);
            }
        }
        self
    }

    /// Name of the rule the warning is about
    pub fn rule(&self) -> &str {
        match self {
            Warning::UnknownRule { rule, .. }
            | Warning::UnsupportedTemplateType { rule, .. }
            | Warning::MissingValue { rule, .. }
            | Warning::DuplicateRule { rule } => rule,
        }
    }
}
