//! Parsing and validation for formrules.toml configuration files

use crate::compiler::{FieldRules, FormRules};
use crate::error::ConfigError;
use crate::rules::PatternRuleConfig;
use crate::types::{RuleName, Trigger};
use crate::validator::Validator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Main configuration struct for formrules.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Facade settings
    #[serde(default)]
    pub validator: ValidatorSection,

    /// Pattern rules added to the registry, keyed by rule name
    #[serde(default)]
    pub rules: IndexMap<String, PatternRuleConfig>,

    /// Field rule objects, keyed by field name in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, Value>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, rule) in &self.rules {
            if RuleName::new(name.as_str()).is_none() {
                return Err(ConfigError::Validation(format!(
                    "Invalid rule name '{}'. Use letters, digits, '-' and '_'",
                    name
                )));
            }

            // Compiles the pattern and checks the template table
            rule.to_definition(name)?;
        }

        // Named custom validators can only be registered through the library
        for (field, rules) in self.form_rules()? {
            if !rules.custom.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Field '{}' has custom validators; they are registered in code with \
                     Validator::register_custom and cannot be used from formrules.toml",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Decode the `[fields]` tables into field rule objects
    pub fn form_rules(&self) -> Result<FormRules, ConfigError> {
        self.fields
            .iter()
            .map(|(field, rules)| {
                FieldRules::from_value(field, rules)
                    .map(|rules| (field.clone(), rules))
                    .map_err(|e| ConfigError::Validation(e.to_string()))
            })
            .collect()
    }

    /// Build a validator with the configured default trigger and pattern rules
    ///
    /// A pattern rule clashing with a registered name without `replace`
    /// keeps the existing rule; the warning is logged.
    pub fn build_validator(&self) -> Result<Validator, ConfigError> {
        let mut validator = Validator::new();

        if let Some(trigger) = &self.validator.trigger {
            validator.set_default_trigger(trigger.clone());
        }

        for (name, rule) in &self.rules {
            validator.add_pattern_rule(name, rule)?;
        }

        Ok(validator)
    }
}

/// `[validator]` section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidatorSection {
    /// Global default trigger; `blur` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format options, shared by the config file and the `--format` flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RuleOption;
    use crate::types::TriggerEvent;
    use serde_json::json;

    const VALID_CONFIG: &str = r#"
[validator]
trigger = ["change", "blur"]

[rules.zipcode]
pattern = '^\d{6}$'
template = "[0] 格式不正确"
trigger = "blur"

[fields.password]
label = "密码"
required = true
minlength = 5

[fields.mail]
label = "邮箱"
email = { value = true, message = "邮箱格式不对" }

[fields.zip]
label = "邮编"
zipcode = true

[output]
format = "jsonl"
"#;

    #[test]
    fn test_valid_config_parsing() {
        let config = Config::parse(VALID_CONFIG).unwrap();

        let trigger = config.validator.trigger.as_ref().unwrap();
        assert!(trigger.fires_on(TriggerEvent::Change));
        assert!(trigger.fires_on(TriggerEvent::Blur));

        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules["zipcode"].pattern, r"^\d{6}$");

        assert_eq!(
            config.fields.keys().collect::<Vec<_>>(),
            vec!["password", "mail", "zip"]
        );
        assert_eq!(config.output.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::parse("").unwrap();
        assert!(config.validator.trigger.is_none());
        assert!(config.rules.is_empty());
        assert!(config.fields.is_empty());
        assert_eq!(config.output.format, OutputFormat::Human);
    }

    #[test]
    fn test_form_rules_keep_order() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let form = config.form_rules().unwrap();

        let password = &form["password"];
        assert_eq!(password.label.as_deref(), Some("密码"));
        assert_eq!(
            password.rules.keys().collect::<Vec<_>>(),
            vec!["required", "minlength"]
        );
        assert_eq!(password.rules["minlength"], RuleOption::Value(json!(5)));
        assert!(matches!(form["mail"].rules["email"], RuleOption::Expanded(_)));
    }

    #[test]
    fn test_build_validator() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let validator = config.build_validator().unwrap();

        assert!(validator.registry().contains("zipcode"));
        assert!(validator.default_trigger().fires_on(TriggerEvent::Change));

        let compiled = validator.compile(&config.form_rules().unwrap()).unwrap();
        assert!(compiled.warnings().is_empty());
        assert_eq!(compiled.rule_count(), 4);
    }

    #[test]
    fn test_invalid_trigger() {
        let result = Config::parse(
            r#"
[validator]
trigger = "submit"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Config::parse(
            r#"
[rules.broken]
pattern = '[unclosed'
template = "x"
"#,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Rule(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_invalid_rule_name() {
        let result = Config::parse(
            r#"
[rules."zip code"]
pattern = '^\d{6}$'
template = "x"
"#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid rule name 'zip code'"));
    }

    #[test]
    fn test_invalid_field_rules() {
        let result = Config::parse(
            r#"
[fields]
password = "required"
"#,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_custom_entries_rejected() {
        let err = Config::parse(
            r#"
[fields.username]
label = "用户名"
custom = [{ validator = "unique-username" }]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("'username' has custom validators"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/formrules.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
