#![forbid(unsafe_code)]

//! Regex-backed rule definitions
//!
//! A pattern rule is a registry entry described entirely as data, typically
//! under `[rules.<name>]` in `formrules.toml`. The candidate's text form must
//! match the pattern.

use crate::error::RuleError;
use crate::rules::predicates::as_text;
use crate::rules::{Predicate, RuleDefinition, Template};
use crate::types::Trigger;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// TOML structure for a pattern rule definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRuleConfig {
    /// Regular expression the candidate must match
    pub pattern: String,

    /// Failure message template
    pub template: TemplateSpec,

    /// Default trigger of the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,

    /// Substitute the candidate value into `{i}` slots
    #[serde(default)]
    pub inject: bool,

    /// Replace an existing rule with the same name
    #[serde(default)]
    pub replace: bool,
}

/// A template as written in configuration: one string or a variant table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateSpec {
    Single(String),
    ByType(IndexMap<String, String>),
}

impl TemplateSpec {
    fn into_template(self, rule: &str) -> Result<Template, RuleError> {
        match self {
            TemplateSpec::Single(text) => Ok(Template::Single(text)),
            TemplateSpec::ByType(variants) => Template::from_variants(rule, variants),
        }
    }
}

impl PatternRuleConfig {
    /// Build a rule definition from this configuration
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidRegex` if the pattern does not compile and
    /// `RuleError::MissingDefaultTemplate` if a variant table has no `default`.
    pub fn to_definition(&self, rule: &str) -> Result<RuleDefinition, RuleError> {
        let pattern = Regex::new(&self.pattern).map_err(|e| {
            RuleError::InvalidRegex(format!(
                "Failed to compile pattern '{}' for rule '{}': {}",
                self.pattern, rule, e
            ))
        })?;

        let template = self.template.clone().into_template(rule)?;

        let predicate = Predicate::new(move |value, _param, _type_hint| {
            as_text(value).is_some_and(|text| pattern.is_match(&text))
        });

        let mut definition = RuleDefinition::new(predicate, template).inject_raw_value(self.inject);
        if let Some(trigger) = &self.trigger {
            definition = definition.with_trigger(trigger.clone());
        }
        Ok(definition)
    }
}
