#![forbid(unsafe_code)]

//! Rule listing output formatters
//!
//! This module provides formatters for displaying the registered rules from
//! the `formrules list` command. It supports both human-readable and JSONL
//! output formats.

use crate::rules::RuleRegistry;
use serde::Serialize;

/// Source of a rule (builtin or configured)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    Builtin,
    Configured,
}

impl RuleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSource::Builtin => "builtin",
            RuleSource::Configured => "configured",
        }
    }
}

/// Listing information for a single registered rule
#[derive(Debug, Clone)]
pub struct RuleListing {
    pub name: String,
    pub source: RuleSource,
    /// Default trigger of the rule; `None` defers to the global default
    pub trigger: Option<String>,
    pub inject: bool,
    /// `(type_hint, template)` pairs, `default` first
    pub templates: Vec<(String, String)>,
}

impl RuleListing {
    /// Describe every rule of `registry` in registration order
    ///
    /// Rules named in `configured` are reported as configured, even when they
    /// replaced a built-in.
    pub fn from_registry(registry: &RuleRegistry, configured: &[&str]) -> Vec<RuleListing> {
        registry
            .iter()
            .map(|(name, definition)| RuleListing {
                name: name.to_string(),
                source: if configured.contains(&name.as_str()) {
                    RuleSource::Configured
                } else {
                    RuleSource::Builtin
                },
                trigger: definition.trigger().map(ToString::to_string),
                inject: definition.injects_raw_value(),
                templates: definition
                    .template()
                    .variants()
                    .into_iter()
                    .map(|(hint, text)| (hint.to_string(), text.to_string()))
                    .collect(),
            })
            .collect()
    }
}

/// Human-readable formatter for rule listings
pub struct RuleListingHumanFormatter;

impl RuleListingHumanFormatter {
    pub fn new() -> Self {
        RuleListingHumanFormatter
    }

    /// Format a list of rules for human consumption
    pub fn format(&self, rules: &[RuleListing]) -> String {
        let mut output = String::new();

        output.push_str(&format!("Rules ({} registered):\n", rules.len()));
        output.push('\n');

        for rule in rules {
            output.push_str(&format!("{} ({})\n", rule.name, rule.source.as_str()));
            output.push_str(&format!(
                "  Trigger: {}\n",
                rule.trigger.as_deref().unwrap_or("(global default)")
            ));
            output.push_str(&format!(
                "  Inject value: {}\n",
                if rule.inject { "yes" } else { "no" }
            ));
            for (hint, text) in &rule.templates {
                if hint == "default" {
                    output.push_str(&format!("  Template: {}\n", text));
                } else {
                    output.push_str(&format!("  Template [{}]: {}\n", hint, text));
                }
            }
            output.push('\n');
        }

        output
    }

    /// Write the formatted output to stdout
    pub fn write_to_stdout(&self, rules: &[RuleListing]) {
        print!("{}", self.format(rules));
    }
}

impl Default for RuleListingHumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// JSONL output structure for a rule listing
#[derive(Debug, Serialize)]
struct JsonlRuleListing<'a> {
    rule: &'a str,
    source: &'static str,
    trigger: Option<&'a str>,
    inject: bool,
    templates: indexmap::IndexMap<&'a str, &'a str>,
}

/// JSONL formatter for rule listings
pub struct RuleListingJsonlFormatter;

impl RuleListingJsonlFormatter {
    pub fn new() -> Self {
        RuleListingJsonlFormatter
    }

    /// Format rules as JSONL, one object per rule
    pub fn format(&self, rules: &[RuleListing]) -> String {
        let mut output = String::new();

        for rule in rules {
            let record = JsonlRuleListing {
                rule: &rule.name,
                source: rule.source.as_str(),
                trigger: rule.trigger.as_deref(),
                inject: rule.inject,
                templates: rule
                    .templates
                    .iter()
                    .map(|(hint, text)| (hint.as_str(), text.as_str()))
                    .collect(),
            };

            if let Ok(json) = serde_json::to_string(&record) {
                output.push_str(&json);
                output.push('\n');
            }
        }

        output
    }

    /// Write the formatted output to stdout
    pub fn write_to_stdout(&self, rules: &[RuleListing]) {
        print!("{}", self.format(rules));
    }
}

impl Default for RuleListingJsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn builtins() -> Vec<RuleListing> {
        RuleListing::from_registry(&RuleRegistry::with_builtins(), &[])
    }

    #[test]
    fn test_rule_source_as_str() {
        assert_eq!(RuleSource::Builtin.as_str(), "builtin");
        assert_eq!(RuleSource::Configured.as_str(), "configured");
    }

    #[test]
    fn test_from_registry() {
        let rules = builtins();
        assert_eq!(rules.len(), 15);
        assert_eq!(rules[0].name, "required");
        assert_eq!(rules[0].templates.len(), 3);
        assert!(rules.iter().all(|r| r.source == RuleSource::Builtin));

        let email = rules.iter().find(|r| r.name == "email").unwrap();
        assert_eq!(email.trigger.as_deref(), Some("blur"));
        let telephone = rules.iter().find(|r| r.name == "telephone").unwrap();
        assert!(telephone.inject);
    }

    #[test]
    fn test_configured_source() {
        let rules = RuleListing::from_registry(&RuleRegistry::with_builtins(), &["email"]);
        let email = rules.iter().find(|r| r.name == "email").unwrap();
        assert_eq!(email.source, RuleSource::Configured);
    }

    #[test]
    fn test_human_formatter_empty() {
        let output = RuleListingHumanFormatter::new().format(&[]);
        assert!(output.contains("Rules (0 registered)"));
    }

    #[test]
    fn test_human_formatter() {
        let output = RuleListingHumanFormatter::new().format(&builtins());
        assert!(output.contains("Rules (15 registered)"));
        assert!(output.contains("required (builtin)"));
        assert!(output.contains("  Template: 请输入 [0]"));
        assert!(output.contains("  Template [select]: 请选择 [0]"));
        assert!(output.contains("  Trigger: (global default)"));
        assert!(output.contains("  Trigger: blur"));
        assert!(output.contains("  Inject value: yes"));
    }

    #[test]
    fn test_jsonl_formatter() {
        let output = RuleListingJsonlFormatter::new().format(&builtins());
        let lines: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0]["rule"], "required");
        assert_eq!(lines[0]["trigger"], Value::Null);
        assert_eq!(lines[0]["templates"]["select"], "请选择 [0]");
        assert_eq!(lines[12]["rule"], "email");
        assert_eq!(lines[12]["trigger"], "blur");
    }
}
