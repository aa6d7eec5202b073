#![forbid(unsafe_code)]

//! Execution engine for running compiled rules against form documents
//!
//! This module provides the ExecutionEngine which selects the compiled rules
//! that fire on an event and drives their validators to completion.

use crate::compiler::{CompiledRule, CompiledRules};
use crate::types::TriggerEvent;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

/// How the validators of a field are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Run every validator concurrently and report every failure
    #[default]
    CollectAll,
    /// Run each field's validators in order, stopping at its first failure
    FirstFailure,
}

/// One failed rule of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub rule: String,
    pub message: String,
}

/// Result of running compiled rules against one form document
#[derive(Debug, Default)]
pub struct ExecutionResult {
    /// Failures in field order, then rule order
    pub failures: Vec<FieldFailure>,
    /// Number of fields checked
    pub fields_checked: usize,
    /// Number of validators invoked
    pub rules_executed: usize,
}

impl ExecutionResult {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Execution engine that drives compiled validators
///
/// The engine:
/// - Selects the rules of each field that fire on the requested event
/// - Reads each field's value from the form document (`null` when missing)
/// - Runs validators concurrently, or in order per field
pub struct ExecutionEngine<'a> {
    rules: &'a CompiledRules,
    mode: RunMode,
    event: Option<TriggerEvent>,
}

impl<'a> ExecutionEngine<'a> {
    /// Creates an engine over `rules` that runs every rule in `CollectAll` mode
    pub fn new(rules: &'a CompiledRules) -> Self {
        Self {
            rules,
            mode: RunMode::default(),
            event: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Only run rules whose trigger includes `event`
    #[must_use]
    pub fn on_event(mut self, event: TriggerEvent) -> Self {
        self.event = Some(event);
        self
    }

    fn selected<'r>(&self, rules: &'r [CompiledRule]) -> Vec<&'r CompiledRule> {
        rules
            .iter()
            .filter(|rule| self.event.is_none_or(|event| rule.fires_on(event)))
            .collect()
    }

    /// Run the selected validators against `form`
    pub async fn run(&self, form: &Value) -> ExecutionResult {
        let fields: Vec<(&str, &Value, Vec<&CompiledRule>)> = self
            .rules
            .iter()
            .map(|(field, rules)| {
                let value = form.get(field).unwrap_or(&Value::Null);
                (field, value, self.selected(rules))
            })
            .collect();

        let fields_checked = fields.len();
        let mut rules_executed = 0;

        let per_field = join_all(fields.into_iter().map(|(field, value, rules)| async move {
            let mut failures = Vec::new();
            let mut executed = 0;

            match self.mode {
                RunMode::CollectAll => {
                    executed = rules.len();
                    let outcomes = join_all(rules.iter().map(|rule| rule.validate(form, value))).await;
                    for (rule, outcome) in rules.iter().zip(outcomes) {
                        if let Err(failure) = outcome {
                            failures.push(FieldFailure {
                                field: field.to_string(),
                                rule: rule.rule_name().to_string(),
                                message: failure.message().to_string(),
                            });
                        }
                    }
                }
                RunMode::FirstFailure => {
                    for rule in rules {
                        executed += 1;
                        if let Err(failure) = rule.validate(form, value).await {
                            failures.push(FieldFailure {
                                field: field.to_string(),
                                rule: rule.rule_name().to_string(),
                                message: failure.message().to_string(),
                            });
                            break;
                        }
                    }
                }
            }

            (failures, executed)
        }))
        .await;

        let mut result = ExecutionResult {
            fields_checked,
            ..ExecutionResult::default()
        };
        for (failures, executed) in per_field {
            rules_executed += executed;
            result.failures.extend(failures);
        }
        result.rules_executed = rules_executed;

        tracing::debug!(
            fields = result.fields_checked,
            rules = result.rules_executed,
            failures = result.failures.len(),
            "executed compiled rules"
        );
        result
    }

    /// Run on the current thread, blocking until every validator resolves
    pub fn run_blocking(&self, form: &Value) -> ExecutionResult {
        futures::executor::block_on(self.run(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::FieldRules;
    use crate::validator::Validator;
    use serde_json::json;

    fn compiled() -> CompiledRules {
        let mut form = crate::compiler::FormRules::new();
        form.insert(
            "password".to_string(),
            FieldRules::new()
                .label("密码")
                .rule("required", true)
                .rule("minlength", 5),
        );
        form.insert(
            "mail".to_string(),
            FieldRules::new().label("邮箱").rule("email", true),
        );
        Validator::new().compile(&form).unwrap()
    }

    #[test]
    fn test_collect_all_reports_every_failure() {
        let rules = compiled();
        let result = ExecutionEngine::new(&rules).run_blocking(&json!({ "password": "" }));

        assert!(!result.passed());
        assert_eq!(result.fields_checked, 2);
        assert_eq!(result.rules_executed, 3);
        let failed: Vec<(&str, &str)> = result
            .failures
            .iter()
            .map(|f| (f.field.as_str(), f.rule.as_str()))
            .collect();
        assert_eq!(failed, vec![("password", "required"), ("password", "minlength")]);
    }

    #[test]
    fn test_first_failure_stops_per_field() {
        let rules = compiled();
        let result = ExecutionEngine::new(&rules)
            .with_mode(RunMode::FirstFailure)
            .run_blocking(&json!({ "password": "", "mail": "nope" }));

        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.failures[0].message, "请输入密码");
        assert_eq!(result.failures[1].message, "请输入有效邮箱");
        assert_eq!(result.rules_executed, 2);
    }

    #[test]
    fn test_event_filter() {
        let mut validator = Validator::new();
        validator.set_default_trigger(TriggerEvent::Change);
        let rules = validator
            .compile_value(&json!({
                "mail": { "label": "邮箱", "required": true, "email": true }
            }))
            .unwrap();

        let form = json!({ "mail": "nope" });
        let on_change = ExecutionEngine::new(&rules)
            .on_event(TriggerEvent::Change)
            .run_blocking(&form);
        assert!(on_change.passed());
        assert_eq!(on_change.rules_executed, 1);

        let on_blur = ExecutionEngine::new(&rules)
            .on_event(TriggerEvent::Blur)
            .run_blocking(&form);
        assert_eq!(on_blur.failures.len(), 1);
        assert_eq!(on_blur.failures[0].rule, "email");
    }

    #[test]
    fn test_missing_fields_are_null() {
        let rules = compiled();
        let result = ExecutionEngine::new(&rules).run_blocking(&json!({}));
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures.iter().all(|f| f.field == "password"));
    }

    #[test]
    fn test_passing_form() {
        let rules = compiled();
        let result = ExecutionEngine::new(&rules)
            .run_blocking(&json!({ "password": "secret", "mail": "a@b.cn" }));
        assert!(result.passed());
    }
}
