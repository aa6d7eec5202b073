#![forbid(unsafe_code)]

//! Compiled validators and the values they produce

use crate::diagnostics::Warning;
use crate::types::{Trigger, TriggerEvent};
use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A failed check, carrying the formatted user-facing message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    message: String,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a compiled validator: resolves to `Ok(())` on pass
pub type ValidatorFuture = BoxFuture<'static, Result<(), ValidationFailure>>;

/// Outcome of a custom validator: `Err` carries a message template
pub type CustomFuture = BoxFuture<'static, Result<(), String>>;

type ValidatorFn = dyn Fn(&Value, &Value) -> ValidatorFuture + Send + Sync;

type CustomFn = dyn Fn(&Value, &Value) -> CustomFuture + Send + Sync;

/// A user-supplied check invoked with `(form_value, candidate_value)`
///
/// Custom validators always produce a future, so a failure is representable
/// whether the check is asynchronous or not. The error string may use the
/// `[0]` label placeholder; it is formatted with the field label on failure.
#[derive(Clone)]
pub struct CustomValidator(Arc<CustomFn>);

impl CustomValidator {
    /// Wraps an asynchronous check
    ///
    /// The returned future must own its data; clone what it needs out of the
    /// borrowed arguments.
    pub fn new<F, Fut>(check: F) -> Self
    where
        F: Fn(&Value, &Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        CustomValidator(Arc::new(move |form, value| check(form, value).boxed()))
    }

    /// Wraps a synchronous check into an already-resolved future
    pub fn from_sync<F>(check: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        CustomValidator(Arc::new(move |form, value| {
            futures::future::ready(check(form, value)).boxed()
        }))
    }

    /// Invokes the check
    pub fn call(&self, form: &Value, value: &Value) -> CustomFuture {
        (self.0)(form, value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(<fn>)")
    }
}

/// One compiled rule of a field
///
/// Compiled rules own everything they need (label, template, constraint);
/// they must be recompiled when the registry or the field rules change.
#[derive(Clone)]
pub struct CompiledRule {
    rule_name: String,
    trigger: Trigger,
    type_hint: Option<String>,
    validator: Arc<ValidatorFn>,
}

impl CompiledRule {
    pub(crate) fn new<F>(
        rule_name: impl Into<String>,
        trigger: Trigger,
        type_hint: Option<String>,
        validator: F,
    ) -> Self
    where
        F: Fn(&Value, &Value) -> ValidatorFuture + Send + Sync + 'static,
    {
        Self {
            rule_name: rule_name.into(),
            trigger,
            type_hint,
            validator: Arc::new(validator),
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Template variant selected at compile time, when not the default
    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    pub fn fires_on(&self, event: TriggerEvent) -> bool {
        self.trigger.fires_on(event)
    }

    /// Runs the check against `value`; `form` is the whole form value
    pub fn validate(&self, form: &Value, value: &Value) -> ValidatorFuture {
        (self.validator)(form, value)
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("rule_name", &self.rule_name)
            .field("trigger", &self.trigger)
            .field("type_hint", &self.type_hint)
            .field("validator", &"<fn>")
            .finish()
    }
}

/// Compiled rules of a form, keyed by field in declaration order
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    fields: IndexMap<String, Vec<CompiledRule>>,
    warnings: Vec<Warning>,
}

impl CompiledRules {
    pub(crate) fn insert(&mut self, field: impl Into<String>, rules: Vec<CompiledRule>) {
        self.fields.insert(field.into(), rules);
    }

    pub(crate) fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        self.warnings.extend(warnings);
    }

    /// Compiled rules of one field
    pub fn get(&self, field: &str) -> Option<&[CompiledRule]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterate `(field, rules)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CompiledRule])> {
        self.fields
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }

    /// Warnings raised while compiling
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of compiled rules across all fields
    pub fn rule_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn into_fields(self) -> IndexMap<String, Vec<CompiledRule>> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_sync_custom_validator_can_fail() {
        let validator = CustomValidator::from_sync(|_, value| {
            if value == &json!("taken") {
                Err("[0] 已被占用".to_string())
            } else {
                Ok(())
            }
        });
        assert!(block_on(validator.call(&Value::Null, &json!("free"))).is_ok());
        assert_eq!(
            block_on(validator.call(&Value::Null, &json!("taken"))),
            Err("[0] 已被占用".to_string())
        );
    }

    #[test]
    fn test_async_custom_validator() {
        let validator = CustomValidator::new(|form, value| {
            let expected = form["password"].clone();
            let value = value.clone();
            async move {
                if value == expected {
                    Ok(())
                } else {
                    Err("两次输入的密码不一致".to_string())
                }
            }
        });
        let form = json!({ "password": "secret" });
        assert!(block_on(validator.call(&form, &json!("secret"))).is_ok());
        assert!(block_on(validator.call(&form, &json!("other"))).is_err());
    }

    #[test]
    fn test_compiled_rule_accessors() {
        let rule = CompiledRule::new(
            "email",
            Trigger::new(TriggerEvent::Blur),
            None,
            |_, _| futures::future::ready(Err(ValidationFailure::new("bad"))).boxed(),
        );
        assert_eq!(rule.rule_name(), "email");
        assert!(rule.fires_on(TriggerEvent::Blur));
        assert!(!rule.fires_on(TriggerEvent::Change));
        assert!(rule.type_hint().is_none());

        let failure = block_on(rule.validate(&Value::Null, &json!("x"))).unwrap_err();
        assert_eq!(failure.message(), "bad");
        assert_eq!(failure.to_string(), "bad");
    }

    #[test]
    fn test_compiled_rule_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<CompiledRule>();
        assert_sync::<CompiledRule>();
        assert_send::<CompiledRules>();
        assert_sync::<CompiledRules>();
    }
}
