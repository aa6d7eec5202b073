#![forbid(unsafe_code)]

//! Rule definitions: predicates, default trigger and message templates

use crate::error::RuleError;
use crate::types::Trigger;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every predicate: `(candidate, constraint, type_hint) -> passed`
type PredicateFn = dyn Fn(&Value, &Value, &str) -> bool + Send + Sync;

/// A boolean check backing a rule
///
/// Predicates are stateless and cheap to clone; the compiler only relies on
/// their contract, never on what they check.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wraps a function with the predicate signature
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value, &Value, &str) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(check))
    }

    /// Evaluates the predicate
    pub fn test(&self, candidate: &Value, param: &Value, type_hint: &str) -> bool {
        (self.0)(candidate, param, type_hint)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(<fn>)")
    }
}

/// The message template of a rule
///
/// Either a single string, or one string per type hint with a mandatory
/// `default` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Single(String),
    ByType {
        default: String,
        variants: IndexMap<String, String>,
    },
}

impl Template {
    /// Starts a multi-variant template from its `default` variant
    pub fn by_type(default: impl Into<String>) -> Self {
        Template::ByType {
            default: default.into(),
            variants: IndexMap::new(),
        }
    }

    /// Adds a variant for `type_hint`
    ///
    /// A single-string template is promoted to a multi-variant one whose
    /// `default` is the original string.
    pub fn with_variant(self, type_hint: impl Into<String>, template: impl Into<String>) -> Self {
        let type_hint = type_hint.into();
        let template = template.into();
        match self {
            Template::Single(default) => Template::by_type(default).with_variant(type_hint, template),
            Template::ByType {
                mut default,
                mut variants,
            } => {
                if type_hint == "default" {
                    default = template;
                } else {
                    variants.insert(type_hint, template);
                }
                Template::ByType { default, variants }
            }
        }
    }

    /// Builds a template from a variant map, which must contain `default`
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MissingDefaultTemplate` naming `rule` when the map
    /// has no `default` key.
    pub fn from_variants(rule: &str, mut map: IndexMap<String, String>) -> Result<Self, RuleError> {
        let default = map
            .shift_remove("default")
            .ok_or_else(|| RuleError::MissingDefaultTemplate(rule.to_string()))?;
        Ok(Template::ByType {
            default,
            variants: map,
        })
    }

    /// Returns true if this template has a variant keyed by `type_hint`
    ///
    /// Only multi-variant templates support type hints, `default` included.
    pub fn supports(&self, type_hint: &str) -> bool {
        match self {
            Template::Single(_) => false,
            Template::ByType { variants, .. } => {
                type_hint == "default" || variants.contains_key(type_hint)
            }
        }
    }

    /// Returns the template text for `type_hint`, falling back to the default
    pub fn resolve(&self, type_hint: &str) -> &str {
        match self {
            Template::Single(text) => text,
            Template::ByType { default, variants } => variants
                .get(type_hint)
                .map(String::as_str)
                .unwrap_or(default),
        }
    }

    /// Iterates `(type_hint, text)` pairs, `default` first
    pub fn variants(&self) -> Vec<(&str, &str)> {
        match self {
            Template::Single(text) => vec![("default", text.as_str())],
            Template::ByType { default, variants } => {
                let mut all = vec![("default", default.as_str())];
                all.extend(variants.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                all
            }
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::Single(text.to_string())
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::Single(text)
    }
}

/// A registry entry: what a rule checks and how it reports failure
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    predicates: Vec<Predicate>,
    trigger: Option<Trigger>,
    template: Template,
    inject_raw_value: bool,
}

impl RuleDefinition {
    /// Creates a definition from one predicate and its message template
    pub fn new(predicate: Predicate, template: impl Into<Template>) -> Self {
        Self {
            predicates: vec![predicate],
            trigger: None,
            template: template.into(),
            inject_raw_value: false,
        }
    }

    /// Adds another predicate; all predicates must pass
    #[must_use]
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Sets the rule's default trigger
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Into<Trigger>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Substitutes the candidate value into `{i}` slots instead of the constraint
    #[must_use]
    pub fn inject_raw_value(mut self, inject: bool) -> Self {
        self.inject_raw_value = inject;
        self
    }

    /// Evaluates every predicate (logical AND)
    pub fn check(&self, candidate: &Value, param: &Value, type_hint: &str) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.test(candidate, param, type_hint))
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn injects_raw_value(&self) -> bool {
        self.inject_raw_value
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TriggerEvent;
    use serde_json::json;

    fn always(result: bool) -> Predicate {
        Predicate::new(move |_, _, _| result)
    }

    #[test]
    fn test_single_template_resolves_any_hint() {
        let template = Template::from("[0] 只能为数字");
        assert_eq!(template.resolve("default"), "[0] 只能为数字");
        assert_eq!(template.resolve("select"), "[0] 只能为数字");
        assert!(!template.supports("default"));
        assert!(!template.supports("select"));
    }

    #[test]
    fn test_multi_variant_template() {
        let template = Template::by_type("请输入 [0]").with_variant("select", "请选择 [0]");
        assert!(template.supports("default"));
        assert!(template.supports("select"));
        assert!(!template.supports("array"));
        assert_eq!(template.resolve("select"), "请选择 [0]");
        assert_eq!(template.resolve("array"), "请输入 [0]");
        assert_eq!(
            template.variants(),
            vec![("default", "请输入 [0]"), ("select", "请选择 [0]")]
        );
    }

    #[test]
    fn test_with_variant_promotes_single() {
        let template = Template::from("a").with_variant("array", "b");
        assert_eq!(template.resolve("default"), "a");
        assert_eq!(template.resolve("array"), "b");
    }

    #[test]
    fn test_from_variants_requires_default() {
        let mut map = IndexMap::new();
        map.insert("select".to_string(), "请选择 [0]".to_string());
        let err = Template::from_variants("choice", map).unwrap_err();
        assert!(err.to_string().contains("choice"));

        let mut map = IndexMap::new();
        map.insert("default".to_string(), "请输入 [0]".to_string());
        map.insert("select".to_string(), "请选择 [0]".to_string());
        let template = Template::from_variants("choice", map).unwrap();
        assert_eq!(template.resolve("select"), "请选择 [0]");
        assert_eq!(template.resolve("default"), "请输入 [0]");
    }

    #[test]
    fn test_check_is_logical_and() {
        let passing = RuleDefinition::new(always(true), "x").and(always(true));
        assert!(passing.check(&json!("v"), &json!(true), "default"));

        let failing = RuleDefinition::new(always(true), "x").and(always(false));
        assert!(!failing.check(&json!("v"), &json!(true), "default"));
        assert_eq!(failing.predicate_count(), 2);
    }

    #[test]
    fn test_builder_flags() {
        let definition = RuleDefinition::new(always(true), "x")
            .with_trigger(TriggerEvent::Change)
            .inject_raw_value(true);
        assert_eq!(
            definition.trigger(),
            Some(&Trigger::new(TriggerEvent::Change))
        );
        assert!(definition.injects_raw_value());
    }

    #[test]
    fn test_predicate_receives_arguments() {
        let predicate = Predicate::new(|value, param, hint| {
            value == &json!("a") && param == &json!(1) && hint == "array"
        });
        assert!(predicate.test(&json!("a"), &json!(1), "array"));
        assert!(!predicate.test(&json!("a"), &json!(1), "default"));
    }
}
