#![forbid(unsafe_code)]

//! Built-in rule definitions
//!
//! Every validator instance starts from a fresh copy of these definitions, so
//! replacing a built-in on one instance never affects another.

use crate::rules::predicates;
use crate::rules::{Predicate, RuleDefinition, Template};
use crate::types::{RuleName, TriggerEvent};

/// Type alias for a list of rule definitions with their names
type RuleList = Vec<(RuleName, RuleDefinition)>;

/// Names of the built-in rules, in registration order
pub const BUILTIN_RULE_NAMES: &[&str] = &[
    "required",
    "number",
    "digits",
    "contains",
    "minlength",
    "maxlength",
    "rangelength",
    "min",
    "max",
    "range",
    "xss",
    "telephone",
    "email",
    "landline",
    "url",
];

/// Build the definition of one built-in rule
///
/// Returns None for names that are not built in.
pub fn builtin_definition(name: &str) -> Option<RuleDefinition> {
    let definition = match name {
        "required" => RuleDefinition::new(
            Predicate::new(predicates::required),
            Template::by_type("请输入 [0]")
                .with_variant("array", "请输入 [0]")
                .with_variant("select", "请选择 [0]"),
        ),
        "number" => RuleDefinition::new(Predicate::new(predicates::number), "[0] 只能为数字"),
        "digits" => RuleDefinition::new(Predicate::new(predicates::digits), "[0] 只能输入数字"),
        "contains" => RuleDefinition::new(Predicate::new(predicates::contains), "[0] 必须包含 {0}"),
        "minlength" => RuleDefinition::new(
            Predicate::new(predicates::minlength),
            "[0] 不能少于 {0} 个字符",
        ),
        "maxlength" => RuleDefinition::new(
            Predicate::new(predicates::maxlength),
            "[0] 不能多于 {0} 个字符",
        ),
        "rangelength" => RuleDefinition::new(
            Predicate::new(predicates::rangelength),
            "[0] 字符在 {0} 到 {1} 长度之间",
        ),
        "min" => RuleDefinition::new(Predicate::new(predicates::min), "[0] 不能小于 {0}"),
        "max" => RuleDefinition::new(Predicate::new(predicates::max), "[0] 不能大于 {0}"),
        "range" => RuleDefinition::new(
            Predicate::new(predicates::range),
            "[0] 范围在 {0} 到 {1} 之间",
        ),
        "xss" => RuleDefinition::new(Predicate::new(predicates::xss), "内容不能包含HTML标签"),
        "telephone" => {
            RuleDefinition::new(Predicate::new(predicates::telephone), "{0} 为无效 [0]")
                .inject_raw_value(true)
        }
        "email" => RuleDefinition::new(Predicate::new(predicates::email), "请输入有效 [0]")
            .with_trigger(TriggerEvent::Blur),
        "landline" => {
            RuleDefinition::new(Predicate::new(predicates::landline), "{0} 为无效 [0]")
                .with_trigger(TriggerEvent::Blur)
        }
        "url" => RuleDefinition::new(Predicate::new(predicates::url), "请输入有效 [0]")
            .with_trigger(TriggerEvent::Blur),
        _ => return None,
    };
    Some(definition)
}

/// Load all built-in rule definitions
///
/// Returns a freshly constructed list of (rule name, definition) pairs.
pub fn load_builtin_rules() -> RuleList {
    BUILTIN_RULE_NAMES
        .iter()
        .filter_map(|name| {
            let rule_name = RuleName::new(*name)?;
            builtin_definition(name).map(|definition| (rule_name, definition))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Trigger;
    use serde_json::json;

    #[test]
    fn test_all_builtin_rules_load() {
        let rules = load_builtin_rules();
        assert_eq!(rules.len(), BUILTIN_RULE_NAMES.len());

        let names: Vec<&str> = rules.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, BUILTIN_RULE_NAMES);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(builtin_definition("zipcode").is_none());
    }

    #[test]
    fn test_blur_triggered_rules() {
        for name in ["email", "landline", "url"] {
            let definition = builtin_definition(name).unwrap();
            assert_eq!(
                definition.trigger(),
                Some(&Trigger::new(TriggerEvent::Blur)),
                "{} should default to blur",
                name
            );
        }

        for name in ["required", "number", "minlength", "telephone"] {
            let definition = builtin_definition(name).unwrap();
            assert!(definition.trigger().is_none(), "{} has no default trigger", name);
        }
    }

    #[test]
    fn test_only_telephone_injects() {
        for name in BUILTIN_RULE_NAMES {
            let definition = builtin_definition(name).unwrap();
            assert_eq!(definition.injects_raw_value(), *name == "telephone");
        }
    }

    #[test]
    fn test_required_template_variants() {
        let definition = builtin_definition("required").unwrap();
        assert!(definition.template().supports("select"));
        assert!(definition.template().supports("array"));
        assert_eq!(definition.template().resolve("select"), "请选择 [0]");
        assert_eq!(definition.template().resolve("default"), "请输入 [0]");
    }

    #[test]
    fn test_fresh_copies_are_independent() {
        let first = load_builtin_rules();
        let second = load_builtin_rules();
        assert_eq!(first.len(), second.len());

        let (_, email) = &first[12];
        assert!(email.check(&json!("a@b.cn"), &json!(true), "default"));
    }
}
