//! Integration tests for the validator facade and its shared handle

mod common;

use formrules::rules::PatternRuleConfig;
use formrules::{
    CustomValidator, FieldRules, FormRules, Predicate, RuleDefinition, TriggerEvent, Validator,
    ValidatorHandle, Warning,
};
use futures::executor::block_on;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn form(field: &str, rules: FieldRules) -> FormRules {
    let mut form = FormRules::new();
    form.insert(field.to_string(), rules);
    form
}

#[test]
fn test_with_rules_keeps_builtins_on_clash() {
    let shadow = RuleDefinition::new(Predicate::new(|_, _, _| false), "shadowed");
    let validator = assert_ok!(Validator::with_rules([
        ("email", shadow, false),
        (
            "even",
            RuleDefinition::new(
                Predicate::new(|value, _, _| value.as_i64().is_some_and(|n| n % 2 == 0)),
                "[0] 必须为偶数",
            ),
            false,
        ),
    ]));

    let email = assert_some!(validator.registry().get("email"));
    assert_eq!(email.template().resolve("default"), "请输入有效 [0]");
    assert!(validator.registry().contains("even"));
}

#[test]
fn test_with_rules_replaces_builtin_when_asked() {
    let lenient = RuleDefinition::new(Predicate::new(|_, _, _| true), "[0] custom email");
    let validator = assert_ok!(Validator::with_rules([("email", lenient, true)]));

    let email = assert_some!(validator.registry().get("email"));
    assert_eq!(email.template().resolve("default"), "[0] custom email");
    assert_eq!(validator.registry().len(), 15);

    let compiled = assert_ok!(
        validator.compile_field("mail", &FieldRules::new().label("邮箱").rule("email", true))
    );
    let rule = &assert_some!(compiled.get("mail"))[0];
    assert!(block_on(rule.validate(&Value::Null, &json!("not-an-email"))).is_ok());
}

#[test]
fn test_pattern_rule_registration() {
    let mut validator = Validator::new();
    let config: PatternRuleConfig = assert_ok!(toml::from_str(
        r#"
pattern = '^\d{6}$'
template = "[0] 格式不正确"
"#
    ));
    assert_eq!(assert_ok!(validator.add_pattern_rule("zipcode", &config)), None);

    let compiled = assert_ok!(
        validator.compile_field("zip", &FieldRules::new().label("邮编").rule("zipcode", true))
    );
    let rule = &assert_some!(compiled.get("zip"))[0];
    let failure = block_on(rule.validate(&Value::Null, &json!("3610"))).unwrap_err();
    assert_eq!(failure.message(), "邮编格式不正确");
}

#[test]
fn test_pattern_rule_replace_flag() {
    let mut validator = Validator::new();
    let mut config: PatternRuleConfig = assert_ok!(toml::from_str(
        r#"
pattern = '^[a-z]+$'
template = "[0] 只能为小写字母"
"#
    ));

    let warning = assert_ok!(validator.add_pattern_rule("number", &config));
    assert!(matches!(warning, Some(Warning::DuplicateRule { .. })));

    config.replace = true;
    assert_eq!(assert_ok!(validator.add_pattern_rule("number", &config)), None);
    let number = assert_some!(validator.registry().get("number"));
    assert_eq!(number.template().resolve("default"), "[0] 只能为小写字母");
}

#[test]
fn test_register_custom_returns_previous() {
    let mut validator = Validator::new();
    assert!(
        validator
            .register_custom("unique", CustomValidator::from_sync(|_, _| Ok(())))
            .is_none()
    );
    assert!(
        validator
            .register_custom("unique", CustomValidator::from_sync(|_, _| Ok(())))
            .is_some()
    );
}

#[test]
fn test_handle_call_matches_compile() {
    let handle = ValidatorHandle::new(Validator::new());
    let rules = form(
        "password",
        FieldRules::new()
            .label("密码")
            .rule("required", true)
            .rule("minlength", 5),
    );

    let direct = assert_ok!(handle.call(&rules));
    let through_fn = assert_ok!((handle.as_fn())(&rules));
    assert_eq!(direct.rule_count(), through_fn.rule_count());

    let compiled = assert_ok!(handle.call_value(&json!({
        "password": { "label": "密码", "required": true, "minlength": 5 }
    })));
    assert_eq!(compiled.rule_count(), 2);
}

#[test]
fn test_handle_methods_share_state_across_threads() {
    let handle = Validator::new().into_handle();
    let calls = Arc::new(AtomicUsize::new(0));

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let handle = handle.clone();
            thread::spawn(move || {
                let definition = RuleDefinition::new(Predicate::new(|_, _, _| true), "ok");
                assert_ok!(handle.add_rule(&format!("rule{}", i), definition, false));
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let counter = Arc::clone(&calls);
    handle.register_custom(
        "counted",
        CustomValidator::from_sync(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    let compiled = assert_ok!(handle.call_value(&json!({
        "a": { "rule0": true, "rule1": true, "rule2": true, "rule3": true },
        "b": { "custom": [{ "validator": "counted" }] }
    })));
    assert!(compiled.warnings().is_empty());
    assert_eq!(compiled.rule_count(), 5);

    let custom = &assert_some!(compiled.get("b"))[0];
    assert!(block_on(custom.validate(&Value::Null, &json!("x"))).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handle_default_trigger() {
    let handle = ValidatorHandle::default();
    handle.set_default_trigger(TriggerEvent::Change);

    let compiled = assert_ok!(handle.compile_field("age", &FieldRules::new().rule("min", 1)));
    assert!(assert_some!(compiled.get("age"))[0].fires_on(TriggerEvent::Change));
}

#[test]
fn test_validator_converts_into_handle() {
    let handle: ValidatorHandle = Validator::new().into();
    let count = handle.with_validator(|validator| validator.registry().len());
    assert_eq!(count, 15);
}
