#![forbid(unsafe_code)]

//! The compilation algorithm
//!
//! For each field, every rule-name key is resolved against the registry and
//! turned into a validator closure; unknown rules are skipped with a warning.
//! Custom entries follow, in list order, named `"{field}-custom-{index}"`.

use crate::compiler::{
    CompiledRule, CompiledRules, CustomValidator, FieldRules, FormRules, RuleOption,
    ValidationFailure, ValidatorFuture, ValidatorRef,
};
use crate::diagnostics::Warning;
use crate::error::CompileError;
use crate::rules::predicates::is_present;
use crate::rules::{RuleDefinition, RuleRegistry};
use crate::template;
use crate::types::Trigger;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;

const DEFAULT_TYPE: &str = "default";

/// Compiles field rule objects against a registry
///
/// Borrowed from a [`Validator`](crate::validator::Validator) for the
/// duration of one compilation.
pub struct RuleCompiler<'a> {
    registry: &'a RuleRegistry,
    default_trigger: &'a Trigger,
    custom_validators: &'a HashMap<String, CustomValidator>,
}

/// Everything a built-in validator closure captures
struct BuiltinPlan {
    rule_name: String,
    definition: RuleDefinition,
    label: Option<String>,
    constraint: Value,
    type_hint: String,
    message: Option<String>,
    requires_presence: bool,
    trigger: Trigger,
}

impl<'a> RuleCompiler<'a> {
    pub fn new(
        registry: &'a RuleRegistry,
        default_trigger: &'a Trigger,
        custom_validators: &'a HashMap<String, CustomValidator>,
    ) -> Self {
        Self {
            registry,
            default_trigger,
            custom_validators,
        }
    }

    /// Compile every field of a form
    ///
    /// # Errors
    ///
    /// Returns the first fatal `CompileError`; warnings are collected in the
    /// returned `CompiledRules`.
    pub fn compile_all(&self, form: &FormRules) -> Result<CompiledRules, CompileError> {
        let mut compiled = CompiledRules::default();
        for (field, rules) in form {
            let mut warnings = Vec::new();
            let field_rules = self.compile_field(field, rules, &mut warnings)?;
            compiled.insert(field.clone(), field_rules);
            compiled.extend_warnings(warnings);
        }
        Ok(compiled)
    }

    /// Compile one field into its ordered list of validators
    ///
    /// # Errors
    ///
    /// Returns `CompileError::MissingCustomValidator` or
    /// `CompileError::NotCallable` for unusable custom entries.
    pub fn compile_field(
        &self,
        field: &str,
        rules: &FieldRules,
        warnings: &mut Vec<Warning>,
    ) -> Result<Vec<CompiledRule>, CompileError> {
        let requires_presence = rules.requires_presence();
        let mut compiled = Vec::with_capacity(rules.rules.len() + rules.custom.len());

        for (rule_name, option) in &rules.rules {
            let Some(definition) = self.registry.get(rule_name) else {
                warnings.push(
                    Warning::UnknownRule {
                        field: field.to_string(),
                        rule: rule_name.clone(),
                    }
                    .emit(),
                );
                continue;
            };

            let plan = self.plan_builtin(
                field,
                rule_name,
                option,
                definition,
                rules,
                requires_presence,
                warnings,
            );
            compiled.push(build_builtin(plan));
        }

        for (index, custom) in rules.custom.iter().enumerate() {
            let validator = self.resolve_custom(field, index, custom.validator.as_ref())?;
            let trigger = custom
                .trigger
                .clone()
                .unwrap_or_else(|| self.default_trigger.clone());
            compiled.push(build_custom(
                format!("{}-custom-{}", field, index),
                trigger,
                validator,
                rules.label.clone(),
                requires_presence,
            ));
        }

        tracing::debug!(field, rules = compiled.len(), "compiled field");
        Ok(compiled)
    }

    /// Resolve trigger, constraint, template variant and message of one rule entry
    #[allow(clippy::too_many_arguments)]
    fn plan_builtin(
        &self,
        field: &str,
        rule_name: &str,
        option: &RuleOption,
        definition: &RuleDefinition,
        rules: &FieldRules,
        requires_presence: bool,
        warnings: &mut Vec<Warning>,
    ) -> BuiltinPlan {
        let mut trigger = rules
            .trigger
            .as_ref()
            .or(definition.trigger())
            .unwrap_or(self.default_trigger)
            .clone();
        let mut type_hint = DEFAULT_TYPE.to_string();
        let mut message = None;

        // Field-level type hints apply only where the template has the variant
        if let Some(hint) = &rules.type_hint
            && definition.template().supports(hint)
        {
            type_hint = hint.clone();
        }

        let constraint = match option {
            RuleOption::Value(value) => value.clone(),
            RuleOption::Expanded(expanded) => {
                if let Some(hint) = &expanded.type_hint {
                    if definition.template().supports(hint) {
                        type_hint = hint.clone();
                    } else {
                        warnings.push(
                            Warning::UnsupportedTemplateType {
                                field: field.to_string(),
                                rule: rule_name.to_string(),
                                type_hint: hint.clone(),
                            }
                            .emit(),
                        );
                        type_hint = DEFAULT_TYPE.to_string();
                    }
                }

                message = expanded.message.clone();

                if let Some(rule_trigger) = &expanded.trigger {
                    trigger = rule_trigger.clone();
                }

                match &expanded.value {
                    Some(value) => value.clone(),
                    None => {
                        warnings.push(
                            Warning::MissingValue {
                                field: field.to_string(),
                                rule: rule_name.to_string(),
                            }
                            .emit(),
                        );
                        Value::Null
                    }
                }
            }
        };

        BuiltinPlan {
            rule_name: rule_name.to_string(),
            definition: definition.clone(),
            label: rules.label.clone(),
            constraint,
            type_hint,
            message,
            requires_presence,
            trigger,
        }
    }

    fn resolve_custom(
        &self,
        field: &str,
        index: usize,
        validator: Option<&ValidatorRef>,
    ) -> Result<CustomValidator, CompileError> {
        match validator {
            None => Err(CompileError::MissingCustomValidator {
                field: field.to_string(),
                index,
            }),
            Some(ValidatorRef::Func(validator)) => Ok(validator.clone()),
            Some(ValidatorRef::Named(name)) => self
                .custom_validators
                .get(name)
                .cloned()
                .ok_or_else(|| CompileError::NotCallable {
                    field: field.to_string(),
                    index,
                    reason: format!("no custom validator named '{}' is registered", name),
                }),
        }
    }
}

/// Build the validator closure of a registered rule
fn build_builtin(plan: BuiltinPlan) -> CompiledRule {
    let BuiltinPlan {
        rule_name,
        definition,
        label,
        constraint,
        type_hint,
        message,
        requires_presence,
        trigger,
    } = plan;

    let disabled = constraint == Value::Bool(false);
    let template_text = message.unwrap_or_else(|| {
        definition
            .template()
            .resolve(&type_hint)
            .to_string()
    });
    let selected_hint = (type_hint != DEFAULT_TYPE).then(|| type_hint.clone());

    CompiledRule::new(
        rule_name,
        trigger,
        selected_hint,
        move |_form: &Value, candidate: &Value| -> ValidatorFuture {
            let skipped = disabled
                || (!requires_presence && !is_present(candidate))
                || *candidate == Value::Bool(false);

            let outcome = if skipped || definition.check(candidate, &constraint, &type_hint) {
                Ok(())
            } else {
                let values = if definition.injects_raw_value() {
                    candidate
                } else {
                    &constraint
                };
                Err(ValidationFailure::new(template::format(
                    &template_text,
                    Some(values),
                    label.as_deref(),
                )))
            };

            futures::future::ready(outcome).boxed()
        },
    )
}

/// Build the wrapper around a custom validator
fn build_custom(
    rule_name: String,
    trigger: Trigger,
    validator: CustomValidator,
    label: Option<String>,
    requires_presence: bool,
) -> CompiledRule {
    CompiledRule::new(
        rule_name,
        trigger,
        None,
        move |form: &Value, candidate: &Value| -> ValidatorFuture {
            if !requires_presence && !is_present(candidate) {
                return futures::future::ready(Ok(())).boxed();
            }

            let pending = validator.call(form, candidate);
            let label = label.clone();
            async move {
                pending.await.map_err(|message| {
                    ValidationFailure::new(template::format(&message, None, label.as_deref()))
                })
            }
            .boxed()
        },
    )
}
