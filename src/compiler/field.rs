#![forbid(unsafe_code)]

//! Field rule objects
//!
//! A field rule object maps rule names to constraint values, plus the
//! reserved keys `label`, `trigger`, `type` and `custom`. It can be built
//! in code or decoded from a JSON/TOML document.

use crate::compiler::CustomValidator;
use crate::error::CompileError;
use crate::types::Trigger;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Rule objects of a whole form, keyed by field in declaration order
pub type FormRules = IndexMap<String, FieldRules>;

/// Keys of a field rule object that are not rule names
const RESERVED_KEYS: &[&str] = &["label", "trigger", "type", "custom"];

/// How a rule is configured on a field
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOption {
    /// The constraint value itself, e.g. `5` for `minlength`
    Value(Value),
    /// `{ value, type?, message?, trigger? }`
    Expanded(ExpandedRule),
}

impl RuleOption {
    /// The configured constraint, if any
    pub fn constraint(&self) -> Option<&Value> {
        match self {
            RuleOption::Value(value) => Some(value),
            RuleOption::Expanded(expanded) => expanded.value.as_ref(),
        }
    }
}

macro_rules! rule_option_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RuleOption {
                fn from(value: $ty) -> Self {
                    RuleOption::Value(value.into())
                }
            }
        )*
    };
}

rule_option_from!(Value, bool, i32, i64, u32, u64, usize, f64, &str, String);

impl<T: Into<Value>> From<Vec<T>> for RuleOption {
    fn from(values: Vec<T>) -> Self {
        RuleOption::Value(Value::Array(values.into_iter().map(Into::into).collect()))
    }
}

impl From<ExpandedRule> for RuleOption {
    fn from(expanded: ExpandedRule) -> Self {
        RuleOption::Expanded(expanded)
    }
}

/// The expanded form of a rule entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedRule {
    pub value: Option<Value>,
    pub type_hint: Option<String>,
    pub message: Option<String>,
    pub trigger: Option<Trigger>,
}

impl ExpandedRule {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Selects a template variant, e.g. `select` for `required`
    #[must_use]
    pub fn type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    /// Replaces the rule's template for this field
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: impl Into<Trigger>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }
}

/// Reference to the check of a custom entry
#[derive(Debug, Clone)]
pub enum ValidatorRef {
    /// A validator supplied directly
    Func(CustomValidator),
    /// A validator registered on the facade under this name
    Named(String),
}

/// A custom check attached to a field
#[derive(Debug, Clone, Default)]
pub struct CustomRule {
    pub trigger: Option<Trigger>,
    pub validator: Option<ValidatorRef>,
}

impl CustomRule {
    pub fn new(validator: CustomValidator) -> Self {
        Self {
            trigger: None,
            validator: Some(ValidatorRef::Func(validator)),
        }
    }

    /// Refers to a validator registered on the facade
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            trigger: None,
            validator: Some(ValidatorRef::Named(name.into())),
        }
    }

    #[must_use]
    pub fn trigger(mut self, trigger: impl Into<Trigger>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }
}

/// The rule object of one field
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub label: Option<String>,
    pub trigger: Option<Trigger>,
    pub type_hint: Option<String>,
    pub custom: Vec<CustomRule>,
    pub rules: IndexMap<String, RuleOption>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Field-level trigger, used by rules without their own
    #[must_use]
    pub fn trigger(mut self, trigger: impl Into<Trigger>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Field data-type hint used to pick template variants
    #[must_use]
    pub fn type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    /// Adds (or replaces) a rule entry
    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, option: impl Into<RuleOption>) -> Self {
        self.rules.insert(name.into(), option.into());
        self
    }

    #[must_use]
    pub fn custom(mut self, custom: CustomRule) -> Self {
        self.custom.push(custom);
        self
    }

    /// Returns true when a `required` rule is configured and not disabled
    pub fn requires_presence(&self) -> bool {
        match self.rules.get("required") {
            Some(option) => option.constraint() != Some(&Value::Bool(false)),
            None => false,
        }
    }

    /// Decode the rule object of `field` from a dynamic value
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidFieldRules` if `value` is not an object,
    /// `CompileError::InvalidReservedKey` if a reserved key or an expanded
    /// entry has the wrong shape, and the custom-validator errors if a
    /// `custom` entry has no usable `validator`.
    pub fn from_value(field: &str, value: &Value) -> Result<Self, CompileError> {
        let object = value
            .as_object()
            .ok_or_else(|| CompileError::InvalidFieldRules {
                field: field.to_string(),
            })?;

        let mut rules = FieldRules {
            label: optional_string(field, "label", object.get("label"))?,
            type_hint: optional_string(field, "type", object.get("type"))?,
            trigger: optional_trigger(field, "trigger", object.get("trigger"))?,
            custom: decode_custom(field, object.get("custom"))?,
            rules: IndexMap::new(),
        };

        for (name, option) in object {
            if RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }
            let option = match option {
                Value::Object(expanded) => {
                    RuleOption::Expanded(decode_expanded(field, name, expanded)?)
                }
                other => RuleOption::Value(other.clone()),
            };
            rules.rules.insert(name.clone(), option);
        }

        Ok(rules)
    }

    /// Decode the rules of a whole form; the top level must be an object
    pub fn form_from_value(value: &Value) -> Result<FormRules, CompileError> {
        let object = value.as_object().ok_or(CompileError::InvalidFormRules)?;
        object
            .iter()
            .map(|(field, rules)| Ok((field.clone(), FieldRules::from_value(field, rules)?)))
            .collect()
    }
}

fn invalid_key(field: &str, key: &str, message: impl Into<String>) -> CompileError {
    CompileError::InvalidReservedKey {
        field: field.to_string(),
        key: key.to_string(),
        message: message.into(),
    }
}

fn optional_string(
    field: &str,
    key: &str,
    value: Option<&Value>,
) -> Result<Option<String>, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid_key(
            field,
            key,
            format!("expected a string, found {}", other),
        )),
    }
}

fn optional_trigger(
    field: &str,
    key: &str,
    value: Option<&Value>,
) -> Result<Option<Trigger>, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Trigger::from_value(value)
            .map(Some)
            .map_err(|message| invalid_key(field, key, message)),
    }
}

fn decode_expanded(
    field: &str,
    rule: &str,
    object: &Map<String, Value>,
) -> Result<ExpandedRule, CompileError> {
    let value = match object.get("value") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    };
    Ok(ExpandedRule {
        value,
        type_hint: optional_string(field, &format!("{}.type", rule), object.get("type"))?,
        message: optional_string(field, &format!("{}.message", rule), object.get("message"))?,
        trigger: optional_trigger(field, &format!("{}.trigger", rule), object.get("trigger"))?,
    })
}

fn decode_custom(field: &str, value: Option<&Value>) -> Result<Vec<CustomRule>, CompileError> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(invalid_key(
                field,
                "custom",
                format!("expected a list, found {}", other),
            ));
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry.as_object().ok_or_else(|| {
                invalid_key(
                    field,
                    &format!("custom[{}]", index),
                    format!("expected an object, found {}", entry),
                )
            })?;

            let trigger =
                optional_trigger(field, &format!("custom[{}].trigger", index), object.get("trigger"))?;

            let validator = match object.get("validator") {
                None | Some(Value::Null) => None,
                Some(Value::String(name)) => Some(ValidatorRef::Named(name.clone())),
                Some(other) => {
                    return Err(CompileError::NotCallable {
                        field: field.to_string(),
                        index,
                        reason: format!("expected a validator name, found {}", other),
                    });
                }
            };

            Ok(CustomRule { trigger, validator })
        })
        .collect()
}
