#![forbid(unsafe_code)]

//! formrules: declarative form validation rules
//!
//! Per-field rule objects (`label`, `trigger`, rule-name/constraint pairs and
//! `custom` checks) are compiled against a rule registry into ordered lists
//! of asynchronous validators, each tagged with the events that fire it and
//! producing a formatted message on failure.
//!
//! ```
//! use formrules::{FieldRules, Validator};
//! use futures::executor::block_on;
//! use serde_json::{Value, json};
//!
//! let validator = Validator::new();
//! let rules = FieldRules::new().label("密码").rule("required", true).rule("minlength", 5);
//! let compiled = validator.compile_field("password", &rules).unwrap();
//!
//! let minlength = &compiled.get("password").unwrap()[1];
//! let failure = block_on(minlength.validate(&Value::Null, &json!("abc"))).unwrap_err();
//! assert_eq!(failure.message(), "密码不能少于 5 个字符");
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod template;
pub mod types;
pub mod validator;

// Re-export error types for convenient access
pub use error::{CompileError, ConfigError, FormRulesError, RuleError};

// Re-export core domain types for convenient access
pub use compiler::{
    CompiledRule, CompiledRules, CustomRule, CustomValidator, ExpandedRule, FieldRules,
    FormRules, RuleOption, ValidationFailure,
};
pub use diagnostics::Warning;
pub use engine::{ExecutionEngine, FieldFailure, RunMode};
pub use rules::{Predicate, RuleDefinition, RuleRegistry, Template};
pub use types::{RuleName, Trigger, TriggerEvent};
pub use validator::{Validator, ValidatorHandle};
