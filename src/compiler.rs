#![forbid(unsafe_code)]

//! Rule compiler: field rule objects in, ordered asynchronous validators out

mod compile;
mod compiled;
mod field;

pub use compile::RuleCompiler;
pub use compiled::{
    CompiledRule, CompiledRules, CustomFuture, CustomValidator, ValidationFailure,
    ValidatorFuture,
};
pub use field::{CustomRule, ExpandedRule, FieldRules, FormRules, RuleOption, ValidatorRef};
