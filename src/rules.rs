#![forbid(unsafe_code)]

//! Rule definitions and registry

pub mod builtin;
mod definition;
mod pattern_rule;
pub mod predicates;
mod registry;

// Re-export core types
pub use definition::{Predicate, RuleDefinition, Template};
pub use pattern_rule::{PatternRuleConfig, TemplateSpec};
pub use registry::RuleRegistry;
