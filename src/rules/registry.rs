#![forbid(unsafe_code)]

//! Rule registry for managing rule definitions
//!
//! The RuleRegistry is responsible for:
//! - Holding its own copy of the built-in rule definitions
//! - Accepting additional definitions at runtime
//! - Refusing silent overwrites unless a replace is requested
//! - Providing access to definitions by name

use crate::diagnostics::Warning;
use crate::rules::RuleDefinition;
use crate::rules::builtin::load_builtin_rules;
use crate::types::RuleName;
use indexmap::IndexMap;

/// Registry for storing and managing rule definitions
///
/// Definitions are kept in registration order so listings are stable.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: IndexMap<RuleName, RuleDefinition>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Create a registry seeded with a fresh copy of the built-in rules
    pub fn with_builtins() -> Self {
        Self {
            rules: load_builtin_rules().into_iter().collect(),
        }
    }

    /// Register a rule definition
    ///
    /// If a rule with this name already exists and `replace` is false, the
    /// existing definition is kept and a `Warning::DuplicateRule` is returned.
    /// With `replace` the definition is overwritten in place.
    pub fn add(
        &mut self,
        name: RuleName,
        definition: RuleDefinition,
        replace: bool,
    ) -> Option<Warning> {
        if !replace && self.rules.contains_key(&name) {
            return Some(
                Warning::DuplicateRule {
                    rule: name.into(),
                }
                .emit(),
            );
        }

        tracing::debug!(rule = %name, replace, "registered rule");
        self.rules.insert(name, definition);
        None
    }

    /// Get a rule definition by its name
    ///
    /// Returns `None` if the rule is not registered.
    pub fn get(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.get(name)
    }

    /// Check whether a rule is registered
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Iterate over all rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&RuleName, &RuleDefinition)> {
        self.rules.iter()
    }

    /// Get the number of rules in the registry
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
