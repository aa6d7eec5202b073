#![forbid(unsafe_code)]

//! The validator facade
//!
//! A [`Validator`] owns one rule registry, the global default trigger and the
//! table of named custom validators. [`ValidatorHandle`] wraps a validator in
//! shared ownership so it can be invoked directly as shorthand for
//! [`Validator::compile`] while its methods stay reachable on the same state.

use crate::compiler::{
    CompiledRules, CustomValidator, FieldRules, FormRules, RuleCompiler,
};
use crate::diagnostics::Warning;
use crate::error::{CompileError, RuleError};
use crate::rules::{PatternRuleConfig, RuleDefinition, RuleRegistry};
use crate::types::{RuleName, Trigger};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Compiles field rules against its own registry
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: RuleRegistry,
    default_trigger: Trigger,
    custom_validators: HashMap<String, CustomValidator>,
}

impl Validator {
    /// Create a validator seeded with a fresh copy of the built-in rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with extra rule definitions on top of the built-ins
    ///
    /// Each `(name, definition, replace)` entry goes through
    /// [`Validator::add_rule`] with its own `replace` flag, so a clashing
    /// entry without `replace` keeps the built-in and logs a warning.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidName` for a malformed rule name.
    pub fn with_rules<I, S>(rules: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (S, RuleDefinition, bool)>,
        S: AsRef<str>,
    {
        let mut validator = Self::new();
        for (name, definition, replace) in rules {
            validator.add_rule(name.as_ref(), definition, replace)?;
        }
        Ok(validator)
    }

    /// Register a rule definition
    ///
    /// Returns the `DuplicateRule` warning when `name` is taken and `replace`
    /// is false; the existing definition stays in effect.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidName` for a malformed rule name.
    pub fn add_rule(
        &mut self,
        name: &str,
        definition: RuleDefinition,
        replace: bool,
    ) -> Result<Option<Warning>, RuleError> {
        let name = RuleName::new(name).ok_or_else(|| RuleError::InvalidName(name.to_string()))?;
        Ok(self.registry.add(name, definition, replace))
    }

    /// Register a regex-backed rule, honouring its `replace` flag
    pub fn add_pattern_rule(
        &mut self,
        name: &str,
        config: &PatternRuleConfig,
    ) -> Result<Option<Warning>, RuleError> {
        let definition = config.to_definition(name)?;
        self.add_rule(name, definition, config.replace)
    }

    /// Register a custom validator that rule documents refer to by name
    ///
    /// Returns the validator previously registered under `name`, if any.
    pub fn register_custom(
        &mut self,
        name: impl Into<String>,
        validator: CustomValidator,
    ) -> Option<CustomValidator> {
        self.custom_validators.insert(name.into(), validator)
    }

    /// Set the trigger used by rules that specify none
    ///
    /// Affects subsequent compilations only.
    pub fn set_default_trigger(&mut self, trigger: impl Into<Trigger>) {
        self.default_trigger = trigger.into();
    }

    pub fn default_trigger(&self) -> &Trigger {
        &self.default_trigger
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    fn compiler(&self) -> RuleCompiler<'_> {
        RuleCompiler::new(&self.registry, &self.default_trigger, &self.custom_validators)
    }

    /// Compile the rules of a whole form
    ///
    /// # Errors
    ///
    /// Returns a `CompileError` for an unusable custom entry.
    pub fn compile(&self, form: &FormRules) -> Result<CompiledRules, CompileError> {
        self.compiler().compile_all(form)
    }

    /// Compile the rules of a single field
    pub fn compile_field(
        &self,
        field: &str,
        rules: &FieldRules,
    ) -> Result<CompiledRules, CompileError> {
        let mut warnings = Vec::new();
        let compiled = self.compiler().compile_field(field, rules, &mut warnings)?;

        let mut result = CompiledRules::default();
        result.insert(field, compiled);
        result.extend_warnings(warnings);
        Ok(result)
    }

    /// Decode a JSON rule document and compile it
    ///
    /// # Errors
    ///
    /// Returns a `CompileError` if the document is malformed or a custom
    /// entry cannot be resolved.
    pub fn compile_value(&self, document: &Value) -> Result<CompiledRules, CompileError> {
        let form = FieldRules::form_from_value(document)?;
        self.compile(&form)
    }

    /// Move this validator behind a shared, callable handle
    pub fn into_handle(self) -> ValidatorHandle {
        ValidatorHandle::new(self)
    }
}

/// Shared handle to a [`Validator`]
///
/// Cloning the handle shares the same registry; `add_rule` and the other
/// mutating methods take the write lock, compilation takes the read lock.
#[derive(Debug, Clone, Default)]
pub struct ValidatorHandle {
    inner: Arc<RwLock<Validator>>,
}

static GLOBAL: LazyLock<ValidatorHandle> = LazyLock::new(ValidatorHandle::default);

impl ValidatorHandle {
    pub fn new(validator: Validator) -> Self {
        Self {
            inner: Arc::new(RwLock::new(validator)),
        }
    }

    /// Process-wide default handle, seeded with the built-in rules
    pub fn global() -> &'static ValidatorHandle {
        &GLOBAL
    }

    /// Compile a form; the handle's call form
    pub fn call(&self, form: &FormRules) -> Result<CompiledRules, CompileError> {
        self.inner.read().compile(form)
    }

    /// Compile a JSON rule document
    pub fn call_value(&self, document: &Value) -> Result<CompiledRules, CompileError> {
        self.inner.read().compile_value(document)
    }

    /// Closure adapter over [`ValidatorHandle::call`]
    pub fn as_fn(
        &self,
    ) -> impl Fn(&FormRules) -> Result<CompiledRules, CompileError> + Send + Sync + 'static {
        let handle = self.clone();
        move |form| handle.call(form)
    }

    pub fn compile_field(
        &self,
        field: &str,
        rules: &FieldRules,
    ) -> Result<CompiledRules, CompileError> {
        self.inner.read().compile_field(field, rules)
    }

    pub fn add_rule(
        &self,
        name: &str,
        definition: RuleDefinition,
        replace: bool,
    ) -> Result<Option<Warning>, RuleError> {
        self.inner.write().add_rule(name, definition, replace)
    }

    pub fn add_pattern_rule(
        &self,
        name: &str,
        config: &PatternRuleConfig,
    ) -> Result<Option<Warning>, RuleError> {
        self.inner.write().add_pattern_rule(name, config)
    }

    pub fn register_custom(
        &self,
        name: impl Into<String>,
        validator: CustomValidator,
    ) -> Option<CustomValidator> {
        self.inner.write().register_custom(name, validator)
    }

    pub fn set_default_trigger(&self, trigger: impl Into<Trigger>) {
        self.inner.write().set_default_trigger(trigger);
    }

    pub fn default_trigger(&self) -> Trigger {
        self.inner.read().default_trigger().clone()
    }

    /// Run `f` with read access to the underlying validator
    pub fn with_validator<R>(&self, f: impl FnOnce(&Validator) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<Validator> for ValidatorHandle {
    fn from(validator: Validator) -> Self {
        ValidatorHandle::new(validator)
    }
}
