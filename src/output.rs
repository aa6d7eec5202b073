//! Output formatters (human and JSONL)

pub mod human;
pub mod jsonl;
pub mod rule_listing;

pub use human::HumanFormatter;
pub use jsonl::JsonlFormatter;
pub use rule_listing::{
    RuleListing, RuleListingHumanFormatter, RuleListingJsonlFormatter, RuleSource,
};

use crate::diagnostics::Warning;
use crate::engine::{ExecutionResult, FieldFailure};

/// Outcome of checking one form document
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Input path as given on the command line
    pub input: String,
    pub failures: Vec<FieldFailure>,
    pub fields_checked: usize,
    pub rules_executed: usize,
}

impl DocumentReport {
    pub fn new(input: impl Into<String>, result: ExecutionResult) -> Self {
        Self {
            input: input.into(),
            failures: result.failures,
            fields_checked: result.fields_checked,
            rules_executed: result.rules_executed,
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a `check` run over several documents
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Per-document results, in input order
    pub documents: Vec<DocumentReport>,
    /// Warnings raised while compiling the configured rules
    pub warnings: Vec<Warning>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.documents.iter().all(DocumentReport::passed)
    }

    pub fn documents_failed(&self) -> usize {
        self.documents.iter().filter(|d| !d.passed()).count()
    }

    pub fn total_failures(&self) -> usize {
        self.documents.iter().map(|d| d.failures.len()).sum()
    }
}
