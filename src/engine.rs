//! Running compiled rules against form documents

pub mod executor;

pub use executor::{ExecutionEngine, ExecutionResult, FieldFailure, RunMode};
