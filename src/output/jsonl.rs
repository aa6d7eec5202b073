#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All warning records (in compile order)
//! 2. All failure records (by input, then field and rule order)
//! 3. One document record per input
//! 4. One status record

use crate::output::CheckReport;
use serde::Serialize;

/// JSONL output formatter
///
/// Formats check reports as JSON Lines (one JSON object per line).
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format the check report as JSONL
    pub fn format(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        for warning in &report.warnings {
            push_record(
                &mut output,
                &WarningRecord {
                    record_type: "warning",
                    rule: warning.rule(),
                    message: warning.to_string(),
                },
            );
        }

        for document in &report.documents {
            for failure in &document.failures {
                push_record(
                    &mut output,
                    &FailureRecord {
                        record_type: "failure",
                        input: &document.input,
                        field: &failure.field,
                        rule: &failure.rule,
                        message: &failure.message,
                    },
                );
            }
        }

        for document in &report.documents {
            push_record(
                &mut output,
                &DocumentRecord {
                    record_type: "document",
                    input: &document.input,
                    passed: document.passed(),
                    fields_checked: document.fields_checked as u64,
                    rules_executed: document.rules_executed as u64,
                    failures: document.failures.len() as u64,
                },
            );
        }

        push_record(
            &mut output,
            &StatusRecord {
                record_type: "status",
                passed: report.passed(),
                documents_checked: report.documents.len() as u64,
                documents_failed: report.documents_failed() as u64,
                total_failures: report.total_failures() as u64,
            },
        );

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

/// Warning record for JSONL output
#[derive(Debug, Serialize)]
struct WarningRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    message: String,
}

/// Failure record for JSONL output
#[derive(Debug, Serialize)]
struct FailureRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    input: &'a str,
    field: &'a str,
    rule: &'a str,
    message: &'a str,
}

/// Per-document record for JSONL output
#[derive(Debug, Serialize)]
struct DocumentRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    input: &'a str,
    passed: bool,
    fields_checked: u64,
    rules_executed: u64,
    failures: u64,
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    documents_checked: u64,
    documents_failed: u64,
    total_failures: u64,
}
