#![forbid(unsafe_code)]

//! Human-readable output formatter for check reports

use crate::output::CheckReport;

/// Human-readable formatter
pub struct HumanFormatter;

impl HumanFormatter {
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Format a check report
    ///
    /// Warnings first, then one block per document, then a summary line.
    pub fn format(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        for warning in &report.warnings {
            output.push_str(&format!("Warning: {}\n", warning));
        }
        if !report.warnings.is_empty() {
            output.push('\n');
        }

        for document in &report.documents {
            if document.passed() {
                output.push_str(&format!(
                    "✓ {} ({} fields, {} rules)\n",
                    document.input, document.fields_checked, document.rules_executed
                ));
                continue;
            }

            output.push_str(&format!(
                "✗ {} ({} {})\n",
                document.input,
                document.failures.len(),
                plural(document.failures.len(), "failure", "failures")
            ));
            for failure in &document.failures {
                output.push_str(&format!(
                    "  {} [{}]: {}\n",
                    failure.field, failure.rule, failure.message
                ));
            }
        }

        output.push('\n');
        if report.passed() {
            output.push_str(&format!(
                "Check passed: {} {} checked\n",
                report.documents.len(),
                plural(report.documents.len(), "document", "documents")
            ));
        } else {
            output.push_str(&format!(
                "Check failed: {} of {} {} failed, {} {}\n",
                report.documents_failed(),
                report.documents.len(),
                plural(report.documents.len(), "document", "documents"),
                report.total_failures(),
                plural(report.total_failures(), "failure", "failures")
            ));
        }

        output
    }

    /// Write the formatted output to stdout
    pub fn write_to_stdout(&self, report: &CheckReport) {
        print!("{}", self.format(report));
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
