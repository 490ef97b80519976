//! JSON output formatter.

use crate::issue::{FileReport, LintReport};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    timestamp: &'a str,
    catalog: &'a str,
    passed: bool,
    summary: Summary<'a>,
    files: &'a [FileReport],
}

#[derive(serde::Serialize)]
struct Summary<'a> {
    files: usize,
    issues: usize,
    suppressed: usize,
    unreadable: usize,
    by_category: Vec<CategoryCount<'a>>,
}

#[derive(serde::Serialize)]
struct CategoryCount<'a> {
    category: &'a str,
    issues: usize,
}

/// Formats a [`LintReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &LintReport) -> String {
    let output = JsonOutput {
        timestamp: &report.timestamp,
        catalog: &report.catalog,
        passed: report.passed,
        summary: Summary {
            files: report.files.len(),
            issues: report.issue_count(),
            suppressed: report.suppressed_count(),
            unreadable: report.error_count(),
            by_category: report
                .count_by_category()
                .into_iter()
                .map(|(category, issues)| CategoryCount { category, issues })
                .collect(),
        },
        files: &report.files,
    };

    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
