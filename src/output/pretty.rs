//! Human-readable colored text formatter.

use crate::issue::LintReport;
use colored::Colorize;

/// Formats a [`LintReport`] as ANSI-colored text.
///
/// One section per file: every active issue with its line, category, problem
/// and guidance (the AI explanation when present, otherwise the catalog
/// recommendation), then suppressed issues. A one-line summary closes the
/// report.
pub fn format(report: &LintReport) -> String {
    let mut out = String::new();
    let separator = "=".repeat(60);

    for file in &report.files {
        out.push_str(&format!(
            "\n{}\n",
            format!("  Analyzing: {}  ", file.file.display())
                .bold()
                .on_blue()
                .white()
        ));
        out.push_str(&format!("{}\n", separator.dimmed()));

        if let Some(ref error) = file.error {
            out.push_str(&format!("  {} {}\n", "ERROR".red().bold(), error));
            continue;
        }

        if file.issues.is_empty() {
            out.push_str(&format!(
                "  {} No issues found ({} lines checked).\n",
                "PASS".green().bold(),
                file.lines_scanned
            ));
        } else {
            out.push_str(&format!(
                "  {} {} potential issue(s):\n\n",
                "WARN".yellow().bold(),
                file.issues.len()
            ));
            for issue in &file.issues {
                out.push_str(&format!(
                    "  {} {}\n",
                    format!("Line {}:", issue.line).bold(),
                    issue.text.dimmed()
                ));
                out.push_str(&format!("     Category: {}\n", issue.category.cyan()));
                out.push_str(&format!("     Problem:  {}\n", issue.problem));
                match issue.explanation {
                    Some(ref text) => {
                        out.push_str(&format!("     {}\n", "AI explanation:".magenta().bold()));
                        for line in text.lines().filter(|l| !l.trim().is_empty()) {
                            out.push_str(&format!("       {}\n", line.trim()));
                        }
                    }
                    None => out.push_str(&format!(
                        "     {} {}\n",
                        "Recommendation:".green(),
                        issue.recommendation
                    )),
                }
                out.push('\n');
            }
        }

        if !file.suppressed.is_empty() {
            out.push_str(&format!(
                "  {} ({} suppressed)\n",
                "Suppressed".bold().underline(),
                file.suppressed.len()
            ));
            for issue in &file.suppressed {
                let reason = issue
                    .suppression_reason
                    .as_deref()
                    .unwrap_or("no reason given");
                out.push_str(&format!(
                    "  [SKIP] line {:<5} {:<25} {}\n",
                    issue.line,
                    issue.category.dimmed(),
                    reason.dimmed(),
                ));
            }
        }
    }

    let status_str = if report.passed {
        "PASSED".green().bold().to_string()
    } else {
        "FAILED".red().bold().to_string()
    };
    out.push_str(&format!(
        "\nResult: {status_str}  |  {} issues, {} suppressed, {} files (catalog: {})\n",
        report.issue_count(),
        report.suppressed_count(),
        report.files.len(),
        report.catalog,
    ));

    out
}
