//! Output formatting for lint reports.
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |

pub mod json;
pub mod pretty;
pub mod sarif;

use crate::issue::LintReport;

/// Supported output formats for lint reports.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats a [`LintReport`] in the requested [`OutputFormat`].
///
/// ```rust,no_run
/// use oxidized_bashrc::output::{format_report, OutputFormat};
/// # use oxidized_bashrc::issue::LintReport;
/// # fn example(report: &LintReport) {
/// let json = format_report(report, &OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_report(report: &LintReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Sarif => sarif::format(report),
    }
}
