use std::path::{Path, PathBuf};

use crate::config::Suppression;
use crate::matcher::RuleMatch;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub file: PathBuf,
    pub line: usize,
    /// The offending line with surrounding whitespace stripped.
    pub text: String,
    pub category: String,
    /// Description of the category, shared by all of its patterns.
    #[serde(default)]
    pub category_description: String,
    pub problem: String,
    pub recommendation: String,
    pub suppressed: bool,
    pub suppression_reason: Option<String>,
    pub explanation: Option<String>,
}

impl Issue {
    pub fn from_match(file: &Path, line: usize, text: &str, m: &RuleMatch<'_>) -> Self {
        Issue {
            file: file.to_path_buf(),
            line,
            text: text.to_string(),
            category: m.category.to_string(),
            category_description: m.category_description.to_string(),
            problem: m.pattern.problem().to_string(),
            recommendation: m.pattern.ai_recommendation().to_string(),
            suppressed: false,
            suppression_reason: None,
            explanation: None,
        }
    }

    /// The AI explanation when one was fetched, otherwise the catalog's
    /// recommendation.
    pub fn guidance(&self) -> &str {
        self.explanation.as_deref().unwrap_or(&self.recommendation)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    /// Non-blank, non-comment lines handed to the matcher.
    pub lines_scanned: usize,
    pub issues: Vec<Issue>,
    pub suppressed: Vec<Issue>,
    pub error: Option<String>,
}

impl FileReport {
    /// Splits `found` into active and suppressed issues.
    pub fn new(
        file: &Path,
        lines_scanned: usize,
        found: Vec<Issue>,
        suppressions: &[Suppression],
    ) -> Self {
        let mut issues = Vec::new();
        let mut suppressed = Vec::new();

        for mut issue in found {
            match find_suppression(&issue, suppressions) {
                Some(s) => {
                    issue.suppressed = true;
                    issue.suppression_reason = Some(s.reason.clone());
                    suppressed.push(issue);
                }
                None => issues.push(issue),
            }
        }

        FileReport {
            file: file.to_path_buf(),
            lines_scanned,
            issues,
            suppressed,
            error: None,
        }
    }

    pub fn unreadable(file: &Path, error: String) -> Self {
        FileReport {
            file: file.to_path_buf(),
            lines_scanned: 0,
            issues: vec![],
            suppressed: vec![],
            error: Some(error),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct LintReport {
    pub timestamp: String,
    /// Where the rule catalog came from.
    pub catalog: String,
    pub files: Vec<FileReport>,
    pub passed: bool,
}

impl LintReport {
    pub fn from_files(catalog: &str, files: Vec<FileReport>) -> Self {
        let passed = files
            .iter()
            .all(|f| f.issues.is_empty() && f.error.is_none());

        LintReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            catalog: catalog.to_string(),
            files,
            passed,
        }
    }

    /// Active issues across all files, in file then line order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.files.iter().flat_map(|f| f.issues.iter())
    }

    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|f| f.issues.len()).sum()
    }

    pub fn suppressed_count(&self) -> usize {
        self.files.iter().map(|f| f.suppressed.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }

    /// Active issue counts per category, in order of first appearance.
    pub fn count_by_category(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for issue in self.issues() {
            match counts.iter_mut().find(|(name, _)| *name == issue.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((issue.category.as_str(), 1)),
            }
        }
        counts
    }
}

fn find_suppression<'a>(issue: &Issue, suppressions: &'a [Suppression]) -> Option<&'a Suppression> {
    suppressions
        .iter()
        .find(|s| s.applies_to(&issue.category, &issue.file, issue.line))
}
