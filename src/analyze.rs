//! File analysis.
//!
//! [`run`] expands the input paths to startup files, analyzes them **in
//! parallel** via [rayon] against a shared [`Catalog`], and assembles a
//! [`LintReport`]. Each file is read once; every non-blank, non-comment line
//! is passed to [`Catalog::check_line`].

use crate::catalog::Catalog;
use crate::config::Config;
use crate::issue::{FileReport, Issue, LintReport};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File names recognized as shell startup files when a directory is given.
pub const STARTUP_FILE_NAMES: &[&str] = &[
    ".bashrc",
    ".bash_profile",
    ".bash_login",
    ".bash_aliases",
    ".profile",
    ".zshrc",
    ".zprofile",
    ".zshenv",
    ".kshrc",
];

/// Analyzes every startup file reachable from `paths`.
///
/// Directories contribute the startup files directly inside them (sorted by
/// name); plain files are analyzed as given. Report order follows input order.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use oxidized_bashrc::{analyze, catalog::Catalog, config::Config};
///
/// let catalog = Catalog::builtin().unwrap();
/// let report = analyze::run(&[PathBuf::from("/home/me/.bashrc")], &catalog, &Config::default());
/// std::process::exit(if report.passed { 0 } else { 1 });
/// ```
pub fn run(paths: &[PathBuf], catalog: &Catalog, config: &Config) -> LintReport {
    let files = collect_startup_files(paths);
    debug!(files = files.len(), "analyzing startup files");

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|file| analyze_file(file, catalog, config))
        .collect();

    LintReport::from_files(catalog.source(), reports)
}

/// Expands directories in `paths` to the startup files they contain.
pub fn collect_startup_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .max_depth(1)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_startup_file(e.path()))
                    .map(|e| e.into_path()),
            );
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Returns `true` for well-known startup file names and for `*.bashrc` /
/// `*.sh` files.
pub fn is_startup_file(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if STARTUP_FILE_NAMES.contains(&name.as_ref()) {
        return true;
    }
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "bashrc" || ext == "sh"
        })
        .unwrap_or(false)
}

/// Reads and analyzes one file.
///
/// Invalid UTF-8 is replaced rather than rejected. A read failure is recorded
/// in [`FileReport::error`] so the remaining files are still analyzed.
pub fn analyze_file(path: &Path, catalog: &Catalog, config: &Config) -> FileReport {
    match std::fs::read(path) {
        Ok(bytes) => analyze_content(path, &String::from_utf8_lossy(&bytes), catalog, config),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "could not read file");
            FileReport::unreadable(path, format!("could not read file: {e}"))
        }
    }
}

/// Analyzes already-loaded file content.
///
/// Lines are stripped; blank lines, `#` comments and lines carrying an
/// [inline suppression](is_suppressed_inline) marker are skipped. Line numbers
/// are 1-based. Config suppressions are applied last.
pub fn analyze_content(file: &Path, content: &str, catalog: &Catalog, config: &Config) -> FileReport {
    let mut found = Vec::new();
    let mut lines_scanned = 0;

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if is_suppressed_inline(line) {
            continue;
        }
        lines_scanned += 1;

        for m in catalog.check_line(line) {
            found.push(Issue::from_match(file, idx + 1, line, &m));
        }
    }

    FileReport::new(file, lines_scanned, found, &config.suppress)
}

/// Returns `true` if `line` ends with an inline suppression marker.
///
/// Recognized markers (case-insensitive):
/// - `# bashrc:ignore`
/// - `# oxidized-bashrc:ignore`
///
/// # Examples
///
/// ```
/// use oxidized_bashrc::analyze::is_suppressed_inline;
///
/// assert!(is_suppressed_inline("conda activate base # bashrc:ignore"));
/// assert!(!is_suppressed_inline("echo '# bashrc:ignore' > notes"));
/// ```
pub fn is_suppressed_inline(line: &str) -> bool {
    static RE_INLINE_SUPPRESS: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(r"(?i)\s*#\s*(bashrc|oxidized-bashrc):ignore\s*$").unwrap()
    });
    RE_INLINE_SUPPRESS.is_match(line)
}
