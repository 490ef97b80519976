//! Rule catalog loading.
//!
//! The catalog is a YAML document listing categories of anti-patterns, each
//! holding one or more detection patterns:
//!
//! ```yaml
//! categories:
//!   - name: Conda Activation
//!     description: Activating conda at login changes every process.
//!     patterns:
//!       - problem: conda environment activated in a startup file
//!         detector: '\bconda\s+activate\b'
//!         ai_recommendation: Activate environments in job scripts instead.
//! ```
//!
//! Loading is all-or-nothing. Required fields are enforced by the typed
//! records below and every regular expression is compiled up front, so a
//! [`Catalog`] that exists is always safe to match against.
//!
//! ```
//! use oxidized_bashrc::catalog::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! assert!(catalog.category("Conda Activation").is_some());
//! ```

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Catalog file picked up from the current directory when no path is given.
pub const DEFAULT_CATALOG_FILE: &str = "bashrc-patterns.yaml";

/// Label used as [`Catalog::source`] for the embedded rule set.
pub const BUILTIN_SOURCE: &str = "built-in";

const BUILTIN_CATALOG: &str = include_str!("../config/patterns.yaml");

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file does not exist.
    #[error("catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid YAML or a missing required field.
    #[error("malformed catalog {origin}: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A `detector` or `exclude_pattern` is not a valid regular expression.
    #[error("invalid {field} in category '{category}' (\"{problem}\"): {source}")]
    InvalidRegex {
        category: String,
        problem: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    categories: Vec<RawCategory>,
}

#[derive(Deserialize)]
struct RawCategory {
    name: String,
    description: String,
    #[serde(default)]
    patterns: Vec<RawPattern>,
}

#[derive(Deserialize)]
struct RawPattern {
    problem: String,
    detector: String,
    #[serde(default)]
    exclude_pattern: Option<String>,
    ai_recommendation: String,
    #[serde(default)]
    additional_check: Option<String>,
}

/// One detection rule.
///
/// Fields are read-only so the expression text always describes the
/// compiled regex that [`Pattern::matches`] runs.
///
/// ```compile_fail
/// use oxidized_bashrc::catalog::Catalog;
///
/// let catalog = Catalog::builtin().unwrap();
/// let mut pattern = catalog.patterns_for("Conda Activation")[0].clone();
/// pattern.detector = "something_else".to_string();
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    problem: String,
    detector: String,
    exclude_pattern: String,
    ai_recommendation: String,
    additional_check: Option<String>,
    detector_re: Regex,
    exclude_re: Option<Regex>,
}

impl Pattern {
    fn compile(category: &str, raw: RawPattern) -> Result<Pattern, CatalogError> {
        let invalid = |field: &'static str, source: regex::Error| CatalogError::InvalidRegex {
            category: category.to_string(),
            problem: raw.problem.clone(),
            field,
            source,
        };

        let detector_re = build_regex(&raw.detector).map_err(|e| invalid("detector", e))?;
        let exclude_pattern = raw.exclude_pattern.clone().unwrap_or_default();
        let exclude_re = if exclude_pattern.is_empty() {
            None
        } else {
            Some(build_regex(&exclude_pattern).map_err(|e| invalid("exclude_pattern", e))?)
        };

        Ok(Pattern {
            problem: raw.problem,
            detector: raw.detector,
            exclude_pattern,
            ai_recommendation: raw.ai_recommendation,
            additional_check: raw.additional_check,
            detector_re,
            exclude_re,
        })
    }

    /// What is wrong with a matching line.
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Regular expression searched for anywhere in the line, case-insensitively.
    pub fn detector(&self) -> &str {
        &self.detector
    }

    /// Regular expression that suppresses the pattern when it also matches.
    /// Empty means the pattern is never suppressed.
    pub fn exclude_pattern(&self) -> &str {
        &self.exclude_pattern
    }

    /// Fallback guidance shown when no AI explanation is available.
    pub fn ai_recommendation(&self) -> &str {
        &self.ai_recommendation
    }

    /// Reserved for a secondary check; not used by matching.
    pub fn additional_check(&self) -> Option<&str> {
        self.additional_check.as_deref()
    }

    /// Returns `true` if the detector is found anywhere in `line`.
    pub fn detects(&self, line: &str) -> bool {
        self.detector_re.is_match(line)
    }

    /// Returns `true` if a non-empty exclude pattern matches `line`.
    pub fn excludes(&self, line: &str) -> bool {
        self.exclude_re.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Detector matches and the exclude pattern does not.
    pub fn matches(&self, line: &str) -> bool {
        self.detects(line) && !self.excludes(line)
    }
}

fn build_regex(expr: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(expr).case_insensitive(true).build()
}

/// A named group of patterns.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub description: String,
    /// Patterns in document order.
    pub patterns: Vec<Pattern>,
}

/// The full, immutable rule set for one run.
#[derive(Debug, Clone)]
pub struct Catalog {
    source: String,
    categories: Vec<Category>,
}

impl Catalog {
    /// Loads a catalog.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CATALOG_FILE`] in the current directory.
    /// 3. Otherwise use the [built-in](Catalog::builtin) catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] when the explicit path does not exist.
    /// - [`CatalogError::Io`] when the file cannot be read.
    /// - [`CatalogError::Malformed`] on invalid YAML or a missing required field.
    /// - [`CatalogError::InvalidRegex`] when an expression fails to compile.
    pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogError> {
        match path {
            Some(p) => Catalog::from_file(p),
            None => {
                let default_path = Path::new(DEFAULT_CATALOG_FILE);
                if default_path.exists() {
                    Catalog::from_file(default_path)
                } else {
                    Catalog::builtin()
                }
            }
        }
    }

    /// Loads a catalog from a YAML file.
    pub fn from_file(path: &Path) -> Result<Catalog, CatalogError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(CatalogError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        Catalog::parse(&content, &path.display().to_string())
    }

    /// The rule set embedded in the binary.
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Catalog::parse(BUILTIN_CATALOG, BUILTIN_SOURCE)
    }

    /// Parses an in-memory YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Catalog, CatalogError> {
        Catalog::parse(yaml, "<inline>")
    }

    fn parse(yaml: &str, origin: &str) -> Result<Catalog, CatalogError> {
        let raw: RawCatalog =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Malformed {
                origin: origin.to_string(),
                source: e,
            })?;

        let mut categories = Vec::with_capacity(raw.categories.len());
        for raw_category in raw.categories {
            let patterns = raw_category
                .patterns
                .into_iter()
                .map(|p| Pattern::compile(&raw_category.name, p))
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(Category {
                name: raw_category.name,
                description: raw_category.description,
                patterns,
            });
        }

        let catalog = Catalog {
            source: origin.to_string(),
            categories,
        };
        debug!(
            source = origin,
            categories = catalog.categories.len(),
            patterns = catalog.pattern_count(),
            "loaded rule catalog"
        );
        Ok(catalog)
    }

    /// Where the catalog was loaded from: a file path or [`BUILTIN_SOURCE`].
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Categories in document order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// First category with the given name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Patterns of the named category, or an empty slice when unknown.
    pub fn patterns_for(&self, name: &str) -> &[Pattern] {
        self.category(name)
            .map(|c| c.patterns.as_slice())
            .unwrap_or(&[])
    }

    pub fn pattern_count(&self) -> usize {
        self.categories.iter().map(|c| c.patterns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count() == 0
    }
}
