//! Tool configuration.
//!
//! The default configuration file is `oxidized-bashrc.toml` in the current
//! working directory. Every field has a default, so the file can be omitted:
//!
//! ```toml
//! [catalog]
//! path = "my-patterns.yaml"
//!
//! [ai]
//! claude_model = "claude-3-haiku-20240307"
//! max_tokens = 300
//!
//! [[suppress]]
//! category = "Conda Activation"
//! file = ".bashrc"
//! lines = "10-12"
//! reason = "login node only"
//! ```

use std::path::{Path, PathBuf};

/// Configuration file picked up from the current directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "oxidized-bashrc.toml";

/// Main configuration.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Rule catalog selection.
    pub catalog: CatalogConfig,
    /// Remote explanation settings.
    pub ai: AiConfig,
    /// Suppression rules applied to every analyzed file.
    pub suppress: Vec<Suppression>,
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file to load instead of the default. Relative paths are
    /// resolved against the directory containing the config file.
    pub path: Option<PathBuf>,
}

/// Settings for the language-model explainers.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AiConfig {
    pub claude_model: String,
    pub openai_model: String,
    pub max_tokens: u32,
    /// Sampling temperature sent to ChatGPT.
    pub temperature: f32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            claude_model: "claude-3-haiku-20240307".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

/// Silences one category on matching files and lines.
///
/// A suppression matches an [`Issue`](crate::issue::Issue) when:
/// - `category` equals the issue's category name.
/// - `file` is a path suffix of the issue's file (empty string matches any file).
/// - `lines` (if set) contains the issue's line number.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Suppression {
    pub category: String,
    #[serde(default)]
    pub file: String,
    /// Optional line range (`"10-20"`) or single line (`"15"`).
    pub lines: Option<String>,
    /// Human-readable justification for the suppression.
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CONFIG_FILE`] in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use oxidized_bashrc::config::Config;
    ///
    /// let cfg = Config::load(Some(Path::new("my-config.toml")))?;
    /// let cfg = Config::load(None)?;
    /// # Ok::<(), oxidized_bashrc::config::ConfigError>(())
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(ConfigError::NotFound(p.to_path_buf()));
            }
        } else {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            default_path.exists().then(|| default_path.to_path_buf())
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                let mut config: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::Parse {
                        path: path.clone(),
                        source: e,
                    })?;
                if let (Some(catalog), Some(dir)) = (&config.catalog.path, path.parent()) {
                    if catalog.is_relative() {
                        config.catalog.path = Some(dir.join(catalog));
                    }
                }
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }
}

impl Suppression {
    /// Returns `true` if this entry silences `category` at `file:line`.
    pub fn applies_to(&self, category: &str, file: &Path, line: usize) -> bool {
        if self.category != category {
            return false;
        }
        // Path::ends_with compares whole components, so "bashrc" does not
        // match "/home/me/.bashrc".
        if !self.file.is_empty() && !file.ends_with(Path::new(&self.file)) {
            return false;
        }
        if let Some(ref lines) = self.lines {
            match parse_line_range(lines) {
                Some((start, end)) if line >= start && line <= end => {}
                _ => return false,
            }
        }
        true
    }
}

fn parse_line_range(lines: &str) -> Option<(usize, usize)> {
    let parts: Vec<&str> = lines.split('-').map(str::trim).collect();
    if parts.len() == 2 {
        let start = parts[0].parse().ok()?;
        let end = parts[1].parse().ok()?;
        if start > end {
            return None;
        }
        Some((start, end))
    } else if parts.len() == 1 {
        let line = parts[0].parse().ok()?;
        Some((line, line))
    } else {
        None
    }
}
