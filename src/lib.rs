//! # oxidized-bashrc
//!
//! Smart linter for shell startup files.
//!
//! `oxidized-bashrc` reads `.bashrc`-style files line by line and flags common
//! anti-patterns (PATH overwrites, module loads, conda activation, conflicting
//! modules, hardcoded paths) using a user-editable YAML rule catalog.
//! Findings can optionally be explained by a remote language model.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use oxidized_bashrc::{analyze, catalog::Catalog, config::Config, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let catalog = Catalog::load(None).expect("failed to load catalog");
//! let report = analyze::run(&[PathBuf::from(".bashrc")], &catalog, &config);
//!
//! if !report.passed {
//!     let text = output::format_report(&report, &output::OutputFormat::Pretty);
//!     print!("{text}");
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **[`catalog`]** — load and validate the rule catalog, compiling every regex once.
//! 2. **[`matcher`]** — [`Catalog::check_line`](catalog::Catalog::check_line), the
//!    stateless per-line matcher.
//! 3. **[`analyze`]** — read files, filter comments, run the matcher in parallel.
//! 4. **[`issue`]** — report data types ([`issue::Issue`], [`issue::LintReport`]).
//! 5. **[`explain`]** — optional AI explanations behind the [`explain::Explainer`] trait.
//! 6. **[`output`]** — format reports as pretty text, JSON, or [SARIF].
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod analyze;
pub mod catalog;
pub mod config;
pub mod explain;
pub mod issue;
pub mod matcher;
pub mod output;
