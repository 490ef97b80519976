use clap::{Parser, Subcommand};
use oxidized_bashrc::explain::Provider;
use oxidized_bashrc::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "oxidized-bashrc",
    version,
    about = "Smart linter for shell startup files - detects common problems and anti-patterns"
)]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze startup files (default: ~/.bashrc)
    Lint {
        /// Files or directories to analyze
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Custom rule catalog (YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// AI provider for explanations; prompts interactively when omitted
        #[arg(long, value_enum)]
        ai: Option<Provider>,

        /// Write an annotated copy of the analyzed file
        #[arg(long)]
        annotate: Option<PathBuf>,
    },

    /// List every category and pattern in the catalog
    ListRules {
        /// Custom rule catalog (YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show full details for a category
    Explain {
        /// Category name (e.g., "Conda Activation")
        category: String,

        /// Custom rule catalog (YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a single line against the catalog
    CheckLine {
        /// The shell line to check
        line: String,

        /// Custom rule catalog (YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show which AI providers are configured
    Providers,
}
