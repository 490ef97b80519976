mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use oxidized_bashrc::catalog::Catalog;
use oxidized_bashrc::config::Config;
use oxidized_bashrc::explain::{self, Provider};
use oxidized_bashrc::{analyze, output};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Lint {
            paths,
            format,
            output: output_path,
            catalog: catalog_path,
            config: config_path,
            ai,
            annotate,
        } => {
            let paths = if paths.is_empty() {
                match default_bashrc() {
                    Some(p) => vec![p],
                    None => {
                        eprintln!("Error: HOME is not set; pass a file to analyze");
                        std::process::exit(2);
                    }
                }
            } else {
                paths
            };

            for path in &paths {
                if !path.exists() {
                    eprintln!("Error: path does not exist: {}", path.display());
                    std::process::exit(2);
                }
            }

            let config = load_config(config_path.as_deref());
            let catalog = load_catalog(catalog_path.as_deref(), &config);

            let mut report = analyze::run(&paths, &catalog, &config);
            if report.files.is_empty() {
                eprintln!("Error: no startup files found in the given paths");
                std::process::exit(2);
            }

            if annotate.is_some() && report.files.len() != 1 {
                eprintln!("Error: --annotate requires exactly one file to analyze");
                std::process::exit(2);
            }

            let provider = ai.unwrap_or_else(|| {
                let interactive = matches!(format, output::OutputFormat::Pretty)
                    && std::io::stdin().is_terminal()
                    && std::io::stdout().is_terminal();
                if interactive && report.issue_count() > 0 {
                    explain::prompt_for_provider(&explain::available_providers())
                } else {
                    Provider::Disabled
                }
            });

            match explain::explainer_for(provider, &config.ai) {
                Ok(Some(explainer)) => {
                    eprintln!(
                        "Requesting explanations for {} issue(s) from {}...",
                        report.issue_count(),
                        explainer.name()
                    );
                    let explained = explain::enrich(&mut report, explainer.as_ref());
                    eprintln!(
                        "Explained {explained} of {} issue(s)",
                        report.issue_count()
                    );
                }
                Ok(None) => {}
                Err(e) => eprintln!("Warning: {e}; continuing without AI explanations"),
            }

            if let Some(annotate_path) = annotate {
                let file = &report.files[0];
                let content = std::fs::read(&file.file).unwrap_or_else(|e| {
                    eprintln!("Error reading {}: {e}", file.file.display());
                    std::process::exit(2);
                });
                let issues: Vec<_> = file.issues.iter().collect();
                let annotated = explain::annotate(&String::from_utf8_lossy(&content), &issues);
                std::fs::write(&annotate_path, annotated).unwrap_or_else(|e| {
                    eprintln!("Error writing annotated file: {e}");
                    std::process::exit(2);
                });
                eprintln!("Annotated file written to {}", annotate_path.display());
            }

            let formatted = output::format_report(&report, &format);

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::ListRules {
            catalog: catalog_path,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let catalog = load_catalog(catalog_path.as_deref(), &config);

            println!("{}", "Detection Rules".bold().underline());
            println!("  Catalog: {}", catalog.source().dimmed());
            println!();

            for category in catalog.categories() {
                println!("  {}", category.name.bold());
                for pattern in &category.patterns {
                    println!("    - {}", pattern.problem());
                }
                println!();
            }

            println!(
                "  Total: {} categories, {} patterns",
                catalog.categories().len(),
                catalog.pattern_count()
            );
        }

        Commands::Explain {
            category: name,
            catalog: catalog_path,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let catalog = load_catalog(catalog_path.as_deref(), &config);

            match catalog.category(&name) {
                Some(category) => {
                    println!("{}", category.name.bold());
                    println!();
                    println!("  {}", category.description);
                    for pattern in &category.patterns {
                        println!();
                        println!("  Problem:         {}", pattern.problem());
                        println!("  Detector:        {}", pattern.detector());
                        if !pattern.exclude_pattern().is_empty() {
                            println!("  Exclude:         {}", pattern.exclude_pattern());
                        }
                        println!("  Recommendation:  {}", pattern.ai_recommendation());
                    }
                }
                None => {
                    eprintln!("Unknown category: {name}");
                    eprintln!("Use 'oxidized-bashrc list-rules' to see all categories.");
                    std::process::exit(2);
                }
            }
        }

        Commands::CheckLine {
            line,
            catalog: catalog_path,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let catalog = load_catalog(catalog_path.as_deref(), &config);

            let matches = catalog.check_line(line.trim());
            if matches.is_empty() {
                println!("{} no rule matches", "PASS".green().bold());
                return;
            }
            for m in &matches {
                println!(
                    "{} {:<25} {}",
                    "WARN".yellow().bold(),
                    m.category,
                    m.pattern.problem()
                );
            }
            std::process::exit(1);
        }

        Commands::Providers => {
            println!("{}", "AI Providers".bold().underline());
            println!();

            let available = explain::available_providers();
            for provider in [Provider::Claude, Provider::Chatgpt] {
                let status = if available.contains(&provider) {
                    "READY".green().bold().to_string()
                } else {
                    "NOT SET".red().to_string()
                };
                println!(
                    "  [{status}] {label:<22} {var}",
                    label = provider.label(),
                    var = provider.env_var().unwrap_or_default(),
                );
            }

            println!();
            println!("Note: set ANTHROPIC_API_KEY or OPENAI_API_KEY to enable AI explanations.");
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "oxidized_bashrc=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_bashrc() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".bashrc"))
}

fn load_config(path: Option<&Path>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

/// `--catalog` wins over `[catalog] path` in the config file.
fn load_catalog(flag: Option<&Path>, config: &Config) -> Catalog {
    let path = flag.or(config.catalog.path.as_deref());
    Catalog::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}
