//! Natural-language explanations from a remote language model.
//!
//! Explanations are an optional enrichment layered on top of a finished
//! [`LintReport`]. The HTTP client lives behind the [`Explainer`] trait and
//! is passed in by the caller, so the catalog and matcher never see it.
//!
//! | Provider | Module | API key variable |
//! |----------|--------|------------------|
//! | [`Claude`](Provider::Claude) | [`claude`] | `ANTHROPIC_API_KEY` |
//! | [`Chatgpt`](Provider::Chatgpt) | [`openai`] | `OPENAI_API_KEY` |

pub mod claude;
pub mod openai;

use crate::config::AiConfig;
use crate::issue::{Issue, LintReport};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Prefix of every comment line written by [`annotate`] for an AI explanation.
pub const AI_COMMENT_PREFIX: &str = "# 🤖 AI: ";
/// Prefix used by [`annotate`] when falling back to the catalog recommendation.
pub const RECOMMENDATION_COMMENT_PREFIX: &str = "# 💡 ";

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// A language-model backend that turns a prompt into an explanation.
///
/// Implementers must be [`Send`] + [`Sync`] so a single client can be shared.
pub trait Explainer: Send + Sync {
    /// Short display name (e.g., `"Claude"`).
    fn name(&self) -> &'static str;

    /// Sends `prompt` and returns the model's reply text.
    fn complete(&self, prompt: &str) -> Result<String, ExplainError>;
}

/// Which explanation backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    /// Claude (Anthropic).
    Claude,
    /// ChatGPT (OpenAI).
    Chatgpt,
    /// Skip AI analysis and show catalog recommendations only.
    #[value(name = "none")]
    Disabled,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude (Anthropic)",
            Provider::Chatgpt => "ChatGPT (OpenAI)",
            Provider::Disabled => "Skip AI analysis (basic recommendations only)",
        }
    }

    /// Environment variable holding the API key, if the provider needs one.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Provider::Claude => Some(claude::API_KEY_VAR),
            Provider::Chatgpt => Some(openai::API_KEY_VAR),
            Provider::Disabled => None,
        }
    }
}

/// Providers whose API key is set in the process environment.
///
/// [`Provider::Disabled`] is always present, last.
pub fn available_providers() -> Vec<Provider> {
    available_providers_from(|var| std::env::var(var).ok())
}

/// Same as [`available_providers`] with an injectable variable lookup.
pub fn available_providers_from(lookup: impl Fn(&str) -> Option<String>) -> Vec<Provider> {
    let mut providers: Vec<Provider> = [Provider::Claude, Provider::Chatgpt]
        .into_iter()
        .filter(|p| {
            p.env_var()
                .and_then(&lookup)
                .is_some_and(|key| !key.trim().is_empty())
        })
        .collect();
    providers.push(Provider::Disabled);
    providers
}

/// Asks the user to pick one of `available` on the terminal.
///
/// Returns [`Provider::Disabled`] without prompting when nothing but
/// `Disabled` is available, and when the prompt fails or is cancelled.
pub fn prompt_for_provider(available: &[Provider]) -> Provider {
    if available.iter().all(|p| *p == Provider::Disabled) {
        return Provider::Disabled;
    }

    let labels: Vec<&str> = available.iter().map(Provider::label).collect();
    let choice = dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt("Choose an AI assistant for detailed explanations")
        .items(&labels)
        .default(0)
        .interact_opt();

    match choice {
        Ok(Some(idx)) => available[idx],
        Ok(None) => Provider::Disabled,
        Err(e) => {
            warn!(error = %e, "provider prompt failed, continuing without AI");
            Provider::Disabled
        }
    }
}

/// Builds the client for `provider`, reading its API key from the environment.
///
/// Returns `Ok(None)` for [`Provider::Disabled`].
///
/// # Errors
///
/// [`ExplainError::NotConfigured`] when the API key variable is unset, or
/// [`ExplainError::Http`] when the HTTP client cannot be built.
pub fn explainer_for(
    provider: Provider,
    config: &AiConfig,
) -> Result<Option<Box<dyn Explainer>>, ExplainError> {
    let Some(var) = provider.env_var() else {
        return Ok(None);
    };
    let api_key = std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ExplainError::NotConfigured(format!("{var} is not set")))?;

    let explainer: Box<dyn Explainer> = match provider {
        Provider::Claude => Box::new(claude::ClaudeExplainer::new(api_key, config)?),
        Provider::Chatgpt => Box::new(openai::OpenAiExplainer::new(api_key, config)?),
        Provider::Disabled => return Ok(None),
    };
    Ok(Some(explainer))
}

/// Builds the instruction sent to the language model for one issue.
pub fn build_prompt(problem: &str, code_line: &str, category: &str) -> String {
    format!(
        "You are a friendly AI assistant helping scientists and researchers who use High Performance Computing (HPC) clusters. Your job is to explain .bashrc configuration problems in simple, clear terms.

Context: The user has a potential issue in their .bashrc file.
Category: {category}
Problem detected: {problem}
Problematic line: {code_line}

Please provide:
1. A clear, non-technical explanation of why this is problematic
2. Specific consequences this could cause
3. A concrete example of how to fix it
4. Any additional tips related to HPC cluster usage

Keep your response concise (2-3 sentences for explanation, 1-2 for consequences, concrete fix example, optional tip).
Use friendly, helpful tone. Assume the user is a scientist, not necessarily a Linux expert."
    )
}

/// Fetches an explanation for every active issue in `report`.
///
/// Identical (category, problem, line) triples are requested once. A failed
/// request is logged and leaves that issue's explanation empty, so output
/// falls back to the catalog recommendation.
///
/// Returns the number of issues that received an explanation.
pub fn enrich(report: &mut LintReport, explainer: &dyn Explainer) -> usize {
    let mut cache: HashMap<String, Option<String>> = HashMap::new();
    let mut explained = 0;

    for issue in report.files.iter_mut().flat_map(|f| f.issues.iter_mut()) {
        let prompt = build_prompt(&issue.problem, &issue.text, &issue.category);
        let answer = cache
            .entry(prompt)
            .or_insert_with_key(|prompt| {
                debug!(provider = explainer.name(), category = %issue.category, "requesting explanation");
                match explainer.complete(prompt) {
                    Ok(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
                    Err(e) => {
                        warn!(provider = explainer.name(), error = %e, "AI explanation failed");
                        None
                    }
                }
            })
            .clone();

        if answer.is_some() {
            explained += 1;
        }
        issue.explanation = answer;
    }

    explained
}

/// Reproduces `content` with a comment block after every line that has issues.
///
/// Each issue contributes its explanation lines prefixed with
/// [`AI_COMMENT_PREFIX`], or its recommendation prefixed with
/// [`RECOMMENDATION_COMMENT_PREFIX`] when no explanation was fetched, followed
/// by a blank line. Trailing whitespace is stripped from original lines.
pub fn annotate(content: &str, issues: &[&Issue]) -> String {
    let mut by_line: BTreeMap<usize, Vec<&Issue>> = BTreeMap::new();
    for &issue in issues {
        by_line.entry(issue.line).or_default().push(issue);
    }

    let mut out: Vec<String> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        out.push(line.trim_end().to_string());

        let Some(line_issues) = by_line.get(&(idx + 1)) else {
            continue;
        };
        for issue in line_issues {
            match issue.explanation {
                Some(ref text) => out.extend(
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(|l| format!("{AI_COMMENT_PREFIX}{l}")),
                ),
                None => out.push(format!(
                    "{RECOMMENDATION_COMMENT_PREFIX}{}: {}",
                    issue.category, issue.recommendation
                )),
            }
            out.push(String::new());
        }
    }

    let mut annotated = out.join("\n");
    annotated.push('\n');
    annotated
}
