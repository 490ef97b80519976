use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{ExplainError, Explainer};
use crate::config::AiConfig;

pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct ClaudeExplainer {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeExplainer {
    pub fn new(api_key: String, config: &AiConfig) -> Result<Self, ExplainError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.claude_model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

impl Explainer for ClaudeExplainer {
    fn name(&self) -> &'static str {
        "Claude"
    }

    fn complete(&self, prompt: &str) -> Result<String, ExplainError> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!("Claude request to {}", API_URL);

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExplainError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let resp: serde_json::Value = response.json()?;
        parse_response(&resp)
    }
}

fn parse_response(resp: &serde_json::Value) -> Result<String, ExplainError> {
    resp["content"][0]["text"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ExplainError::Parse("missing content[0].text".into()))
}
