use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{ExplainError, Explainer};
use crate::config::AiConfig;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiExplainer {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiExplainer {
    pub fn new(api_key: String, config: &AiConfig) -> Result<Self, ExplainError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.openai_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

impl Explainer for OpenAiExplainer {
    fn name(&self) -> &'static str {
        "ChatGPT"
    }

    fn complete(&self, prompt: &str) -> Result<String, ExplainError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        debug!("OpenAI request to {}", API_URL);

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
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
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ExplainError::Parse("missing choices[0].message.content".into()))
}
