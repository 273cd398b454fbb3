//! OpenAI-compatible chat-completions `LanguageGenerator`.
//!
//! Speaks the `/chat/completions` protocol over reqwest, so any provider
//! exposing that surface works. The API key is wrapped in
//! [`secrecy::SecretString`] and is only exposed when building the
//! Authorization header; the generator deliberately does not derive `Debug`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use confab_core::generate::LanguageGenerator;
use confab_types::generate::{GenerateError, GenerationOutput, GenerationRequest};

use super::fields::{parse_output, render_system, render_user};

/// Configuration for an OpenAI-compatible generator endpoint.
pub struct OpenAiCompatConfig {
    /// Base URL for the API (e.g. "https://api.openai.com/v1").
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: SecretString,
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl OpenAiCompatConfig {
    /// OpenAI defaults for the given key and model.
    pub fn openai(api_key: SecretString, model: &str) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// The file holds plain text; the key is wrapped into a `SecretString`
    /// immediately after parsing.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw: RawConfig = toml::from_str(&std::fs::read_to_string(path)?)?;
        Ok(Self {
            base_url: raw.base_url,
            api_key: SecretString::from(raw.api_key),
            model: raw.model,
            temperature: raw.temperature,
            max_tokens: raw.max_tokens,
        })
    }
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    api_key: String,
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// `LanguageGenerator` over an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatGenerator {
    client: reqwest::Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatGenerator {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| GenerateError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn body_for(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: render_system(request),
                },
                ChatMessage {
                    role: "user",
                    content: render_user(request),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

fn error_for_status(status: u16, body: String) -> GenerateError {
    match status {
        401 | 403 => GenerateError::AuthenticationFailed,
        400 | 404 | 422 => GenerateError::InvalidRequest(format!("HTTP {status}: {body}")),
        _ => GenerateError::Transport(format!("HTTP {status}: {body}")),
    }
}

impl LanguageGenerator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerateError> {
        let body = self.body_for(request);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), error_body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::MalformedOutput(format!("failed to parse response: {e}")))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| GenerateError::MalformedOutput("response has no content".to_string()))?;

        debug!(task = %request.task, chars = content.len(), "generation complete");
        Ok(parse_output(content, &request.outputs))
    }
}
