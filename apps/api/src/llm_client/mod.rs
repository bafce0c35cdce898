/// LLM Client: the single point of entry for all provider calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through `LlmClient`.
///
/// The concrete backend is picked once from `Config::provider`; gateways only
/// ever see "complete one prompt to one JSON reply".
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, ProviderKind};

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatibleProvider;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A JSON schema the provider should constrain its reply to.
#[derive(Debug, Clone)]
pub struct JsonSchema {
    pub name: &'static str,
    pub schema: Value,
}

/// One prompt, one reply.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: Option<&'a str>,
    pub prompt: &'a str,
    pub schema: Option<&'a JsonSchema>,
    pub temperature: f32,
}

/// A backend able to complete a prompt into a (hopefully JSON) text reply.
///
/// Implementations return `Ok(None)` when the provider answered but produced no text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Whether the backend honours `CompletionRequest::schema`.
    fn supports_schema(&self) -> bool;

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Option<String>, LlmError>;
}

/// The single LLM client shared by both gateways.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn LlmProvider>,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Builds the configured provider. Returns `Ok(None)` when its credential is unset.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = build_http_client(Duration::from_secs(config.llm_timeout_secs))?;
        let model = config.model.clone();

        let provider: Arc<dyn LlmProvider> = match config.provider {
            ProviderKind::OpenAi => Arc::new(OpenAiCompatibleProvider::openai(http, api_key, model)),
            ProviderKind::Groq => Arc::new(OpenAiCompatibleProvider::groq(http, api_key, model)),
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(http, api_key, model)),
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(http, api_key, model)),
        };

        Ok(Some(Self::new(provider)))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Calls the provider once and parses the reply as JSON.
    ///
    /// The schema is only forwarded to providers that support constrained output;
    /// every prompt also spells out the expected shape in plain text.
    pub async fn call_json(&self, request: CompletionRequest<'_>) -> Result<Value, LlmError> {
        let request = if self.provider.supports_schema() {
            request
        } else {
            CompletionRequest {
                schema: None,
                ..request
            }
        };

        debug!(
            "LLM call: provider={} model={} schema={}",
            self.provider.name(),
            self.provider.model(),
            request.schema.map(|s| s.name).unwrap_or("none")
        );

        let text = self.provider.complete(request).await?;
        let text = text
            .as_deref()
            .map(strip_json_fences)
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyContent)?;

        serde_json::from_str(text).map_err(|e| {
            debug!(
                "Unparsable model reply: {}",
                text.chars().take(500).collect::<String>()
            );
            LlmError::Parse(e)
        })
    }
}

/// Shared reqwest client; the timeout bounds every provider call.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Extracts a provider's error message from a JSON error body, falling back to the raw body.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}
