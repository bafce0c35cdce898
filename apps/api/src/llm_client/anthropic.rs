//! Anthropic Messages API. No schema-constrained output: the prompt carries the shape
//! and `LlmClient` strips any code fences the model adds.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error, CompletionRequest, LlmError, LlmProvider};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
    }
}

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: String, model: Option<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| ANTHROPIC_DEFAULT_MODEL.to_string()),
        }
    }

    fn build_body<'a>(&'a self, request: &CompletionRequest<'a>) -> AnthropicRequest<'a> {
        // JSON mode does not exist here, so the JSON-only rules always ride along.
        let system = match request.system {
            Some(system) => format!("{system}\n\n{JSON_ONLY_SYSTEM}"),
            None => JSON_ONLY_SYSTEM.to_string(),
        };

        AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            temperature: request.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_schema(&self) -> bool {
        false
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Option<String>, LlmError> {
        let body = self.build_body(&request);

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let message: AnthropicResponse = response.json().await?;
        if let Some(usage) = &message.usage {
            debug!(
                "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(message.text())
    }
}
