//! OpenAI Chat Completions, and any backend speaking the same wire format (Groq).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{api_error, CompletionRequest, LlmError, LlmProvider};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// How structured output is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredOutput {
    /// `response_format: json_schema` with strict validation.
    JsonSchema,
    /// `response_format: json_object`; shape comes from the prompt.
    JsonObject,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: Value,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: String,
    base_url: &'static str,
    model: String,
    name: &'static str,
    structured: StructuredOutput,
}

impl OpenAiCompatibleProvider {
    pub fn openai(client: Client, api_key: String, model: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: OPENAI_BASE_URL,
            model: model.unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
            name: "openai",
            structured: StructuredOutput::JsonSchema,
        }
    }

    pub fn groq(client: Client, api_key: String, model: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: GROQ_BASE_URL,
            model: model.unwrap_or_else(|| GROQ_DEFAULT_MODEL.to_string()),
            name: "groq",
            structured: StructuredOutput::JsonObject,
        }
    }

    fn build_body<'a>(&'a self, request: &CompletionRequest<'a>) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt,
        });

        let response_format = match (self.structured, request.schema) {
            (StructuredOutput::JsonSchema, Some(schema)) => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "strict": true,
                    "schema": schema.schema,
                }
            }),
            _ => json!({ "type": "json_object" }),
        };

        ChatRequest {
            model: &self.model,
            messages,
            response_format,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_schema(&self) -> bool {
        self.structured == StructuredOutput::JsonSchema
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Option<String>, LlmError> {
        let body = self.build_body(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let chat: ChatResponse = response.json().await?;
        debug!("{} returned {} choice(s)", self.name, chat.choices.len());

        Ok(first_content(chat))
    }
}

fn first_content(chat: ChatResponse) -> Option<String> {
    chat.choices.into_iter().next().and_then(|c| c.message.content)
}
