//! HTTP client for `/api/optimize-posts` and `/api/hashtags`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

use crate::client::{ClientError, PostGateway};
use crate::generation::handlers::HashtagResponse;
use crate::generation::tone::Tone;
use crate::models::OptimizedPost;

const FALLBACK_ERROR: &str = "Failed to generate posts";

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl PostGateway for GatewayClient {
    async fn optimize_posts(
        &self,
        draft: &str,
        tone: Tone,
    ) -> Result<Vec<OptimizedPost>, ClientError> {
        if draft.trim().is_empty() {
            return Err(ClientError::EmptyDraft);
        }

        let response = self
            .client
            .post(self.url("/api/optimize-posts"))
            .json(&json!({ "draft": draft, "tone": tone }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Gateway {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response.json().await?)
    }

    async fn suggest_hashtags(&self, content: &str) -> Vec<String> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let response = self
            .client
            .post(self.url("/api/hashtags"))
            .json(&json!({ "content": content }))
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("Hashtag suggestion returned {}", r.status());
                return Vec::new();
            }
            Err(e) => {
                warn!("Hashtag suggestion failed: {e}");
                return Vec::new();
            }
        };

        match response.json::<HashtagResponse>().await {
            Ok(body) => body.hashtags,
            Err(e) => {
                warn!("Hashtag suggestion body unreadable: {e}");
                Vec::new()
            }
        }
    }
}

/// Display string from an error body: `{error: {message}}`, `{error: "..."}`, or a fallback.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return FALLBACK_ERROR.to_string();
    };
    value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_ERROR)
        .to_string()
}
