//! Hashtag gateway core.
//!
//! Unlike post generation, every failure here degrades to an empty list:
//! hashtag suggestions are an enhancement and must never surface as an error.

use serde_json::Value;
use tracing::{info, warn};

use crate::generation::prompts::{build_hashtag_prompt, hashtags_schema, HASHTAG_COUNT};
use crate::llm_client::{CompletionRequest, LlmClient};

const TEMPERATURE: f32 = 0.4;

/// Suggests up to ten raw hashtags for `content`. Never fails.
pub async fn suggest_hashtags(llm: &LlmClient, content: &str) -> Vec<String> {
    let prompt = build_hashtag_prompt(content);
    let schema = hashtags_schema();

    let reply = match llm
        .call_json(CompletionRequest {
            system: None,
            prompt: &prompt,
            schema: Some(&schema),
            temperature: TEMPERATURE,
        })
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Hashtag suggestion failed, returning none: {e}");
            return Vec::new();
        }
    };

    let hashtags = extract_hashtags(reply);
    info!("Suggested {} hashtags via {}", hashtags.len(), llm.provider_name());
    hashtags
}

/// Pulls string items out of `{"hashtags": [...]}`; anything else yields nothing.
fn extract_hashtags(reply: Value) -> Vec<String> {
    let Some(Value::Array(items)) = reply.get("hashtags").cloned() else {
        warn!("Model JSON missing hashtags array: {reply}");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(tag) => Some(tag),
            _ => None,
        })
        .take(HASHTAG_COUNT)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::llm_client::testing::{StubProvider, StubReply};

    async fn run(reply: StubReply) -> Vec<String> {
        let llm = LlmClient::new(Arc::new(StubProvider::new(reply)));
        suggest_hashtags(&llm, "We rewrote our parser in Rust").await
    }

    #[tokio::test]
    async fn test_returns_provider_tags_in_order() {
        let tags = run(StubReply::Text(
            json!({"hashtags": ["#RustLang", "ParserDesign", "#Compilers"]}).to_string(),
        ))
        .await;
        assert_eq!(tags, vec!["#RustLang", "ParserDesign", "#Compilers"]);
    }

    #[tokio::test]
    async fn test_every_failure_mode_yields_empty_list() {
        let failures = [
            StubReply::Empty,
            StubReply::Failure,
            StubReply::Text("not json".to_string()),
            StubReply::Text(json!({"tags": ["#x"]}).to_string()),
            StubReply::Text(json!({"hashtags": "#x #y"}).to_string()),
            StubReply::Text(json!(["#x"]).to_string()),
        ];
        for reply in failures {
            let label = format!("{reply:?}");
            assert!(run(reply).await.is_empty(), "expected no tags for {label}");
        }
    }

    #[test]
    fn test_extract_skips_non_strings_and_caps_count() {
        let mut items: Vec<Value> = (0..12).map(|i| json!(format!("#tag{i}"))).collect();
        items.insert(1, json!(7));
        items.insert(2, Value::Null);
        let tags = extract_hashtags(json!({ "hashtags": items }));
        assert_eq!(tags.len(), HASHTAG_COUNT);
        assert_eq!(tags[0], "#tag0");
        assert_eq!(tags[1], "#tag1");
    }

    #[test]
    fn test_duplicates_are_kept_server_side() {
        let tags = extract_hashtags(json!({"hashtags": ["#a", "#a"]}));
        assert_eq!(tags, vec!["#a", "#a"]);
    }
}
