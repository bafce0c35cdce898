//! Generation gateway core: draft + tone -> ordered list of rewritten posts.
//!
//! Exactly one provider call per request. No retry, no caching. Every provider
//! failure is converted into a `ContractViolation` before it leaves this module.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{AppError, ContractViolation};
use crate::generation::prompts::{build_optimize_prompt, posts_schema, VARIANT_COUNT};
use crate::generation::tone::Tone;
use crate::llm_client::{CompletionRequest, LlmClient, LlmError};
use crate::models::OptimizedPost;

const TEMPERATURE: f32 = 0.7;

/// Rewrites `draft` into post variants using `tone`.
///
/// The provider's list is returned as-is: not reordered, not deduplicated and not
/// truncated, even when it holds more or fewer than the requested variants.
pub async fn optimize(
    llm: &LlmClient,
    draft: &str,
    tone: Tone,
) -> Result<Vec<OptimizedPost>, AppError> {
    let prompt = build_optimize_prompt(draft, tone);
    let schema = posts_schema();

    let reply = llm
        .call_json(CompletionRequest {
            system: Some(&prompt.system),
            prompt: &prompt.user,
            schema: Some(&schema),
            temperature: TEMPERATURE,
        })
        .await
        .map_err(|e| AppError::Provider(classify(e)))?;

    let posts = extract_posts(reply).map_err(AppError::Provider)?;

    if posts.len() != VARIANT_COUNT {
        warn!(
            "Model returned {} variants (asked for {VARIANT_COUNT}); passing them through",
            posts.len()
        );
    }
    info!(
        "Generated {} variants via {} (tone={tone})",
        posts.len(),
        llm.provider_name()
    );

    Ok(posts)
}

fn classify(err: LlmError) -> ContractViolation {
    match err {
        LlmError::EmptyContent => ContractViolation::NoResponse,
        LlmError::Parse(e) => {
            warn!("Failed to parse model JSON: {e}");
            ContractViolation::InvalidJson
        }
        LlmError::Http(e) => {
            warn!("Provider transport error: {e}");
            ContractViolation::Upstream
        }
        LlmError::Api { status, message } => {
            warn!("Provider API error (status {status}): {message}");
            ContractViolation::Upstream
        }
    }
}

/// Accepts a bare list or `{"posts": [...]}`. Anything else is unexpected.
fn extract_posts(reply: Value) -> Result<Vec<OptimizedPost>, ContractViolation> {
    let list = match reply {
        Value::Array(_) => reply,
        Value::Object(mut map) => match map.remove("posts") {
            Some(posts @ Value::Array(_)) => posts,
            other => {
                warn!("Model JSON missing posts array: {other:?}");
                return Err(ContractViolation::UnexpectedShape);
            }
        },
        other => {
            warn!("Model JSON has unexpected top-level shape: {other}");
            return Err(ContractViolation::UnexpectedShape);
        }
    };

    serde_json::from_value(list).map_err(|e| {
        warn!("Model posts do not match the post shape: {e}");
        ContractViolation::UnexpectedShape
    })
}
