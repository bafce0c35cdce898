//! Axum route handlers for the generation and hashtag gateways.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::hashtags::suggest_hashtags;
use crate::generation::optimizer::optimize;
use crate::generation::tone::Tone;
use crate::models::OptimizedPost;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub draft: Option<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HashtagRequest {
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashtagResponse {
    pub hashtags: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/optimize-posts
///
/// Rewrites a draft into post variants. 400 on bad input, 500 when the provider
/// credential is unset, 502 when the provider reply breaks the contract.
pub async fn handle_optimize_posts(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<Vec<OptimizedPost>>, AppError> {
    let Json(request) = payload.map_err(|e| {
        AppError::Validation(format!("Request body must be {{draft, tone}}: {e}"))
    })?;

    let draft = required(request.draft.as_deref(), "Draft is required")?;
    let tone = required(request.tone.as_deref(), "Tone is required")?
        .parse::<Tone>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let llm = state.llm()?;
    let posts = optimize(llm, draft, tone).await?;

    Ok(Json(posts))
}

/// POST /api/hashtags
///
/// Suggests hashtags for a post. Past input and credential checks this always
/// answers 200, with an empty list when the provider misbehaves.
pub async fn handle_hashtags(
    State(state): State<AppState>,
    payload: Result<Json<HashtagRequest>, JsonRejection>,
) -> Result<Json<HashtagResponse>, AppError> {
    let Json(request) = payload
        .map_err(|e| AppError::Validation(format!("Request body must be {{content}}: {e}")))?;

    let content = required(request.content.as_deref(), "Content is required")?;

    let llm = state.llm()?;
    let hashtags = suggest_hashtags(llm, content).await;

    Ok(Json(HashtagResponse { hashtags }))
}

/// Any method other than POST on a gateway route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Trims `value` and rejects it when absent or blank.
fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
