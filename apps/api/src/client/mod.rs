//! Client side of the gateways: HTTP access, result state, hashtag
//! normalization, local scheduling and the account session.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::generation::tone::Tone;
use crate::models::OptimizedPost;

pub mod composer;
pub mod gateway;
pub mod hashtags;
pub mod session;

pub use composer::{BoostState, Composer, GenerationState, PostCard, GENERIC_FAILURE_MESSAGE};
pub use gateway::GatewayClient;
pub use hashtags::{format_hashtag, merge_hashtags, DedupPolicy};
pub use session::{AccountSession, SessionError};

/// Bound applied to every gateway call made from the client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Draft content cannot be empty")]
    EmptyDraft,

    #[error("A request is already in flight")]
    Busy,

    #[error("No post at index {0}")]
    UnknownPost(usize),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request was cancelled")]
    Cancelled,
}

/// The two gateway operations as the client sees them.
#[async_trait]
pub trait PostGateway: Send + Sync {
    async fn optimize_posts(
        &self,
        draft: &str,
        tone: Tone,
    ) -> Result<Vec<OptimizedPost>, ClientError>;

    /// Soft-failing: any problem yields an empty list.
    async fn suggest_hashtags(&self, content: &str) -> Vec<String>;
}
