use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One rewritten variant of the user's draft.
///
/// Missing fields deserialize to empty values so a sloppy model reply still renders.
/// Fields of the wrong JSON type fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedPost {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tone_explanation: String,
}

/// A post the user has put on their calendar. Lives only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPost {
    pub id: Uuid,
    #[serde(flatten)]
    pub post: OptimizedPost,
    pub scheduled_date: DateTime<Utc>,
}

impl ScheduledPost {
    pub fn new(post: OptimizedPost, scheduled_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post,
            scheduled_date,
        }
    }
}
