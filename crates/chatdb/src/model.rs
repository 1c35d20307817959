//! Row models for the archive tables.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `user_mappings`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub author_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Display name, falling back to the account username.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// A message as seen by the aggregator. Only the content matters; pages are
/// already filtered by author in SQL.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub content: Option<String>,
}

/// Per-author aggregate used by the leaderboards and the network graph.
#[derive(Debug, Clone, FromRow)]
pub struct AuthorCount {
    pub author_id: String,
    pub count: i64,
}

/// One reply edge of the `user_interactions` view.
#[derive(Debug, Clone, FromRow)]
pub struct InteractionEdge {
    pub source_user_id: String,
    pub target_user_id: String,
    pub interaction_count: i64,
}
