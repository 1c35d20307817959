//! Read-only queries against the archive.
//!
//! Every function here maps to one select; callers compose them into view
//! models. Failures carry context and bubble up untouched, there is no retry
//! at this layer.
use anyhow::{Context, Result};
use sqlx::{query_as, query_scalar};

use crate::model::{AuthorCount, InteractionEdge, MessageRow, UserProfile};
use crate::DB;

/// Look up the profile of a single user, `None` if the id is unknown.
pub async fn get_profile(db: &DB, author_id: &str) -> Result<Option<UserProfile>> {
    query_as::<_, UserProfile>(
        "SELECT author_id,username,display_name,avatar_url FROM user_mappings WHERE author_id=?",
    )
    .bind(author_id)
    .fetch_optional(&db.pool)
    .await
    .context("Failed to fetch user profile")
}

/// Fetch the profiles of all given ids. Unknown ids are silently absent from
/// the result.
pub async fn get_profiles(db: &DB, author_ids: &[String]) -> Result<Vec<UserProfile>> {
    if author_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT author_id,username,display_name,avatar_url FROM user_mappings WHERE author_id IN ({})",
        placeholders(author_ids.len())
    );
    let mut query = query_as::<_, UserProfile>(&sql);
    for id in author_ids {
        query = query.bind(id);
    }
    query.fetch_all(&db.pool).await.context("Failed to fetch user profiles")
}

/// Exact number of archived messages for one user.
pub async fn message_count(db: &DB, author_id: &str) -> Result<i64> {
    query_scalar("SELECT COUNT(*) FROM discord_messages WHERE author_id=?")
        .bind(author_id)
        .fetch_one(&db.pool)
        .await
        .context("Failed to count messages")
}

/// One page of a user's messages, ordered by message id so that consecutive
/// pages never skip or repeat rows over a static archive.
pub async fn message_page(
    db: &DB, author_id: &str, page: i64, page_size: i64,
) -> Result<Vec<MessageRow>> {
    query_as::<_, MessageRow>(
        "SELECT content FROM discord_messages WHERE author_id=? ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(author_id)
    .bind(page_size)
    .bind(page * page_size)
    .fetch_all(&db.pool)
    .await
    .with_context(|| format!("Failed to fetch message page {}", page))
}

/// Authors with the most archived messages.
pub async fn top_message_counts(db: &DB, limit: i64) -> Result<Vec<AuthorCount>> {
    query_as::<_, AuthorCount>(
        "SELECT author_id, COUNT(*) AS count FROM discord_messages \
         GROUP BY author_id ORDER BY count DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&db.pool)
    .await
    .context("Failed to fetch top message counts")
}

/// Authors with the most messages containing the guild's `<:gramen:...>` emoji.
pub async fn top_gramen_counts(db: &DB, limit: i64) -> Result<Vec<AuthorCount>> {
    query_as::<_, AuthorCount>(
        "SELECT author_id, COUNT(*) AS count FROM discord_messages \
         WHERE content LIKE '%<:gramen:%' OR content LIKE '%<a:gramen:%' \
         GROUP BY author_id ORDER BY count DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&db.pool)
    .await
    .context("Failed to fetch top gramen counts")
}

/// Authors with the most replies to other messages.
pub async fn top_reply_counts(db: &DB, limit: i64) -> Result<Vec<AuthorCount>> {
    query_as::<_, AuthorCount>(
        "SELECT author_id, COUNT(*) AS count FROM discord_messages \
         WHERE replied_to IS NOT NULL GROUP BY author_id ORDER BY count DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&db.pool)
    .await
    .context("Failed to fetch top reply counts")
}

/// Authors with the most messages containing any custom emoji markup.
pub async fn top_emoji_counts(db: &DB, limit: i64) -> Result<Vec<AuthorCount>> {
    query_as::<_, AuthorCount>(
        "SELECT author_id, COUNT(*) AS count FROM discord_messages \
         WHERE content LIKE '%<:%' OR content LIKE '%<a:%' \
         GROUP BY author_id ORDER BY count DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&db.pool)
    .await
    .context("Failed to fetch top emoji counts")
}

/// Reply edges where both ends are within the given set of users, strongest
/// first.
pub async fn interactions_between(
    db: &DB, author_ids: &[String], limit: i64,
) -> Result<Vec<InteractionEdge>> {
    if author_ids.is_empty() {
        return Ok(Vec::new());
    }

    let marks = placeholders(author_ids.len());
    let sql = format!(
        "SELECT source_user_id,target_user_id,interaction_count FROM user_interactions \
         WHERE source_user_id IN ({marks}) AND target_user_id IN ({marks}) \
         ORDER BY interaction_count DESC LIMIT ?",
    );
    let mut query = query_as::<_, InteractionEdge>(&sql);
    for id in author_ids {
        query = query.bind(id);
    }
    for id in author_ids {
        query = query.bind(id);
    }
    query.bind(limit).fetch_all(&db.pool).await.context("Failed to fetch user interactions")
}

/// Case-insensitive substring search over usernames and display names.
pub async fn search_profiles(db: &DB, search: &str, limit: i64) -> Result<Vec<UserProfile>> {
    let pattern = format!("%{}%", search);
    query_as::<_, UserProfile>(
        "SELECT author_id,username,display_name,avatar_url FROM user_mappings \
         WHERE username LIKE ? OR display_name LIKE ? LIMIT ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .fetch_all(&db.pool)
    .await
    .context("Failed to search user profiles")
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
