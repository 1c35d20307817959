use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use chatdb::fetch;
use chatdb::model::UserProfile;

use crate::error::ApiError;
use crate::AppState;

const SEARCH_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub user: UserProfile,
    #[serde(rename = "hasMessages")]
    pub has_messages: bool,
    #[serde(rename = "messageCount")]
    pub message_count: i64,
}

/// `GET /users/search?query=Q`
pub async fn search_users(
    State(state): State<Arc<AppState>>, Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let db = &state.db;
    let query = match params.query {
        Some(query) if !query.is_empty() => query,
        _ => return Err(ApiError::MissingQuery),
    };

    // All-digit queries are treated as an exact id lookup first
    if query.chars().all(|c| c.is_ascii_digit()) {
        if let Some(profile) = fetch::get_profile(db, &query).await? {
            let count = fetch::message_count(db, &profile.author_id).await?;
            return Ok(Json(vec![to_result(profile, count)]));
        }
    }

    let mut results = Vec::new();
    for profile in fetch::search_profiles(db, &query, SEARCH_LIMIT).await? {
        let count = fetch::message_count(db, &profile.author_id).await?;
        results.push(to_result(profile, count));
    }
    Ok(Json(results))
}

fn to_result(user: UserProfile, message_count: i64) -> SearchResult {
    SearchResult { has_messages: message_count > 0, message_count, user }
}
