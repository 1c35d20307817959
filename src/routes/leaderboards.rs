use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use chatdb::fetch;
use chatdb::model::{AuthorCount, UserProfile};

use crate::error::ApiError;
use crate::AppState;

const BOARD_SIZE: i64 = 10;

#[derive(Debug, Serialize)]
pub struct BoardEntry {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub value: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboards {
    pub top_messages: Vec<BoardEntry>,
    pub top_gramen: Vec<BoardEntry>,
    pub top_replies: Vec<BoardEntry>,
    pub top_emojis: Vec<BoardEntry>,
}

/// `GET /leaderboards`
pub async fn leaderboards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Leaderboards>, ApiError> {
    let db = &state.db;
    let top_messages = fetch::top_message_counts(db, BOARD_SIZE).await?;
    let top_gramen = fetch::top_gramen_counts(db, BOARD_SIZE).await?;
    let top_replies = fetch::top_reply_counts(db, BOARD_SIZE).await?;
    let top_emojis = fetch::top_emoji_counts(db, BOARD_SIZE).await?;

    // One profile fetch for the union of all boards
    let mut ids: Vec<String> = Vec::new();
    for entry in top_messages.iter().chain(&top_gramen).chain(&top_replies).chain(&top_emojis) {
        if !ids.contains(&entry.author_id) {
            ids.push(entry.author_id.clone());
        }
    }
    let profiles: HashMap<String, UserProfile> =
        fetch::get_profiles(db, &ids).await?.into_iter().map(|p| (p.author_id.clone(), p)).collect();

    let format = |entries: Vec<AuthorCount>| -> Vec<BoardEntry> {
        entries
            .into_iter()
            .map(|entry| {
                let profile = profiles.get(&entry.author_id);
                BoardEntry {
                    name: profile
                        .map_or_else(|| "Unknown User".to_string(), |p| p.name().to_string()),
                    avatar: profile.and_then(|p| p.avatar_url.clone()),
                    value: entry.count,
                    id: entry.author_id,
                }
            })
            .collect()
    };

    Ok(Json(Leaderboards {
        top_messages: format(top_messages),
        top_gramen: format(top_gramen),
        top_replies: format(top_replies),
        top_emojis: format(top_emojis),
    }))
}
