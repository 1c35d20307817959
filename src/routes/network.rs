use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use chatdb::fetch;

use crate::error::ApiError;
use crate::AppState;

const DEFAULT_NODES: i64 = 50;
const MAX_LINKS: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct NetworkParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(rename = "messageCount")]
    pub message_count: i64,
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// `GET /network?limit=N`
pub async fn network(
    State(state): State<Arc<AppState>>, Query(params): Query<NetworkParams>,
) -> Result<Json<Network>, ApiError> {
    let db = &state.db;
    let max_users = params.limit.unwrap_or(DEFAULT_NODES).clamp(10, 100);

    let message_stats = fetch::top_message_counts(db, max_users).await?;
    if message_stats.is_empty() {
        return Ok(Json(Network { nodes: Vec::new(), links: Vec::new() }));
    }

    let ids: Vec<String> = message_stats.iter().map(|s| s.author_id.clone()).collect();
    let profiles = fetch::get_profiles(db, &ids).await?;
    let interactions = fetch::interactions_between(db, &ids, MAX_LINKS).await?;

    let nodes: Vec<Node> = profiles
        .into_iter()
        .map(|profile| Node {
            name: profile.name().to_string(),
            message_count: message_stats
                .iter()
                .find(|s| s.author_id == profile.author_id)
                .map_or(0, |s| s.count),
            avatar: profile.avatar_url,
            id: profile.author_id,
        })
        .collect();

    // Nodes come from known profiles, which can be a subset of the top ids,
    // so edges are filtered against the node set again.
    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let links: Vec<Link> = interactions
        .into_iter()
        .filter(|edge| {
            node_ids.contains(edge.source_user_id.as_str())
                && node_ids.contains(edge.target_user_id.as_str())
        })
        .map(|edge| Link {
            source: edge.source_user_id,
            target: edge.target_user_id,
            value: edge.interaction_count,
        })
        .collect();

    Ok(Json(Network { nodes, links }))
}
