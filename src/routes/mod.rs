//! Route handlers.
//!
//! Each one is a thin pass-through: fetch rows, reshape them into the view
//! model, respond with JSON.
mod leaderboards;
mod network;
mod search;
mod stats;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users/search", get(search::search_users))
        .route("/users/:id/stats", get(stats::user_stats))
        .route("/leaderboards", get(leaderboards::leaderboards))
        .route("/network", get(network::network))
        .with_state(state)
}
