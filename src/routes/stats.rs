use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use msgstat::aggregate::{self, UserStats};

use crate::error::ApiError;
use crate::AppState;

/// `GET /users/:id/stats`
pub async fn user_stats(
    State(state): State<Arc<AppState>>, Path(author_id): Path<String>,
) -> Result<Json<UserStats>, ApiError> {
    match aggregate::user_stats(&state.db, &author_id).await? {
        Some(stats) => Ok(Json(stats)),
        None => Err(ApiError::UserNotFound),
    }
}
