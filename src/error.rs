//! API boundary errors.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with. Data layer failures all land in
/// `Internal`; the request is read-only and idempotent, so the client simply
/// retries.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("User not found")]
    UserNotFound,

    #[error("Search query is required")]
    MissingQuery,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": self.to_string() }))).into_response()
            }
            Self::MissingQuery => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
            }
            Self::Internal(why) => {
                error!("Request failed: {:#}", why);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error",
                        "details": format!("{:#}", why),
                    })),
                )
                    .into_response()
            }
        }
    }
}
