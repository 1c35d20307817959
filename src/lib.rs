//! HTTP surface of the guild analytics dashboard.
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use chatdb::DB;

/// State shared by all handlers. Only the pool lives here; every request
/// builds its own view models from scratch.
pub struct AppState {
    pub db: DB,
}

impl AppState {
    pub fn new(db: DB) -> Arc<Self> {
        Arc::new(Self { db })
    }
}
