//! SQLite access layer for the guild message archive.
//!
//! The archive is read-only from this crate's point of view: it is filled by
//! an external scraper, and everything here is a select or an aggregate over
//! the `user_mappings` and `discord_messages` tables.
pub mod fetch;
pub mod model;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

#[derive(Debug)]
pub struct DB {
    pub pool: Pool<Sqlite>,
}

impl DB {
    pub async fn new(file: &str, max_conn: u32) -> Self {
        Self { pool: connect_db(file, max_conn).await }
    }
}

pub async fn connect_db(file: &str, max_conn: u32) -> Pool<Sqlite> {
    let db = SqlitePoolOptions::new()
        .max_connections(max_conn)
        .connect_with(SqliteConnectOptions::new().filename(file).create_if_missing(true))
        .await
        .expect("Couldn't connect to database");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Couldn't run database migrations");
    info!("Connected to database {}", file);
    db
}
