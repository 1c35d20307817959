//! Environment configuration.
use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub bind_addr: String,
    pub db_file: String,
    pub db_max_conn: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3001"),
            db_file: try_load("DATABASE_FILE", "./database/archive.db"),
            db_max_conn: try_load("DATABASE_MAX_CONNECTIONS", "4"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|why| {
            warn!("Invalid {key} value: {why}");
        })
        .expect("Environment misconfigured!")
}
