//! Per-user frequency aggregation over a paginated scan of the archive.
//!
//! One call owns its tables: they are built fresh, filled during the scan and
//! dropped with the response. Pages are fetched strictly one after another
//! because the stop condition depends on the size of the current page.
use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use chatdb::model::UserProfile;
use chatdb::{fetch, DB};

use crate::tokenizer::{self, is_custom_emoji};

pub const PAGE_SIZE: i64 = 1000;
pub const WORD_LIMIT: usize = 50;
pub const EMOJI_LIMIT: usize = 10;

/// Token counts kept in first-seen order, so that a stable descending sort
/// breaks ties by encounter order.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `n` tokens by descending count.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        self.top_filtered(n, |_| true)
    }

    /// Like [`top`], restricted to tokens matching `keep`.
    ///
    /// [`top`]: Self::top
    pub fn top_filtered(&self, n: usize, keep: impl Fn(&str) -> bool) -> Vec<(String, u64)> {
        let mut sorted: Vec<(String, u64)> =
            self.entries.iter().filter(|(token, _)| keep(token)).cloned().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

/// The `/users/:id/stats` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_messages: u64,
    #[serde(rename = "totalMessagesInDB")]
    pub total_messages_in_db: i64,
    pub word_frequency: Map<String, Value>,
    pub emoji_frequency: EmojiFrequency,
    pub user_data: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct EmojiFrequency {
    pub custom: Map<String, Value>,
    pub unicode: Map<String, Value>,
}

fn to_map(entries: Vec<(String, u64)>) -> Map<String, Value> {
    entries.into_iter().map(|(token, count)| (token, Value::from(count))).collect()
}

/// Scan the full message history of one user and build their statistics.
///
/// Returns `None` when no profile exists for the id. Any page, count or
/// profile fetch failure aborts the whole scan; nothing partial is returned.
pub async fn user_stats(db: &DB, author_id: &str) -> Result<Option<UserStats>> {
    let profile = match fetch::get_profile(db, author_id).await? {
        Some(profile) => profile,
        None => return Ok(None),
    };

    // Exact count up front; may drift from the scan total under concurrent
    // writes, which is fine.
    let total_in_db = fetch::message_count(db, author_id).await?;

    let mut words = FrequencyTable::new();
    let mut emojis = FrequencyTable::new();
    let mut total_messages: u64 = 0;

    let mut page = 0;
    loop {
        let rows = fetch::message_page(db, author_id, page, PAGE_SIZE).await?;
        if rows.is_empty() {
            break;
        }

        for row in &rows {
            let content = match &row.content {
                Some(content) => content,
                None => continue,
            };
            let tokens = tokenizer::process_message(content);
            for word in &tokens.words {
                words.add(word);
            }
            // Custom and unicode emojis share one table and are split again
            // at output time by shape.
            for emoji in tokens.custom_emojis.iter().chain(&tokens.unicode_emojis) {
                emojis.add(emoji);
            }
        }

        total_messages += rows.len() as u64;
        // A short page is the last page
        if (rows.len() as i64) < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    debug!("Aggregated {} messages for user {}", total_messages, author_id);

    Ok(Some(UserStats {
        total_messages,
        total_messages_in_db: total_in_db,
        word_frequency: to_map(words.top(WORD_LIMIT)),
        emoji_frequency: EmojiFrequency {
            custom: to_map(emojis.top_filtered(EMOJI_LIMIT, is_custom_emoji)),
            unicode: to_map(emojis.top_filtered(EMOJI_LIMIT, |token| !is_custom_emoji(token))),
        },
        user_data: profile,
    }))
}
