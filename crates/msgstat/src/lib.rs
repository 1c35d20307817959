//! Message content analysis.
//!
//! [`tokenizer`] extracts words and emojis from a single message body, and
//! [`aggregate`] drives a paginated scan of one user's archived messages to
//! build their frequency statistics.
pub mod aggregate;
pub mod tokenizer;
