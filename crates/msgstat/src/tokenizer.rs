//! Word and emoji extraction from raw message content.
//!
//! The unicode handling here is deliberately approximate: the three character
//! ranges below are the contract, not an attempt to detect every emoji the
//! standard keeps adding.
use std::sync::LazyLock;

use regex::Regex;

/// `<:name:id>` / `<a:name:id>` custom emoji markup spans.
static CUSTOM_EMOJI_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a?:[^>]+>").expect("Invalid custom emoji pattern"));

/// Two regional indicator code points in a row, i.e. a flag sequence.
static FLAG_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{1F1E6}-\u{1F1FF}]{2}").expect("Invalid flag pattern"));

/// Characters stripped from word fragments before filtering.
const PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Whether a whitespace-delimited token is a custom emoji reference.
pub fn is_custom_emoji(token: &str) -> bool {
    (token.starts_with("<:") || token.starts_with("<a:")) && token.ends_with('>')
}

/// Misc symbols & pictographs, transport, emoticon and dingbat blocks.
fn is_generic_emoji(c: char) -> bool {
    matches!(c, '\u{1F300}'..='\u{1F9FF}' | '\u{2600}'..='\u{26FF}' | '\u{2700}'..='\u{27BF}')
}

/// Skin tone modifiers must never be emitted as standalone emojis.
fn is_skin_tone_modifier(c: char) -> bool {
    matches!(c, '\u{1F3FB}'..='\u{1F3FF}')
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c, '\u{1F1E6}'..='\u{1F1FF}')
}

/// The three token streams extracted from one message body, in the order they
/// were encountered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenizedMessage {
    pub words: Vec<String>,
    pub custom_emojis: Vec<String>,
    pub unicode_emojis: Vec<String>,
}

/// Tokenize one message body. Pure: the same content always yields the same
/// three streams.
pub fn process_message(content: &str) -> TokenizedMessage {
    let mut out = TokenizedMessage::default();

    for token in content.split_whitespace() {
        if is_custom_emoji(token) {
            out.custom_emojis.push(token.to_string());
        }
    }

    // Flags first, then strip them so they are not recounted a code point at
    // a time by the generic pass below.
    for flag in FLAG_SEQUENCE.find_iter(content) {
        out.unicode_emojis.push(flag.as_str().to_string());
    }
    let without_flags = FLAG_SEQUENCE.replace_all(content, "");

    for c in without_flags.chars() {
        if is_generic_emoji(c) && !is_skin_tone_modifier(c) {
            out.unicode_emojis.push(c.to_string());
        }
    }

    // The word pass works on the original content with custom emoji markup
    // removed, so flags still count toward fragment boundaries.
    let without_markup = CUSTOM_EMOJI_MARKUP.replace_all(content, "").to_lowercase();
    for fragment in without_markup.split_whitespace() {
        let clean: String = fragment.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
        if keep_word(&clean) {
            out.words.push(clean);
        }
    }

    out
}

/// Word filter: drop single characters, bare numbers, links, leftover mention
/// or emoji markup, and fragments that are nothing but emoji.
fn keep_word(word: &str) -> bool {
    word.chars().count() > 1
        && !word.chars().all(|c| c.is_ascii_digit())
        && !word.contains("http")
        && !word.contains("www.")
        && !word.chars().all(|c| c.is_ascii_digit() || matches!(c, '<' | '>' | ':'))
        && !word.chars().all(|c| is_generic_emoji(c) || is_regional_indicator(c))
}
