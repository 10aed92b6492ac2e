//! Text normalization for storage and embedding.

use std::sync::LazyLock;

use regex::Regex;

/// Normalized chunks at or below this many characters are not stored.
pub const MIN_STORED_TEXT_CHARS: usize = 20;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Lowercase and collapse whitespace runs to single spaces.
///
/// Embeddings are requested for the normalized form, and the normalized
/// form is what gets stored.
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RUNS
        .replace_all(&text.to_lowercase(), " ")
        .into_owned()
}

/// Whether a normalized chunk is long enough to be worth storing.
pub fn exceeds_storage_threshold(text: &str) -> bool {
    text.trim().chars().count() > MIN_STORED_TEXT_CHARS
}
