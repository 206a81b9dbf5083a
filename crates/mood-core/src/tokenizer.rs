use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s']").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@#]\w+").unwrap());
static APOSTROPHE_TRIM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^'+|'+$").unwrap());

/// Tokenize short-form text into lowercase words.
/// Drops URLs, @mentions and #hashtags; keeps apostrophes within words
/// (e.g., "don't") so negations survive.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = URL.replace_all(text, " ");
    let text = MENTION.replace_all(&text, " ");
    let cleaned = NON_WORD.replace_all(&text, " ");
    cleaned
        .to_lowercase()
        .split_whitespace()
        .map(|t| APOSTROPHE_TRIM.replace_all(t, "").to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
