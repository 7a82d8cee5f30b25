//! Text normalization: lower-case, punctuation to spaces, collapsed whitespace.

use std::sync::LazyLock;

use moka::sync::Cache;
use regex::Regex;

static NON_WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^\w\s]").ok());

/// Normalize `text` without memoization.
pub fn normalize_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = match NON_WORD.as_ref() {
        Some(re) => re.replace_all(&lower, " ").into_owned(),
        None => lower
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bounded memoizing wrapper around [`normalize_text`].
///
/// One per vectorizer, so a refit over a new corpus never sees entries
/// produced for another one.
pub struct TextNormalizer {
    cache: Cache<String, String>,
}

impl TextNormalizer {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        if let Some(hit) = self.cache.get(text) {
            return hit;
        }
        let normalized = normalize_text(text);
        self.cache.insert(text.to_string(), normalized.clone());
        normalized
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize_text("Binance-MCP  Server!"), "binance mcp server");
    }

    #[test]
    fn keeps_underscores_and_digits() {
        assert_eq!(normalize_text("web3_tools v2.0"), "web3_tools v2 0");
    }

    #[test]
    fn blank_input_normalizes_empty() {
        assert_eq!(normalize_text("  ...  \n\t"), "");
    }

    #[test]
    fn cached_result_matches_uncached() {
        let normalizer = TextNormalizer::new(16);
        let first = normalizer.normalize("Weather API (beta)");
        let second = normalizer.normalize("Weather API (beta)");
        assert_eq!(first, "weather api beta");
        assert_eq!(first, second);
    }

    #[test]
    fn zero_capacity_still_normalizes() {
        let normalizer = TextNormalizer::new(0);
        assert_eq!(normalizer.normalize("A.B"), "a b");
    }
}
