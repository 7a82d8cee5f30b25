//! Tokenization of normalized text into 1..=n word grams.

use crate::stop_words::is_stop_word;

/// Split already-normalized text into word n-grams.
///
/// Words shorter than two characters and stop words are dropped first;
/// n-grams are then built over the surviving sequence, unigrams first.
pub fn tokenize(normalized: &str, max_ngram: usize) -> Vec<String> {
    let words: Vec<&str> = normalized
        .split_whitespace()
        .filter(|w| w.chars().count() >= 2 && !is_stop_word(w))
        .collect();

    let mut grams = Vec::with_capacity(words.len() * max_ngram.max(1));
    for n in 1..=max_ngram {
        if n > words.len() {
            break;
        }
        grams.extend(words.windows(n).map(|window| window.join(" ")));
    }
    grams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_unigrams_then_bigrams() {
        assert_eq!(
            tokenize("binance mcp server", 2),
            vec!["binance", "mcp", "server", "binance mcp", "mcp server"]
        );
    }

    #[test]
    fn drops_short_words_and_stop_words() {
        assert_eq!(tokenize("a tool for the x web", 2), vec!["tool", "web", "tool web"]);
    }

    #[test]
    fn unigrams_only() {
        assert_eq!(tokenize("weather api", 1), vec!["weather", "api"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(tokenize("", 2).is_empty());
        assert!(tokenize("the of a", 2).is_empty());
    }
}
