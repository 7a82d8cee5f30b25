use serde::{Deserialize, Serialize};

use super::defaults;

/// TF-IDF vectorizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Largest n-gram size (1 = unigrams only).
    pub max_ngram: usize,
    /// Vocabulary cap for the description corpus.
    pub description_max_features: usize,
    /// Entries held by each vectorizer's normalization cache.
    pub normalization_cache_size: u64,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_ngram: defaults::DEFAULT_MAX_NGRAM,
            description_max_features: defaults::DEFAULT_DESCRIPTION_MAX_FEATURES,
            normalization_cache_size: defaults::DEFAULT_NORMALIZATION_CACHE_SIZE,
        }
    }
}
