use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted TF-IDF state for one corpus.
///
/// Enough to rebuild a fitted vectorizer without refitting, provided the
/// snapshot was taken over the same corpus (see `fingerprint`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularySnapshot {
    /// Corpus label, e.g. `title` or `description`.
    pub corpus: String,
    /// Term -> column index.
    pub vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column index.
    pub idf: Vec<f64>,
    pub max_ngram: usize,
    pub max_features: Option<usize>,
    /// Number of documents the vectorizer was fitted on.
    pub documents: usize,
    /// blake3 hex digest of the normalized corpus.
    pub fingerprint: String,
}

/// Snapshots for both independently fitted corpora.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerSnapshots {
    pub title: VocabularySnapshot,
    pub description: VocabularySnapshot,
}
