use super::error_code::{self, AtlasErrorCode};

/// TF-IDF fitting and snapshot errors.
#[derive(Debug, thiserror::Error)]
pub enum VectorizationError {
    #[error("empty vocabulary after fitting {corpus} corpus of {documents} documents")]
    EmptyVocabulary { corpus: String, documents: usize },

    #[error("vectorizer for {corpus} corpus used before fit")]
    NotFitted { corpus: String },

    #[error("snapshot fingerprint mismatch: expected {expected}, got {actual}")]
    SnapshotMismatch { expected: String, actual: String },

    #[error("malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },
}

impl AtlasErrorCode for VectorizationError {
    fn error_code(&self) -> &'static str {
        error_code::VECTORIZATION_FAILURE
    }
}
