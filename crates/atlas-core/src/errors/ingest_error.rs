use super::error_code::{self, AtlasErrorCode};

/// Catalog ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read catalog {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse catalog {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("catalog entry {index} is missing required field {field}")]
    MissingField { index: usize, field: &'static str },
}

impl AtlasErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        error_code::INGEST_FAILURE
    }
}
