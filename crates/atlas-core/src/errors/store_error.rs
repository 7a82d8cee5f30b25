use super::error_code::{self, AtlasErrorCode};

/// Summary document-store adapter errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("upsert of {key} failed: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("read failed: {reason}")]
    ReadFailed { reason: String },
}

impl AtlasErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        error_code::STORE_FAILURE
    }
}
