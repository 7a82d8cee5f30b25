use super::error_code::{self, AtlasErrorCode};

/// Similarity query errors.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("server not found: {server_id}")]
    RecordNotFound { server_id: String },

    #[error("server {server_id} has no cluster assignment")]
    NotClustered { server_id: String },
}

impl AtlasErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RecordNotFound { .. } => error_code::RECORD_NOT_FOUND,
            Self::NotClustered { .. } => error_code::CLUSTERING_FAILURE,
        }
    }
}
