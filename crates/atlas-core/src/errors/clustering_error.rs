use super::error_code::{self, AtlasErrorCode};
use super::{CheckpointError, VectorizationError};

/// Clustering engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusteringError {
    #[error("vectorization failed: {0}")]
    Vectorization(#[from] VectorizationError),

    #[error("checkpoint failed: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("batch {batch} failed: {reason}")]
    BatchFailed { batch: usize, reason: String },

    #[error("invalid clustering input: {reason}")]
    InvalidInput { reason: String },

    #[error("worker pool unavailable: {reason}")]
    WorkerPool { reason: String },
}

impl AtlasErrorCode for ClusteringError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Vectorization(e) => e.error_code(),
            Self::Checkpoint(e) => e.error_code(),
            Self::BatchFailed { .. } => error_code::BATCH_COMPUTATION_FAILURE,
            Self::InvalidInput { .. } | Self::WorkerPool { .. } => error_code::CLUSTERING_FAILURE,
        }
    }
}
