use super::error_code::AtlasErrorCode;
use super::{
    CheckpointError, ClusteringError, ConfigError, IngestError, QueryError, StoreError,
    VectorizationError,
};

/// Top-level error aggregating every subsystem error via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("vectorization error: {0}")]
    Vectorization(#[from] VectorizationError),

    #[error("clustering error: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AtlasErrorCode for AtlasError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Checkpoint(e) => e.error_code(),
            Self::Vectorization(e) => e.error_code(),
            Self::Clustering(e) => e.error_code(),
            Self::Query(e) => e.error_code(),
            Self::Ingest(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
        }
    }
}

pub type AtlasResult<T> = Result<T, AtlasError>;
