use super::error_code::{self, AtlasErrorCode};

/// Checkpoint-layer errors for the progress ledger and stage blobs.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O failed at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("could not serialize output of stage {stage}: {reason}")]
    Serialization { stage: String, reason: String },

    #[error("checkpoint corruption detected in stage {stage}: {reason}")]
    Corruption { stage: String, reason: String },

    #[error("stage mismatch: requested {requested}, blob holds {found}")]
    StageMismatch { requested: String, found: String },
}

impl AtlasErrorCode for CheckpointError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::Serialization { .. } => error_code::CHECKPOINT_IO,
            Self::Corruption { .. } | Self::StageMismatch { .. } => {
                error_code::CHECKPOINT_CORRUPTION
            }
        }
    }
}
