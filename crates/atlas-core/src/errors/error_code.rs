//! Stable error codes, one per failure class.

pub const CHECKPOINT_IO: &str = "CHECKPOINT_IO";
pub const CHECKPOINT_CORRUPTION: &str = "CHECKPOINT_CORRUPTION";
pub const VECTORIZATION_FAILURE: &str = "VECTORIZATION_FAILURE";
pub const BATCH_COMPUTATION_FAILURE: &str = "BATCH_COMPUTATION_FAILURE";
pub const CLUSTERING_FAILURE: &str = "CLUSTERING_FAILURE";
pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";
pub const INGEST_FAILURE: &str = "INGEST_FAILURE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORE_FAILURE: &str = "STORE_FAILURE";

/// Maps an error to its stable, machine-readable code.
pub trait AtlasErrorCode {
    fn error_code(&self) -> &'static str;
}
