//! Error handling for Atlas.
//! One error enum per subsystem, `thiserror` only.

pub mod atlas_error;
pub mod checkpoint_error;
pub mod clustering_error;
pub mod config_error;
pub mod error_code;
pub mod ingest_error;
pub mod query_error;
pub mod store_error;
pub mod vectorization_error;

pub use atlas_error::{AtlasError, AtlasResult};
pub use checkpoint_error::CheckpointError;
pub use clustering_error::ClusteringError;
pub use config_error::ConfigError;
pub use error_code::AtlasErrorCode;
pub use ingest_error::IngestError;
pub use query_error::QueryError;
pub use store_error::StoreError;
pub use vectorization_error::VectorizationError;
