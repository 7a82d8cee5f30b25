//! # atlas-core
//!
//! Foundation crate for the Atlas catalog clustering engine.
//! Defines the data model, collaborator traits, errors, config, and defaults.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AtlasConfig;
pub use errors::{AtlasError, AtlasResult};
pub use models::{
    ClusterAssignment, ClusterGroup, ClusterId, ClusterSnapshot, ClusterSummary, DocumentMetrics,
    RawServer, ServerRecord, SimilarityResult,
};
