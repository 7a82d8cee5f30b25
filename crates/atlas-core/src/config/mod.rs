//! Configuration system for Atlas.
//! TOML-based: env > file > compiled defaults.

pub mod atlas_config;
pub mod checkpoint_config;
pub mod clustering_config;
pub mod defaults;
pub mod observability_config;
pub mod query_config;
pub mod vectorizer_config;

pub use atlas_config::AtlasConfig;
pub use checkpoint_config::CheckpointConfig;
pub use clustering_config::ClusteringConfig;
pub use observability_config::ObservabilityConfig;
pub use query_config::QueryConfig;
pub use vectorizer_config::VectorizerConfig;
