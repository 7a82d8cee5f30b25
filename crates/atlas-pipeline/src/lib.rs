//! # atlas-pipeline
//!
//! Runs the catalog through every stage with checkpointed resume:
//! data loading, basic processing, metrics, vectorizers, clustering,
//! visualization. Publishes cluster summaries to a summary store and
//! answers similarity queries.

pub mod ingest;
pub mod metrics;
pub mod observability;
pub mod pipeline;
pub mod store;

pub use pipeline::{CatalogPipeline, PipelineReport};
pub use store::MemorySummaryStore;
