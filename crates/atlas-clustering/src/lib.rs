//! # atlas-clustering
//!
//! Groups catalog records into entity clusters:
//! Phase 0 entity seeding, Phase 1 title union, Phase 2 batched parallel
//! refinement, all merged through a single union-find. Also builds
//! per-cluster summaries, similarity queries and a 2-D cluster layout.

pub mod engine;
pub mod entity;
pub mod layout;
pub mod pipeline;
pub mod query;
pub mod scoring;
pub mod summary;
pub mod union_find;

pub use engine::{ClusteringEngine, ClusteringOutcome};
pub use entity::{entity_key, extract_entity_name};
pub use layout::cluster_layout;
pub use query::SimilarityIndex;
pub use scoring::{PairScorer, RecordVectors, ScoreWeights, TfidfPairScorer};
pub use summary::ClusterSummaryBuilder;
pub use union_find::UnionFind;
