//! Data model shared across the workspace.

pub mod cluster;
pub mod layout;
pub mod server;
pub mod similarity;
pub mod summary;
pub mod vocabulary;

pub use cluster::{ClusterAssignment, ClusterEntry, ClusterGroup, ClusterId, ClusterSnapshot};
pub use layout::{LayoutPoint, VisualizationPayload};
pub use server::{DocumentMetrics, RawServer, ServerRecord};
pub use similarity::SimilarityResult;
pub use summary::{ClusterSummary, MemberRef};
pub use vocabulary::{VectorizerSnapshots, VocabularySnapshot};
