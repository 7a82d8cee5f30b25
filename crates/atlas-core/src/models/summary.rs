use serde::{Deserialize, Serialize};

use super::ClusterId;

/// Member reference inside a cluster summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: String,
    pub title: String,
}

/// Reportable metadata for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: ClusterId,
    /// Unique within a run.
    pub cluster_name: String,
    pub entity_name: String,
    pub size: usize,
    pub members: Vec<MemberRef>,
    pub avg_word_count: f64,
    pub avg_feature_count: f64,
    pub avg_tool_count: f64,
    pub common_tags: Vec<String>,
}
