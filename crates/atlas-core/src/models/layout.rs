use serde::{Deserialize, Serialize};

use super::{ClusterId, ClusterSummary};

/// 2-D placement of one record for cluster visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub server_id: String,
    pub title: String,
    pub cluster_id: ClusterId,
    pub x: f64,
    pub y: f64,
}

/// Precomputed payload persisted by the visualization stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationPayload {
    pub points: Vec<LayoutPoint>,
    pub summaries: Vec<ClusterSummary>,
}
