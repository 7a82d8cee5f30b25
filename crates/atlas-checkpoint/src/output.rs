//! Typed per-stage payloads.

use atlas_core::models::{
    ClusterSnapshot, RawServer, ServerRecord, VectorizerSnapshots, VisualizationPayload,
};
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Output of one stage, one schema per stage.
///
/// Serialized as `{"stage": "<name>", "payload": ...}` so a blob can be
/// checked against the stage it was loaded for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "payload", rename_all = "snake_case")]
pub enum StageOutput {
    DataLoading(Vec<RawServer>),
    BasicProcessing(Vec<ServerRecord>),
    MetricsCalculation(Vec<ServerRecord>),
    Vectorizers(Box<VectorizerSnapshots>),
    Clustering(ClusterSnapshot),
    Visualization(VisualizationPayload),
}

impl StageOutput {
    pub fn stage(&self) -> Stage {
        match self {
            Self::DataLoading(_) => Stage::DataLoading,
            Self::BasicProcessing(_) => Stage::BasicProcessing,
            Self::MetricsCalculation(_) => Stage::MetricsCalculation,
            Self::Vectorizers(_) => Stage::Vectorizers,
            Self::Clustering(_) => Stage::Clustering,
            Self::Visualization(_) => Stage::Visualization,
        }
    }

    pub fn into_raw_servers(self) -> Option<Vec<RawServer>> {
        match self {
            Self::DataLoading(v) => Some(v),
            _ => None,
        }
    }

    /// Records from either record-bearing stage.
    pub fn into_records(self) -> Option<Vec<ServerRecord>> {
        match self {
            Self::BasicProcessing(v) | Self::MetricsCalculation(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_vectorizers(self) -> Option<VectorizerSnapshots> {
        match self {
            Self::Vectorizers(v) => Some(*v),
            _ => None,
        }
    }

    pub fn into_cluster_snapshot(self) -> Option<ClusterSnapshot> {
        match self {
            Self::Clustering(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_visualization(self) -> Option<VisualizationPayload> {
        match self {
            Self::Visualization(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_stage_name() {
        let output = StageOutput::Clustering(ClusterSnapshot::default());
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["stage"], Stage::Clustering.as_str());
        assert!(json["payload"]["clusters"].is_object());
    }

    #[test]
    fn accessors_reject_other_stages() {
        let output = StageOutput::DataLoading(vec![]);
        assert_eq!(output.stage(), Stage::DataLoading);
        assert!(output.clone().into_cluster_snapshot().is_none());
        assert_eq!(output.into_raw_servers(), Some(vec![]));
    }
}
