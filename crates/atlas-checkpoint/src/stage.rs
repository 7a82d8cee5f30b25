//! Pipeline stage names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named, independently cacheable pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DataLoading,
    BasicProcessing,
    MetricsCalculation,
    Vectorizers,
    Clustering,
    Visualization,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 6] = [
        Stage::DataLoading,
        Stage::BasicProcessing,
        Stage::MetricsCalculation,
        Stage::Vectorizers,
        Stage::Clustering,
        Stage::Visualization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataLoading => "data_loading",
            Self::BasicProcessing => "basic_processing",
            Self::MetricsCalculation => "metrics_calculation",
            Self::Vectorizers => "vectorizers",
            Self::Clustering => "clustering",
            Self::Visualization => "visualization",
        }
    }

    /// File name of the stage's intermediate blob.
    pub fn blob_file_name(&self) -> String {
        format!("{}_result.json", self.as_str())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("feature_extraction".parse::<Stage>().is_err());
    }

    #[test]
    fn blob_names_follow_stage() {
        assert_eq!(Stage::Clustering.blob_file_name(), "clustering_result.json");
    }
}
