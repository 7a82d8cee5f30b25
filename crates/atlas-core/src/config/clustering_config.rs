use serde::{Deserialize, Serialize};

use super::defaults;

/// Clustering engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum similarity for two records to share a cluster.
    pub similarity_threshold: f64,
    /// Records per refinement batch.
    pub batch_size: usize,
    /// Worker threads for batch refinement.
    pub workers: usize,
    /// Weight of title cosine in the combined score.
    pub title_weight: f64,
    /// Weight of description cosine in the combined score.
    pub description_weight: f64,
    /// Union records sharing a suffix-stripped entity head before phase 1.
    pub entity_seeding: bool,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            workers: defaults::DEFAULT_WORKERS,
            title_weight: defaults::DEFAULT_TITLE_WEIGHT,
            description_weight: defaults::DEFAULT_DESCRIPTION_WEIGHT,
            entity_seeding: defaults::DEFAULT_ENTITY_SEEDING,
        }
    }
}
