//! In-memory summary store.

use atlas_core::errors::StoreError;
use atlas_core::models::{ClusterId, ClusterSummary};
use atlas_core::traits::ISummaryStore;
use dashmap::DashMap;

/// Concurrent map keyed by cluster id.
#[derive(Debug, Default)]
pub struct MemorySummaryStore {
    summaries: DashMap<ClusterId, ClusterSummary>,
}

impl MemorySummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

impl ISummaryStore for MemorySummaryStore {
    fn upsert(&self, summary: &ClusterSummary) -> Result<(), StoreError> {
        self.summaries.insert(summary.cluster_id, summary.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<ClusterSummary>, StoreError> {
        let mut all: Vec<ClusterSummary> =
            self.summaries.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by_key(|s| s.cluster_id);
        Ok(all)
    }

    fn get(&self, cluster_id: ClusterId) -> Result<Option<ClusterSummary>, StoreError> {
        Ok(self.summaries.get(&cluster_id).map(|entry| entry.value().clone()))
    }
}
