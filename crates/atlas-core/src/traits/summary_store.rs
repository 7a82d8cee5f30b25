use crate::errors::StoreError;
use crate::models::{ClusterId, ClusterSummary};

/// Document-store adapter for cluster summaries, keyed by cluster id.
pub trait ISummaryStore: Send + Sync {
    /// Insert or replace the summary stored under `summary.cluster_id`.
    fn upsert(&self, summary: &ClusterSummary) -> Result<(), StoreError>;

    /// All stored summaries, in ascending cluster id order.
    fn read_all(&self) -> Result<Vec<ClusterSummary>, StoreError>;

    /// Fetch one summary.
    fn get(&self, cluster_id: ClusterId) -> Result<Option<ClusterSummary>, StoreError> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|s| s.cluster_id == cluster_id))
    }

    /// Upsert every summary, stopping at the first failure.
    fn upsert_all(&self, summaries: &[ClusterSummary]) -> Result<usize, StoreError> {
        for summary in summaries {
            self.upsert(summary)?;
        }
        Ok(summaries.len())
    }
}
