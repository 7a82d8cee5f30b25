//! Progress ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Persisted pipeline progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Stage currently in flight, if any.
    pub current_stage: Option<Stage>,
    /// Completed stages, in completion order.
    pub completed_stages: Vec<Stage>,
    pub processed_count: u64,
    pub total_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProgressState {
    pub fn is_complete(&self, stage: Stage) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// True when nothing has been recorded yet.
    pub fn is_initial(&self) -> bool {
        self.current_stage.is_none() && self.completed_stages.is_empty()
    }
}
