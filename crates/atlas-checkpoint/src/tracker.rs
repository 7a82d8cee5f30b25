//! StageTracker: durable progress ledger + per-stage blob store.
//!
//! Every mutating call writes through to disk before returning. The read
//! path never fails: a missing or unreadable ledger reads as "nothing
//! completed", which is why `verify_cache_integrity` must gate any
//! non-empty ledger before its blobs are trusted.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use atlas_core::config::CheckpointConfig;
use atlas_core::errors::CheckpointError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::atomic::write_durable;
use crate::ledger::ProgressState;
use crate::output::StageOutput;
use crate::stage::Stage;

/// Outcome of [`StageTracker::verify_and_maybe_reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub intact: bool,
    /// First completed stage whose blob failed verification.
    pub failed_stage: Option<Stage>,
    pub reason: Option<String>,
    /// Whether the ledger and blobs were wiped.
    pub reset: bool,
}

pub struct StageTracker {
    progress_path: PathBuf,
    intermediate_dir: PathBuf,
    /// Serializes ledger read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl StageTracker {
    /// Open a tracker with the configured layout, creating directories.
    pub fn open(config: &CheckpointConfig) -> Result<Self, CheckpointError> {
        let intermediate_dir = config.intermediate_path();
        fs::create_dir_all(&intermediate_dir).map_err(|e| io_error(&intermediate_dir, e))?;
        Ok(Self {
            progress_path: config.progress_path(),
            intermediate_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Open a tracker rooted at `data_dir` with default file names.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        Self::open(&CheckpointConfig::in_dir(
            data_dir.as_ref().to_string_lossy().into_owned(),
        ))
    }

    pub fn progress_path(&self) -> &Path {
        &self.progress_path
    }

    pub fn blob_path(&self, stage: Stage) -> PathBuf {
        self.intermediate_dir.join(stage.blob_file_name())
    }

    /// Current ledger. Never fails; I/O and parse errors degrade to the
    /// initial state.
    pub fn get_progress(&self) -> ProgressState {
        match fs::read_to_string(&self.progress_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!(
                        path = %self.progress_path.display(),
                        error = %e,
                        "unparseable progress ledger, treating as empty"
                    );
                    ProgressState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ProgressState::default(),
            Err(e) => {
                warn!(
                    path = %self.progress_path.display(),
                    error = %e,
                    "unreadable progress ledger, treating as empty"
                );
                ProgressState::default()
            }
        }
    }

    pub fn is_stage_complete(&self, stage: Stage) -> bool {
        self.get_progress().is_complete(stage)
    }

    /// Record partial progress for an in-flight stage.
    /// No-op when the stage is already completed.
    pub fn update_progress(
        &self,
        stage: Stage,
        processed: u64,
        total: u64,
    ) -> Result<(), CheckpointError> {
        let _guard = self.lock();
        let mut progress = self.get_progress();
        if progress.is_complete(stage) {
            return Ok(());
        }
        progress.current_stage = Some(stage);
        progress.processed_count = processed;
        progress.total_count = total;
        progress.last_updated = Some(Utc::now());
        self.write_progress(&progress)?;
        debug!(stage = %stage, processed, total, "progress updated");
        Ok(())
    }

    /// Mark a stage completed and clear the in-flight marker. Idempotent.
    pub fn complete_stage(&self, stage: Stage) -> Result<(), CheckpointError> {
        let _guard = self.lock();
        let mut progress = self.get_progress();
        if progress.is_complete(stage) {
            return Ok(());
        }
        progress.completed_stages.push(stage);
        progress.current_stage = None;
        progress.last_updated = Some(Utc::now());
        self.write_progress(&progress)?;
        info!(stage = %stage, "stage completed");
        Ok(())
    }

    /// Durably persist a stage's output under its stage key.
    pub fn save_intermediate_result(&self, output: &StageOutput) -> Result<(), CheckpointError> {
        let stage = output.stage();
        let bytes =
            serde_json::to_vec_pretty(output).map_err(|e| CheckpointError::Serialization {
                stage: stage.to_string(),
                reason: e.to_string(),
            })?;
        let path = self.blob_path(stage);
        write_durable(&path, &bytes).map_err(|e| io_error(&path, e))?;
        debug!(stage = %stage, bytes = bytes.len(), "intermediate result saved");
        Ok(())
    }

    /// Load a stage's output. Absent when missing; unreadable or mistagged
    /// blobs are logged and also reported absent.
    pub fn load_intermediate_result(&self, stage: Stage) -> Option<StageOutput> {
        match self.read_blob(stage) {
            Ok(output) => output,
            Err(e) => {
                warn!(stage = %stage, error = %e, "discarding unreadable intermediate result");
                None
            }
        }
    }

    fn read_blob(&self, stage: Stage) -> Result<Option<StageOutput>, CheckpointError> {
        let path = self.blob_path(stage);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        let output: StageOutput =
            serde_json::from_str(&content).map_err(|e| CheckpointError::Corruption {
                stage: stage.to_string(),
                reason: e.to_string(),
            })?;
        if output.stage() != stage {
            return Err(CheckpointError::StageMismatch {
                requested: stage.to_string(),
                found: output.stage().to_string(),
            });
        }
        Ok(Some(output))
    }

    /// Check every completed stage's blob, stopping at the first failure.
    pub fn check_integrity(&self) -> Result<(), CheckpointError> {
        for stage in self.get_progress().completed_stages {
            match self.read_blob(stage)? {
                Some(_) => {}
                None => {
                    return Err(CheckpointError::Corruption {
                        stage: stage.to_string(),
                        reason: "stage marked complete but its result is missing".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// True when every completed stage has a readable, parseable blob.
    pub fn verify_cache_integrity(&self) -> bool {
        match self.check_integrity() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "checkpoint integrity check failed");
                false
            }
        }
    }

    /// Delete the ledger and every stage blob.
    pub fn reset_progress(&self) -> Result<(), CheckpointError> {
        let _guard = self.lock();
        match fs::remove_file(&self.progress_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&self.progress_path, e)),
        }
        let entries = match fs::read_dir(&self.intermediate_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_error(&self.intermediate_dir, e)),
        };
        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with("_result.json") || name.ends_with("_result.json.tmp") {
                fs::remove_file(&path).map_err(|e| io_error(&path, e))?;
                removed += 1;
            }
        }
        info!(removed, "checkpoint progress reset");
        Ok(())
    }

    /// Run the integrity gate and wipe all state when it fails.
    pub fn verify_and_maybe_reset(&self) -> Result<IntegrityReport, CheckpointError> {
        match self.check_integrity() {
            Ok(()) => Ok(IntegrityReport {
                intact: true,
                failed_stage: None,
                reason: None,
                reset: false,
            }),
            Err(e) => {
                let failed_stage = match &e {
                    CheckpointError::Corruption { stage, .. } => stage.parse().ok(),
                    CheckpointError::StageMismatch { requested, .. } => requested.parse().ok(),
                    _ => None,
                };
                warn!(error = %e, "checkpoint corrupt, resetting all progress");
                self.reset_progress()?;
                Ok(IntegrityReport {
                    intact: false,
                    failed_stage,
                    reason: Some(e.to_string()),
                    reset: true,
                })
            }
        }
    }

    fn write_progress(&self, progress: &ProgressState) -> Result<(), CheckpointError> {
        let bytes =
            serde_json::to_vec_pretty(progress).map_err(|e| CheckpointError::Serialization {
                stage: "ledger".to_string(),
                reason: e.to_string(),
            })?;
        write_durable(&self.progress_path, &bytes).map_err(|e| io_error(&self.progress_path, e))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock guards no data; recover the guard.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> CheckpointError {
    CheckpointError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::models::ClusterSnapshot;

    #[test]
    fn fresh_tracker_reports_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = StageTracker::in_dir(dir.path()).unwrap();
        assert!(tracker.get_progress().is_initial());
        assert!(tracker.verify_cache_integrity());
    }

    #[test]
    fn garbage_ledger_degrades_to_initial() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = StageTracker::in_dir(dir.path()).unwrap();
        fs::write(tracker.progress_path(), b"{not json").unwrap();
        assert!(tracker.get_progress().is_initial());
    }

    #[test]
    fn mistagged_blob_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = StageTracker::in_dir(dir.path()).unwrap();
        let blob =
            serde_json::to_vec(&StageOutput::Clustering(ClusterSnapshot::default())).unwrap();
        fs::write(tracker.blob_path(Stage::Visualization), blob).unwrap();
        assert!(tracker.load_intermediate_result(Stage::Visualization).is_none());
        assert!(matches!(
            tracker.read_blob(Stage::Visualization),
            Err(CheckpointError::StageMismatch { .. })
        ));
    }
}
