use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Checkpoint storage layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Root directory for the ledger and intermediate blobs.
    pub data_dir: String,
    /// Ledger file name, relative to `data_dir`.
    pub progress_file: String,
    /// Blob directory name, relative to `data_dir`.
    pub intermediate_dir: String,
}

impl CheckpointConfig {
    /// Config rooted at `data_dir` with default file names.
    pub fn in_dir(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn progress_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.progress_file)
    }

    pub fn intermediate_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.intermediate_dir)
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::DEFAULT_DATA_DIR.to_string(),
            progress_file: defaults::DEFAULT_PROGRESS_FILE.to_string(),
            intermediate_dir: defaults::DEFAULT_INTERMEDIATE_DIR.to_string(),
        }
    }
}
