//! Top-level Atlas configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    CheckpointConfig, ClusteringConfig, ObservabilityConfig, QueryConfig, VectorizerConfig,
};
use crate::errors::ConfigError;

/// Environment variables consulted by [`AtlasConfig::apply_env_overrides`].
pub const ENV_SIMILARITY_THRESHOLD: &str = "ATLAS_SIMILARITY_THRESHOLD";
pub const ENV_BATCH_SIZE: &str = "ATLAS_BATCH_SIZE";
pub const ENV_WORKERS: &str = "ATLAS_WORKERS";
pub const ENV_DATA_DIR: &str = "ATLAS_DATA_DIR";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ATLAS_*`)
/// 2. TOML config file
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AtlasConfig {
    pub clustering: ClusteringConfig,
    pub vectorizer: VectorizerConfig,
    pub checkpoint: CheckpointConfig,
    pub query: QueryConfig,
    pub observability: ObservabilityConfig,
}

impl AtlasConfig {
    /// Load configuration from an optional TOML file, then apply `ATLAS_*`
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file without env overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    /// Values that fail to parse are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_SIMILARITY_THRESHOLD).and_then(|v| v.parse().ok()) {
            self.clustering.similarity_threshold = v;
        }
        if let Some(v) = lookup(ENV_BATCH_SIZE).and_then(|v| v.parse().ok()) {
            self.clustering.batch_size = v;
        }
        if let Some(v) = lookup(ENV_WORKERS).and_then(|v| v.parse().ok()) {
            self.clustering.workers = v;
        }
        if let Some(v) = lookup(ENV_DATA_DIR) {
            if !v.trim().is_empty() {
                self.checkpoint.data_dir = v;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.clustering;
        if !(0.0..=1.0).contains(&c.similarity_threshold) {
            return Err(invalid(
                "clustering.similarity_threshold",
                "must be between 0.0 and 1.0",
            ));
        }
        if c.batch_size == 0 {
            return Err(invalid("clustering.batch_size", "must be greater than 0"));
        }
        if c.workers == 0 {
            return Err(invalid("clustering.workers", "must be greater than 0"));
        }
        if c.title_weight < 0.0 || c.description_weight < 0.0 {
            return Err(invalid("clustering.title_weight", "weights must be non-negative"));
        }
        if c.title_weight + c.description_weight <= 0.0 {
            return Err(invalid(
                "clustering.description_weight",
                "weights must not both be zero",
            ));
        }
        if self.vectorizer.max_ngram == 0 {
            return Err(invalid("vectorizer.max_ngram", "must be at least 1"));
        }
        if self.vectorizer.description_max_features == 0 {
            return Err(invalid(
                "vectorizer.description_max_features",
                "must be greater than 0",
            ));
        }
        if self.checkpoint.data_dir.trim().is_empty() {
            return Err(invalid("checkpoint.data_dir", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
