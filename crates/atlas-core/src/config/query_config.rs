use serde::{Deserialize, Serialize};

use super::defaults;

/// Similarity query configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Results returned when the caller does not specify a count.
    pub default_top_n: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_n: defaults::DEFAULT_TOP_N,
        }
    }
}
