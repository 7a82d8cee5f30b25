use serde::{Deserialize, Serialize};

use super::ClusterId;

/// A catalog entry as it appears in the ingested JSON, before validation.
/// Every field is optional on the wire; missing values deserialize empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawServer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub github_url: Option<String>,
    pub page_url: Option<String>,
    pub content: String,
    pub detailed_content: String,
}

/// Documentation metrics derived from a record's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetrics {
    pub word_count: usize,
    pub documentation_length: usize,
    pub feature_count: usize,
    pub tool_count: usize,
    pub has_github: bool,
    pub has_faq: bool,
    /// Normalized numeric features, in the order above.
    pub feature_vector: Vec<f64>,
}

/// A validated catalog entry.
///
/// `id`, `title`, `description` and `tags` are fixed at ingestion.
/// `cluster_id` is written by the clustering engine, once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub detailed_content: String,
    #[serde(default)]
    pub metrics: DocumentMetrics,
    #[serde(default)]
    pub cluster_id: Option<ClusterId>,
}

impl ServerRecord {
    /// Build a record from its identity fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            tags,
            ..Default::default()
        }
    }

    /// Builder-style metrics setter.
    pub fn with_metrics(mut self, metrics: DocumentMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}
