use serde::{Deserialize, Serialize};

/// One neighbor returned by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub server_id: String,
    pub title: String,
    /// Combined title/description cosine, in [0, 1].
    pub similarity_score: f64,
    /// False when the result came from the global fallback scan.
    pub same_cluster: bool,
}
