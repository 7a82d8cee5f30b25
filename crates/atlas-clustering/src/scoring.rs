//! Pairwise record similarity.

use atlas_core::config::ClusteringConfig;
use atlas_core::errors::{ClusteringError, VectorizationError};
use atlas_core::models::ServerRecord;
use atlas_text::{SparseVector, TfidfVectorizer};

/// Weights of the combined title/description score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub title: f64,
    pub description: f64,
}

impl ScoreWeights {
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            title: config.title_weight,
            description: config.description_weight,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::from_config(&ClusteringConfig::default())
    }
}

/// Title and description vectors for a record slice, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct RecordVectors {
    pub titles: Vec<SparseVector>,
    pub descriptions: Vec<SparseVector>,
}

impl RecordVectors {
    pub fn build(
        records: &[ServerRecord],
        title: &TfidfVectorizer,
        description: &TfidfVectorizer,
    ) -> Result<Self, VectorizationError> {
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        let descriptions: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();
        Ok(Self {
            titles: title.transform_many(&titles)?,
            descriptions: description.transform_many(&descriptions)?,
        })
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn title_similarity(&self, i: usize, j: usize) -> f64 {
        self.titles[i].cosine(&self.titles[j])
    }

    /// Weighted title/description cosine, clamped to [0, 1].
    pub fn combined_similarity(&self, i: usize, j: usize, weights: ScoreWeights) -> f64 {
        let title = self.titles[i].cosine(&self.titles[j]);
        let description = self.descriptions[i].cosine(&self.descriptions[j]);
        (weights.title * title + weights.description * description).clamp(0.0, 1.0)
    }
}

/// Scores a pair of record indices for Phase 2 refinement.
pub trait PairScorer: Send + Sync {
    fn score(&self, i: usize, j: usize) -> Result<f64, ClusteringError>;
}

/// Combined TF-IDF cosine over precomputed vectors.
pub struct TfidfPairScorer<'a> {
    vectors: &'a RecordVectors,
    weights: ScoreWeights,
}

impl<'a> TfidfPairScorer<'a> {
    pub fn new(vectors: &'a RecordVectors, weights: ScoreWeights) -> Self {
        Self { vectors, weights }
    }
}

impl PairScorer for TfidfPairScorer<'_> {
    fn score(&self, i: usize, j: usize) -> Result<f64, ClusteringError> {
        let n = self.vectors.len();
        if i >= n || j >= n {
            return Err(ClusteringError::InvalidInput {
                reason: format!("pair ({i}, {j}) out of range for {n} records"),
            });
        }
        Ok(self.vectors.combined_similarity(i, j, self.weights))
    }
}
