//! Top-N similar servers for a target record.

use std::cmp::Ordering;
use std::collections::HashMap;

use atlas_core::errors::{QueryError, VectorizationError};
use atlas_core::models::{ClusterId, ServerRecord, SimilarityResult};
use atlas_text::TfidfVectorizer;

use crate::scoring::{RecordVectors, ScoreWeights};

struct Entry {
    server_id: String,
    title: String,
    cluster_id: Option<ClusterId>,
}

/// Read-only index over clustered records and their vectors.
pub struct SimilarityIndex {
    entries: Vec<Entry>,
    position: HashMap<String, usize>,
    vectors: RecordVectors,
    weights: ScoreWeights,
}

impl SimilarityIndex {
    pub fn build(
        records: &[ServerRecord],
        title: &TfidfVectorizer,
        description: &TfidfVectorizer,
        weights: ScoreWeights,
    ) -> Result<Self, VectorizationError> {
        let vectors = RecordVectors::build(records, title, description)?;
        let entries: Vec<Entry> = records
            .iter()
            .map(|r| Entry {
                server_id: r.id.clone(),
                title: r.title.clone(),
                cluster_id: r.cluster_id,
            })
            .collect();
        let mut position = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            position.entry(entry.server_id.clone()).or_insert(i);
        }
        Ok(Self {
            entries,
            position,
            vectors,
            weights,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `n` neighbors of `server_id`, best first.
    ///
    /// Other members of the target's cluster are ranked when there are any;
    /// a singleton falls back to every other record, flagged as
    /// cross-cluster. Equal scores keep input order.
    pub fn get_similar(
        &self,
        server_id: &str,
        n: usize,
    ) -> Result<Vec<SimilarityResult>, QueryError> {
        let &target = self
            .position
            .get(server_id)
            .ok_or_else(|| QueryError::RecordNotFound {
                server_id: server_id.to_string(),
            })?;
        let cluster_id = self.entries[target].cluster_id.ok_or_else(|| {
            QueryError::NotClustered {
                server_id: server_id.to_string(),
            }
        })?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let mates: Vec<usize> = (0..self.entries.len())
            .filter(|&i| i != target && self.entries[i].cluster_id == Some(cluster_id))
            .collect();
        let (candidates, same_cluster) = if mates.is_empty() {
            ((0..self.entries.len()).filter(|&i| i != target).collect(), false)
        } else {
            (mates, true)
        };

        let mut scored: Vec<(usize, f64)> = candidates
            .into_iter()
            .map(|i| (i, self.vectors.combined_similarity(target, i, self.weights)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(n);

        Ok(scored
            .into_iter()
            .map(|(i, score)| SimilarityResult {
                server_id: self.entries[i].server_id.clone(),
                title: self.entries[i].title.clone(),
                similarity_score: score,
                same_cluster,
            })
            .collect())
    }
}
