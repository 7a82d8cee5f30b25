//! Phase 2: batched combined-score refinement on a fixed worker pool.
//!
//! Workers only score pairs inside their own batch and send the qualifying
//! pairs back; the coordinating thread owns the union-find and applies
//! them in completion order.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use atlas_core::config::ClusteringConfig;
use atlas_core::errors::{AtlasErrorCode, ClusteringError};
use tracing::{debug, warn};

use crate::scoring::PairScorer;
use crate::union_find::UnionFind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefinementOutcome {
    pub total_batches: usize,
    /// Qualifying pairs reported by successful batches.
    pub pairs: usize,
    /// Pairs that joined two previously separate clusters.
    pub merges: usize,
    /// Indices of batches whose results were discarded, ascending.
    pub failed_batches: Vec<usize>,
}

/// Consecutive index ranges of at most `batch_size` records.
pub fn batch_ranges(n: usize, batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    (0..n)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(n))
        .collect()
}

/// Score every pair within `range`, keeping those at or above `threshold`.
pub fn score_batch(
    scorer: &dyn PairScorer,
    range: Range<usize>,
    threshold: f64,
) -> Result<Vec<(usize, usize)>, ClusteringError> {
    let mut pairs = Vec::new();
    for i in range.clone() {
        for j in (i + 1)..range.end {
            if scorer.score(i, j)? >= threshold {
                pairs.push((i, j));
            }
        }
    }
    Ok(pairs)
}

/// Run all batches and merge their pairs into `uf`.
///
/// `on_batch(completed, total)` is called on the coordinating thread after
/// each batch finishes, failed or not.
pub fn refine_batches<F>(
    scorer: &dyn PairScorer,
    config: &ClusteringConfig,
    uf: &mut UnionFind,
    mut on_batch: F,
) -> Result<RefinementOutcome, ClusteringError>
where
    F: FnMut(usize, usize),
{
    let ranges = batch_ranges(uf.len(), config.batch_size);
    let mut outcome = RefinementOutcome {
        total_batches: ranges.len(),
        ..Default::default()
    };
    if ranges.is_empty() {
        return Ok(outcome);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .thread_name(|i| format!("atlas-refine-{i}"))
        .build()
        .map_err(|e| ClusteringError::WorkerPool {
            reason: e.to_string(),
        })?;
    let threshold = config.similarity_threshold;
    let (tx, rx) = mpsc::channel::<(usize, Result<Vec<(usize, usize)>, ClusteringError>)>();

    pool.in_place_scope(|scope| {
        for (batch, range) in ranges.iter().cloned().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    score_batch(scorer, range, threshold)
                }))
                .unwrap_or_else(|payload| {
                    Err(ClusteringError::BatchFailed {
                        batch,
                        reason: format!("worker panicked: {}", panic_message(payload.as_ref())),
                    })
                });
                // The receiver outlives the scope; a send error means nothing is listening.
                let _ = tx.send((batch, result));
            });
        }
        drop(tx);

        let mut completed = 0;
        for (batch, result) in rx {
            completed += 1;
            match result {
                Ok(pairs) => {
                    outcome.pairs += pairs.len();
                    for (a, b) in pairs {
                        if uf.union(a, b) {
                            outcome.merges += 1;
                        }
                    }
                    debug!(batch, completed, "batch refined");
                }
                Err(e) => {
                    let e = match e {
                        e @ ClusteringError::BatchFailed { .. } => e,
                        other => ClusteringError::BatchFailed {
                            batch,
                            reason: other.to_string(),
                        },
                    };
                    warn!(
                        batch,
                        code = e.error_code(),
                        error = %e,
                        "batch refinement failed, skipping"
                    );
                    outcome.failed_batches.push(batch);
                }
            }
            on_batch(completed, outcome.total_batches);
        }
    });

    outcome.failed_batches.sort_unstable();
    Ok(outcome)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
