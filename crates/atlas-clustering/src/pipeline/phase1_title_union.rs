//! Phase 1: union every title pair at or above the threshold.

use crate::scoring::RecordVectors;
use crate::union_find::UnionFind;

/// Records with an empty title vector never take part. Returns the
/// number of merges performed.
pub fn union_by_title(vectors: &RecordVectors, threshold: f64, uf: &mut UnionFind) -> usize {
    let n = vectors.len();
    let mut merges = 0;
    for i in 0..n {
        if vectors.titles[i].is_empty() {
            continue;
        }
        for j in (i + 1)..n {
            if vectors.titles[j].is_empty() || uf.connected(i, j) {
                continue;
            }
            if vectors.title_similarity(i, j) >= threshold && uf.union(i, j) {
                merges += 1;
            }
        }
    }
    merges
}
