//! Sparse vectors over a fitted vocabulary.

/// Index-sorted `(column, weight)` pairs; zero weights are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from arbitrary pairs. Duplicate columns are summed, zeros dropped.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|(idx, _)| *idx);
        let mut entries: Vec<(usize, f64)> = Vec::with_capacity(pairs.len());
        for (idx, weight) in pairs {
            match entries.last_mut() {
                Some((last, acc)) if *last == idx => *acc += weight,
                _ => entries.push((idx, weight)),
            }
        }
        entries.retain(|(_, w)| *w != 0.0);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> f64 {
        self.entries
            .binary_search_by_key(&idx, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }

    /// Scale to unit length. Zero vectors are left untouched.
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > f64::EPSILON {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }

    /// Cosine similarity in [0, 1]. Zero vectors score 0; equal non-zero
    /// vectors score exactly 1.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom < f64::EPSILON {
            0.0
        } else if self.entries == other.entries {
            1.0
        } else {
            (self.dot(other) / denom).clamp(0.0, 1.0)
        }
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &SparseVector) -> f64 {
        let sq = self.norm().powi(2) + other.norm().powi(2) - 2.0 * self.dot(other);
        sq.max(0.0).sqrt()
    }

    /// Component-wise mean. Empty input gives the zero vector.
    pub fn mean<'a>(vectors: impl IntoIterator<Item = &'a SparseVector>) -> SparseVector {
        let mut pairs = Vec::new();
        let mut count = 0usize;
        for v in vectors {
            pairs.extend_from_slice(&v.entries);
            count += 1;
        }
        if count == 0 {
            return SparseVector::default();
        }
        let mut mean = SparseVector::from_pairs(pairs);
        for (_, w) in &mut mean.entries {
            *w /= count as f64;
        }
        mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(pairs: &[(usize, f64)]) -> SparseVector {
        SparseVector::from_pairs(pairs.to_vec())
    }

    #[test]
    fn identical_vectors_have_similarity_one() {
        let a = v(&[(0, 1.0), (3, 2.0)]);
        assert_eq!(a.cosine(&a.clone()), 1.0);
    }

    #[test]
    fn disjoint_vectors_have_similarity_zero() {
        assert_eq!(v(&[(0, 1.0)]).cosine(&v(&[(1, 1.0)])), 0.0);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(SparseVector::default().cosine(&v(&[(1, 1.0)])), 0.0);
    }

    #[test]
    fn from_pairs_sorts_and_merges() {
        let a = v(&[(5, 1.0), (2, 1.0), (5, 2.0), (7, 0.0)]);
        assert_eq!(a.entries(), &[(2, 1.0), (5, 3.0)]);
        assert_eq!(a.get(5), 3.0);
        assert_eq!(a.get(4), 0.0);
    }

    #[test]
    fn normalized_has_unit_norm() {
        let a = v(&[(0, 3.0), (1, 4.0)]).l2_normalized();
        assert!((a.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_and_mean() {
        let a = v(&[(0, 1.0)]);
        let b = v(&[(1, 1.0)]);
        assert!((a.distance(&b) - 2f64.sqrt()).abs() < 1e-12);
        let m = SparseVector::mean([&a, &b]);
        assert_eq!(m.entries(), &[(0, 0.5), (1, 0.5)]);
        assert!(SparseVector::mean(std::iter::empty()).is_empty());
    }
}
