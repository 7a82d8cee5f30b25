//! TF-IDF vectorizer with exportable fitted state.
//!
//! Smooth IDF `ln((1 + n) / (1 + df)) + 1`, raw term counts, L2-normalized
//! rows. Column indices follow lexicographic term order so a fit over the
//! same corpus always yields the same vocabulary.

use std::collections::{BTreeMap, HashMap, HashSet};

use atlas_core::config::VectorizerConfig;
use atlas_core::errors::VectorizationError;
use atlas_core::models::VocabularySnapshot;
use tracing::{debug, info};

use crate::normalize::TextNormalizer;
use crate::sparse::SparseVector;
use crate::tokenizer::tokenize;

pub const TITLE_CORPUS: &str = "title";
pub const DESCRIPTION_CORPUS: &str = "description";

/// Fitted term -> column mapping with per-column IDF weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get(term).copied()
    }

    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

struct Fitted {
    vocabulary: Vocabulary,
    documents: usize,
    fingerprint: String,
}

pub struct TfidfVectorizer {
    corpus: String,
    max_ngram: usize,
    max_features: Option<usize>,
    normalizer: TextNormalizer,
    fitted: Option<Fitted>,
}

impl TfidfVectorizer {
    pub fn new(corpus: impl Into<String>, config: &VectorizerConfig) -> Self {
        Self {
            corpus: corpus.into(),
            max_ngram: config.max_ngram.max(1),
            max_features: None,
            normalizer: TextNormalizer::new(config.normalization_cache_size),
            fitted: None,
        }
    }

    /// Unbounded vectorizer for the title corpus.
    pub fn for_titles(config: &VectorizerConfig) -> Self {
        Self::new(TITLE_CORPUS, config)
    }

    /// Vectorizer for the description corpus, capped at
    /// `description_max_features` terms.
    pub fn for_descriptions(config: &VectorizerConfig) -> Self {
        Self::new(DESCRIPTION_CORPUS, config)
            .with_max_features(Some(config.description_max_features))
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fingerprint of the corpus the current state was fitted on.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fitted.as_ref().map(|f| f.fingerprint.as_str())
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.fitted.as_ref().map(|f| &f.vocabulary)
    }

    /// Fit over `documents`. An empty corpus, or one with no usable
    /// tokens, yields an empty vocabulary.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> &Vocabulary {
        let normalized: Vec<String> = documents
            .iter()
            .map(|d| self.normalizer.normalize(d.as_ref()))
            .collect();
        let fingerprint = fingerprint_normalized(&normalized);

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_freq: HashMap<String, usize> = HashMap::new();
        for doc in &normalized {
            let tokens = tokenize(doc, self.max_ngram);
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                *total_freq.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut kept: Vec<String> = doc_freq.keys().cloned().collect();
        if let Some(limit) = self.max_features {
            if kept.len() > limit {
                kept.sort_by(|a, b| {
                    total_freq[b]
                        .cmp(&total_freq[a])
                        .then_with(|| a.cmp(b))
                });
                kept.truncate(limit);
            }
        }
        kept.sort();

        let n = normalized.len() as f64;
        let mut terms = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (index, term) in kept.into_iter().enumerate() {
            let df = doc_freq[&term] as f64;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            terms.insert(term, index);
        }

        info!(
            corpus = %self.corpus,
            documents = normalized.len(),
            terms = terms.len(),
            "vectorizer fitted"
        );
        let fitted = self.fitted.insert(Fitted {
            vocabulary: Vocabulary { terms, idf },
            documents: normalized.len(),
            fingerprint,
        });
        &fitted.vocabulary
    }

    /// Like [`fit`](Self::fit), but an empty vocabulary is an error.
    pub fn fit_checked<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<&Vocabulary, VectorizationError> {
        let count = documents.len();
        if self.fit(documents).is_empty() {
            return Err(VectorizationError::EmptyVocabulary {
                corpus: self.corpus.clone(),
                documents: count,
            });
        }
        self.vocabulary().ok_or_else(|| VectorizationError::NotFitted {
            corpus: self.corpus.clone(),
        })
    }

    /// Project `text` into the fitted space. Unknown terms contribute nothing.
    pub fn transform(&self, text: &str) -> Result<SparseVector, VectorizationError> {
        let fitted = self.fitted.as_ref().ok_or_else(|| VectorizationError::NotFitted {
            corpus: self.corpus.clone(),
        })?;
        let vocabulary = &fitted.vocabulary;
        let normalized = self.normalizer.normalize(text);
        let pairs: Vec<(usize, f64)> = tokenize(&normalized, self.max_ngram)
            .iter()
            .filter_map(|token| {
                let index = vocabulary.index_of(token)?;
                Some((index, vocabulary.idf[index]))
            })
            .collect();
        Ok(SparseVector::from_pairs(pairs).l2_normalized())
    }

    pub fn transform_many<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<Vec<SparseVector>, VectorizationError> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    /// Fingerprint `documents` the way [`fit`](Self::fit) would.
    pub fn corpus_fingerprint<S: AsRef<str>>(&self, documents: &[S]) -> String {
        let normalized: Vec<String> = documents
            .iter()
            .map(|d| self.normalizer.normalize(d.as_ref()))
            .collect();
        fingerprint_normalized(&normalized)
    }

    pub fn export_snapshot(&self) -> Result<VocabularySnapshot, VectorizationError> {
        let fitted = self.fitted.as_ref().ok_or_else(|| VectorizationError::NotFitted {
            corpus: self.corpus.clone(),
        })?;
        Ok(VocabularySnapshot {
            corpus: self.corpus.clone(),
            vocabulary: fitted.vocabulary.terms.clone(),
            idf: fitted.vocabulary.idf.clone(),
            max_ngram: self.max_ngram,
            max_features: self.max_features,
            documents: fitted.documents,
            fingerprint: fitted.fingerprint.clone(),
        })
    }

    /// Adopt a previously exported state. When `expected_fingerprint` is
    /// given, the snapshot must have been fitted on that corpus.
    pub fn restore_snapshot(
        &mut self,
        snapshot: VocabularySnapshot,
        expected_fingerprint: Option<&str>,
    ) -> Result<(), VectorizationError> {
        if snapshot.corpus != self.corpus {
            return Err(malformed(format!(
                "snapshot is for corpus {}, vectorizer is {}",
                snapshot.corpus, self.corpus
            )));
        }
        if let Some(expected) = expected_fingerprint {
            if expected != snapshot.fingerprint {
                return Err(VectorizationError::SnapshotMismatch {
                    expected: expected.to_string(),
                    actual: snapshot.fingerprint,
                });
            }
        }
        if snapshot.max_ngram == 0 {
            return Err(malformed("max_ngram must be at least 1".to_string()));
        }
        if snapshot.idf.len() != snapshot.vocabulary.len() {
            return Err(malformed(format!(
                "{} terms but {} idf weights",
                snapshot.vocabulary.len(),
                snapshot.idf.len()
            )));
        }
        let mut used = vec![false; snapshot.idf.len()];
        for (term, &index) in &snapshot.vocabulary {
            match used.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(malformed(format!("bad column {index} for term {term:?}"))),
            }
        }
        if snapshot.idf.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(malformed("idf weights must be finite and positive".to_string()));
        }

        self.max_ngram = snapshot.max_ngram;
        self.max_features = snapshot.max_features;
        self.normalizer.clear();
        debug!(corpus = %self.corpus, terms = snapshot.vocabulary.len(), "vectorizer restored");
        self.fitted = Some(Fitted {
            vocabulary: Vocabulary {
                terms: snapshot.vocabulary,
                idf: snapshot.idf,
            },
            documents: snapshot.documents,
            fingerprint: snapshot.fingerprint,
        });
        Ok(())
    }
}

fn fingerprint_normalized(documents: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(documents.len() as u64).to_le_bytes());
    for doc in documents {
        hasher.update(doc.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}

fn malformed(reason: String) -> VectorizationError {
    VectorizationError::MalformedSnapshot { reason }
}
