//! # atlas-text
//!
//! Turns free text into comparable vectors: normalization (memoized),
//! stop-word filtered n-gram tokenization, and a TF-IDF vectorizer whose
//! fitted state can be exported and restored without refitting.

pub mod normalize;
pub mod sparse;
pub mod stop_words;
pub mod tokenizer;
pub mod vectorizer;

pub use normalize::{normalize_text, TextNormalizer};
pub use sparse::SparseVector;
pub use tokenizer::tokenize;
pub use vectorizer::{TfidfVectorizer, Vocabulary, DESCRIPTION_CORPUS, TITLE_CORPUS};
