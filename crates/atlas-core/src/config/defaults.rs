// Single source of truth for all default values.

// --- Clustering ---
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TITLE_WEIGHT: f64 = 0.6;
pub const DEFAULT_DESCRIPTION_WEIGHT: f64 = 0.4;
pub const DEFAULT_ENTITY_SEEDING: bool = true;

// --- Vectorizer ---
pub const DEFAULT_MAX_NGRAM: usize = 2;
pub const DEFAULT_DESCRIPTION_MAX_FEATURES: usize = 1_000;
pub const DEFAULT_NORMALIZATION_CACHE_SIZE: u64 = 1_000;

// --- Checkpoint ---
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PROGRESS_FILE: &str = "processing_progress.json";
pub const DEFAULT_INTERMEDIATE_DIR: &str = "intermediate";

// --- Query ---
pub const DEFAULT_TOP_N: usize = 3;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
