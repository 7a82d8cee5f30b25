//! Collaborator interfaces consumed by the core.

pub mod summary_store;

pub use summary_store::ISummaryStore;
