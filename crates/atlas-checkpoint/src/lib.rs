//! # atlas-checkpoint
//!
//! Single source of truth for what the pipeline has already computed.
//! A JSON progress ledger plus one durable blob per completed stage,
//! with an integrity gate that forces a full reset on corruption.

mod atomic;
pub mod ledger;
pub mod output;
pub mod stage;
pub mod tracker;

pub use ledger::ProgressState;
pub use output::StageOutput;
pub use stage::Stage;
pub use tracker::{IntegrityReport, StageTracker};
