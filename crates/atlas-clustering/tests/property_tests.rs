//! Property-based tests for the clustering invariants.

mod property;
