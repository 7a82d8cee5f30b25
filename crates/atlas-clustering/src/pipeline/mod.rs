//! Phased clustering over one union-find.
//!
//! Phase 0: Duplicate union + entity seeding → Phase 1: Title union →
//! Phase 2: Batched refinement

pub mod phase0_seeding;
pub mod phase1_title_union;
pub mod phase2_refinement;

use atlas_core::config::ClusteringConfig;
use atlas_core::errors::ClusteringError;
use atlas_core::models::{ClusterGroup, ClusterId, ServerRecord};
use tracing::info;

use crate::entity::extract_entity_name;
use crate::scoring::{PairScorer, RecordVectors};
use crate::union_find::UnionFind;

pub use phase2_refinement::RefinementOutcome;

/// Groups plus the refinement statistics that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseResult {
    pub groups: Vec<ClusterGroup>,
    pub refinement: RefinementOutcome,
}

/// Run phases 0-2 over `records` and return dense, index-ordered groups.
pub fn run_phases<F>(
    records: &[ServerRecord],
    vectors: &RecordVectors,
    scorer: &dyn PairScorer,
    config: &ClusteringConfig,
    on_batch: F,
) -> Result<PhaseResult, ClusteringError>
where
    F: FnMut(usize, usize),
{
    if vectors.len() != records.len() {
        return Err(ClusteringError::InvalidInput {
            reason: format!(
                "{} records but {} vectors",
                records.len(),
                vectors.len()
            ),
        });
    }
    let mut uf = UnionFind::new(records.len());

    let merges = phase0_seeding::union_exact_duplicates(records, &mut uf);
    info!(merges, "Phase 0: duplicate union complete");

    if config.entity_seeding {
        let merges = phase0_seeding::seed_entities(records, &mut uf);
        info!(merges, "Phase 0: entity seeding complete");
    }

    let merges =
        phase1_title_union::union_by_title(vectors, config.similarity_threshold, &mut uf);
    info!(merges, "Phase 1: title union complete");

    let refinement = phase2_refinement::refine_batches(scorer, config, &mut uf, on_batch)?;
    info!(
        batches = refinement.total_batches,
        pairs = refinement.pairs,
        merges = refinement.merges,
        failed = refinement.failed_batches.len(),
        "Phase 2: batched refinement complete"
    );

    Ok(PhaseResult {
        groups: groups_from(records, &mut uf),
        refinement,
    })
}

/// Number union-find sets densely, in order of their first member.
pub fn groups_from(records: &[ServerRecord], uf: &mut UnionFind) -> Vec<ClusterGroup> {
    uf.groups()
        .into_iter()
        .enumerate()
        .map(|(cluster_id, members)| ClusterGroup {
            cluster_id: cluster_id as ClusterId,
            entity_name: extract_entity_name(&records[members[0]].title).to_lowercase(),
            members: members.into_iter().map(|i| records[i].id.clone()).collect(),
        })
        .collect()
}
