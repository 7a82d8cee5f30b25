use std::collections::HashSet;

use atlas_clustering::pipeline::phase2_refinement::refine_batches;
use atlas_clustering::{ClusteringEngine, PairScorer, UnionFind};
use atlas_core::config::{ClusteringConfig, VectorizerConfig};
use atlas_core::errors::ClusteringError;
use atlas_core::models::{ClusterSnapshot, ServerRecord};
use proptest::prelude::*;

struct EdgeScorer {
    edges: HashSet<(usize, usize)>,
}

impl PairScorer for EdgeScorer {
    fn score(&self, i: usize, j: usize) -> Result<f64, ClusteringError> {
        Ok(if self.edges.contains(&(i.min(j), i.max(j))) { 1.0 } else { 0.0 })
    }
}

/// Components of the graph restricted to same-batch edges, by naive relabeling.
fn expected_components(n: usize, edges: &HashSet<(usize, usize)>, batch: usize) -> Vec<usize> {
    let mut label: Vec<usize> = (0..n).collect();
    let same_batch: Vec<&(usize, usize)> =
        edges.iter().filter(|(a, b)| a / batch == b / batch).collect();
    loop {
        let mut changed = false;
        for &&(a, b) in &same_batch {
            let low = label[a].min(label[b]);
            if label[a] != low || label[b] != low {
                label[a] = low;
                label[b] = low;
                changed = true;
            }
        }
        if !changed {
            return label;
        }
    }
}

const WORDS: &[&str] = &[
    "github", "slack", "weather", "crypto", "postgres", "notion", "calendar", "server", "api",
    "tools", "forecast", "trading",
];

fn record_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (
        prop::collection::vec(0..WORDS.len(), 1..4),
        prop::collection::vec(0..WORDS.len(), 0..5),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn refinement_matches_same_batch_components(
        n in 1usize..30,
        raw_edges in prop::collection::vec((0usize..30, 0usize..30), 0..40),
        batch in 1usize..8,
        workers in 1usize..5,
    ) {
        let edges: HashSet<(usize, usize)> = raw_edges
            .into_iter()
            .filter(|(a, b)| a != b && *a < n && *b < n)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        let scorer = EdgeScorer { edges: edges.clone() };
        let config = ClusteringConfig { batch_size: batch, workers, ..Default::default() };
        let mut uf = UnionFind::new(n);
        let outcome = refine_batches(&scorer, &config, &mut uf, |_, _| {}).unwrap();
        prop_assert!(outcome.failed_batches.is_empty());

        let labels = expected_components(n, &edges, batch);
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(uf.connected(i, j), labels[i] == labels[j]);
            }
        }
    }

    #[test]
    fn every_record_lands_in_exactly_one_group(
        shapes in prop::collection::vec(record_strategy(), 1..25),
        threshold in 0.3f64..1.0,
        batch in 1usize..10,
    ) {
        let mut records: Vec<ServerRecord> = shapes
            .iter()
            .enumerate()
            .map(|(i, (title, desc))| {
                let title: Vec<&str> = title.iter().map(|&w| WORDS[w]).collect();
                let desc: Vec<&str> = desc.iter().map(|&w| WORDS[w]).collect();
                ServerRecord::new(format!("r{i}"), title.join(" "), desc.join(" "), vec![])
            })
            .collect();
        let config = ClusteringConfig {
            similarity_threshold: threshold,
            batch_size: batch,
            workers: 3,
            ..Default::default()
        };
        let outcome = ClusteringEngine::new(config, VectorizerConfig::default())
            .cluster(&mut records)
            .unwrap();

        let snapshot = ClusterSnapshot::from_groups(&outcome.groups);
        prop_assert!(snapshot.is_partition_of(records.iter().map(|r| r.id.as_str())));
        for record in &records {
            prop_assert_eq!(record.cluster_id, outcome.assignment.get(&record.id));
        }
    }
}
