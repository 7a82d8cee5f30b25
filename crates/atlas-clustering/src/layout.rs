//! 2-D cluster layout for visualization.
//!
//! Each cluster sits on the x axis at `2 * cluster_id`; members are spread
//! around it by position, closer in the more central they are.

use std::collections::HashMap;
use std::f64::consts::TAU;

use atlas_core::models::{ClusterGroup, LayoutPoint, ServerRecord};
use atlas_text::SparseVector;

use crate::scoring::{RecordVectors, ScoreWeights};

/// Place every member of `groups`. `vectors` is index-aligned with `records`.
pub fn cluster_layout(
    records: &[ServerRecord],
    groups: &[ClusterGroup],
    vectors: &RecordVectors,
    weights: ScoreWeights,
) -> Vec<LayoutPoint> {
    let index: HashMap<&str, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.as_str(), i))
        .collect();

    let mut ordered: Vec<&ClusterGroup> = groups.iter().collect();
    ordered.sort_by_key(|g| g.cluster_id);

    let mut points = Vec::with_capacity(records.len());
    for group in ordered {
        let members: Vec<usize> = group
            .members
            .iter()
            .filter_map(|id| index.get(id.as_str()).copied())
            .filter(|&i| i < vectors.len())
            .collect();
        if members.is_empty() {
            continue;
        }
        let title_centroid = SparseVector::mean(members.iter().map(|&i| &vectors.titles[i]));
        let description_centroid =
            SparseVector::mean(members.iter().map(|&i| &vectors.descriptions[i]));
        let center_x = 2.0 * group.cluster_id as f64;

        for (k, &i) in members.iter().enumerate() {
            let distance = weights.title * vectors.titles[i].distance(&title_centroid)
                + weights.description * vectors.descriptions[i].distance(&description_centroid);
            let radius = 0.5 + 0.5 / (1.0 + distance);
            let angle = TAU * k as f64 / members.len() as f64;
            points.push(LayoutPoint {
                server_id: records[i].id.clone(),
                title: records[i].title.clone(),
                cluster_id: group.cluster_id,
                x: center_x + radius * angle.cos(),
                y: radius * angle.sin(),
            });
        }
    }
    points
}
