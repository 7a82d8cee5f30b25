//! Per-cluster reportable metadata.

use std::collections::{BTreeSet, HashMap, HashSet};

use atlas_core::models::{ClusterGroup, ClusterSummary, MemberRef, ServerRecord};
use tracing::warn;

use crate::entity::extract_entity_name;

/// Tags shared by at least this share of a cluster's members are common.
pub const COMMON_TAG_RATIO: f64 = 0.5;

/// Builds [`ClusterSummary`] values. A pure function of groups and records.
pub struct ClusterSummaryBuilder<'a> {
    records: HashMap<&'a str, &'a ServerRecord>,
}

impl<'a> ClusterSummaryBuilder<'a> {
    pub fn new(records: &'a [ServerRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            by_id.entry(record.id.as_str()).or_insert(record);
        }
        Self { records: by_id }
    }

    /// Summaries in ascending cluster id, with names unique within the call.
    pub fn build(&self, groups: &[ClusterGroup]) -> Vec<ClusterSummary> {
        let mut ordered: Vec<&ClusterGroup> = groups.iter().collect();
        ordered.sort_by_key(|g| g.cluster_id);

        let mut taken: HashSet<String> = HashSet::new();
        ordered
            .into_iter()
            .map(|group| {
                let mut summary = self.summarize(group);
                summary.cluster_name = unique_name(&summary, &mut taken);
                summary
            })
            .collect()
    }

    fn summarize(&self, group: &ClusterGroup) -> ClusterSummary {
        let members: Vec<&ServerRecord> = group
            .members
            .iter()
            .filter_map(|id| {
                let found = self.records.get(id.as_str()).copied();
                if found.is_none() {
                    warn!(
                        cluster_id = group.cluster_id,
                        server_id = %id,
                        "cluster member has no record"
                    );
                }
                found
            })
            .collect();

        let size = members.len();
        let avg = |f: fn(&ServerRecord) -> usize| -> f64 {
            if size == 0 {
                return 0.0;
            }
            round2(members.iter().copied().map(|m| f(m) as f64).sum::<f64>() / size as f64)
        };
        let base_name = members
            .first()
            .map(|m| extract_entity_name(&m.title))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| group.entity_name.clone());

        ClusterSummary {
            cluster_id: group.cluster_id,
            cluster_name: base_name,
            entity_name: group.entity_name.clone(),
            size,
            members: members
                .iter()
                .map(|m| MemberRef {
                    id: m.id.clone(),
                    title: m.title.clone(),
                })
                .collect(),
            avg_word_count: avg(|m| m.metrics.word_count),
            avg_feature_count: avg(|m| m.metrics.feature_count),
            avg_tool_count: avg(|m| m.metrics.tool_count),
            common_tags: common_tags(&members),
        }
    }
}

/// Case-folded tags carried by at least half the members, most shared first.
pub fn common_tags(members: &[&ServerRecord]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for member in members {
        let distinct: BTreeSet<String> = member
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        for tag in distinct {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    let threshold = members.len() as f64 * COMMON_TAG_RATIO;
    let mut common: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count as f64 >= threshold)
        .collect();
    common.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    common.into_iter().map(|(tag, _)| tag).collect()
}

fn unique_name(summary: &ClusterSummary, taken: &mut HashSet<String>) -> String {
    let base = summary.cluster_name.clone();
    let candidates = [
        base.clone(),
        format!("{base} ({} Tools)", summary.avg_tool_count as u64),
        format!("{base} ({} Features)", summary.avg_feature_count as u64),
        format!("{base} (Group {})", summary.cluster_id),
    ];
    let mut chosen = candidates.into_iter().find(|c| !taken.contains(c));
    let mut suffix = 2;
    while chosen.is_none() {
        let candidate = format!("{base} (Group {}) {suffix}", summary.cluster_id);
        if !taken.contains(&candidate) {
            chosen = Some(candidate);
        }
        suffix += 1;
    }
    let name = chosen.unwrap_or(base);
    taken.insert(name.clone());
    name
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
