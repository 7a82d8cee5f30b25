use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Cluster identifier. Allocation order only; carries no meaning beyond identity.
pub type ClusterId = u32;

/// `server_id -> cluster_id`, one entry per clustered record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterAssignment {
    clusters: BTreeMap<String, ClusterId>,
}

impl ClusterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `server_id`, overwriting any previous assignment.
    pub fn assign(&mut self, server_id: impl Into<String>, cluster_id: ClusterId) {
        self.clusters.insert(server_id.into(), cluster_id);
    }

    pub fn get(&self, server_id: &str) -> Option<ClusterId> {
        self.clusters.get(server_id).copied()
    }

    pub fn contains(&self, server_id: &str) -> bool {
        self.clusters.contains_key(server_id)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ClusterId)> {
        self.clusters.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct clusters referenced.
    pub fn cluster_count(&self) -> usize {
        self.clusters.values().collect::<HashSet<_>>().len()
    }
}

/// Persisted per-cluster data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEntry {
    pub entity_name: String,
    pub members: Vec<String>,
}

/// A cluster with its members, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub cluster_id: ClusterId,
    /// Lower-cased entity head of the first member's title.
    pub entity_name: String,
    pub members: Vec<String>,
}

impl ClusterGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Full clustering output as persisted by the `clustering` stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub clusters: ClusterAssignment,
    pub cluster_data: BTreeMap<ClusterId, ClusterEntry>,
    pub next_cluster_id: ClusterId,
}

impl ClusterSnapshot {
    /// Build a snapshot from groups. `next_cluster_id` is one past the largest id.
    pub fn from_groups(groups: &[ClusterGroup]) -> Self {
        let mut snapshot = Self::default();
        for group in groups {
            for member in &group.members {
                snapshot.clusters.assign(member.clone(), group.cluster_id);
            }
            snapshot.cluster_data.insert(
                group.cluster_id,
                ClusterEntry {
                    entity_name: group.entity_name.clone(),
                    members: group.members.clone(),
                },
            );
            snapshot.next_cluster_id = snapshot.next_cluster_id.max(group.cluster_id + 1);
        }
        snapshot
    }

    /// Groups in ascending cluster id order.
    pub fn groups(&self) -> Vec<ClusterGroup> {
        self.cluster_data
            .iter()
            .map(|(id, entry)| ClusterGroup {
                cluster_id: *id,
                entity_name: entry.entity_name.clone(),
                members: entry.members.clone(),
            })
            .collect()
    }

    /// True when the groups partition exactly `server_ids`: no id in two
    /// groups, no id missing, no stray ids, and the assignment map agrees.
    pub fn is_partition_of<'a>(&self, server_ids: impl IntoIterator<Item = &'a str>) -> bool {
        let expected: HashSet<&str> = server_ids.into_iter().collect();
        let mut seen: HashSet<&str> = HashSet::new();
        for (cluster_id, entry) in &self.cluster_data {
            for member in &entry.members {
                if !seen.insert(member.as_str()) {
                    return false;
                }
                if self.clusters.get(member) != Some(*cluster_id) {
                    return false;
                }
            }
        }
        seen == expected && self.clusters.len() == expected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: ClusterId, members: &[&str]) -> ClusterGroup {
        ClusterGroup {
            cluster_id: id,
            entity_name: format!("e{id}"),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn snapshot_round_trips_groups() {
        let groups = vec![group(0, &["a", "b"]), group(1, &["c"])];
        let snapshot = ClusterSnapshot::from_groups(&groups);
        assert_eq!(snapshot.next_cluster_id, 2);
        assert_eq!(snapshot.groups(), groups);
        assert_eq!(snapshot.clusters.get("b"), Some(0));
        assert_eq!(snapshot.clusters.cluster_count(), 2);
    }

    #[test]
    fn partition_detects_duplicates_and_gaps() {
        let ok = ClusterSnapshot::from_groups(&[group(0, &["a", "b"]), group(1, &["c"])]);
        assert!(ok.is_partition_of(["a", "b", "c"]));
        assert!(!ok.is_partition_of(["a", "b", "c", "d"]));

        let mut dup = ok.clone();
        dup.cluster_data.get_mut(&1).unwrap().members.push("a".into());
        assert!(!dup.is_partition_of(["a", "b", "c"]));
    }

    #[test]
    fn snapshot_json_uses_string_keys() {
        let snapshot = ClusterSnapshot::from_groups(&[group(3, &["x"])]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["clusters"]["x"], 3);
        assert_eq!(json["cluster_data"]["3"]["members"][0], "x");
        assert_eq!(json["next_cluster_id"], 4);
        let back: ClusterSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
