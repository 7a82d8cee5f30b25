//! Phase 0: union exact duplicates, then records that share an entity key.

use std::collections::HashMap;

use atlas_core::models::ServerRecord;
use atlas_text::normalize_text;

use crate::entity::entity_key;
use crate::union_find::UnionFind;

/// Union records whose normalized title and description are both equal.
/// Runs regardless of what the vectorizers make of the text, so a title
/// made only of stop words still groups with its twin. Returns the number
/// of merges performed.
pub fn union_exact_duplicates(records: &[ServerRecord], uf: &mut UnionFind) -> usize {
    let mut first_with_text: HashMap<(String, String), usize> = HashMap::new();
    let mut merges = 0;
    for (i, record) in records.iter().enumerate() {
        let key = (
            normalize_text(&record.title),
            normalize_text(&record.description),
        );
        match first_with_text.get(&key) {
            Some(&anchor) => {
                if uf.union(anchor, i) {
                    merges += 1;
                }
            }
            None => {
                first_with_text.insert(key, i);
            }
        }
    }
    merges
}

/// Returns the number of merges performed.
pub fn seed_entities(records: &[ServerRecord], uf: &mut UnionFind) -> usize {
    let mut first_with_key: HashMap<String, usize> = HashMap::new();
    let mut merges = 0;
    for (i, record) in records.iter().enumerate() {
        let Some(key) = entity_key(&record.title) else {
            continue;
        };
        match first_with_key.get(&key) {
            Some(&anchor) => {
                if uf.union(anchor, i) {
                    merges += 1;
                }
            }
            None => {
                first_with_key.insert(key, i);
            }
        }
    }
    merges
}
