//! Test fixture loader for Atlas catalog datasets.
//!
//! Fixture JSON lives next to this crate; helpers here find it from any
//! crate in the workspace.

use std::path::PathBuf;

use atlas_core::models::{RawServer, ServerRecord};
use serde::de::DeserializeOwned;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Raw catalog entries from `catalog/<name>.json`.
pub fn load_catalog(name: &str) -> Vec<RawServer> {
    load_fixture(&format!("catalog/{name}.json"))
}

/// Catalog entries as bare records (identity fields only, no metrics).
pub fn catalog_records(name: &str) -> Vec<ServerRecord> {
    load_catalog(name)
        .into_iter()
        .map(|raw| ServerRecord::new(raw.id, raw.title, raw.description, raw.tags))
        .collect()
}

/// `n` synthetic records in families of `family` near-duplicates, for
/// benchmarks and scale tests.
pub fn synthetic_records(n: usize, family: usize) -> Vec<ServerRecord> {
    const TOPICS: &[&str] = &[
        "crypto trading exchange",
        "weather forecast data",
        "source code repository",
        "calendar scheduling events",
        "database query sql",
        "image generation art",
        "email inbox automation",
        "payment invoice billing",
    ];
    let family = family.max(1);
    (0..n)
        .map(|i| {
            let f = i / family;
            let topic = TOPICS[f % TOPICS.len()];
            ServerRecord::new(
                format!("srv-{i:05}"),
                format!("Vendor{f} Server"),
                format!("{topic} integration variant {}", i % family),
                vec![topic.split(' ').next().unwrap_or("misc").to_string()],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_load() {
        assert_eq!(load_catalog("binance_weather").len(), 3);
        assert!(catalog_records("mixed").len() >= 10);
    }

    #[test]
    fn synthetic_ids_are_unique() {
        let records = synthetic_records(50, 5);
        let ids: std::collections::HashSet<_> = records.iter().map(|r| &r.id).collect();
        assert_eq!(ids.len(), 50);
    }
}
