//! Similarity queries over clustered records.

use atlas_clustering::ClusteringEngine;
use atlas_core::config::{ClusteringConfig, VectorizerConfig};
use atlas_core::errors::QueryError;
use test_fixtures::catalog_records;

fn clustered(name: &str) -> (ClusteringEngine, Vec<atlas_core::models::ServerRecord>) {
    let mut engine =
        ClusteringEngine::new(ClusteringConfig::default(), VectorizerConfig::default());
    let mut records = catalog_records(name);
    engine.cluster(&mut records).unwrap();
    (engine, records)
}

#[test]
fn cluster_mates_are_ranked_first() {
    let (mut engine, records) = clustered("binance_weather");
    let index = engine.similarity_index(&records).unwrap();

    let results = index.get_similar("A", 3).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].server_id, "B");
    assert!(results[0].same_cluster);
    assert!(results[0].similarity_score > 0.0);
}

#[test]
fn singleton_falls_back_to_global_scan() {
    let (mut engine, records) = clustered("binance_weather");
    let index = engine.similarity_index(&records).unwrap();

    let results = index.get_similar("C", 5).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.server_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert!(results.iter().all(|r| !r.same_cluster));
}

#[test]
fn results_are_bounded_and_sorted() {
    let (mut engine, records) = clustered("mixed");
    let index = engine.similarity_index(&records).unwrap();

    for record in &records {
        let results = index.get_similar(&record.id, 2).unwrap();
        assert!(results.len() <= 2);
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity_score >= w[1].similarity_score));
        assert!(results
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.similarity_score) && r.server_id != record.id));
    }
}

#[test]
fn zero_results_requested() {
    let (mut engine, records) = clustered("binance_weather");
    let index = engine.similarity_index(&records).unwrap();
    assert!(index.get_similar("A", 0).unwrap().is_empty());
}

#[test]
fn unknown_id_is_not_found() {
    let (mut engine, records) = clustered("binance_weather");
    let index = engine.similarity_index(&records).unwrap();
    assert!(matches!(
        index.get_similar("missing", 3),
        Err(QueryError::RecordNotFound { server_id }) if server_id == "missing"
    ));
}
