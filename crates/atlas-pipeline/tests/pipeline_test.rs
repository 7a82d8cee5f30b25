//! CatalogPipeline end-to-end: staged run, resume, integrity gate, queries.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atlas_checkpoint::Stage;
use atlas_core::config::CheckpointConfig;
use atlas_core::errors::{AtlasError, QueryError};
use atlas_core::models::ServerRecord;
use atlas_core::traits::ISummaryStore;
use atlas_core::AtlasConfig;
use atlas_pipeline::{CatalogPipeline, MemorySummaryStore};
use tempfile::TempDir;
use test_fixtures::fixture_path;

fn config_in(dir: &Path) -> AtlasConfig {
    AtlasConfig {
        checkpoint: CheckpointConfig::in_dir(dir.to_string_lossy().into_owned()),
        ..Default::default()
    }
}

fn catalog(name: &str) -> PathBuf {
    fixture_path(&format!("catalog/{name}.json"))
}

fn cluster_of(records: &[ServerRecord], id: &str) -> u32 {
    records
        .iter()
        .find(|r| r.id == id)
        .and_then(|r| r.cluster_id)
        .unwrap()
}

fn names(pipeline: &CatalogPipeline) -> Vec<(String, Vec<String>)> {
    pipeline
        .get_cluster_summary()
        .into_iter()
        .map(|s| (s.cluster_name, s.members.into_iter().map(|m| m.id).collect()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL RUN
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn full_run_clusters_and_summarizes_catalog() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let report = pipeline.run(&catalog("mixed")).unwrap();

    assert!(report.integrity.intact);
    assert!(!report.integrity.reset);
    assert!(report.restored_stages.is_empty());
    assert!(report.failed_batches.is_empty());
    assert_eq!(report.records, 12);

    let records = pipeline.records();
    assert_eq!(cluster_of(records, "bn-1"), cluster_of(records, "bn-2"));
    assert_ne!(cluster_of(records, "bn-1"), cluster_of(records, "fs-1"));
    assert!(records.iter().all(|r| r.metrics.feature_vector.len() == 6));

    let summaries = pipeline.get_cluster_summary();
    assert_eq!(summaries.len(), report.clusters);
    assert_eq!(summaries.iter().map(|s| s.size).sum::<usize>(), 12);
    let unique: HashSet<&str> = summaries.iter().map(|s| s.cluster_name.as_str()).collect();
    assert_eq!(unique.len(), summaries.len());

    assert_eq!(pipeline.visualization().points.len(), 12);
    for stage in Stage::ALL {
        assert!(pipeline.tracker().is_stage_complete(stage), "{stage}");
    }
    assert_eq!(pipeline.tracker().get_progress().current_stage, None);
}

#[test]
fn malformed_entries_are_skipped() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let report = pipeline.run(&catalog("malformed")).unwrap();

    assert_eq!(report.records, 2);
    let ids: Vec<&str> = pipeline.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["ok-1", "ok-2"]);
    assert_eq!(pipeline.records()[0].title, "Notion Server");
}

#[test]
fn missing_catalog_is_an_ingest_error() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let err = pipeline
        .run(&dir.path().join("does-not-exist.json"))
        .unwrap_err();
    assert!(matches!(err, AtlasError::Ingest(_)));
    assert!(!pipeline.tracker().is_stage_complete(Stage::DataLoading));
}

// ═══════════════════════════════════════════════════════════════════════════
// RESUME
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn second_run_restores_every_stage() {
    let dir = TempDir::new().unwrap();
    let mut first = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let first_report = first.run(&catalog("mixed")).unwrap();

    let mut second = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let second_report = second.run(&catalog("mixed")).unwrap();

    assert!(second_report.integrity.intact);
    assert_eq!(second_report.restored_stages, Stage::ALL.to_vec());
    assert_eq!(second_report.clusters, first_report.clusters);
    assert_eq!(names(&second), names(&first));
    let assigned = |p: &CatalogPipeline| -> Vec<(String, Option<u32>)> {
        p.records().iter().map(|r| (r.id.clone(), r.cluster_id)).collect()
    };
    assert_eq!(assigned(&second), assigned(&first));
}

#[test]
fn resume_does_not_reread_the_catalog() {
    let dir = TempDir::new().unwrap();
    let copied = dir.path().join("catalog.json");
    std::fs::copy(catalog("binance_weather"), &copied).unwrap();

    let mut first = CatalogPipeline::open(config_in(dir.path())).unwrap();
    first.run(&copied).unwrap();
    std::fs::remove_file(&copied).unwrap();

    let mut second = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let report = second.run(&copied).unwrap();
    assert_eq!(report.records, 3);
    assert!(report.restored_stages.contains(&Stage::DataLoading));
}

#[test]
fn crash_after_metrics_resumes_at_clustering() {
    let dir = TempDir::new().unwrap();
    let mut first = CatalogPipeline::open(config_in(dir.path())).unwrap();
    first.run(&catalog("binance_weather")).unwrap();

    // Simulate a crash before clustering finished: drop the later blobs and
    // rewrite the ledger so only the first three stages are complete.
    let tracker = first.tracker();
    let mut progress = tracker.get_progress();
    progress.completed_stages.truncate(3);
    progress.current_stage = Some(Stage::Vectorizers);
    std::fs::write(
        tracker.progress_path(),
        serde_json::to_vec_pretty(&progress).unwrap(),
    )
    .unwrap();
    for stage in [Stage::Vectorizers, Stage::Clustering, Stage::Visualization] {
        std::fs::remove_file(tracker.blob_path(stage)).unwrap();
    }

    let mut second = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let report = second.run(&catalog("binance_weather")).unwrap();
    assert!(report.integrity.intact);
    assert_eq!(
        report.restored_stages,
        vec![
            Stage::DataLoading,
            Stage::BasicProcessing,
            Stage::MetricsCalculation
        ]
    );
    assert_eq!(names(&second), names(&first));
}

// ═══════════════════════════════════════════════════════════════════════════
// INTEGRITY GATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn deleted_blob_resets_and_recomputes() {
    let dir = TempDir::new().unwrap();
    let mut first = CatalogPipeline::open(config_in(dir.path())).unwrap();
    first.run(&catalog("mixed")).unwrap();
    std::fs::remove_file(first.tracker().blob_path(Stage::Clustering)).unwrap();

    let mut second = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let report = second.run(&catalog("mixed")).unwrap();
    assert!(!report.integrity.intact);
    assert!(report.integrity.reset);
    assert!(report.restored_stages.is_empty());
    assert_eq!(names(&second), names(&first));
    assert!(second.tracker().verify_cache_integrity());
}

#[test]
fn verify_on_fresh_directory_is_intact() {
    let dir = TempDir::new().unwrap();
    let pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let report = pipeline.verify_and_maybe_reset().unwrap();
    assert!(report.intact);
    assert_eq!(report.failed_stage, None);
}

// ═══════════════════════════════════════════════════════════════════════════
// STORE + QUERIES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn summaries_are_published_to_the_store() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemorySummaryStore::new());
    let mut pipeline = CatalogPipeline::open(config_in(dir.path()))
        .unwrap()
        .with_store(store.clone());
    let report = pipeline.run(&catalog("mixed")).unwrap();

    assert_eq!(report.published, report.clusters);
    assert_eq!(store.len(), report.clusters);
    let stored: Vec<String> = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|s| s.cluster_name)
        .collect();
    let reported: Vec<String> = pipeline
        .get_cluster_summary()
        .into_iter()
        .map(|s| s.cluster_name)
        .collect();
    assert_eq!(stored, reported);
}

#[test]
fn similar_servers_come_from_the_same_cluster() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    pipeline.run(&catalog("binance_weather")).unwrap();

    let similar = pipeline.get_similar("A", 5).unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].server_id, "B");
    assert!(similar[0].same_cluster);

    // Singleton falls back to every other record.
    let fallback = pipeline.get_similar_default("C").unwrap();
    assert_eq!(fallback.len(), 2);
    assert!(fallback.iter().all(|r| !r.same_cluster));

    assert!(pipeline.get_similar("A", 0).unwrap().is_empty());
}

#[test]
fn similar_before_clustering_is_not_clustered() {
    let dir = TempDir::new().unwrap();
    let pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    assert!(matches!(
        pipeline.get_similar("A", 3),
        Err(QueryError::NotClustered { .. })
    ));
    assert!(matches!(
        pipeline.get_similar_default("anything"),
        Err(QueryError::NotClustered { .. })
    ));
}

#[test]
fn unknown_server_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    pipeline.run(&catalog("binance_weather")).unwrap();
    assert!(matches!(
        pipeline.get_similar("nope", 3),
        Err(QueryError::RecordNotFound { .. })
    ));
}

#[test]
fn cluster_can_be_called_directly() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = CatalogPipeline::open(config_in(dir.path())).unwrap();
    let assignment = pipeline
        .cluster(test_fixtures::catalog_records("binance_weather"))
        .unwrap();
    assert_eq!(assignment.len(), 3);
    assert_eq!(assignment.get("A"), assignment.get("B"));
    assert_eq!(pipeline.get_cluster_summary().len(), 2);
}
