use atlas_core::errors::error_code;
use atlas_core::errors::*;

#[test]
fn record_not_found_carries_id() {
    let err = QueryError::RecordNotFound {
        server_id: "srv-42".into(),
    };
    assert!(err.to_string().contains("srv-42"));
    assert_eq!(err.error_code(), error_code::RECORD_NOT_FOUND);
}

#[test]
fn corruption_carries_stage_and_reason() {
    let err = CheckpointError::Corruption {
        stage: "clustering".into(),
        reason: "blob missing".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("clustering"));
    assert!(msg.contains("blob missing"));
    assert_eq!(err.error_code(), error_code::CHECKPOINT_CORRUPTION);
}

#[test]
fn batch_failure_has_its_own_code() {
    let err = ClusteringError::BatchFailed {
        batch: 7,
        reason: "panicked".into(),
    };
    assert!(err.to_string().contains('7'));
    assert_eq!(err.error_code(), error_code::BATCH_COMPUTATION_FAILURE);
}

#[test]
fn vectorization_error_converts_through_clustering_and_atlas() {
    let inner = VectorizationError::EmptyVocabulary {
        corpus: "title".into(),
        documents: 0,
    };
    let clustering: ClusteringError = inner.into();
    assert_eq!(clustering.error_code(), error_code::VECTORIZATION_FAILURE);

    let top: AtlasError = clustering.into();
    assert!(matches!(top, AtlasError::Clustering(_)));
    assert_eq!(top.error_code(), error_code::VECTORIZATION_FAILURE);
    assert!(top.to_string().contains("title"));
}

#[test]
fn every_subsystem_error_lifts_into_atlas_error() {
    let errors: Vec<AtlasError> = vec![
        CheckpointError::Io {
            path: "p".into(),
            reason: "r".into(),
        }
        .into(),
        QueryError::NotClustered {
            server_id: "x".into(),
        }
        .into(),
        IngestError::Parse {
            path: "catalog.json".into(),
            reason: "eof".into(),
        }
        .into(),
        ConfigError::FileNotFound {
            path: "atlas.toml".into(),
        }
        .into(),
        StoreError::ReadFailed {
            reason: "offline".into(),
        }
        .into(),
    ];
    let codes: Vec<&str> = errors.iter().map(|e| e.error_code()).collect();
    assert_eq!(
        codes,
        vec![
            error_code::CHECKPOINT_IO,
            error_code::CLUSTERING_FAILURE,
            error_code::INGEST_FAILURE,
            error_code::CONFIG_ERROR,
            error_code::STORE_FAILURE,
        ]
    );
}
