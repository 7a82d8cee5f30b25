//! ClusteringEngine: checkpoint-aware entry point to the phased pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use atlas_checkpoint::{Stage, StageOutput, StageTracker};
use atlas_core::config::{ClusteringConfig, VectorizerConfig};
use atlas_core::errors::ClusteringError;
use atlas_core::models::{
    ClusterAssignment, ClusterGroup, ClusterSnapshot, ServerRecord, VectorizerSnapshots,
};
use atlas_text::TfidfVectorizer;
use tracing::{debug, info, warn};

use crate::pipeline::{self, RefinementOutcome};
use crate::query::SimilarityIndex;
use crate::scoring::{RecordVectors, ScoreWeights, TfidfPairScorer};

/// Result of one [`ClusteringEngine::cluster`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusteringOutcome {
    pub assignment: ClusterAssignment,
    /// Ascending cluster id.
    pub groups: Vec<ClusterGroup>,
    /// True when taken from the clustering checkpoint without recomputation.
    pub restored: bool,
    /// Phase 2 batches whose refinements were skipped.
    pub failed_batches: Vec<usize>,
}

impl ClusteringOutcome {
    pub fn cluster_count(&self) -> usize {
        self.groups.len()
    }

    fn from_snapshot(snapshot: ClusterSnapshot, restored: bool) -> Self {
        Self {
            groups: snapshot.groups(),
            assignment: snapshot.clusters,
            restored,
            failed_batches: Vec::new(),
        }
    }
}

pub struct ClusteringEngine {
    config: ClusteringConfig,
    vectorizer_config: VectorizerConfig,
    tracker: Option<Arc<StageTracker>>,
    title_vectorizer: TfidfVectorizer,
    description_vectorizer: TfidfVectorizer,
}

impl ClusteringEngine {
    pub fn new(config: ClusteringConfig, vectorizer_config: VectorizerConfig) -> Self {
        Self {
            title_vectorizer: TfidfVectorizer::for_titles(&vectorizer_config),
            description_vectorizer: TfidfVectorizer::for_descriptions(&vectorizer_config),
            config,
            vectorizer_config,
            tracker: None,
        }
    }

    /// Persist and restore through `tracker`.
    pub fn with_tracker(mut self, tracker: Arc<StageTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights::from_config(&self.config)
    }

    /// Assign a cluster id to every record, restoring from the clustering
    /// checkpoint when it covers exactly these records.
    pub fn cluster(
        &mut self,
        records: &mut [ServerRecord],
    ) -> Result<ClusteringOutcome, ClusteringError> {
        self.validate_input(records)?;
        if records.is_empty() {
            info!("no records to cluster");
            return Ok(ClusteringOutcome::default());
        }

        if let Some(snapshot) = self.cached_snapshot(records) {
            apply_assignment(records, &snapshot.clusters);
            let outcome = ClusteringOutcome::from_snapshot(snapshot, true);
            info!(
                records = records.len(),
                clusters = outcome.cluster_count(),
                "clustering restored from checkpoint"
            );
            return Ok(outcome);
        }

        self.prepare_vectorizers(records)?;
        let vectors = RecordVectors::build(
            records,
            &self.title_vectorizer,
            &self.description_vectorizer,
        )?;
        let scorer = TfidfPairScorer::new(&vectors, self.weights());

        let tracker = self.tracker.clone();
        let total =
            pipeline::phase2_refinement::batch_ranges(records.len(), self.config.batch_size).len();
        record_progress(tracker.as_deref(), 0, total);
        let result = pipeline::run_phases(records, &vectors, &scorer, &self.config, |done, total| {
            record_progress(tracker.as_deref(), done, total)
        })?;
        let RefinementOutcome { failed_batches, .. } = result.refinement;

        let snapshot = ClusterSnapshot::from_groups(&result.groups);
        if let Some(tracker) = &self.tracker {
            tracker.save_intermediate_result(&StageOutput::Clustering(snapshot.clone()))?;
            tracker.complete_stage(Stage::Clustering)?;
        }
        apply_assignment(records, &snapshot.clusters);

        let mut outcome = ClusteringOutcome::from_snapshot(snapshot, false);
        outcome.failed_batches = failed_batches;
        info!(
            records = records.len(),
            clusters = outcome.cluster_count(),
            failed_batches = outcome.failed_batches.len(),
            "clustering complete"
        );
        Ok(outcome)
    }

    /// Make both vectorizers usable for `records`: restore them from the
    /// vectorizers checkpoint when it was fitted on the same corpora,
    /// otherwise fit (and persist) them.
    pub fn prepare_vectorizers(&mut self, records: &[ServerRecord]) -> Result<(), ClusteringError> {
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        let descriptions: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();

        if self.restore_vectorizers(&titles, &descriptions) {
            return Ok(());
        }

        // Fresh vectorizers so a failed restore leaves no partial state behind.
        self.title_vectorizer = TfidfVectorizer::for_titles(&self.vectorizer_config);
        self.description_vectorizer = TfidfVectorizer::for_descriptions(&self.vectorizer_config);
        self.title_vectorizer.fit_checked(&titles)?;
        self.description_vectorizer.fit(&descriptions);

        if let Some(tracker) = &self.tracker {
            let snapshots = VectorizerSnapshots {
                title: self.title_vectorizer.export_snapshot()?,
                description: self.description_vectorizer.export_snapshot()?,
            };
            tracker.save_intermediate_result(&StageOutput::Vectorizers(Box::new(snapshots)))?;
            tracker.complete_stage(Stage::Vectorizers)?;
        }
        Ok(())
    }

    /// Build a similarity index over clustered `records`, preparing the
    /// vectorizers first if needed.
    pub fn similarity_index(
        &mut self,
        records: &[ServerRecord],
    ) -> Result<SimilarityIndex, ClusteringError> {
        if !self.vectorizers_match(records) {
            self.prepare_vectorizers(records)?;
        }
        Ok(SimilarityIndex::build(
            records,
            &self.title_vectorizer,
            &self.description_vectorizer,
            self.weights(),
        )?)
    }

    pub fn title_vectorizer(&self) -> &TfidfVectorizer {
        &self.title_vectorizer
    }

    pub fn description_vectorizer(&self) -> &TfidfVectorizer {
        &self.description_vectorizer
    }

    fn validate_input(&self, records: &[ServerRecord]) -> Result<(), ClusteringError> {
        if self.config.batch_size == 0 || self.config.workers == 0 {
            return Err(ClusteringError::InvalidInput {
                reason: "batch_size and workers must be greater than 0".to_string(),
            });
        }
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id.as_str()) {
                return Err(ClusteringError::InvalidInput {
                    reason: format!("duplicate server id {}", record.id),
                });
            }
        }
        Ok(())
    }

    fn cached_snapshot(&self, records: &[ServerRecord]) -> Option<ClusterSnapshot> {
        let tracker = self.tracker.as_ref()?;
        if !tracker.is_stage_complete(Stage::Clustering) {
            return None;
        }
        let snapshot = tracker
            .load_intermediate_result(Stage::Clustering)
            .and_then(StageOutput::into_cluster_snapshot)?;
        if snapshot.is_partition_of(records.iter().map(|r| r.id.as_str())) {
            Some(snapshot)
        } else {
            warn!(
                records = records.len(),
                cached = snapshot.clusters.len(),
                "clustering checkpoint does not match input, recomputing"
            );
            None
        }
    }

    fn restore_vectorizers(&mut self, titles: &[&str], descriptions: &[&str]) -> bool {
        let Some(tracker) = &self.tracker else {
            return false;
        };
        if !tracker.is_stage_complete(Stage::Vectorizers) {
            return false;
        }
        let Some(snapshots) = tracker
            .load_intermediate_result(Stage::Vectorizers)
            .and_then(StageOutput::into_vectorizers)
        else {
            return false;
        };

        let title_fp = self.title_vectorizer.corpus_fingerprint(titles);
        let description_fp = self.description_vectorizer.corpus_fingerprint(descriptions);
        let restored = self
            .title_vectorizer
            .restore_snapshot(snapshots.title, Some(&title_fp))
            .and_then(|()| {
                self.description_vectorizer
                    .restore_snapshot(snapshots.description, Some(&description_fp))
            });
        match restored {
            Ok(()) => {
                debug!("vectorizers restored from checkpoint");
                true
            }
            Err(e) => {
                warn!(error = %e, "vectorizer checkpoint unusable, refitting");
                false
            }
        }
    }

    fn vectorizers_match(&self, records: &[ServerRecord]) -> bool {
        let (Some(title_fp), Some(description_fp)) = (
            self.title_vectorizer.fingerprint(),
            self.description_vectorizer.fingerprint(),
        ) else {
            return false;
        };
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        let descriptions: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();
        title_fp == self.title_vectorizer.corpus_fingerprint(&titles)
            && description_fp == self.description_vectorizer.corpus_fingerprint(&descriptions)
    }
}

fn apply_assignment(records: &mut [ServerRecord], assignment: &ClusterAssignment) {
    for record in records.iter_mut() {
        record.cluster_id = assignment.get(&record.id);
    }
}

fn record_progress(tracker: Option<&StageTracker>, done: usize, total: usize) {
    if let Some(tracker) = tracker {
        if let Err(e) = tracker.update_progress(Stage::Clustering, done as u64, total as u64) {
            warn!(error = %e, "failed to record clustering progress");
        }
    }
}
