//! Staged catalog pipeline with checkpointed resume.
//!
//! data_loading → basic_processing → metrics_calculation → vectorizers →
//! clustering → visualization. A stage whose checkpoint is complete and
//! readable is restored instead of recomputed.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use atlas_checkpoint::{IntegrityReport, Stage, StageOutput, StageTracker};
use atlas_clustering::{
    cluster_layout, ClusterSummaryBuilder, ClusteringEngine, ClusteringOutcome, RecordVectors,
    SimilarityIndex,
};
use atlas_core::errors::{AtlasResult, QueryError};
use atlas_core::models::{
    ClusterAssignment, ClusterGroup, ClusterSummary, RawServer, ServerRecord, SimilarityResult,
    VisualizationPayload,
};
use atlas_core::traits::ISummaryStore;
use atlas_core::AtlasConfig;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::ingest;
use crate::metrics;
use crate::store::MemorySummaryStore;

/// What a [`CatalogPipeline::run`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub integrity: IntegrityReport,
    pub records: usize,
    pub clusters: usize,
    /// Stages taken from checkpoints, in pipeline order.
    pub restored_stages: Vec<Stage>,
    pub failed_batches: Vec<usize>,
    pub published: usize,
}

pub struct CatalogPipeline {
    config: AtlasConfig,
    tracker: Arc<StageTracker>,
    engine: ClusteringEngine,
    store: Arc<dyn ISummaryStore>,
    records: Vec<ServerRecord>,
    groups: Vec<ClusterGroup>,
    visualization: VisualizationPayload,
    index: Option<SimilarityIndex>,
}

impl CatalogPipeline {
    /// Open a pipeline over the configured checkpoint directory with an
    /// in-memory summary store.
    pub fn open(config: AtlasConfig) -> AtlasResult<Self> {
        let tracker = Arc::new(StageTracker::open(&config.checkpoint)?);
        let engine = ClusteringEngine::new(config.clustering.clone(), config.vectorizer.clone())
            .with_tracker(Arc::clone(&tracker));
        Ok(Self {
            config,
            tracker,
            engine,
            store: Arc::new(MemorySummaryStore::new()),
            records: Vec::new(),
            groups: Vec::new(),
            visualization: VisualizationPayload::default(),
            index: None,
        })
    }

    /// Publish summaries to `store` instead of the in-memory default.
    pub fn with_store(mut self, store: Arc<dyn ISummaryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn tracker(&self) -> &StageTracker {
        &self.tracker
    }

    pub fn records(&self) -> &[ServerRecord] {
        &self.records
    }

    pub fn groups(&self) -> &[ClusterGroup] {
        &self.groups
    }

    pub fn visualization(&self) -> &VisualizationPayload {
        &self.visualization
    }

    /// Integrity gate: wipe every checkpoint if any completed stage is unusable.
    pub fn verify_and_maybe_reset(&self) -> AtlasResult<IntegrityReport> {
        Ok(self.tracker.verify_and_maybe_reset()?)
    }

    /// Run every stage over the catalog at `catalog_path`.
    pub fn run(&mut self, catalog_path: &Path) -> AtlasResult<PipelineReport> {
        let integrity = self.verify_and_maybe_reset()?;
        let mut restored_stages = Vec::new();

        let raw = match self.restore(Stage::DataLoading, StageOutput::into_raw_servers) {
            Some(raw) => {
                restored_stages.push(Stage::DataLoading);
                raw
            }
            None => {
                let raw = ingest::load_catalog(catalog_path)?;
                self.persist(StageOutput::DataLoading(raw.clone()), raw.len())?;
                raw
            }
        };

        let records = self.run_record_stages(raw, &mut restored_stages)?;
        let vectorizers_done = self.tracker.is_stage_complete(Stage::Vectorizers);
        let outcome = self.cluster_records(records)?;
        if outcome.restored {
            if vectorizers_done {
                restored_stages.push(Stage::Vectorizers);
            }
            restored_stages.push(Stage::Clustering);
        }

        if self.run_visualization()? {
            restored_stages.push(Stage::Visualization);
        }
        let published = self.publish()?;

        info!(
            records = self.records.len(),
            clusters = outcome.cluster_count(),
            restored = restored_stages.len(),
            published,
            "pipeline complete"
        );
        Ok(PipelineReport {
            integrity,
            records: self.records.len(),
            clusters: self.groups.len(),
            restored_stages,
            failed_batches: outcome.failed_batches,
            published,
        })
    }

    /// Cluster `records` (restoring from checkpoint when possible) and make
    /// them the pipeline's current records.
    pub fn cluster(&mut self, records: Vec<ServerRecord>) -> AtlasResult<ClusterAssignment> {
        Ok(self.cluster_records(records)?.assignment)
    }

    /// Summaries for the current clustering, ascending cluster id.
    pub fn get_cluster_summary(&self) -> Vec<ClusterSummary> {
        if self.visualization.summaries.len() == self.groups.len() {
            return self.visualization.summaries.clone();
        }
        ClusterSummaryBuilder::new(&self.records).build(&self.groups)
    }

    /// Nothing can be similar before the first clustering, so every id is
    /// reported as not yet clustered.
    pub fn get_similar(
        &self,
        server_id: &str,
        n: usize,
    ) -> Result<Vec<SimilarityResult>, QueryError> {
        match &self.index {
            Some(index) => index.get_similar(server_id, n),
            None => Err(QueryError::NotClustered {
                server_id: server_id.to_string(),
            }),
        }
    }

    /// [`get_similar`](Self::get_similar) with the configured default N.
    pub fn get_similar_default(
        &self,
        server_id: &str,
    ) -> Result<Vec<SimilarityResult>, QueryError> {
        self.get_similar(server_id, self.config.query.default_top_n)
    }

    fn cluster_records(
        &mut self,
        mut records: Vec<ServerRecord>,
    ) -> AtlasResult<ClusteringOutcome> {
        let outcome = self.engine.cluster(&mut records)?;
        self.index = Some(self.engine.similarity_index(&records)?);
        self.records = records;
        self.groups = outcome.groups.clone();
        self.visualization = VisualizationPayload::default();
        Ok(outcome)
    }

    fn run_record_stages(
        &mut self,
        raw: Vec<RawServer>,
        restored_stages: &mut Vec<Stage>,
    ) -> AtlasResult<Vec<ServerRecord>> {
        if let Some(records) = self.restore(Stage::MetricsCalculation, StageOutput::into_records) {
            if self.tracker.is_stage_complete(Stage::BasicProcessing) {
                restored_stages.push(Stage::BasicProcessing);
            }
            restored_stages.push(Stage::MetricsCalculation);
            return Ok(records);
        }

        let basic = match self.restore(Stage::BasicProcessing, StageOutput::into_records) {
            Some(records) => {
                restored_stages.push(Stage::BasicProcessing);
                records
            }
            None => {
                self.tracker
                    .update_progress(Stage::BasicProcessing, 0, raw.len() as u64)?;
                let records = ingest::basic_processing(raw);
                self.persist(StageOutput::BasicProcessing(records.clone()), records.len())?;
                records
            }
        };

        self.tracker
            .update_progress(Stage::MetricsCalculation, 0, basic.len() as u64)?;
        let records = metrics::calculate_metrics(basic);
        self.persist(StageOutput::MetricsCalculation(records.clone()), records.len())?;
        Ok(records)
    }

    /// Returns true when the payload came from its checkpoint.
    fn run_visualization(&mut self) -> AtlasResult<bool> {
        if let Some(payload) = self.restore(Stage::Visualization, StageOutput::into_visualization) {
            if self.payload_matches(&payload) {
                self.visualization = payload;
                return Ok(true);
            }
            warn!("visualization checkpoint does not match clustering, recomputing");
        }

        self.tracker
            .update_progress(Stage::Visualization, 0, self.groups.len() as u64)?;
        let summaries = ClusterSummaryBuilder::new(&self.records).build(&self.groups);
        let vectors = RecordVectors::build(
            &self.records,
            self.engine.title_vectorizer(),
            self.engine.description_vectorizer(),
        )?;
        let points = cluster_layout(&self.records, &self.groups, &vectors, self.engine.weights());
        self.visualization = VisualizationPayload { points, summaries };
        self.persist(
            StageOutput::Visualization(self.visualization.clone()),
            self.groups.len(),
        )?;
        Ok(false)
    }

    /// The payload must place every current record in its current cluster.
    fn payload_matches(&self, payload: &VisualizationPayload) -> bool {
        let expected: BTreeSet<u32> = self.groups.iter().map(|g| g.cluster_id).collect();
        let found: BTreeSet<u32> = payload.summaries.iter().map(|s| s.cluster_id).collect();
        if expected != found || payload.points.len() != self.records.len() {
            return false;
        }
        let placed: HashMap<&str, u32> = payload
            .points
            .iter()
            .map(|p| (p.server_id.as_str(), p.cluster_id))
            .collect();
        self.records
            .iter()
            .all(|r| r.cluster_id.is_some() && placed.get(r.id.as_str()).copied() == r.cluster_id)
    }

    fn publish(&self) -> AtlasResult<usize> {
        let published = self.store.upsert_all(&self.visualization.summaries)?;
        info!(published, "cluster summaries published");
        Ok(published)
    }

    fn restore<T>(&self, stage: Stage, extract: fn(StageOutput) -> Option<T>) -> Option<T> {
        if !self.tracker.is_stage_complete(stage) {
            return None;
        }
        let restored = self.tracker.load_intermediate_result(stage).and_then(extract);
        if restored.is_some() {
            info!(stage = %stage, "stage restored from checkpoint");
        }
        restored
    }

    fn persist(&self, output: StageOutput, count: usize) -> AtlasResult<()> {
        let stage = output.stage();
        self.tracker
            .update_progress(stage, count as u64, count as u64)?;
        self.tracker.save_intermediate_result(&output)?;
        self.tracker.complete_stage(stage)?;
        Ok(())
    }
}

/// One line per cluster: id, name, size, and member titles.
pub fn render_report(summaries: &[ClusterSummary]) -> Vec<String> {
    summaries
        .iter()
        .map(|s| {
            let titles: Vec<&str> = s.members.iter().map(|m| m.title.as_str()).collect();
            format!(
                "[{}] {} ({} members): {}",
                s.cluster_id,
                s.cluster_name,
                s.size,
                titles.join(", ")
            )
        })
        .collect()
}

/// Summaries as a JSON object keyed by cluster id.
pub fn summaries_json(summaries: &[ClusterSummary]) -> Value {
    let mut map = Map::new();
    for summary in summaries {
        if let Ok(value) = serde_json::to_value(summary) {
            map.insert(summary.cluster_id.to_string(), value);
        }
    }
    Value::Object(map)
}
