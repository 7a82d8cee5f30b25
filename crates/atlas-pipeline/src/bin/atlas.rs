//! atlas - cluster a server catalog with checkpointed resume.

use std::path::PathBuf;
use std::process::ExitCode;

use atlas_core::errors::{AtlasErrorCode, AtlasResult};
use atlas_core::AtlasConfig;
use atlas_pipeline::observability::init_tracing;
use atlas_pipeline::pipeline::{render_report, summaries_json};
use atlas_pipeline::CatalogPipeline;
use clap::Parser;
use tracing::error;

/// Cluster a server catalog into entities.
#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(about = "Cluster a server catalog into entities with resumable checkpoints")]
struct Args {
    /// Catalog JSON file (array of server entries)
    catalog: PathBuf,

    /// TOML config file (ATLAS_* environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wipe all checkpoints before running
    #[arg(long)]
    fresh: bool,

    /// Print summaries as JSON instead of one line per cluster
    #[arg(long)]
    json: bool,

    /// Print the top N neighbors of this server id after the run
    #[arg(long)]
    similar: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match AtlasConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("atlas: {e}");
            return ExitCode::from(2);
        }
    };
    init_tracing(&config.observability);

    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), error = %e, "atlas failed");
            eprintln!("atlas: [{}] {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: AtlasConfig) -> AtlasResult<()> {
    let mut pipeline = CatalogPipeline::open(config)?;
    if args.fresh {
        pipeline.tracker().reset_progress()?;
    }

    let report = pipeline.run(&args.catalog)?;
    let summaries = pipeline.get_cluster_summary();

    if args.json {
        println!("{:#}", summaries_json(&summaries));
    } else {
        println!(
            "=== {} records, {} clusters ({} stages restored) ===",
            report.records,
            report.clusters,
            report.restored_stages.len()
        );
        for line in render_report(&summaries) {
            println!("{line}");
        }
        if !report.failed_batches.is_empty() {
            println!("failed batches: {:?}", report.failed_batches);
        }
    }

    if let Some(server_id) = &args.similar {
        println!("\n=== similar to {server_id} ===");
        for result in pipeline.get_similar_default(server_id)? {
            let scope = if result.same_cluster { "cluster" } else { "global" };
            println!(
                "  {:.3}  {} ({}) [{scope}]",
                result.similarity_score, result.title, result.server_id
            );
        }
    }
    Ok(())
}
