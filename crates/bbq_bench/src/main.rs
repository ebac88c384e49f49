mod report;
mod workload;

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use bbq_lookup::{Backend, BoundingBoxCollection, GridConfig, lookups};
use clap::Parser;
use report::{BackendReport, Fingerprint, RunReport};
use tracing::{info, warn};
use workload::Workload;

#[derive(Parser)]
#[command(
    name = "bbq_bench",
    about = "Time bounding box lookups on a random workload and check that they agree"
)]
struct Args {
    /// Number of entries to insert
    #[arg(short, long, default_value_t = 10_000)]
    count: usize,

    /// Number of queries to run
    #[arg(short, long, default_value_t = 1_000)]
    queries: usize,

    /// Seed for the workload generator
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Grid cells per axis (defaults to $BBQ_GRID_SIZE, then 16)
    #[arg(short, long, value_parser = GridConfig::parse)]
    grid_size: Option<GridConfig>,

    /// Longest edge of a generated box
    #[arg(short, long, default_value_t = 10.0)]
    max_extent: f64,

    /// Backend to run; repeat to select several (defaults to all)
    #[arg(short, long = "backend")]
    backends: Vec<Backend>,

    /// Write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    if !args.max_extent.is_finite() || args.max_extent < 0.0 {
        bail!("--max-extent must be a finite non-negative number, got {}", args.max_extent);
    }

    let grid_config = match args.grid_size {
        Some(config) => config,
        None => GridConfig::from_env()?,
    };
    let backends = if args.backends.is_empty() {
        Backend::ALL.to_vec()
    } else {
        args.backends.clone()
    };

    info!(
        count = args.count,
        queries = args.queries,
        seed = args.seed,
        "generating workload"
    );
    let workload = Workload::generate(args.count, args.queries, args.max_extent, args.seed)?;

    let reports = backends
        .iter()
        .map(|&backend| run_backend(backend, grid_config, &workload))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mismatches = RunReport::find_mismatches(&reports);
    let run = RunReport {
        count: args.count,
        queries: args.queries,
        seed: args.seed,
        grid_cells_per_axis: grid_config.cells_per_axis(),
        backends: reports,
        mismatches,
    };

    print!("{}", run.summary());

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&run)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    ensure_agreement(&run, &workload)
}

/// Fail the run if any query returned different results across backends.
fn ensure_agreement(run: &RunReport, workload: &Workload) -> anyhow::Result<()> {
    if run.mismatches.is_empty() {
        return Ok(());
    }
    for &query in run.mismatches.iter().take(10) {
        warn!(query, item = ?workload.queries.get(query), "backends disagree");
    }
    bail!("{} queries returned different results across backends", run.mismatches.len());
}

fn run_backend(
    backend: Backend,
    grid_config: GridConfig,
    workload: &Workload,
) -> anyhow::Result<BackendReport> {
    let mut lookup = lookups::create::<String>(backend, grid_config);

    let started = Instant::now();
    for (value, bounding_box) in &workload.entries {
        lookup.insert(value.clone(), *bounding_box);
    }
    let insert_ms = millis(started);
    if lookup.len() != workload.entries.len() {
        bail!(
            "{backend}: holds {} entries after inserting {}",
            lookup.len(),
            workload.entries.len()
        );
    }
    info!(%backend, entries = lookup.len(), insert_ms, "inserted");

    let mut fingerprints = Vec::with_capacity(workload.queries.len());
    let started = Instant::now();
    for query in &workload.queries {
        let mut fingerprint = Fingerprint::default();
        let _ = lookup.for_each_intersecting(query, &mut |entry| {
            fingerprint.add(&entry);
            ControlFlow::Continue(())
        });
        fingerprints.push(fingerprint);
    }
    let query_ms = millis(started);
    let total_hits = fingerprints.iter().map(|f| f.count).sum();
    info!(%backend, queries = fingerprints.len(), total_hits, query_ms, "queried");

    let started = Instant::now();
    for (value, bounding_box) in &workload.entries {
        if !lookup.remove(value, bounding_box) {
            bail!("{backend}: entry {value} was not found for removal");
        }
    }
    let remove_ms = millis(started);
    if !lookup.is_empty() {
        bail!("{backend}: {} entries left after removing all", lookup.len());
    }
    info!(%backend, remove_ms, "removed");

    Ok(BackendReport {
        backend,
        insert_ms,
        query_ms,
        remove_ms,
        total_hits,
        fingerprints,
    })
}

fn millis(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
