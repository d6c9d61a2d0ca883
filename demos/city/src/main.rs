//! city — command-line driver for the scootsim ride engine.
//!
//! Loads a plan from CSV (or synthesizes a toy one on a grid network), runs
//! the simulation and writes ride, parking and vehicle tables plus a
//! `summary.json`.  With `--replicates N` the toy planner draws N plans from
//! independent seeds and runs them on Rayon's thread pool.
//!
//! ```text
//! city --plan-dir data/plan --network-dir data/net --out output/city
//! city --replicates 8 --rides 5000 --seed 7 --format csv
//! RUST_LOG=debug city --ride-limit 100
//! ```

mod network;
mod planner;


use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;

use scoot_core::{SimConfig, DEFAULT_PROBE_INTERVAL_SECS};
use scoot_output::{CsvWriter, OutputWriter, SimOutputObserver};
use scoot_plan::{load_plan_dir, SimulationPlan};
use scoot_sim::{RunSummary, SimBuilder};
use scoot_spatial::{load_network_csv, CachedRouter, DijkstraRouter, RoadNetwork};

use planner::ToyPlanParams;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Monday 2023-11-13 00:00 UTC.
const DEFAULT_START: i64 = 1_699_833_600;
const DAY_SECS:      i64 = 86_400;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    /// Needs the `sqlite` feature.
    Sqlite,
    /// Needs the `parquet` feature.
    Parquet,
}

#[derive(Parser, Debug)]
#[command(name = "city")]
#[command(about = "Scooter-sharing ride simulation")]
struct Cli {
    /// Plan directory with parking.csv, vehicles.csv, riders.csv, rides.csv.
    /// A toy plan is synthesized when omitted.
    #[arg(long)]
    plan_dir: Option<PathBuf>,

    /// Road network directory with nodes.csv and edges.csv.  A toy grid is
    /// used when omitted.
    #[arg(long)]
    network_dir: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = "output/city")]
    out: PathBuf,

    /// JSON run configuration (a serialized `SimConfig`).  Flags below
    /// override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window start, Unix seconds.
    #[arg(long)]
    start: Option<i64>,

    /// Window end (exclusive), Unix seconds.
    #[arg(long)]
    end: Option<i64>,

    /// Stop dispatching once this many rides are realized.
    #[arg(long)]
    ride_limit: Option<usize>,

    /// Seconds between vehicle scans of a searching rider.
    #[arg(long)]
    probe_secs: Option<u64>,

    /// Seed for the toy planner.  Replicate `i` uses `seed + i`, the value
    /// reported in `summary.json`.
    #[arg(long)]
    seed: Option<u64>,

    /// Independent toy-plan runs, executed in parallel.
    #[arg(long, default_value_t = 1)]
    replicates: usize,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Snapshot parking stock and vehicles every N simulated seconds
    /// (0 = end of run only).
    #[arg(long, default_value_t = 0)]
    snapshot_secs: u64,

    /// Toy plan: number of riders.
    #[arg(long, default_value_t = 400)]
    riders: usize,

    /// Toy plan: number of ride requests.
    #[arg(long, default_value_t = 2_000)]
    rides: usize,

    /// Toy network: grid side length in nodes.
    #[arg(long, default_value_t = 8)]
    grid: usize,
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn resolve_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<SimConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::for_window(DEFAULT_START, DEFAULT_START + DAY_SECS),
    };

    let start = cli.start.unwrap_or(config.start_unix_secs);
    let end = cli.end.unwrap_or(start + config.total_ticks as i64);
    if end <= start {
        bail!("window end {end} is not after start {start}");
    }
    config.start_unix_secs = start;
    config.total_ticks = (end - start) as u64;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(probe) = cli.probe_secs {
        config.probe_interval_secs = probe;
    }
    if cli.ride_limit.is_some() {
        config.ride_limit = cli.ride_limit;
    }
    if config.probe_interval_secs == 0 {
        log::warn!("probe interval 0 is invalid; using {DEFAULT_PROBE_INTERVAL_SECS} s");
        config.probe_interval_secs = DEFAULT_PROBE_INTERVAL_SECS;
    }
    Ok(config)
}

// ── Run ───────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ReplicateReport {
    replicate:    usize,
    seed:         u64,
    requests:     usize,
    vehicles:     usize,
    elapsed_secs: f64,
    summary:      RunSummary,
}

fn open_writer(format: Format, dir: &Path) -> Result<Box<dyn OutputWriter>> {
    let writer: Box<dyn OutputWriter> = match format {
        Format::Csv => Box::new(CsvWriter::new(dir)?),
        #[cfg(feature = "sqlite")]
        Format::Sqlite => Box::new(scoot_output::SqliteWriter::new(dir)?),
        #[cfg(feature = "parquet")]
        Format::Parquet => Box::new(scoot_output::ParquetWriter::new(dir)?),
        #[allow(unreachable_patterns)]
        other => bail!("{other:?} output is not compiled in; rebuild with the matching feature"),
    };
    Ok(writer)
}

#[allow(clippy::too_many_arguments)]
fn run_one(
    replicate: usize,
    seed: u64,
    plan: SimulationPlan,
    config: SimConfig,
    network: RoadNetwork,
    router: Arc<CachedRouter<DijkstraRouter>>,
    cli: &Cli,
    out: &Path,
) -> Result<ReplicateReport> {
    let requests = plan.rides.len();
    let vehicles = plan.vehicle_count();

    let mut sim = SimBuilder::new(config, plan, router)
        .network(network)
        .build()
        .with_context(|| format!("building replicate {replicate}"))?;

    let writer = open_writer(cli.format, out)?;
    let mut obs = SimOutputObserver::new(writer, &sim.config).with_snapshot_interval(cli.snapshot_secs);

    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed_secs = t0.elapsed().as_secs_f64();

    if let Some(e) = obs.take_error() {
        return Err(e).with_context(|| format!("writing output to {}", out.display()));
    }

    log::info!(
        "replicate {replicate} (seed {seed}): {} realized, {} cancelled, {} unroutable, {} dropped in {elapsed_secs:.3} s",
        summary.realized, summary.cancelled, summary.unroutable, summary.dropped_requests,
    );
    Ok(ReplicateReport { replicate, seed, requests, vehicles, elapsed_secs, summary })
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let start = config.start_unix_secs;
    let end = start + config.total_ticks as i64;

    // 1. Road network.
    let (network, grid_nodes) = match &cli.network_dir {
        Some(dir) => {
            let net = load_network_csv(dir).with_context(|| format!("loading network from {}", dir.display()))?;
            (net, Vec::new())
        }
        None => network::build_grid(cli.grid),
    };
    log::info!("road network: {} nodes, {} edges", network.node_count(), network.edge_count());
    let router = Arc::new(CachedRouter::new(DijkstraRouter));

    // 2. Plans.
    let plans: Vec<(u64, SimulationPlan)> = match &cli.plan_dir {
        Some(dir) => {
            if cli.replicates > 1 {
                log::warn!("--replicates ignored with --plan-dir: a loaded plan always runs the same way");
            }
            let plan = load_plan_dir(dir, &network, start, end)
                .with_context(|| format!("loading plan from {}", dir.display()))?;
            vec![(config.seed, plan)]
        }
        None => {
            if grid_nodes.is_empty() {
                bail!("a toy plan needs the toy grid; pass --plan-dir with --network-dir");
            }
            let params = ToyPlanParams { riders: cli.riders, rides: cli.rides, fleet_per_lot: 3.0 };
            planner::toy_plans(&network, &grid_nodes, params, config.seed, cli.replicates, start, end)
        }
    };

    // 3. Run.
    let single = plans.len() == 1;
    let t0 = Instant::now();
    let reports: Vec<ReplicateReport> = plans
        .into_par_iter()
        .enumerate()
        .map(|(i, (seed, plan))| {
            let out = if single { cli.out.clone() } else { cli.out.join(format!("rep-{i:03}")) };
            run_one(i, seed, plan, config.clone(), network.clone(), Arc::clone(&router), &cli, &out)
        })
        .collect::<Result<_>>()?;

    // 4. Summary.
    scoot_output::ensure_dir(&cli.out)?;
    let summary_path = cli.out.join("summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&reports)?)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    let realized: usize = reports.iter().map(|r| r.summary.realized).sum();
    let cancelled: usize = reports.iter().map(|r| r.summary.cancelled).sum();
    log::info!(
        "{} run(s) in {:.3} s: {realized} realized, {cancelled} cancelled, {} routes cached; summary at {}",
        reports.len(),
        t0.elapsed().as_secs_f64(),
        router.len(),
        summary_path.display(),
    );
    Ok(())
}
