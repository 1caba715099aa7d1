//! dinner: run one dining-philosophers table to a terminal outcome.
//!
//! ```text
//! dinner --strategy basic --seed 7
//! dinner --strategy waiter --waiter-permissions 3 --output ./out --format sqlite
//! dinner --strategy random --trials 200          # deadlock rate over 200 seeds
//! RUST_LOG=dp_sim=debug dinner --philosophers 3
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dp_core::{SimRng, StrategyKind, TableConfig};
use dp_output::{CsvWriter, OutputWriter, ParquetWriter, SimOutputObserver, SqliteWriter};
use dp_sim::{NoopObserver, Sim, SimBuilder, SimResult, Terminal};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dinner", about = "Dining philosophers discrete-event simulation")]
struct Args {
    /// JSON `TableConfig` to start from; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    philosophers: Option<usize>,

    /// basic, random, waiter or resource-hierarchy.
    #[arg(long)]
    strategy: Option<StrategyKind>,

    #[arg(long)]
    waiter_permissions: Option<usize>,

    /// Seed for the duration / tie-break source.  Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_batches: Option<u64>,

    /// Directory for run output.  Nothing is written if omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Record philosopher rows every N batches (0: final batch only).
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// Print the final snapshot as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Run N independently seeded tables in parallel and report outcomes.
    #[arg(long)]
    trials: Option<u64>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Csv,
    Sqlite,
    Parquet,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    if let Some(trials) = args.trials {
        return run_trials(&config, args.seed.unwrap_or(0), trials);
    }

    let rng = args.seed.map_or_else(SimRng::from_entropy, SimRng::new);
    let mut sim = SimBuilder::new(rng).config(config).build()?;

    let t0 = Instant::now();
    let outcome = match &args.output {
        None => sim.run(&mut NoopObserver)?,
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            run_recorded(&mut sim, dir, args.format, args.interval)?
        }
    };
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "run finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(sim.snapshot())?);
    } else {
        print_summary(&sim, outcome);
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<TableConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TableConfig::default(),
    };
    if let Some(n) = args.philosophers {
        config.philosophers = n;
    }
    if let Some(kind) = args.strategy {
        config.strategy = kind;
    }
    if let Some(p) = args.waiter_permissions {
        config.waiter_permissions = Some(p);
    }
    if let Some(n) = args.max_batches {
        config.max_batches = n;
    }
    config.validate()?;
    Ok(config)
}

// ── Recording ─────────────────────────────────────────────────────────────────

fn run_recorded(sim: &mut Sim<SimRng>, dir: &Path, format: Format, interval: u64) -> Result<Option<Terminal>> {
    match format {
        Format::Csv     => record(sim, CsvWriter::new(dir)?, interval),
        Format::Sqlite  => record(sim, SqliteWriter::new(dir)?, interval),
        Format::Parquet => record(sim, ParquetWriter::new(dir)?, interval),
    }
}

fn record<W: OutputWriter>(sim: &mut Sim<SimRng>, writer: W, interval: u64) -> Result<Option<Terminal>> {
    let mut obs = SimOutputObserver::with_interval(writer, interval);
    let outcome = sim.run(&mut obs)?;
    obs.finish()?;
    if let Some(e) = obs.take_error() {
        return Err(e).context("writing run output");
    }
    Ok(outcome)
}

// ── Trials ────────────────────────────────────────────────────────────────────

fn run_trials(config: &TableConfig, base_seed: u64, trials: u64) -> Result<()> {
    let results: Vec<(Option<Terminal>, u64)> = (0..trials)
        .into_par_iter()
        .map(|i| -> SimResult<_> {
            let mut sim = SimBuilder::new(SimRng::new(base_seed + i)).config(config.clone()).build()?;
            let outcome = sim.run(&mut NoopObserver)?;
            Ok((outcome, sim.stats().batches))
        })
        .collect::<SimResult<_>>()?;

    let deadlocks: Vec<u64> = results
        .iter()
        .filter(|(o, _)| *o == Some(Terminal::Deadlock))
        .map(|&(_, batches)| batches)
        .collect();

    println!(
        "{} × {} philosophers, seeds {}..{}",
        config.strategy,
        config.philosophers,
        base_seed,
        base_seed + trials,
    );
    println!("  deadlocked: {}/{}", deadlocks.len(), trials);
    if !deadlocks.is_empty() {
        let mean = deadlocks.iter().sum::<u64>() as f64 / deadlocks.len() as f64;
        let max = deadlocks.iter().max().copied().unwrap_or(0);
        println!("  batches to deadlock: mean {mean:.1}, max {max}");
    }
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_summary(sim: &Sim<SimRng>, outcome: Option<Terminal>) {
    let stats = sim.stats();
    println!("=== dinner — {} philosophers, {} ===", sim.config().philosophers, sim.config().strategy);
    println!(
        "time {}  |  batches {}  |  events {}  |  conflicts {} ({} fallback)",
        stats.time, stats.batches, stats.events_processed, stats.conflicts, stats.fallback_resolutions,
    );
    println!();
    println!("{:>4}  {:<9} {:>6} {:>10} {:>10} {:>10} {:>6}", "id", "state", "meals", "avg think", "avg eat", "avg wait", "waits");
    for p in sim.table().philosophers() {
        let s = p.stats();
        println!(
            "{:>4}  {:<9} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>6}",
            p.id().0,
            p.state().name(),
            s.meals,
            s.avg_thinking(),
            s.avg_eating(),
            s.avg_waiting(),
            s.waiting_count,
        );
    }
    println!();
    match outcome {
        Some(Terminal::Deadlock)  => println!("DEADLOCK at {} after {} batches", stats.time, stats.batches),
        Some(Terminal::Exhausted) => println!("event queue exhausted at {}", stats.time),
        None => println!("no deadlock within {} batches", sim.config().max_batches),
    }
}
