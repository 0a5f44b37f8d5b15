//! Badlands - Entry Point
//!
//! Builds the stock roster on a generated grid, runs turns until the encounter
//! ends or the turn cap is hit, and prints periodic status plus a final report.

use std::path::PathBuf;

use badlands::core::error::Result;
use badlands::simulation::output::{render_grid, status_panel};
use badlands::{EngineConfig, History, Roster, Simulation};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Badlands hunt simulation
#[derive(Parser, Debug)]
#[command(name = "badlands")]
#[command(about = "Run a seeded hunt on a toroidal badlands grid")]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 25)]
    width: i32,

    /// Grid height in cells
    #[arg(long, default_value_t = 25)]
    height: i32,

    /// Random seed for the single simulation stream
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many turns even if nobody has fallen
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Print status and map every N turns (0 disables)
    #[arg(long, default_value_t = 10)]
    report_every: u32,

    /// TOML file overriding rule constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the per-turn history series to this JSON file
    #[arg(long)]
    history_json: Option<PathBuf>,

    /// Only print the final report
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.quiet { "badlands=warn" } else { "badlands=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut sim = Simulation::from_seed(
        args.width,
        args.height,
        &Roster::badlands(),
        config,
        args.seed,
    )?;
    tracing::info!("Badlands hunt starting (seed {})", args.seed);

    if !args.quiet {
        println!("=== BADLANDS ===");
        println!("{}", render_grid(&sim));
    }

    let mut history = History::new();
    history.record(&sim);

    while sim.turn() < args.max_turns && sim.step() {
        history.record(&sim);
        if !args.quiet && args.report_every > 0 && sim.turn() % args.report_every == 0 {
            println!("{}", status_panel(&sim));
            println!("{}", render_grid(&sim));
        }
    }

    let report = sim.final_report();
    println!("{}", report.summary());

    if let Some(path) = &args.history_json {
        history.write_json(path)?;
        println!("History written to {}", path.display());
    }

    Ok(())
}
