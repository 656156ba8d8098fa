//! Paging simulator - Main Entry Point
//!
//! Usage: paging-sim [OPTIONS] [INPUT]
//!
//! Reads `arrival size` process records, hands out frames with a per-pass page
//! cap and FIFO reclamation, then prints the allocation tables and summary.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{info, LevelFilter};

use paging_sim::io::{write_report, ProcessTable};
use paging_sim::report;
use paging_sim::{Simulation, SimulationConfig, DEFAULT_PROCESS_FILE};

/// Command-line configuration
#[derive(Parser, Debug)]
#[command(name = "paging-sim")]
#[command(about = "Fixed-size paged memory simulator with FIFO frame reclamation", version)]
struct Cli {
    /// Process file of whitespace-separated `arrival size` pairs
    #[arg(default_value = DEFAULT_PROCESS_FILE)]
    input: PathBuf,

    /// TOML file with simulation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total main memory in KB
    #[arg(long)]
    memory: Option<usize>,

    /// Frame size in KB
    #[arg(long)]
    frame_size: Option<usize>,

    /// Pages one pass may grant a single process
    #[arg(long)]
    max_pages: Option<usize>,

    /// Subtract evicted frames from the victim's allocated page count
    #[arg(long)]
    reclaim_victim_pages: bool,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every pass and allocation
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    Builder::from_env(Env::default())
        .filter_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .format_module_path(false)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(memory) = cli.memory {
        config.total_memory = memory;
    }
    if let Some(frame_size) = cli.frame_size {
        config.frame_size = frame_size;
    }
    if let Some(max_pages) = cli.max_pages {
        config.max_pages_per_process = max_pages;
    }
    if cli.reclaim_victim_pages {
        config.reclaim_victim_pages = true;
    }

    config.validate().context("invalid simulation settings")?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let table = ProcessTable::from_file(&cli.input)?;
    info!("Loaded {} processes from {}", table.len(), cli.input.display());
    let processes = table.into_processes(&config);

    let mut simulation = Simulation::new(config)?;
    let outcome = simulation
        .run(processes)
        .context("frame allocation reached an inconsistent state")?;

    let text = report::render(&outcome, &config);
    match &cli.output {
        Some(path) => write_report(path, &text)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{}", text),
    }

    Ok(())
}
