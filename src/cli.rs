//! Command-line interface definitions for packstat.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Workload ingestion and quality statistics for level-packing experiments.
#[derive(Parser)]
#[command(name = "packstat", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Write a uniform random task stream to stdout.
    Generate(GenerateArgs),
    /// Convert a workload log (or synthetic workload) to a task stream on stdout.
    Convert(ConvertArgs),
    /// Compare algorithm quality over a results directory.
    Analyze(AnalyzeArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args)]
pub struct GenerateArgs {
    /// Number of tasks (m).
    pub count: usize,
    /// Resource universe size (n).
    pub universe: u32,
    /// Seed for a reproducible stream.
    pub seed: Option<u64>,
}

/// Arguments for the `convert` subcommand.
#[derive(Args)]
pub struct ConvertArgs {
    /// Workload log (SWF records or `run_time num_procs` lines).
    #[arg(required_unless_present = "synthetic")]
    pub path: Option<PathBuf>,

    /// Stop after this many tasks (0 = no limit).
    pub max_count: Option<usize>,

    /// Generate a synthetic workload instead: M N [SEED].
    #[arg(
        long,
        num_args = 2..=3,
        value_names = ["M", "N", "SEED"],
        conflicts_with_all = ["path", "max_count"]
    )]
    pub synthetic: Option<Vec<u64>>,

    /// Duration cap applied to every task.
    #[arg(long, default_value_t = packstat::task::MAX_DURATION)]
    pub max_duration: u32,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// JSON configuration file (missing keys take defaults).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Results directory (overrides the configuration).
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Plots directory (overrides the configuration).
    #[arg(long)]
    pub plots_dir: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Do not write figures.
    #[arg(long)]
    pub no_plots: bool,

    /// Also report a comparison pooled over both epsilon tables.
    #[arg(long)]
    pub pool: bool,
}
