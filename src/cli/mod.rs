//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Precifix - exact truncation-adjustment solver for reconciliation breaks.
#[derive(Parser, Debug)]
#[command(name = "precifix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a batch of adjustments and write the audit report
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `precifix check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "precifix.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (defaults apply when absent)
    #[arg(short, long, default_value = "precifix.toml")]
    pub config: PathBuf,

    /// Base positions file (current portfolio)
    #[arg(long, default_value = "assets_base.csv")]
    pub base: PathBuf,

    /// Secondary positions file (e.g. depositary receipts)
    #[arg(long)]
    pub secondary: Option<PathBuf>,

    /// Target portfolio files, one portfolio each
    #[arg(long, default_value = "target_portfolios.csv", num_args = 1..)]
    pub target: Vec<PathBuf>,

    /// Audit report destination
    #[arg(long, default_value = "adjustment_results.csv")]
    pub output: PathBuf,

    /// Override the truncation scale (decimal places kept downstream)
    #[arg(long)]
    pub scale: Option<u32>,

    /// Override the working precision in significant digits (minimum 50)
    #[arg(long)]
    pub precision_digits: Option<u32>,

    /// Override the search iteration bound
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Worker threads for the batch (0 = one per CPU)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}
