//! Command-line interface definitions.
//!
//! Defines the CLI structure for the pairsniper application using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Risk-gated new-pair trading with automatic exits
#[derive(Parser, Debug)]
#[command(name = "pairsniper")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the pairsniper CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trade discovered pairs and supervise exits until Ctrl-C
    Run(RunArgs),

    /// List open positions
    Positions,

    /// Sell one position now at the current relay price
    Close(CloseArgs),

    /// Delete every position from the ledger
    Clear(ClearArgs),

    /// Load and validate the configuration
    Check,
}

/// Arguments for `pairsniper run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Simulate order submission regardless of the config file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `pairsniper close`.
#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Pair (target token address) to close
    pub pair: String,

    /// Include every risk event in the printed report
    #[arg(long)]
    pub verbose: bool,
}

/// Arguments for `pairsniper clear`.
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Confirm deletion of all positions
    #[arg(long)]
    pub yes: bool,
}
