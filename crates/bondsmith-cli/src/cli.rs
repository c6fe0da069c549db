//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    BacktestArgs, FrontierArgs, MonteCarloArgs, OptimizeArgs, StressArgs, UniverseArgs,
};

/// Bondsmith - constrained bond allocation and portfolio risk
#[derive(Parser)]
#[command(name = "bondsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Engine configuration file (.toml or .json)
    #[arg(short, long, global = true, env = "BONDSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Log solver and cache activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the bond universe
    Universe(UniverseArgs),

    /// Solve for an allocation under the configured constraints
    Optimize(OptimizeArgs),

    /// Trace the efficient frontier across target durations
    Frontier(FrontierArgs),

    /// Monte Carlo VaR and CVaR of the optimized portfolio
    #[command(name = "monte-carlo")]
    MonteCarlo(MonteCarloArgs),

    /// Run stress scenarios against the optimized portfolio
    Stress(StressArgs),

    /// Backtest the optimized portfolio against benchmarks
    Backtest(BacktestArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
