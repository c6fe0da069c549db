//! Bondsmith CLI - bond allocation and portfolio risk from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Inspect the synthetic universe
//! bondsmith universe --summary
//!
//! # Maximize yield at a 6-year duration
//! bondsmith optimize --target-duration 6 --breakdown
//!
//! # Risk on the Sharpe-optimal portfolio, from a config file
//! bondsmith --config engine.toml monte-carlo --objective OptimizeSharpe
//! bondsmith stress --scenario credit_crisis --scenario 2008_replay
//! bondsmith backtest --cadence quarterly --periods 8 --format json
//! ```

use anyhow::Result;
use bondsmith_config::{EngineConfig, Validate};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.validate_or_error()?;

    let ctx = Context::new(config, cli.format);

    match cli.command {
        Commands::Universe(args) => commands::universe::execute(args, ctx)?,
        Commands::Optimize(args) => commands::optimize::execute(args, ctx)?,
        Commands::Frontier(args) => commands::frontier::execute(args, ctx)?,
        Commands::MonteCarlo(args) => commands::monte_carlo::execute(args, ctx)?,
        Commands::Stress(args) => commands::stress::execute(args, ctx)?,
        Commands::Backtest(args) => commands::backtest::execute(args, ctx)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
