//! CLI command implementations.

pub mod backtest;
pub mod frontier;
pub mod monte_carlo;
pub mod optimize;
pub mod stress;
pub mod universe;

pub use backtest::BacktestArgs;
pub use frontier::FrontierArgs;
pub use monte_carlo::MonteCarloArgs;
pub use optimize::OptimizeArgs;
pub use stress::StressArgs;
pub use universe::UniverseArgs;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bondsmith_config::{EngineConfig, Validate};
use bondsmith_core::Instrument;
use bondsmith_market::{DataSource, MarketDataService};
use bondsmith_portfolio::{AllocationSolver, OptimizedPortfolio};
use bondsmith_risk::PortfolioInputs;
use clap::Args;

use crate::cli::OutputFormat;

/// Configuration and output settings shared by every command.
pub struct Context {
    pub config: EngineConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: EngineConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Revalidates after command-line overrides.
    pub fn validated(self) -> Result<Self> {
        self.config.validate_or_error()?;
        Ok(self)
    }

    /// Loads the universe the market section describes.
    pub fn universe(&self) -> Result<Vec<Instrument>> {
        let mut service = MarketDataService::new(self.config.market.clone())?;
        Ok(service.universe()?)
    }

    /// Loads the universe and solves the configured allocation.
    ///
    /// A solver failure ends the command with its diagnostic.
    pub fn optimize(&self) -> Result<(Vec<Instrument>, OptimizedPortfolio)> {
        let universe = self.universe()?;
        let request = self.config.allocation_request()?;
        let portfolio = AllocationSolver::new().solve(&universe, &request)?;
        Ok((universe, portfolio))
    }

    /// Solves the allocation and packages it for the risk modules.
    pub fn risk_inputs(&self) -> Result<(OptimizedPortfolio, PortfolioInputs)> {
        let (_, portfolio) = self.optimize()?;
        if portfolio.is_empty() {
            anyhow::bail!("optimized portfolio holds no instruments; nothing to analyze");
        }
        let inputs = PortfolioInputs::from_portfolio(&portfolio)
            .context("building risk inputs from the optimized portfolio")?;
        Ok((portfolio, inputs))
    }
}

/// Universe source overrides.
#[derive(Args, Debug, Default)]
pub struct MarketArgs {
    /// Load bonds from this CSV file instead of generating them
    #[arg(long, value_name = "FILE")]
    pub bonds_csv: Option<PathBuf>,

    /// Synthetic universe size
    #[arg(long)]
    pub bonds: Option<usize>,

    /// Synthetic universe seed
    #[arg(long)]
    pub universe_seed: Option<u64>,
}

impl MarketArgs {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(path) = &self.bonds_csv {
            config.market.source = DataSource::Csv;
            config.market.csv_path = Some(path.clone());
        }
        if let Some(n) = self.bonds {
            config.market.n_bonds = n;
        }
        if let Some(seed) = self.universe_seed {
            config.market.seed = seed;
        }
    }
}

/// Allocation request overrides.
#[derive(Args, Debug, Default)]
pub struct AllocationArgs {
    /// MaximizeYield or OptimizeSharpe
    #[arg(long)]
    pub objective: Option<String>,

    /// Target portfolio duration in years
    #[arg(long)]
    pub target_duration: Option<f64>,

    /// Capital to allocate
    #[arg(long)]
    pub capital: Option<f64>,

    /// Per-bond weight cap (fraction)
    #[arg(long)]
    pub max_allocation: Option<f64>,

    /// Aggregate junk cap (fraction)
    #[arg(long)]
    pub max_junk: Option<f64>,

    /// Per-sector cap (fraction)
    #[arg(long)]
    pub max_sector: Option<f64>,

    /// Annual risk-free rate for Sharpe ratios
    #[arg(long)]
    pub risk_free: Option<f64>,
}

impl AllocationArgs {
    pub fn apply(&self, config: &mut EngineConfig) {
        let opt = &mut config.optimization;
        if let Some(objective) = &self.objective {
            opt.objective = objective.clone();
        }
        if let Some(v) = self.target_duration {
            opt.target_duration = v;
        }
        if let Some(v) = self.capital {
            opt.capital = v;
        }
        if let Some(v) = self.max_allocation {
            opt.max_allocation = v;
        }
        if let Some(v) = self.max_junk {
            opt.max_junk_allocation = v;
        }
        if let Some(v) = self.max_sector {
            opt.max_sector_allocation = v;
        }
        if let Some(v) = self.risk_free {
            opt.risk_free_rate = v;
        }
    }
}
