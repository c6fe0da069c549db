//! # Bondsmith Risk
//!
//! Risk analytics for a solved allocation.
//!
//! - **Monte Carlo**: VaR and CVaR from correlated lognormal paths, plus the
//!   P&L histogram and percentiles
//! - **Stress testing**: a fixed catalog of rate and spread shocks with
//!   duration-based price impact
//! - **Backtesting**: the portfolio against equal-weight and risk-free
//!   benchmarks under shared shocks
//!
//! Every stochastic entry point takes a [`SimulationRng`]. Identical seed,
//! inputs and configuration give identical output.
//!
//! ## Example
//!
//! ```rust
//! use bondsmith_risk::prelude::*;
//! use nalgebra::DMatrix;
//!
//! let cov = DMatrix::from_row_slice(2, 2, &[0.0064, 0.002, 0.002, 0.01]);
//! let inputs = PortfolioInputs::new(vec![0.6, 0.4], vec![0.045, 0.055], cov).unwrap();
//!
//! let config = MonteCarloConfig::default().with_simulations(1_000);
//! let result = run_monte_carlo(&inputs, 100_000.0, &config, &mut config.rng()).unwrap();
//! let tail = result.tail(0.95).unwrap();
//! assert!(tail.cvar_dollar >= tail.var_dollar);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod backtest;
pub mod error;
pub mod inputs;
pub mod monte_carlo;
pub mod rng;
pub mod shocks;
pub mod stress;

pub use backtest::{run_backtest, BacktestConfig, BacktestResult, Cadence};
pub use error::{RiskError, RiskResult};
pub use inputs::PortfolioInputs;
pub use monte_carlo::{run_monte_carlo, MonteCarloConfig, MonteCarloResult, TailRisk};
pub use rng::SimulationRng;
pub use shocks::CorrelatedShocks;
pub use stress::{run_stress_config, run_stress_test, StressConfig, StressReport, StressScenario};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::backtest::{
        run_backtest, BacktestConfig, BacktestPoint, BacktestResult, Cadence, TrackSummary,
    };
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::inputs::PortfolioInputs;
    pub use crate::monte_carlo::{
        run_monte_carlo, HistogramBin, MonteCarloConfig, MonteCarloResult, PercentilePoint,
        TailRisk,
    };
    pub use crate::rng::SimulationRng;
    pub use crate::stress::{
        run_stress_config, run_stress_test, standard, ScenarioResult, SpreadMultiplier,
        StressConfig, StressReport, StressScenario,
    };
}
