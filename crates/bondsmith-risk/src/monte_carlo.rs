//! Monte Carlo Value-at-Risk.
//!
//! Portfolio-level shocks come from [`CorrelatedShocks`]; the horizon log
//! return is
//!
//! ```text
//! r = (w · L z) √dt + (μ − σ²/2) dt,   dt = horizon_days / 252
//! ```
//!
//! and terminal value is `capital · exp(r)`. VaR is read off the sorted P&L at
//! index `⌊(1 − cl) n⌋`; CVaR averages the tail up to and including that
//! index, so CVaR ≥ VaR always holds.

use bondsmith_math::statistics::{self, histogram};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RiskError, RiskResult};
use crate::inputs::PortfolioInputs;
use crate::rng::SimulationRng;
use crate::shocks::CorrelatedShocks;

/// Trading days per year.
pub const TRADING_DAYS: f64 = 252.0;

/// Percentiles reported for the P&L distribution.
pub const REPORTED_PERCENTILES: [f64; 9] = [1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

/// Monte Carlo parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Number of simulated paths.
    pub n_simulations: usize,
    /// Holding period in trading days.
    pub time_horizon_days: u32,
    /// VaR confidence levels, each in (0, 1).
    pub confidence_levels: Vec<f64>,
    /// Histogram bin count.
    pub histogram_bins: usize,
    /// Seed for [`MonteCarloConfig::rng`].
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_simulations: 10_000,
            time_horizon_days: 252,
            confidence_levels: vec![0.90, 0.95, 0.99],
            histogram_bins: 50,
            seed: 42,
        }
    }
}

impl MonteCarloConfig {
    /// Sets the path count.
    #[must_use]
    pub fn with_simulations(mut self, n: usize) -> Self {
        self.n_simulations = n;
        self
    }

    /// Sets the horizon.
    #[must_use]
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.time_horizon_days = days;
        self
    }

    /// Sets the confidence levels.
    #[must_use]
    pub fn with_confidence_levels(mut self, levels: Vec<f64>) -> Self {
        self.confidence_levels = levels;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// A fresh generator from the configured seed.
    #[must_use]
    pub fn rng(&self) -> SimulationRng {
        SimulationRng::from_seed(self.seed)
    }

    /// Rejects zero paths, a zero horizon, zero bins and confidence levels
    /// outside (0, 1).
    pub fn validate(&self) -> RiskResult<()> {
        if self.n_simulations == 0 {
            return Err(RiskError::invalid_config("n_simulations must be positive"));
        }
        if self.time_horizon_days == 0 {
            return Err(RiskError::invalid_config("time_horizon_days must be positive"));
        }
        if self.histogram_bins == 0 {
            return Err(RiskError::invalid_config("histogram_bins must be positive"));
        }
        if let Some(cl) = self
            .confidence_levels
            .iter()
            .find(|cl| !(**cl > 0.0 && **cl < 1.0))
        {
            return Err(RiskError::invalid_config(format!(
                "confidence level {cl} is outside (0, 1)"
            )));
        }
        Ok(())
    }
}

/// VaR and CVaR at one confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailRisk {
    /// Confidence level in (0, 1).
    pub confidence_level: f64,
    /// Loss threshold in currency.
    pub var_dollar: f64,
    /// Mean loss at or beyond the threshold, in currency.
    pub cvar_dollar: f64,
    /// Loss threshold as a percentage log return.
    pub var_pct: f64,
    /// Tail mean as a percentage log return.
    pub cvar_pct: f64,
}

impl TailRisk {
    /// `"95%"` style label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}%", (self.confidence_level * 100.0).round())
    }
}

/// One histogram bar of the P&L distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Left edge.
    pub bin_start: f64,
    /// Right edge.
    pub bin_end: f64,
    /// Midpoint.
    pub bin_mid: f64,
    /// Paths in this bin.
    pub count: usize,
    /// `count / n_simulations`.
    pub frequency: f64,
}

/// A percentile of the P&L distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentilePoint {
    /// Percentile in [0, 100].
    pub percentile: f64,
    /// P&L at that percentile.
    pub pnl: f64,
}

/// Output of a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Paths simulated.
    pub n_simulations: usize,
    /// Horizon in trading days.
    pub time_horizon_days: u32,
    /// Starting capital.
    pub capital: f64,
    /// Expected annual return of the portfolio.
    pub expected_return_annual: f64,
    /// Annual volatility of the portfolio.
    pub expected_volatility_annual: f64,
    /// Mean P&L.
    pub mean_pnl: f64,
    /// Median P&L.
    pub median_pnl: f64,
    /// Population standard deviation of P&L.
    pub std_pnl: f64,
    /// Worst path.
    pub min_pnl: f64,
    /// Best path.
    pub max_pnl: f64,
    /// Percentage of paths with negative P&L.
    pub prob_loss: f64,
    /// VaR and CVaR per requested confidence level, in request order.
    pub var_cvar: Vec<TailRisk>,
    /// P&L histogram.
    pub histogram: Vec<HistogramBin>,
    /// P&L at [`REPORTED_PERCENTILES`].
    pub percentiles: Vec<PercentilePoint>,
}

impl MonteCarloResult {
    /// Tail risk at `confidence_level`, if it was requested.
    #[must_use]
    pub fn tail(&self, confidence_level: f64) -> Option<&TailRisk> {
        self.var_cvar
            .iter()
            .find(|t| (t.confidence_level - confidence_level).abs() < 1e-12)
    }
}

/// Runs the simulation.
///
/// # Errors
///
/// [`RiskError::InvalidConfiguration`] for an invalid `config` (including
/// zero simulations) or non-positive capital.
pub fn run_monte_carlo(
    inputs: &PortfolioInputs,
    capital: f64,
    config: &MonteCarloConfig,
    rng: &mut SimulationRng,
) -> RiskResult<MonteCarloResult> {
    config.validate()?;
    if !(capital.is_finite() && capital > 0.0) {
        return Err(RiskError::invalid_config(format!(
            "capital must be positive, got {capital}"
        )));
    }

    let n = config.n_simulations;
    let dt = f64::from(config.time_horizon_days) / TRADING_DAYS;
    let mu = inputs.expected_return();
    let sigma = inputs.volatility()?;
    let drift = (mu - 0.5 * sigma * sigma) * dt;

    let shocks = CorrelatedShocks::new(inputs.covariance());
    let log_returns: Vec<f64> = shocks
        .portfolio_shocks(rng, inputs.weights(), n)?
        .into_iter()
        .map(|s| s * dt.sqrt() + drift)
        .collect();
    let pnl: Vec<f64> = log_returns
        .iter()
        .map(|r| capital * r.exp() - capital)
        .collect();

    let sorted_pnl = statistics::sorted(&pnl);
    let sorted_returns = statistics::sorted(&log_returns);

    let var_cvar = config
        .confidence_levels
        .iter()
        .map(|&cl| {
            let idx = tail_index(cl, n);
            TailRisk {
                confidence_level: cl,
                var_dollar: -sorted_pnl[idx],
                cvar_dollar: -statistics::mean(&sorted_pnl[..=idx]),
                var_pct: -sorted_returns[idx] * 100.0,
                cvar_pct: -statistics::mean(&sorted_returns[..=idx]) * 100.0,
            }
        })
        .collect();

    let hist = histogram(&pnl, config.histogram_bins)?;
    let histogram = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            bin_start: hist.edges[i],
            bin_end: hist.edges[i + 1],
            bin_mid: 0.5 * (hist.edges[i] + hist.edges[i + 1]),
            count,
            frequency: count as f64 / n as f64,
        })
        .collect();

    let percentiles = REPORTED_PERCENTILES
        .iter()
        .map(|&p| {
            Ok(PercentilePoint {
                percentile: p,
                pnl: statistics::percentile(&sorted_pnl, p)?,
            })
        })
        .collect::<RiskResult<Vec<_>>>()?;

    let losses = pnl.iter().filter(|v| **v < 0.0).count();
    let result = MonteCarloResult {
        n_simulations: n,
        time_horizon_days: config.time_horizon_days,
        capital,
        expected_return_annual: mu,
        expected_volatility_annual: sigma,
        mean_pnl: statistics::mean(&pnl),
        median_pnl: statistics::median(&sorted_pnl)?,
        std_pnl: statistics::population_std(&pnl),
        min_pnl: sorted_pnl[0],
        max_pnl: sorted_pnl[n - 1],
        prob_loss: losses as f64 / n as f64 * 100.0,
        var_cvar,
        histogram,
        percentiles,
    };

    info!(
        simulations = n,
        horizon_days = config.time_horizon_days,
        seed = rng.seed(),
        mean_pnl = result.mean_pnl,
        prob_loss = result.prob_loss,
        "monte carlo complete"
    );
    Ok(result)
}

/// `⌊(1 − cl) n⌋`, clamped into the sample.
fn tail_index(confidence_level: f64, n: usize) -> usize {
    (((1.0 - confidence_level) * n as f64).floor() as usize).min(n - 1)
}
