//! Stress impact calculations.

use bondsmith_portfolio::sharpe_from;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::scenarios::{standard, StressScenario};
use crate::error::{RiskError, RiskResult};
use crate::inputs::PortfolioInputs;

/// Stressed yields never fall below this.
pub const MIN_STRESSED_YIELD: f64 = 0.001;

/// Stress run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Catalog keys to run; `None` runs every scenario.
    pub scenario_keys: Option<Vec<String>>,
    /// Risk-free rate for the Sharpe ratios.
    pub risk_free_rate: f64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            scenario_keys: None,
            risk_free_rate: 0.04,
        }
    }
}

impl StressConfig {
    /// The scenarios this config selects. Unknown keys are skipped.
    #[must_use]
    pub fn scenarios(&self) -> Vec<StressScenario> {
        match &self.scenario_keys {
            None => standard::all(),
            Some(keys) => {
                for key in keys {
                    if standard::by_key(key).is_none() {
                        debug!(key = %key, "skipping unknown stress scenario");
                    }
                }
                standard::select(keys)
            }
        }
    }
}

/// Unstressed portfolio figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressBaseline {
    /// Weighted yield.
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    /// Weighted duration.
    pub duration: f64,
    /// Volatility.
    pub volatility: f64,
    /// Sharpe ratio at the configured risk-free rate.
    pub sharpe: f64,
    /// Capital.
    pub capital: f64,
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Catalog key.
    pub scenario: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Unstressed yield.
    pub base_yield: f64,
    /// Weighted stressed yield.
    pub stressed_yield: f64,
    /// Weighted yield change in basis points.
    pub yield_change_bp: f64,
    /// `−D Δy` as a fraction of capital.
    pub price_impact_pct: f64,
    /// `capital × price_impact_pct`.
    pub pnl: f64,
    /// Unstressed volatility.
    pub base_volatility: f64,
    /// Volatility times the scenario multiplier.
    pub stressed_volatility: f64,
    /// Unstressed Sharpe ratio.
    pub base_sharpe: f64,
    /// Sharpe ratio on stressed yield and volatility.
    pub stressed_sharpe: f64,
}

impl ScenarioResult {
    /// Returns true if this is a loss.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }
}

/// Baseline plus one record per scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    /// Unstressed figures.
    pub base_portfolio: StressBaseline,
    /// Scenario results in request order.
    pub scenarios: Vec<ScenarioResult>,
}

impl StressReport {
    /// The scenario with the largest loss.
    #[must_use]
    pub fn worst(&self) -> Option<&ScenarioResult> {
        self.scenarios.iter().min_by(|a, b| a.pnl.total_cmp(&b.pnl))
    }
}

/// Applies `scenarios` to the portfolio.
///
/// # Errors
///
/// [`RiskError::InvalidConfiguration`] if `inputs` carries no instrument
/// attributes or capital is not positive.
pub fn run_stress_test(
    inputs: &PortfolioInputs,
    capital: f64,
    scenarios: &[StressScenario],
    risk_free_rate: f64,
) -> RiskResult<StressReport> {
    let instruments = inputs.instruments();
    if instruments.len() != inputs.len() {
        return Err(RiskError::invalid_config(
            "stress testing needs instrument ratings and durations",
        ));
    }
    if !(capital.is_finite() && capital > 0.0) {
        return Err(RiskError::invalid_config(format!(
            "capital must be positive, got {capital}"
        )));
    }

    let weights = inputs.weights();
    let base_yield = inputs.expected_return();
    let base_duration = inputs.duration();
    let base_vol = inputs.volatility()?;
    let base_sharpe = sharpe_from(base_yield, base_vol, risk_free_rate);

    let results: Vec<ScenarioResult> = scenarios
        .iter()
        .map(|scenario| {
            let stressed: Vec<f64> = instruments
                .iter()
                .map(|b| (b.yield_rate + scenario.yield_change(b.rating)).max(MIN_STRESSED_YIELD))
                .collect();
            let weighted_change: f64 = weights
                .iter()
                .zip(instruments.iter().zip(&stressed))
                .map(|(w, (b, s))| w * (s - b.yield_rate))
                .sum();
            let stressed_yield: f64 = weights.iter().zip(&stressed).map(|(w, y)| w * y).sum();
            let price_impact = -base_duration * weighted_change;
            let stressed_vol = base_vol * scenario.volatility_multiplier;

            ScenarioResult {
                scenario: scenario.key.clone(),
                name: scenario.name.clone(),
                description: scenario.description.clone(),
                base_yield,
                stressed_yield,
                yield_change_bp: weighted_change * 10_000.0,
                price_impact_pct: price_impact,
                pnl: capital * price_impact,
                base_volatility: base_vol,
                stressed_volatility: stressed_vol,
                base_sharpe,
                stressed_sharpe: sharpe_from(stressed_yield, stressed_vol, risk_free_rate),
            }
        })
        .collect();

    let report = StressReport {
        base_portfolio: StressBaseline {
            yield_rate: base_yield,
            duration: base_duration,
            volatility: base_vol,
            sharpe: base_sharpe,
            capital,
        },
        scenarios: results,
    };
    info!(
        scenarios = report.scenarios.len(),
        worst_pnl = report.worst().map_or(0.0, |s| s.pnl),
        "stress test complete"
    );
    Ok(report)
}

/// Runs the scenarios selected by `config`.
pub fn run_stress_config(
    inputs: &PortfolioInputs,
    capital: f64,
    config: &StressConfig,
) -> RiskResult<StressReport> {
    run_stress_test(inputs, capital, &config.scenarios(), config.risk_free_rate)
}
