//! Backtest against equal-weight and risk-free benchmarks.
//!
//! The optimized and equal-weight tracks see the same correlated shock
//! matrix each period, so their difference reflects weights alone. Period
//! return for a track with weights `w`, return `μ` and volatility `σ` is
//! `μ dt + σ √dt (w · shock)`.

use std::fmt;
use std::str::FromStr;

use bondsmith_math::statistics::{mean, population_std};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RiskError, RiskResult};
use crate::inputs::PortfolioInputs;
use crate::rng::SimulationRng;
use crate::shocks::CorrelatedShocks;

/// Period length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Twelve periods a year.
    #[default]
    Monthly,
    /// Four periods a year.
    Quarterly,
}

impl Cadence {
    /// Periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
        }
    }

    /// Period length in years.
    #[must_use]
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.periods_per_year())
    }

    /// Label for period `i`: `M3`, `Q1`, ...
    #[must_use]
    pub fn label(&self, i: usize) -> String {
        match self {
            Self::Monthly => format!("M{i}"),
            Self::Quarterly => format!("Q{i}"),
        }
    }

    /// Lowercase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl FromStr for Cadence {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "m" => Ok(Self::Monthly),
            "quarterly" | "q" => Ok(Self::Quarterly),
            other => Err(RiskError::invalid_config(format!(
                "unknown period cadence '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backtest parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Number of simulated periods.
    pub n_periods: usize,
    /// Period length.
    pub cadence: Cadence,
    /// Annual risk-free accrual rate.
    pub risk_free_rate: f64,
    /// Seed for [`BacktestConfig::rng`].
    pub seed: u64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            n_periods: 12,
            cadence: Cadence::Monthly,
            risk_free_rate: 0.04,
            seed: 42,
        }
    }
}

impl BacktestConfig {
    /// Sets the period count.
    #[must_use]
    pub fn with_periods(mut self, n: usize) -> Self {
        self.n_periods = n;
        self
    }

    /// Sets the cadence.
    #[must_use]
    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
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

    /// Rejects zero periods and a non-finite or negative risk-free rate.
    pub fn validate(&self) -> RiskResult<()> {
        if self.n_periods == 0 {
            return Err(RiskError::invalid_config("n_periods must be positive"));
        }
        if !(self.risk_free_rate.is_finite() && self.risk_free_rate >= 0.0) {
            return Err(RiskError::invalid_config(format!(
                "risk_free_rate must be non-negative, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }
}

/// Track values at one period boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestPoint {
    /// Label, `M0`, `M1`, ...
    pub period: String,
    /// Index, 0 for the starting point.
    pub period_num: usize,
    /// Optimized portfolio value.
    pub optimized: f64,
    /// Equal-weight portfolio value.
    pub equal_weight: f64,
    /// Risk-free accrual value.
    pub risk_free: f64,
}

/// Summary of a risky track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// `(final − start) / start`.
    pub total_return: f64,
    /// Ending value.
    pub final_value: f64,
    /// Largest peak-to-trough decline as a fraction of the peak.
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio of realized period returns.
    pub sharpe: f64,
    /// Ex-ante yield of the track's weights.
    pub portfolio_yield: f64,
    /// Ex-ante volatility of the track's weights.
    pub portfolio_volatility: f64,
}

/// Summary of the risk-free track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFreeSummary {
    /// `(final − start) / start`.
    pub total_return: f64,
    /// Ending value.
    pub final_value: f64,
    /// Annual accrual rate.
    pub rate: f64,
}

/// Output of a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Periods simulated.
    pub n_periods: usize,
    /// Period length.
    pub cadence: Cadence,
    /// `n_periods + 1` points, starting at the initial capital.
    pub time_series: Vec<BacktestPoint>,
    /// Optimized track.
    pub optimized: TrackSummary,
    /// Equal-weight track.
    pub equal_weight: TrackSummary,
    /// Risk-free track.
    pub risk_free: RiskFreeSummary,
    /// Optimized minus equal-weight total return.
    pub alpha_vs_benchmark: f64,
    /// Optimized minus risk-free total return.
    pub alpha_vs_riskfree: f64,
}

/// Runs the backtest.
///
/// # Errors
///
/// [`RiskError::InvalidConfiguration`] for zero periods, a bad risk-free
/// rate or non-positive capital.
pub fn run_backtest(
    inputs: &PortfolioInputs,
    capital: f64,
    config: &BacktestConfig,
    rng: &mut SimulationRng,
) -> RiskResult<BacktestResult> {
    config.validate()?;
    if !(capital.is_finite() && capital > 0.0) {
        return Err(RiskError::invalid_config(format!(
            "capital must be positive, got {capital}"
        )));
    }

    let n = inputs.len();
    let dt = config.cadence.dt();
    let weights = inputs.weights();
    let equal = vec![1.0 / n as f64; n];

    let opt_return = inputs.expected_return();
    let opt_vol = inputs.volatility()?;
    let eq_return = inputs.return_of(&equal);
    let eq_vol = inputs.volatility_of(&equal)?;

    let shocks = CorrelatedShocks::new(inputs.covariance()).draw_many(rng, config.n_periods)?;

    let mut opt = Track::new(capital);
    let mut eq = Track::new(capital);
    let mut rf = vec![capital];
    for shock in &shocks {
        opt.step(opt_return * dt + opt_vol * dt.sqrt() * dot(weights, shock));
        eq.step(eq_return * dt + eq_vol * dt.sqrt() * dot(&equal, shock));
        let last = rf[rf.len() - 1];
        rf.push(last * (1.0 + config.risk_free_rate * dt));
    }

    let time_series = (0..=config.n_periods)
        .map(|i| BacktestPoint {
            period: config.cadence.label(i),
            period_num: i,
            optimized: opt.values[i],
            equal_weight: eq.values[i],
            risk_free: rf[i],
        })
        .collect();

    let ann = f64::from(config.cadence.periods_per_year());
    let optimized = opt.summary(capital, ann, config.risk_free_rate, opt_return, opt_vol);
    let equal_weight = eq.summary(capital, ann, config.risk_free_rate, eq_return, eq_vol);
    let rf_final = rf[rf.len() - 1];
    let risk_free = RiskFreeSummary {
        total_return: (rf_final - capital) / capital,
        final_value: rf_final,
        rate: config.risk_free_rate,
    };

    let result = BacktestResult {
        n_periods: config.n_periods,
        cadence: config.cadence,
        time_series,
        alpha_vs_benchmark: optimized.total_return - equal_weight.total_return,
        alpha_vs_riskfree: optimized.total_return - risk_free.total_return,
        optimized,
        equal_weight,
        risk_free,
    };
    info!(
        periods = config.n_periods,
        cadence = %config.cadence,
        seed = rng.seed(),
        alpha = result.alpha_vs_benchmark,
        "backtest complete"
    );
    Ok(result)
}

/// Largest peak-to-trough decline along `values`, as a fraction of the peak.
#[must_use]
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut mdd = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            mdd = mdd.max((peak - v) / peak);
        }
    }
    mdd
}

/// `(mean · ann − rf) / (std · √ann)` of period returns; 0 when the
/// standard deviation is 0.
#[must_use]
pub fn annualized_sharpe(period_returns: &[f64], periods_per_year: f64, risk_free: f64) -> f64 {
    let sd = population_std(period_returns);
    if sd > 0.0 {
        (mean(period_returns) * periods_per_year - risk_free) / (sd * periods_per_year.sqrt())
    } else {
        0.0
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

struct Track {
    values: Vec<f64>,
    returns: Vec<f64>,
}

impl Track {
    fn new(capital: f64) -> Self {
        Self {
            values: vec![capital],
            returns: Vec::new(),
        }
    }

    fn step(&mut self, period_return: f64) {
        let last = self.values[self.values.len() - 1];
        self.values.push(last * (1.0 + period_return));
        self.returns.push(period_return);
    }

    fn summary(&self, capital: f64, ann: f64, rf: f64, yield_rate: f64, vol: f64) -> TrackSummary {
        let final_value = self.values[self.values.len() - 1];
        TrackSummary {
            total_return: (final_value - capital) / capital,
            final_value,
            max_drawdown: max_drawdown(&self.values),
            sharpe: annualized_sharpe(&self.returns, ann, rf),
            portfolio_yield: yield_rate,
            portfolio_volatility: vol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bondsmith_core::{CreditRating, Instrument, Sector};

    fn inputs() -> PortfolioInputs {
        let bonds = vec![
            Instrument::new("A", "A", Sector::Energy, CreditRating::A, 4.0, 0.045, 0.08, 100.0).unwrap(),
            Instrument::new("B", "B", Sector::Utilities, CreditRating::BB, 6.0, 0.07, 0.15, 100.0).unwrap(),
            Instrument::new("C", "C", Sector::Technology, CreditRating::AA, 3.0, 0.04, 0.06, 100.0).unwrap(),
        ];
        PortfolioInputs::from_instruments(&bonds, &[0.2, 0.5, 0.3]).unwrap()
    }

    #[test]
    fn test_series_length_and_labels() {
        let config = BacktestConfig::default();
        let r = run_backtest(&inputs(), 100_000.0, &config, &mut config.rng()).unwrap();
        assert_eq!(r.time_series.len(), 13);
        assert_eq!(r.time_series[0].period, "M0");
        assert_eq!(r.time_series[12].period, "M12");
        assert_relative_eq!(r.time_series[0].optimized, 100_000.0);
        assert_relative_eq!(r.time_series[0].equal_weight, 100_000.0);

        let config = BacktestConfig::default().with_cadence(Cadence::Quarterly).with_periods(8);
        let r = run_backtest(&inputs(), 100_000.0, &config, &mut config.rng()).unwrap();
        assert_eq!(r.time_series.len(), 9);
        assert_eq!(r.time_series[8].period, "Q8");
    }

    #[test]
    fn test_risk_free_track() {
        let config = BacktestConfig::default();
        let r = run_backtest(&inputs(), 1_000.0, &config, &mut config.rng()).unwrap();
        for pair in r.time_series.windows(2) {
            assert!(pair[1].risk_free >= pair[0].risk_free);
        }
        let expected = 1_000.0 * (1.0 + 0.04 / 12.0_f64).powi(12);
        assert_relative_eq!(r.risk_free.final_value, expected, epsilon = 1e-9);
        assert_relative_eq!(r.alpha_vs_riskfree, r.optimized.total_return - r.risk_free.total_return);
    }

    #[test]
    fn test_summary_fields() {
        let inputs = inputs();
        let config = BacktestConfig::default();
        let r = run_backtest(&inputs, 1_000.0, &config, &mut config.rng()).unwrap();
        assert_relative_eq!(r.optimized.portfolio_yield, inputs.expected_return());
        assert_relative_eq!(r.equal_weight.portfolio_yield, (0.045 + 0.07 + 0.04) / 3.0, epsilon = 1e-12);
        assert!(r.optimized.max_drawdown >= 0.0 && r.optimized.max_drawdown < 1.0);
        assert_relative_eq!(
            r.alpha_vs_benchmark,
            r.optimized.total_return - r.equal_weight.total_return
        );
    }

    #[test]
    fn test_reproducible() {
        let config = BacktestConfig::default().with_seed(99);
        let a = run_backtest(&inputs(), 1_000.0, &config, &mut config.rng()).unwrap();
        let b = run_backtest(&inputs(), 1_000.0, &config, &mut config.rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_periods_rejected() {
        let config = BacktestConfig::default().with_periods(0);
        assert!(matches!(
            run_backtest(&inputs(), 1_000.0, &config, &mut config.rng()),
            Err(RiskError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_max_drawdown() {
        assert_relative_eq!(max_drawdown(&[100.0, 120.0, 90.0, 110.0, 80.0]), 40.0 / 120.0);
        assert_relative_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_relative_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_annualized_sharpe() {
        assert_relative_eq!(annualized_sharpe(&[0.01, 0.01], 12.0, 0.04), 0.0);
        let s = annualized_sharpe(&[0.02, 0.0], 12.0, 0.04);
        // mean 0.01, std 0.01
        assert_relative_eq!(s, (0.12 - 0.04) / (0.01 * 12.0_f64.sqrt()), epsilon = 1e-12);
    }

    #[test]
    fn test_cadence_parse() {
        assert_eq!("Monthly".parse::<Cadence>().unwrap(), Cadence::Monthly);
        assert_eq!("quarterly".parse::<Cadence>().unwrap(), Cadence::Quarterly);
        assert!("weekly".parse::<Cadence>().is_err());
        assert_relative_eq!(Cadence::Quarterly.dt(), 0.25);
    }
}
