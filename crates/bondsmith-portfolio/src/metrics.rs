//! Portfolio metrics as pure functions of weights and instrument attributes.

use bondsmith_core::Instrument;
use bondsmith_math::linear_algebra::quadratic_form;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::covariance::synthesize_covariance;
use crate::error::{PortfolioError, PortfolioResult};

/// `Σ wᵢ rᵢ`.
pub fn expected_return(weights: &[f64], returns: &[f64]) -> PortfolioResult<f64> {
    if weights.len() != returns.len() {
        return Err(PortfolioError::dimension_mismatch(weights.len(), returns.len()));
    }
    Ok(weights.iter().zip(returns).map(|(w, r)| w * r).sum())
}

/// `sqrt(max(wᵀ C w, 0))`.
///
/// The clamp absorbs small negative quadratic forms from rounding on a
/// near-singular matrix.
pub fn volatility(weights: &[f64], covariance: &DMatrix<f64>) -> PortfolioResult<f64> {
    let q = quadratic_form(weights, covariance)
        .map_err(|_| PortfolioError::dimension_mismatch(weights.len(), covariance.nrows()))?;
    Ok(q.max(0.0).sqrt())
}

/// Sharpe ratio for reporting; 0 when volatility is exactly 0.
pub fn sharpe(
    weights: &[f64],
    returns: &[f64],
    covariance: &DMatrix<f64>,
    risk_free: f64,
) -> PortfolioResult<f64> {
    let ret = expected_return(weights, returns)?;
    let vol = volatility(weights, covariance)?;
    Ok(sharpe_from(ret, vol, risk_free))
}

/// `(ret − rf) / vol`, or 0 when `vol` is 0.
#[must_use]
pub fn sharpe_from(ret: f64, vol: f64, risk_free: f64) -> f64 {
    if vol > 0.0 {
        (ret - risk_free) / vol
    } else {
        0.0
    }
}

/// Realized metrics of a weighted portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Weighted yield.
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    /// Weighted duration in years.
    pub duration: f64,
    /// Volatility from the synthesized covariance.
    pub volatility: f64,
    /// Sharpe ratio against the supplied risk-free rate.
    pub sharpe: f64,
}

impl PortfolioMetrics {
    /// All-zero metrics, reported for an empty portfolio.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Computes metrics for `weights` over `instruments`, synthesizing the
    /// covariance of exactly that instrument set.
    pub fn compute(
        instruments: &[Instrument],
        weights: &[f64],
        risk_free: f64,
    ) -> PortfolioResult<Self> {
        let covariance = synthesize_covariance(instruments);
        Self::compute_with(instruments, weights, &covariance, risk_free)
    }

    /// Computes metrics with a caller-supplied covariance.
    pub fn compute_with(
        instruments: &[Instrument],
        weights: &[f64],
        covariance: &DMatrix<f64>,
        risk_free: f64,
    ) -> PortfolioResult<Self> {
        if instruments.is_empty() {
            return Ok(Self::zero());
        }
        let yields: Vec<f64> = instruments.iter().map(|b| b.yield_rate).collect();
        let durations: Vec<f64> = instruments.iter().map(|b| b.duration).collect();
        let yield_rate = expected_return(weights, &yields)?;
        let duration = expected_return(weights, &durations)?;
        let vol = volatility(weights, covariance)?;
        Ok(Self {
            yield_rate,
            duration,
            volatility: vol,
            sharpe: sharpe_from(yield_rate, vol, risk_free),
        })
    }
}
