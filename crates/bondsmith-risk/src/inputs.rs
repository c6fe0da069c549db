//! The portfolio description every risk module consumes.

use bondsmith_core::Instrument;
use bondsmith_math::linear_algebra::quadratic_form;
use bondsmith_portfolio::{synthesize_covariance, OptimizedPortfolio};
use nalgebra::DMatrix;

use crate::error::{RiskError, RiskResult};

/// Weights, expected returns and covariance of one portfolio.
///
/// Built once and shared by Monte Carlo, stress and backtest runs. The
/// constructor checks every dimension so the simulations can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioInputs {
    weights: Vec<f64>,
    returns: Vec<f64>,
    durations: Vec<f64>,
    instruments: Vec<Instrument>,
    covariance: DMatrix<f64>,
}

impl PortfolioInputs {
    /// Inputs from raw vectors.
    ///
    /// `durations` and instrument attributes are unknown here, so stress
    /// testing needs [`PortfolioInputs::from_instruments`] instead.
    pub fn new(weights: Vec<f64>, returns: Vec<f64>, covariance: DMatrix<f64>) -> RiskResult<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(RiskError::invalid_config("portfolio has no holdings"));
        }
        if returns.len() != n {
            return Err(RiskError::dimension_mismatch(n, returns.len()));
        }
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(RiskError::dimension_mismatch(n, covariance.nrows()));
        }
        if weights.iter().chain(&returns).any(|v| !v.is_finite()) {
            return Err(RiskError::invalid_config("weights and returns must be finite"));
        }
        Ok(Self {
            weights,
            returns,
            durations: Vec::new(),
            instruments: Vec::new(),
            covariance,
        })
    }

    /// Inputs for `weights` over `instruments`, with yields as expected
    /// returns and the synthesized covariance of exactly these instruments.
    pub fn from_instruments(instruments: &[Instrument], weights: &[f64]) -> RiskResult<Self> {
        if instruments.len() != weights.len() {
            return Err(RiskError::dimension_mismatch(instruments.len(), weights.len()));
        }
        let mut inputs = Self::new(
            weights.to_vec(),
            instruments.iter().map(|b| b.yield_rate).collect(),
            synthesize_covariance(instruments),
        )?;
        inputs.durations = instruments.iter().map(|b| b.duration).collect();
        inputs.instruments = instruments.to_vec();
        Ok(inputs)
    }

    /// Inputs for the surviving holdings of a solved portfolio.
    pub fn from_portfolio(portfolio: &OptimizedPortfolio) -> RiskResult<Self> {
        Self::from_instruments(&portfolio.instruments(), &portfolio.weights())
    }

    /// Number of holdings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false; an empty portfolio is rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Portfolio weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Expected annual returns.
    #[must_use]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Durations, empty when built from raw vectors.
    #[must_use]
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Instruments, empty when built from raw vectors.
    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Covariance matrix.
    #[must_use]
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// `Σ wᵢ rᵢ` for arbitrary weights over the same holdings.
    pub(crate) fn return_of(&self, weights: &[f64]) -> f64 {
        weights.iter().zip(&self.returns).map(|(w, r)| w * r).sum()
    }

    /// `sqrt(max(wᵀ C w, 0))` for arbitrary weights over the same holdings.
    pub(crate) fn volatility_of(&self, weights: &[f64]) -> RiskResult<f64> {
        Ok(quadratic_form(weights, &self.covariance)?.max(0.0).sqrt())
    }

    /// Expected annual return of the portfolio.
    #[must_use]
    pub fn expected_return(&self) -> f64 {
        self.return_of(&self.weights)
    }

    /// Annual volatility of the portfolio.
    pub fn volatility(&self) -> RiskResult<f64> {
        self.volatility_of(&self.weights)
    }

    /// Weighted duration; 0 when durations are unknown.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.weights.iter().zip(&self.durations).map(|(w, d)| w * d).sum()
    }
}
