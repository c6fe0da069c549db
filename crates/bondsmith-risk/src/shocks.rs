//! Correlated normal shocks from a covariance matrix.
//!
//! Raw draws are clipped to ±[`SHOCK_CLIP`] before correlation so a
//! pathological draw cannot overflow the exponentials downstream.

use bondsmith_math::linear_algebra::{cholesky_or_diagonal, CholeskyFactor};
use nalgebra::DMatrix;
use tracing::debug;

use crate::error::RiskResult;
use crate::rng::SimulationRng;

/// Raw standard-normal draws are clipped to this many standard deviations.
pub const SHOCK_CLIP: f64 = 10.0;

/// Diagonal jitter added before factoring.
pub const FACTOR_JITTER: f64 = 1e-8;

/// Generates vectors `L z` with `L Lᵀ = Σ + jitter·I`.
#[derive(Debug, Clone)]
pub struct CorrelatedShocks {
    factor: CholeskyFactor,
}

impl CorrelatedShocks {
    /// Factors `covariance`, falling back to its diagonal square root when
    /// it is not positive-definite.
    #[must_use]
    pub fn new(covariance: &DMatrix<f64>) -> Self {
        let factor = cholesky_or_diagonal(covariance, FACTOR_JITTER);
        debug!(
            dim = factor.dim(),
            diagonal_fallback = factor.diagonal_fallback,
            "factored covariance"
        );
        Self { factor }
    }

    /// Number of instruments per shock vector.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.factor.dim()
    }

    /// True when correlations were dropped by the diagonal fallback.
    #[must_use]
    pub fn is_diagonal_fallback(&self) -> bool {
        self.factor.diagonal_fallback
    }

    /// Draws one correlated shock vector.
    pub fn draw(&self, rng: &mut SimulationRng) -> RiskResult<Vec<f64>> {
        let mut z = vec![0.0; self.dim()];
        rng.fill_normal(&mut z);
        for v in &mut z {
            *v = v.clamp(-SHOCK_CLIP, SHOCK_CLIP);
        }
        Ok(self.factor.correlate(&z)?)
    }

    /// Draws `rows` shock vectors, one per simulation or period.
    pub fn draw_many(&self, rng: &mut SimulationRng, rows: usize) -> RiskResult<Vec<Vec<f64>>> {
        (0..rows).map(|_| self.draw(rng)).collect()
    }

    /// Draws `rows` shocks and returns each one's dot product with `weights`.
    pub fn portfolio_shocks(
        &self,
        rng: &mut SimulationRng,
        weights: &[f64],
        rows: usize,
    ) -> RiskResult<Vec<f64>> {
        (0..rows)
            .map(|_| {
                let shock = self.draw(rng)?;
                Ok(weights.iter().zip(&shock).map(|(w, s)| w * s).sum())
            })
            .collect()
    }
}
