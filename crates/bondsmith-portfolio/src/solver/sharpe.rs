//! Sharpe ratio maximization.
//!
//! The negative Sharpe ratio is minimized over the constraint polytope with
//! the conditional gradient method. The search starts from the feasible
//! point nearest (L1) to uniform weights.

use bondsmith_core::Instrument;
use bondsmith_math::linear_algebra::{mat_vec, quadratic_form};
use bondsmith_math::optimization::{closest_feasible_point, conditional_gradient, OptimizationConfig};
use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::constraints::ConstraintSystem;
use crate::covariance::synthesize_covariance;
use crate::error::{PortfolioError, PortfolioResult, SolverKind};

/// `f(w) = −(μ·w − r_f) / sqrt(wᵀCw)`.
#[derive(Debug, Clone)]
pub struct SharpeObjective {
    returns: Vec<f64>,
    covariance: DMatrix<f64>,
    risk_free: f64,
}

impl SharpeObjective {
    /// Creates the objective.
    ///
    /// # Errors
    ///
    /// Returns an error if `covariance` is not `n × n` for `n = returns.len()`.
    pub fn new(
        returns: Vec<f64>,
        covariance: DMatrix<f64>,
        risk_free: f64,
    ) -> PortfolioResult<Self> {
        let n = returns.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(PortfolioError::dimension_mismatch(n, covariance.nrows()));
        }
        Ok(Self {
            returns,
            covariance,
            risk_free,
        })
    }

    fn excess_and_vol(&self, w: &[f64]) -> (f64, f64) {
        let excess = w.iter().zip(&self.returns).map(|(a, b)| a * b).sum::<f64>() - self.risk_free;
        let vol = quadratic_form(w, &self.covariance)
            .map(|q| q.max(0.0).sqrt())
            .unwrap_or(0.0);
        (excess, vol)
    }

    /// Objective value; `+∞` when volatility is exactly zero.
    #[must_use]
    pub fn value(&self, w: &[f64]) -> f64 {
        let (excess, vol) = self.excess_and_vol(w);
        if vol == 0.0 {
            return f64::INFINITY;
        }
        -excess / vol
    }

    /// Analytic gradient `−(μ/σ − (μ·w − r_f)·Cw/σ³)`.
    ///
    /// Returns non-finite entries when volatility is zero.
    #[must_use]
    pub fn gradient(&self, w: &[f64]) -> Vec<f64> {
        let (excess, vol) = self.excess_and_vol(w);
        if vol == 0.0 {
            return vec![f64::NAN; w.len()];
        }
        let cw = mat_vec(&self.covariance, w).unwrap_or_else(|_| vec![f64::NAN; w.len()]);
        let vol3 = vol * vol * vol;
        self.returns
            .iter()
            .zip(&cw)
            .map(|(mu, c)| -(mu / vol - excess * c / vol3))
            .collect()
    }
}

/// Maximizes the Sharpe ratio over the constraint polytope.
pub(crate) fn maximize_sharpe(
    universe: &[Instrument],
    system: &ConstraintSystem,
    risk_free: f64,
    config: &OptimizationConfig,
) -> PortfolioResult<Vec<f64>> {
    let n = universe.len();
    let objective = SharpeObjective::new(
        universe.iter().map(|b| b.yield_rate).collect(),
        synthesize_covariance(universe),
        risk_free,
    )?;
    let polytope = system.polytope()?;
    let fail = |e: bondsmith_math::MathError| PortfolioError::infeasible(SolverKind::NonLinear, e.to_string());

    let uniform = vec![1.0 / n as f64; n];
    let start = closest_feasible_point(&polytope, &uniform, &config.simplex).map_err(fail)?;
    debug!(
        moved = start.iter().zip(&uniform).map(|(a, b)| (a - b).abs()).sum::<f64>(),
        "projected uniform start onto constraints"
    );

    let result = conditional_gradient(
        |w| objective.value(w),
        |w| objective.gradient(w),
        &polytope,
        &start,
        config,
    )
    .map_err(fail)?;

    if !result.converged {
        warn!(
            iterations = result.iterations,
            gap = result.gap,
            "sharpe optimizer stopped before reaching tolerance"
        );
    }
    Ok(result.parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_value_infinite_at_zero_vol() {
        let obj = SharpeObjective::new(vec![0.05, 0.06], DMatrix::zeros(2, 2), 0.01).unwrap();
        assert_eq!(obj.value(&[0.5, 0.5]), f64::INFINITY);
    }

    #[test]
    fn test_value_is_negative_sharpe() {
        let cov = DMatrix::from_row_slice(1, 1, &[0.04]);
        let obj = SharpeObjective::new(vec![0.06], cov, 0.02).unwrap();
        assert_relative_eq!(obj.value(&[1.0]), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let cov = DMatrix::from_row_slice(3, 3, &[
            0.010, 0.003, 0.002,
            0.003, 0.020, 0.004,
            0.002, 0.004, 0.030,
        ]);
        let obj = SharpeObjective::new(vec![0.04, 0.05, 0.07], cov, 0.01).unwrap();
        let w = [0.2, 0.3, 0.5];
        let g = obj.gradient(&w);
        let h = 1e-7;
        for i in 0..3 {
            let mut up = w;
            let mut dn = w;
            up[i] += h;
            dn[i] -= h;
            let fd = (obj.value(&up) - obj.value(&dn)) / (2.0 * h);
            assert_relative_eq!(g[i], fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(SharpeObjective::new(vec![0.05], DMatrix::zeros(2, 2), 0.0).is_err());
    }
}
