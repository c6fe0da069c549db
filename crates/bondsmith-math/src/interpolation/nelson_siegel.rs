//! Nelson-Siegel parametric yield curve.

use super::Interpolator;
use crate::error::{MathError, MathResult};

/// Nelson-Siegel zero curve.
///
/// ```text
/// z(t) = β₀ + β₁·L₁(t/τ) + β₂·L₂(t/τ)
/// L₁(x) = (1 − e^(−x)) / x
/// L₂(x) = L₁(x) − e^(−x)
/// ```
///
/// # Example
///
/// ```rust
/// use bondsmith_math::interpolation::{Interpolator, NelsonSiegel};
///
/// let ns = NelsonSiegel::from_lambda(0.05, -0.01, 0.01, 0.5).unwrap();
/// let short = ns.interpolate(0.25).unwrap();
/// let long = ns.interpolate(30.0).unwrap();
/// assert!(short < long);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelsonSiegel {
    beta0: f64,
    beta1: f64,
    beta2: f64,
    tau: f64,
}

impl NelsonSiegel {
    /// Creates a curve from betas and the decay time `tau` (years).
    ///
    /// # Errors
    ///
    /// Returns an error if `tau` is not positive.
    pub fn new(beta0: f64, beta1: f64, beta2: f64, tau: f64) -> MathResult<Self> {
        if !(tau.is_finite() && tau > 0.0) {
            return Err(MathError::invalid_input(format!(
                "tau must be positive, got {tau}"
            )));
        }
        Ok(Self {
            beta0,
            beta1,
            beta2,
            tau,
        })
    }

    /// Creates a curve from the decay rate `lambda = 1 / tau`.
    pub fn from_lambda(beta0: f64, beta1: f64, beta2: f64, lambda: f64) -> MathResult<Self> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(MathError::invalid_input(format!(
                "lambda must be positive, got {lambda}"
            )));
        }
        Self::new(beta0, beta1, beta2, 1.0 / lambda)
    }

    /// `(β₀, β₁, β₂, λ)`.
    #[must_use]
    pub fn params(&self) -> (f64, f64, f64, f64) {
        (self.beta0, self.beta1, self.beta2, 1.0 / self.tau)
    }

    /// Zero rate at `t`; maturities at or below zero return the short rate.
    #[must_use]
    pub fn rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }
        let x = t / self.tau;
        let l1 = Self::slope_loading(x);
        self.beta0 + self.beta1 * l1 + self.beta2 * (l1 - (-x).exp())
    }

    fn slope_loading(x: f64) -> f64 {
        if x < 1e-8 {
            1.0 - x / 2.0
        } else {
            (1.0 - (-x).exp()) / x
        }
    }
}

impl Interpolator for NelsonSiegel {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        Ok(self.rate(t))
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        if t <= 0.0 {
            return Ok(0.0);
        }
        let x = t / self.tau;
        let exp_x = (-x).exp();
        let l1 = Self::slope_loading(x);
        let dl1 = (exp_x - l1) / x;
        let dl2 = dl1 + exp_x;
        Ok((self.beta1 * dl1 + self.beta2 * dl2) / self.tau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_limits() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
        assert_relative_eq!(ns.rate(0.0), 0.025);
        assert_relative_eq!(ns.rate(1e-10), 0.025, epsilon = 1e-9);
        assert_relative_eq!(ns.rate(1000.0), 0.045, epsilon = 1e-4);
    }

    #[test]
    fn test_lambda_matches_tau() {
        let a = NelsonSiegel::from_lambda(0.05, -0.01, 0.01, 0.5).unwrap();
        let b = NelsonSiegel::new(0.05, -0.01, 0.01, 2.0).unwrap();
        assert_relative_eq!(a.rate(7.3), b.rate(7.3), epsilon = 1e-15);
        assert_relative_eq!(a.params().3, 0.5);
    }

    #[test]
    fn test_known_value() {
        // λ = 0.5, t = 2 → x = 1
        let ns = NelsonSiegel::from_lambda(0.05, -0.01, 0.01, 0.5).unwrap();
        let l1 = 1.0 - (-1.0f64).exp();
        let expected = 0.05 - 0.01 * l1 + 0.01 * (l1 - (-1.0f64).exp());
        assert_relative_eq!(ns.rate(2.0), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
        let h = 1e-6;
        let fd = (ns.rate(5.0 + h) - ns.rate(5.0 - h)) / (2.0 * h);
        assert_relative_eq!(ns.derivative(5.0).unwrap(), fd, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_decay() {
        assert!(NelsonSiegel::new(0.05, 0.0, 0.0, 0.0).is_err());
        assert!(NelsonSiegel::from_lambda(0.05, 0.0, 0.0, -1.0).is_err());
    }
}
