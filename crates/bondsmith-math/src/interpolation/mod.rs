//! Curve interpolation.

mod nelson_siegel;

pub use nelson_siegel::NelsonSiegel;

use crate::error::MathResult;

/// A continuous curve `t ↦ y(t)`.
pub trait Interpolator {
    /// Value at `t`.
    fn interpolate(&self, t: f64) -> MathResult<f64>;

    /// First derivative at `t`.
    fn derivative(&self, t: f64) -> MathResult<f64>;
}
