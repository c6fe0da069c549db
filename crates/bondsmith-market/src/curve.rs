//! Treasury base curve.

use bondsmith_math::interpolation::NelsonSiegel;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};

/// Fallback pillar maturities in years (3M, 5Y, 10Y, 30Y).
pub const FALLBACK_MATURITIES: [f64; 4] = [0.25, 5.0, 10.0, 30.0];

/// Fallback pillar rates matching [`FALLBACK_MATURITIES`].
pub const FALLBACK_RATES: [f64; 4] = [0.04, 0.042, 0.045, 0.048];

/// Nelson-Siegel parameters `(β₀, β₁, β₂, λ)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Long-run level.
    pub beta0: f64,
    /// Slope loading.
    pub beta1: f64,
    /// Curvature loading.
    pub beta2: f64,
    /// Decay rate.
    pub lambda: f64,
}

impl CurveParams {
    /// Parameters used when no fitted curve is available.
    pub const FALLBACK: Self = Self {
        beta0: 0.05,
        beta1: -0.01,
        beta2: 0.01,
        lambda: 0.5,
    };
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Treasury curve: observed pillars plus the fitted parametric model used to
/// price base yields at arbitrary durations.
#[derive(Debug, Clone, Serialize)]
pub struct TreasuryCurve {
    maturities: Vec<f64>,
    rates: Vec<f64>,
    ns_params: CurveParams,
    #[serde(skip)]
    model: NelsonSiegel,
}

impl TreasuryCurve {
    /// Builds a curve from pillars and Nelson-Siegel parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the pillars are empty, mismatched in length, not
    /// strictly increasing, or if `lambda` is not positive.
    pub fn new(maturities: Vec<f64>, rates: Vec<f64>, params: CurveParams) -> MarketResult<Self> {
        if maturities.is_empty() {
            return Err(MarketError::invalid_config("curve needs at least one pillar"));
        }
        if maturities.len() != rates.len() {
            return Err(MarketError::invalid_config(format!(
                "{} maturities but {} rates",
                maturities.len(),
                rates.len()
            )));
        }
        if maturities.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MarketError::invalid_config(
                "curve maturities must be strictly increasing",
            ));
        }
        let model =
            NelsonSiegel::from_lambda(params.beta0, params.beta1, params.beta2, params.lambda)?;
        Ok(Self {
            maturities,
            rates,
            ns_params: params,
            model,
        })
    }

    /// The curve used when live rates are unavailable.
    pub fn fallback() -> MarketResult<Self> {
        Self::new(
            FALLBACK_MATURITIES.to_vec(),
            FALLBACK_RATES.to_vec(),
            CurveParams::FALLBACK,
        )
    }

    /// Pillar maturities in years.
    #[must_use]
    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    /// Pillar rates as decimals.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Nelson-Siegel parameters.
    #[must_use]
    pub fn params(&self) -> CurveParams {
        self.ns_params
    }

    /// Model base yield at `duration` years.
    #[must_use]
    pub fn base_yield(&self, duration: f64) -> f64 {
        self.model.rate(duration)
    }
}

/// Something that can produce a treasury curve.
pub trait CurveSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Produces the current curve.
    fn fetch(&self) -> MarketResult<TreasuryCurve>;
}

/// Always returns [`TreasuryCurve::fallback`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCurveSource;

impl CurveSource for FallbackCurveSource {
    fn name(&self) -> &str {
        "fallback"
    }

    fn fetch(&self) -> MarketResult<TreasuryCurve> {
        TreasuryCurve::fallback()
    }
}

/// Serves a fixed parameter set over the fallback pillars.
#[derive(Debug, Clone, Copy)]
pub struct StaticCurveSource {
    params: CurveParams,
}

impl StaticCurveSource {
    /// Creates a source for the given parameters.
    #[must_use]
    pub fn new(params: CurveParams) -> Self {
        Self { params }
    }
}

impl CurveSource for StaticCurveSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> MarketResult<TreasuryCurve> {
        TreasuryCurve::new(
            FALLBACK_MATURITIES.to_vec(),
            FALLBACK_RATES.to_vec(),
            self.params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fallback_curve() {
        let curve = TreasuryCurve::fallback().unwrap();
        assert_eq!(curve.maturities(), &FALLBACK_MATURITIES);
        assert_eq!(curve.rates(), &FALLBACK_RATES);
        assert_eq!(curve.params(), CurveParams::FALLBACK);

        // Short end is β₀ + β₁, long end tends to β₀.
        assert_relative_eq!(curve.base_yield(0.0), 0.04, epsilon = 1e-12);
        assert!(curve.base_yield(30.0) > curve.base_yield(1.0));
        assert!(curve.base_yield(30.0) < 0.05);
    }

    #[test]
    fn test_new_rejects_bad_pillars() {
        let p = CurveParams::FALLBACK;
        assert!(TreasuryCurve::new(vec![], vec![], p).is_err());
        assert!(TreasuryCurve::new(vec![1.0, 2.0], vec![0.04], p).is_err());
        assert!(TreasuryCurve::new(vec![2.0, 1.0], vec![0.04, 0.04], p).is_err());

        let bad = CurveParams { lambda: 0.0, ..p };
        assert!(matches!(
            TreasuryCurve::new(vec![1.0], vec![0.04], bad),
            Err(MarketError::Curve(_))
        ));
    }

    #[test]
    fn test_static_source_uses_params() {
        let params = CurveParams {
            beta0: 0.06,
            ..CurveParams::FALLBACK
        };
        let curve = StaticCurveSource::new(params).fetch().unwrap();
        assert_relative_eq!(curve.base_yield(0.0), 0.05, epsilon = 1e-12);
        assert_eq!(FallbackCurveSource.name(), "fallback");
    }
}
