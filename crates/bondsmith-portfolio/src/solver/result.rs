//! Solver output: filtered holdings plus realized metrics.

use bondsmith_core::Instrument;
use nalgebra::DMatrix;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::Objective;
use crate::covariance::synthesize_covariance;
use crate::error::{PortfolioError, PortfolioResult};
use crate::metrics::PortfolioMetrics;

/// Allocations at or below this percentage are dropped as dust.
const DUST_PCT: Decimal = dec!(0.01);

/// One surviving holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// The instrument.
    #[serde(flatten)]
    pub instrument: Instrument,
    /// Solver weight, before renormalization.
    pub raw_weight: f64,
    /// Weight renormalized over the surviving holdings.
    pub weight: f64,
    /// `raw_weight × 100`, rounded to 2 dp.
    pub allocation_pct: Decimal,
    /// `raw_weight × capital`, rounded to 2 dp.
    pub investment: Decimal,
}

/// Result of a successful solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedPortfolio {
    /// Objective mode used.
    pub objective: Objective,
    /// Capital allocated.
    pub capital: f64,
    /// Risk-free rate used for the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Holdings above the dust threshold, in universe order.
    pub allocations: Vec<Allocation>,
    /// Metrics over the surviving holdings.
    pub metrics: PortfolioMetrics,
}

impl OptimizedPortfolio {
    /// Post-processes raw solver weights.
    ///
    /// Weights become percentages and dollar amounts (2 dp, half-to-even),
    /// holdings at or below 0.01% are dropped, and metrics are recomputed on
    /// the survivors with weights renormalized to sum to one. No survivors
    /// gives an empty portfolio with zero metrics.
    pub fn from_weights(
        universe: &[Instrument],
        weights: &[f64],
        objective: Objective,
        capital: f64,
        risk_free_rate: f64,
    ) -> PortfolioResult<Self> {
        if weights.len() != universe.len() {
            return Err(PortfolioError::dimension_mismatch(universe.len(), weights.len()));
        }

        let mut allocations = Vec::new();
        for (bond, &w) in universe.iter().zip(weights) {
            let allocation_pct = to_cents(w * 100.0)?;
            if allocation_pct <= DUST_PCT {
                continue;
            }
            allocations.push(Allocation {
                instrument: bond.clone(),
                raw_weight: w,
                weight: w,
                allocation_pct,
                investment: to_cents(w * capital)?,
            });
        }

        let total: f64 = allocations.iter().map(|a| a.raw_weight).sum();
        let metrics = if allocations.is_empty() || total <= 0.0 {
            PortfolioMetrics::zero()
        } else {
            for a in &mut allocations {
                a.weight = a.raw_weight / total;
            }
            let survivors: Vec<Instrument> =
                allocations.iter().map(|a| a.instrument.clone()).collect();
            let renormalized: Vec<f64> = allocations.iter().map(|a| a.weight).collect();
            PortfolioMetrics::compute(&survivors, &renormalized, risk_free_rate)?
        };

        Ok(Self {
            objective,
            capital,
            risk_free_rate,
            allocations,
            metrics,
        })
    }

    /// Number of holdings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// True when every allocation was filtered out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Surviving instruments, in universe order.
    #[must_use]
    pub fn instruments(&self) -> Vec<Instrument> {
        self.allocations.iter().map(|a| a.instrument.clone()).collect()
    }

    /// Renormalized weights of the surviving instruments.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.allocations.iter().map(|a| a.weight).collect()
    }

    /// Covariance of the surviving instruments.
    #[must_use]
    pub fn covariance(&self) -> DMatrix<f64> {
        synthesize_covariance(&self.instruments())
    }

    /// Sum of the rounded allocation percentages.
    #[must_use]
    pub fn total_allocation_pct(&self) -> Decimal {
        self.allocations.iter().map(|a| a.allocation_pct).sum()
    }

    /// Sum of the rounded dollar investments.
    #[must_use]
    pub fn total_investment(&self) -> Decimal {
        self.allocations.iter().map(|a| a.investment).sum()
    }
}

fn to_cents(value: f64) -> PortfolioResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| PortfolioError::degenerate(format!("weight {value} is not representable")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bondsmith_core::{CreditRating, Sector};

    fn universe() -> Vec<Instrument> {
        vec![
            Instrument::new("A", "A", Sector::Energy, CreditRating::AA, 4.0, 0.04, 0.1, 100.0)
                .unwrap(),
            Instrument::new("B", "B", Sector::Energy, CreditRating::AA, 6.0, 0.06, 0.1, 100.0)
                .unwrap(),
            Instrument::new("C", "C", Sector::Energy, CreditRating::AA, 9.0, 0.09, 0.1, 100.0)
                .unwrap(),
        ]
    }

    #[test]
    fn test_dust_dropped_and_renormalized() {
        let w = [0.5, 0.5, 0.00005];
        let p = OptimizedPortfolio::from_weights(&universe(), &w, Objective::MaximizeYield, 1000.0, 0.01)
            .unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.allocations[0].allocation_pct, dec!(50.00));
        assert_relative_eq!(p.weights().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.metrics.duration, 5.0, epsilon = 1e-12);
        assert_relative_eq!(p.metrics.yield_rate, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_rounding_of_amounts() {
        let w = [0.333333, 0.333333, 0.333334];
        let p = OptimizedPortfolio::from_weights(&universe(), &w, Objective::MaximizeYield, 100_000.0, 0.01)
            .unwrap();
        assert_eq!(p.allocations[0].allocation_pct, dec!(33.33));
        assert_eq!(p.allocations[0].investment, dec!(33333.30));
        assert_eq!(p.total_allocation_pct(), dec!(99.99));
    }

    #[test]
    fn test_all_dust_gives_zero_metrics() {
        let w = [0.00001, 0.00002, 0.0];
        let p = OptimizedPortfolio::from_weights(&universe(), &w, Objective::OptimizeSharpe, 1000.0, 0.01)
            .unwrap();
        assert!(p.is_empty());
        assert_eq!(p.metrics, PortfolioMetrics::zero());
    }

    #[test]
    fn test_non_finite_weight_is_degenerate() {
        let w = [f64::NAN, 0.5, 0.5];
        let err = OptimizedPortfolio::from_weights(&universe(), &w, Objective::MaximizeYield, 1000.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, PortfolioError::DegenerateResult { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let err = OptimizedPortfolio::from_weights(&universe(), &[1.0], Objective::MaximizeYield, 1000.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, PortfolioError::DimensionMismatch { .. }));
    }
}
