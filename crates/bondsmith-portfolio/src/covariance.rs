//! Structural covariance synthesis.
//!
//! Correlations are not estimated from price history. Every distinct pair
//! starts at a base correlation and is lifted when the two instruments share
//! a sector or an investment-grade status. The result is scaled by the
//! volatility vector and ridge-regularized on the diagonal.

use bondsmith_core::Instrument;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Parameters of the sector / credit-tier correlation model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationModel {
    /// Correlation between any two distinct instruments.
    pub base: f64,
    /// Added when both instruments are in the same sector.
    pub same_sector: f64,
    /// Added when both are investment grade, or both are not.
    pub same_grade: f64,
    /// Upper clamp for off-diagonal correlations.
    pub cap: f64,
    /// Added to every diagonal covariance entry.
    pub ridge: f64,
}

impl Default for CorrelationModel {
    fn default() -> Self {
        Self {
            base: 0.25,
            same_sector: 0.30,
            same_grade: 0.15,
            cap: 0.90,
            ridge: 1e-8,
        }
    }
}

impl CorrelationModel {
    /// Correlation between two instruments (1.0 when `same_instrument`).
    #[must_use]
    pub fn pair_correlation(&self, a: &Instrument, b: &Instrument, same_instrument: bool) -> f64 {
        if same_instrument {
            return 1.0;
        }
        let mut rho = self.base;
        if a.sector == b.sector {
            rho += self.same_sector;
        }
        if a.is_investment_grade() == b.is_investment_grade() {
            rho += self.same_grade;
        }
        rho.min(self.cap)
    }

    /// N×N correlation matrix with unit diagonal.
    #[must_use]
    pub fn correlation_matrix(&self, universe: &[Instrument]) -> DMatrix<f64> {
        let n = universe.len();
        DMatrix::from_fn(n, n, |i, j| {
            self.pair_correlation(&universe[i], &universe[j], i == j)
        })
    }

    /// N×N covariance `D·C·D + ridge·I`, with `D = diag(volatility)`.
    ///
    /// An empty universe gives a 0×0 matrix.
    #[must_use]
    pub fn covariance_matrix(&self, universe: &[Instrument]) -> DMatrix<f64> {
        let n = universe.len();
        let corr = self.correlation_matrix(universe);
        DMatrix::from_fn(n, n, |i, j| {
            let cov = universe[i].volatility * corr[(i, j)] * universe[j].volatility;
            if i == j {
                cov + self.ridge
            } else {
                cov
            }
        })
    }
}

/// Covariance matrix of `universe` under the default [`CorrelationModel`].
#[must_use]
pub fn synthesize_covariance(universe: &[Instrument]) -> DMatrix<f64> {
    CorrelationModel::default().covariance_matrix(universe)
}

/// Correlation implied by a covariance matrix entry.
#[must_use]
pub fn implied_correlation(covariance: &DMatrix<f64>, i: usize, j: usize) -> f64 {
    let denom = (covariance[(i, i)] * covariance[(j, j)]).sqrt();
    if denom > 0.0 {
        covariance[(i, j)] / denom
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bondsmith_core::{CreditRating, Sector};

    fn bond(sector: Sector, rating: CreditRating, vol: f64) -> Instrument {
        Instrument::new("X", "X", sector, rating, 5.0, 0.05, vol, 100.0).unwrap()
    }

    #[test]
    fn test_pair_correlations() {
        let model = CorrelationModel::default();
        let tech_aa = bond(Sector::Technology, CreditRating::AA, 0.1);
        let tech_a = bond(Sector::Technology, CreditRating::A, 0.1);
        let tech_bb = bond(Sector::Technology, CreditRating::BB, 0.1);
        let energy_bb = bond(Sector::Energy, CreditRating::BB, 0.1);

        // same sector + same grade: 0.25 + 0.30 + 0.15
        assert_relative_eq!(model.pair_correlation(&tech_aa, &tech_a, false), 0.70, epsilon = 1e-12);
        // same sector only
        assert_relative_eq!(model.pair_correlation(&tech_aa, &tech_bb, false), 0.55, epsilon = 1e-12);
        // same grade only
        assert_relative_eq!(model.pair_correlation(&tech_bb, &energy_bb, false), 0.40, epsilon = 1e-12);
        // nothing shared
        assert_relative_eq!(model.pair_correlation(&tech_aa, &energy_bb, false), 0.25, epsilon = 1e-12);
        assert_relative_eq!(model.pair_correlation(&tech_aa, &tech_aa, true), 1.0);
    }

    #[test]
    fn test_cap_applies() {
        let model = CorrelationModel {
            base: 0.5,
            ..CorrelationModel::default()
        };
        let a = bond(Sector::Energy, CreditRating::AAA, 0.1);
        assert_relative_eq!(model.pair_correlation(&a, &a, false), 0.90);
    }

    #[test]
    fn test_covariance_entries() {
        let universe = vec![
            bond(Sector::Energy, CreditRating::AA, 0.1),
            bond(Sector::Energy, CreditRating::A, 0.2),
        ];
        let cov = synthesize_covariance(&universe);
        assert_relative_eq!(cov[(0, 0)], 0.01 + 1e-8, epsilon = 1e-15);
        assert_relative_eq!(cov[(1, 1)], 0.04 + 1e-8, epsilon = 1e-15);
        assert_relative_eq!(cov[(0, 1)], 0.7 * 0.1 * 0.2, epsilon = 1e-15);
        assert_eq!(cov[(0, 1)], cov[(1, 0)]);
    }

    #[test]
    fn test_empty_universe() {
        let cov = synthesize_covariance(&[]);
        assert_eq!(cov.nrows(), 0);
        assert_eq!(cov.ncols(), 0);
    }

    #[test]
    fn test_implied_correlation() {
        let universe = vec![
            bond(Sector::Energy, CreditRating::AA, 0.1),
            bond(Sector::Utilities, CreditRating::BB, 0.3),
        ];
        let cov = synthesize_covariance(&universe);
        assert_relative_eq!(implied_correlation(&cov, 0, 1), 0.25, epsilon = 1e-6);
    }
}
