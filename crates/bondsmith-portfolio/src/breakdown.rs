//! Allocation breakdowns by rating, sector and issuer.
//!
//! Pure aggregations over an [`OptimizedPortfolio`]; nothing is recomputed
//! from the solver.

use std::collections::BTreeMap;

use bondsmith_core::{CreditRating, Sector};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::solver::{Allocation, OptimizedPortfolio};

/// Aggregated figures for one bucket of holdings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketMetrics {
    /// Number of holdings in this bucket.
    pub count: usize,
    /// Sum of rounded allocation percentages (0-100).
    pub allocation_pct: Decimal,
    /// Sum of rounded dollar investments.
    pub investment: Decimal,
    /// Weighted average yield within the bucket.
    pub avg_yield: f64,
    /// Weighted average duration within the bucket.
    pub avg_duration: f64,
    #[serde(skip)]
    weight: f64,
}

impl BucketMetrics {
    fn add(&mut self, a: &Allocation) {
        self.count += 1;
        self.allocation_pct += a.allocation_pct;
        self.investment += a.investment;
        self.weight += a.weight;
        self.avg_yield += a.weight * a.instrument.yield_rate;
        self.avg_duration += a.weight * a.instrument.duration;
    }

    fn finish(&mut self) {
        if self.weight > 0.0 {
            self.avg_yield /= self.weight;
            self.avg_duration /= self.weight;
        }
    }

    /// Returns true if this bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Allocation of a portfolio by rating, sector and issuer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationBreakdown {
    /// By credit rating, best rating first.
    pub by_rating: BTreeMap<CreditRating, BucketMetrics>,
    /// By sector.
    pub by_sector: BTreeMap<Sector, BucketMetrics>,
    /// By issuer name.
    pub by_issuer: BTreeMap<String, BucketMetrics>,
}

impl AllocationBreakdown {
    /// Aggregates the holdings of `portfolio`.
    #[must_use]
    pub fn from_portfolio(portfolio: &OptimizedPortfolio) -> Self {
        let mut out = Self::default();
        for a in &portfolio.allocations {
            out.by_rating.entry(a.instrument.rating).or_default().add(a);
            out.by_sector.entry(a.instrument.sector).or_default().add(a);
            out.by_issuer
                .entry(a.instrument.issuer.clone())
                .or_default()
                .add(a);
        }
        out.by_rating.values_mut().for_each(BucketMetrics::finish);
        out.by_sector.values_mut().for_each(BucketMetrics::finish);
        out.by_issuer.values_mut().for_each(BucketMetrics::finish);
        out
    }

    /// Allocation percentage held in investment-grade ratings.
    #[must_use]
    pub fn investment_grade_pct(&self) -> Decimal {
        self.by_rating
            .iter()
            .filter(|(r, _)| r.is_investment_grade())
            .map(|(_, m)| m.allocation_pct)
            .sum()
    }

    /// Allocation percentage held in high-yield ratings.
    #[must_use]
    pub fn high_yield_pct(&self) -> Decimal {
        self.by_rating
            .iter()
            .filter(|(r, _)| r.is_high_yield())
            .map(|(_, m)| m.allocation_pct)
            .sum()
    }

    /// Sectors sorted by allocation, largest first.
    #[must_use]
    pub fn sectors_by_weight(&self) -> Vec<(Sector, &BucketMetrics)> {
        let mut result: Vec<_> = self.by_sector.iter().map(|(s, m)| (*s, m)).collect();
        result.sort_by(|a, b| b.1.allocation_pct.cmp(&a.1.allocation_pct));
        result
    }

    /// Issuers sorted by allocation, largest first.
    #[must_use]
    pub fn issuers_by_weight(&self) -> Vec<(&str, &BucketMetrics)> {
        let mut result: Vec<_> = self
            .by_issuer
            .iter()
            .map(|(s, m)| (s.as_str(), m))
            .collect();
        result.sort_by(|a, b| b.1.allocation_pct.cmp(&a.1.allocation_pct));
        result
    }
}

impl OptimizedPortfolio {
    /// Breakdown by rating, sector and issuer.
    #[must_use]
    pub fn breakdown(&self) -> AllocationBreakdown {
        AllocationBreakdown::from_portfolio(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Objective;
    use approx::assert_relative_eq;
    use bondsmith_core::Instrument;
    use rust_decimal_macros::dec;

    fn portfolio() -> OptimizedPortfolio {
        let universe = vec![
            Instrument::new("APP-1", "Apple", Sector::Technology, CreditRating::AA, 4.0, 0.04, 0.08, 100.0)
                .unwrap(),
            Instrument::new("APP-2", "Apple", Sector::Technology, CreditRating::AA, 8.0, 0.06, 0.10, 100.0)
                .unwrap(),
            Instrument::new("FOR-1", "Ford", Sector::ConsumerDiscretionary, CreditRating::BB, 5.0, 0.08, 0.15, 100.0)
                .unwrap(),
        ];
        OptimizedPortfolio::from_weights(&universe, &[0.25, 0.25, 0.5], Objective::MaximizeYield, 1000.0, 0.01)
            .unwrap()
    }

    #[test]
    fn test_by_rating() {
        let b = portfolio().breakdown();
        assert_eq!(b.by_rating.len(), 2);
        let aa = &b.by_rating[&CreditRating::AA];
        assert_eq!(aa.count, 2);
        assert_eq!(aa.allocation_pct, dec!(50.00));
        assert_eq!(aa.investment, dec!(500.00));
        assert_relative_eq!(aa.avg_yield, 0.05, epsilon = 1e-12);
        assert_relative_eq!(aa.avg_duration, 6.0, epsilon = 1e-12);
        assert_eq!(b.investment_grade_pct(), dec!(50.00));
        assert_eq!(b.high_yield_pct(), dec!(50.00));
    }

    #[test]
    fn test_by_sector_and_issuer() {
        let b = portfolio().breakdown();
        assert_eq!(b.by_sector[&Sector::ConsumerDiscretionary].count, 1);
        assert_eq!(b.by_issuer["Apple"].count, 2);
        assert_eq!(b.issuers_by_weight().len(), 2);
        let sectors = b.sectors_by_weight();
        assert_eq!(sectors[0].1.allocation_pct, dec!(50.00));
    }

    #[test]
    fn test_empty_portfolio() {
        let universe = vec![Instrument::new("X", "X", Sector::Energy, CreditRating::A, 5.0, 0.05, 0.1, 100.0)
            .unwrap()];
        let p = OptimizedPortfolio::from_weights(&universe, &[0.0], Objective::MaximizeYield, 1000.0, 0.01)
            .unwrap();
        let b = p.breakdown();
        assert!(b.by_rating.is_empty());
        assert_eq!(b.investment_grade_pct(), Decimal::ZERO);
    }
}
