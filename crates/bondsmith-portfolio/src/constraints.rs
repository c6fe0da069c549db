//! Allocation constraints as tagged data.
//!
//! A [`ConstraintSystem`] is built once per solve and serves both objective
//! modes: the linear program reads its rows, the nonlinear solver reads the
//! same rows as a [`Polytope`], and tests compare [`GroupCap`]s structurally.

use std::collections::BTreeSet;

use bondsmith_core::universe::{distinct_sectors, indices_where};
use bondsmith_core::{CreditRating, Instrument, Sector};
use bondsmith_math::optimization::Polytope;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// Investor-specified limits on the allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConstraints {
    /// Required portfolio duration (years).
    pub target_duration: f64,
    /// Per-instrument weight cap, in (0, 1].
    pub max_allocation: f64,
    /// Cap on aggregate weight in junk-rated instruments, in [0, 1].
    pub max_junk_allocation: f64,
    /// Cap on aggregate weight per sector, in [0, 1].
    pub max_sector_allocation: f64,
    /// Ratings treated as junk.
    pub junk_ratings: Vec<CreditRating>,
}

impl Default for AllocationConstraints {
    fn default() -> Self {
        Self {
            target_duration: 5.0,
            max_allocation: 0.2,
            max_junk_allocation: 0.3,
            max_sector_allocation: 0.25,
            junk_ratings: CreditRating::non_investment_grade(),
        }
    }
}

impl AllocationConstraints {
    /// Sets the target duration.
    #[must_use]
    pub fn with_target_duration(mut self, target_duration: f64) -> Self {
        self.target_duration = target_duration;
        self
    }

    /// Sets the per-instrument cap.
    #[must_use]
    pub fn with_max_allocation(mut self, max_allocation: f64) -> Self {
        self.max_allocation = max_allocation;
        self
    }

    /// Sets the junk cap.
    #[must_use]
    pub fn with_max_junk_allocation(mut self, cap: f64) -> Self {
        self.max_junk_allocation = cap;
        self
    }

    /// Sets the per-sector cap.
    #[must_use]
    pub fn with_max_sector_allocation(mut self, cap: f64) -> Self {
        self.max_sector_allocation = cap;
        self
    }

    /// Sets the junk rating set.
    #[must_use]
    pub fn with_junk_ratings(mut self, ratings: Vec<CreditRating>) -> Self {
        self.junk_ratings = ratings;
        self
    }

    /// Checks every bound is in range.
    ///
    /// # Errors
    ///
    /// [`PortfolioError::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !(self.target_duration.is_finite() && self.target_duration > 0.0) {
            return Err(PortfolioError::invalid_config(format!(
                "target_duration must be positive, got {}",
                self.target_duration
            )));
        }
        if !(self.max_allocation > 0.0 && self.max_allocation <= 1.0) {
            return Err(PortfolioError::invalid_config(format!(
                "max_allocation must be in (0, 1], got {}",
                self.max_allocation
            )));
        }
        for (name, value) in [
            ("max_junk_allocation", self.max_junk_allocation),
            ("max_sector_allocation", self.max_sector_allocation),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PortfolioError::invalid_config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// What a [`GroupCap`] limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupLabel {
    /// Instruments whose rating is in the junk set.
    Junk,
    /// Instruments of one sector.
    Sector(Sector),
}

/// `Σ_{i ∈ members} wᵢ ≤ cap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCap {
    /// What the group is.
    pub label: GroupLabel,
    /// Universe indices in the group, ascending, never empty.
    pub members: Vec<usize>,
    /// Maximum aggregate weight.
    pub cap: f64,
}

impl GroupCap {
    /// Aggregate weight of the group's members.
    #[must_use]
    pub fn exposure(&self, weights: &[f64]) -> f64 {
        self.members
            .iter()
            .filter_map(|&i| weights.get(i))
            .sum()
    }

    /// `cap − exposure`; feasible when ≥ 0.
    #[must_use]
    pub fn slack(&self, weights: &[f64]) -> f64 {
        self.cap - self.exposure(weights)
    }

    /// Dense 0/1 membership row of length `n`.
    #[must_use]
    pub fn row(&self, n: usize) -> Vec<f64> {
        let mut row = vec![0.0; n];
        for &i in &self.members {
            if i < n {
                row[i] = 1.0;
            }
        }
        row
    }
}

/// The full constraint set for one universe.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSystem {
    durations: Vec<f64>,
    target_duration: f64,
    max_weight: f64,
    caps: Vec<GroupCap>,
}

impl ConstraintSystem {
    /// Builds the constraint rows for `universe`.
    ///
    /// A junk cap is emitted only if some instrument is junk-rated, and one
    /// sector cap per sector that has members. No vacuous rows.
    #[must_use]
    pub fn build(universe: &[Instrument], constraints: &AllocationConstraints) -> Self {
        let junk: BTreeSet<CreditRating> = constraints.junk_ratings.iter().copied().collect();
        let mut caps = Vec::new();

        let junk_members = indices_where(universe, |b| junk.contains(&b.rating));
        if !junk_members.is_empty() {
            caps.push(GroupCap {
                label: GroupLabel::Junk,
                members: junk_members,
                cap: constraints.max_junk_allocation,
            });
        }

        for sector in distinct_sectors(universe) {
            caps.push(GroupCap {
                label: GroupLabel::Sector(sector),
                members: indices_where(universe, |b| b.sector == sector),
                cap: constraints.max_sector_allocation,
            });
        }

        Self {
            durations: universe.iter().map(|b| b.duration).collect(),
            target_duration: constraints.target_duration,
            max_weight: constraints.max_allocation,
            caps,
        }
    }

    /// Number of instruments.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.durations.len()
    }

    /// Junk and sector caps.
    #[must_use]
    pub fn caps(&self) -> &[GroupCap] {
        &self.caps
    }

    /// Per-instrument upper bound.
    #[must_use]
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// `Σw − 1`.
    #[must_use]
    pub fn budget_residual(&self, weights: &[f64]) -> f64 {
        weights.iter().sum::<f64>() - 1.0
    }

    /// `Σ dᵢwᵢ − target`.
    #[must_use]
    pub fn duration_residual(&self, weights: &[f64]) -> f64 {
        weights
            .iter()
            .zip(&self.durations)
            .map(|(w, d)| w * d)
            .sum::<f64>()
            - self.target_duration
    }

    /// True if `weights` meets every constraint within `tol`.
    #[must_use]
    pub fn is_satisfied(&self, weights: &[f64], tol: f64) -> bool {
        weights.len() == self.dim()
            && self.budget_residual(weights).abs() <= tol
            && self.duration_residual(weights).abs() <= tol
            && weights
                .iter()
                .all(|w| *w >= -tol && *w <= self.max_weight + tol)
            && self.caps.iter().all(|c| c.slack(weights) >= -tol)
    }

    /// The feasible region as a polytope over the weight vector.
    pub fn polytope(&self) -> PortfolioResult<Polytope> {
        let n = self.dim();
        let mut p = Polytope::new(n);
        let to_err = |e: bondsmith_math::MathError| PortfolioError::invalid_config(e.to_string());
        p.add_equality(vec![1.0; n], 1.0).map_err(to_err)?;
        p.add_equality(self.durations.clone(), self.target_duration)
            .map_err(to_err)?;
        for cap in &self.caps {
            p.add_inequality(cap.row(n), cap.cap).map_err(to_err)?;
        }
        p.set_uniform_upper_bound(self.max_weight);
        Ok(p)
    }
}
