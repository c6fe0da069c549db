//! # Bondsmith Portfolio
//!
//! Constrained allocation of capital across a bond universe.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: every solve takes the universe and request explicitly
//! - **Caller data is read-only**: post-processing works on filtered copies
//! - **Failures are values**: infeasible constraint sets come back as
//!   [`PortfolioError`] with the solver's diagnostic
//!
//! ## Quick Start
//!
//! ```rust
//! use bondsmith_portfolio::prelude::*;
//!
//! let universe = vec![
//!     Instrument::new("A-1", "Alpha", Sector::Energy, CreditRating::A, 3.0, 0.040, 0.08, 99.0).unwrap(),
//!     Instrument::new("B-1", "Beta", Sector::Utilities, CreditRating::BBB, 7.0, 0.055, 0.11, 98.0).unwrap(),
//!     Instrument::new("C-1", "Gamma", Sector::Healthcare, CreditRating::AA, 5.0, 0.045, 0.07, 101.0).unwrap(),
//! ];
//! let constraints = AllocationConstraints::default()
//!     .with_max_allocation(0.6)
//!     .with_max_sector_allocation(1.0);
//! let request = AllocationRequest::new(Objective::MaximizeYield).with_constraints(constraints);
//!
//! let portfolio = solve_allocation(&universe, &request).unwrap();
//! assert!((portfolio.metrics.duration - 5.0).abs() < 1e-6);
//! ```
//!
//! ## Module Overview
//!
//! - [`covariance`] - Structural correlation model and covariance synthesis
//! - [`metrics`] - Expected return, volatility, Sharpe ratio
//! - [`constraints`] - Constraint set and its linear rows
//! - [`solver`] - Yield and Sharpe solvers plus post-processing
//! - [`breakdown`] - Allocation by rating, sector, issuer
//! - [`frontier`] - Efficient frontier sweep
//!
//! ## Feature Flags
//!
//! - `parallel`: solve frontier points on the rayon thread pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod breakdown;
pub mod constraints;
pub mod covariance;
pub mod error;
pub mod frontier;
pub mod metrics;
pub mod solver;

pub use error::{PortfolioError, PortfolioResult, SolverKind};

pub use breakdown::{AllocationBreakdown, BucketMetrics};
pub use constraints::{AllocationConstraints, ConstraintSystem, GroupCap, GroupLabel};
pub use covariance::{implied_correlation, synthesize_covariance, CorrelationModel};
pub use frontier::{efficient_frontier, FrontierConfig, FrontierPoint};
pub use metrics::{expected_return, sharpe, sharpe_from, volatility, PortfolioMetrics};
pub use solver::{
    solve_allocation, Allocation, AllocationRequest, AllocationSolver, Objective,
    OptimizedPortfolio, SharpeObjective,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::breakdown::AllocationBreakdown;
    pub use crate::constraints::AllocationConstraints;
    pub use crate::covariance::synthesize_covariance;
    pub use crate::error::{PortfolioError, PortfolioResult};
    pub use crate::frontier::{efficient_frontier, FrontierConfig, FrontierPoint};
    pub use crate::metrics::PortfolioMetrics;
    pub use crate::solver::{
        solve_allocation, Allocation, AllocationRequest, AllocationSolver, Objective,
        OptimizedPortfolio,
    };
    pub use bondsmith_core::{CreditRating, Instrument, Sector};
}
