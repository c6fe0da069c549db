//! Efficient frontier sweep over target duration.
//!
//! Each grid point is an independent Sharpe-mode solve. With the `parallel`
//! feature the points are solved on the rayon pool; output order always
//! follows the grid.

use bondsmith_core::Instrument;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PortfolioError, PortfolioResult};
use crate::solver::{AllocationRequest, AllocationSolver, Objective, OptimizedPortfolio};

/// Duration grid for the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// First target duration.
    pub min_duration: f64,
    /// Last target duration.
    pub max_duration: f64,
    /// Number of evenly spaced targets, endpoints included.
    pub points: usize,
    /// Solve grid points in parallel when the `parallel` feature is on.
    pub parallel: bool,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            min_duration: 2.0,
            max_duration: 10.0,
            points: 10,
            parallel: true,
        }
    }
}

impl FrontierConfig {
    /// The target durations, `points` values from `min_duration` to
    /// `max_duration` inclusive.
    #[must_use]
    pub fn grid(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.min_duration],
            n => {
                let step = (self.max_duration - self.min_duration) / (n - 1) as f64;
                (0..n)
                    .map(|i| self.min_duration + step * i as f64)
                    .collect()
            }
        }
    }

    /// Checks the grid bounds.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !(self.min_duration > 0.0 && self.max_duration >= self.min_duration) {
            return Err(PortfolioError::invalid_config(format!(
                "frontier range [{}, {}] is invalid",
                self.min_duration, self.max_duration
            )));
        }
        Ok(())
    }
}

/// One solved point on the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Requested target duration.
    pub target_duration: f64,
    /// Realized duration.
    pub duration: f64,
    /// Realized yield.
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    /// Realized volatility.
    pub volatility: f64,
    /// Realized Sharpe ratio.
    pub sharpe: f64,
}

impl FrontierPoint {
    fn from_portfolio(target_duration: f64, p: &OptimizedPortfolio) -> Self {
        Self {
            target_duration,
            duration: p.metrics.duration,
            yield_rate: p.metrics.yield_rate,
            volatility: p.metrics.volatility,
            sharpe: p.metrics.sharpe,
        }
    }
}

/// Traces the frontier.
///
/// Every grid point is solved with [`Objective::OptimizeSharpe`], whatever
/// objective `request` names; only its constraints, capital and risk-free
/// rate are used. Failed solves and points with non-positive yield are
/// skipped.
pub fn efficient_frontier(
    universe: &[Instrument],
    request: &AllocationRequest,
    config: &FrontierConfig,
    solver: &AllocationSolver,
) -> PortfolioResult<Vec<FrontierPoint>> {
    config.validate()?;
    let grid = config.grid();

    let solve_at = |target: f64| -> Option<FrontierPoint> {
        let req = AllocationRequest {
            objective: Objective::OptimizeSharpe,
            constraints: request.constraints.clone().with_target_duration(target),
            ..request.clone()
        };
        match solver.solve(universe, &req) {
            Ok(p) if p.metrics.yield_rate > 0.0 => Some(FrontierPoint::from_portfolio(target, &p)),
            Ok(_) => {
                debug!(target, "frontier point has no positive yield");
                None
            }
            Err(e) => {
                debug!(target, error = %e, "frontier point infeasible");
                None
            }
        }
    };

    let solved: Vec<Option<FrontierPoint>> = sweep(&grid, config.parallel, solve_at);
    let points: Vec<FrontierPoint> = solved.into_iter().flatten().collect();

    info!(grid = grid.len(), points = points.len(), "frontier traced");
    Ok(points)
}

#[allow(unused_variables)]
fn sweep<F>(grid: &[f64], parallel: bool, f: F) -> Vec<Option<FrontierPoint>>
where
    F: Fn(f64) -> Option<FrontierPoint> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if parallel {
            return grid.par_iter().map(|&t| f(t)).collect();
        }
    }

    grid.iter().map(|&t| f(t)).collect()
}
