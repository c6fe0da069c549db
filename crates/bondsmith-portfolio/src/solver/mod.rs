//! Allocation solver.
//!
//! Two objective modes share one [`ConstraintSystem`]:
//!
//! - [`Objective::MaximizeYield`]: linear program, globally optimal
//! - [`Objective::OptimizeSharpe`]: nonlinear, locally optimal
//!
//! Both end in the same post-processing: dust allocations are dropped and
//! metrics are recomputed over the surviving instruments only.

mod linear;
mod result;
mod sharpe;

use std::fmt;
use std::str::FromStr;

use bondsmith_core::Instrument;
use bondsmith_math::optimization::OptimizationConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constraints::{AllocationConstraints, ConstraintSystem};
use crate::error::{PortfolioError, PortfolioResult};

pub use result::{Allocation, OptimizedPortfolio};
pub use sharpe::SharpeObjective;

/// Objective mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Objective {
    /// Maximize weighted yield.
    #[default]
    MaximizeYield,
    /// Maximize the Sharpe ratio.
    OptimizeSharpe,
}

impl Objective {
    /// Canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MaximizeYield => "MaximizeYield",
            Self::OptimizeSharpe => "OptimizeSharpe",
        }
    }
}

impl FromStr for Objective {
    type Err = PortfolioError;

    /// Accepts `"MaximizeYield"`, `"Maximize Yield"`, `"OptimizeSharpe"` and
    /// `"Optimize Sharpe Ratio"`, ignoring case, spaces and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "maximizeyield" => Ok(Self::MaximizeYield),
            "optimizesharpe" | "optimizesharperatio" => Ok(Self::OptimizeSharpe),
            _ => Err(PortfolioError::invalid_objective(s)),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the solver needs besides the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Objective mode.
    pub objective: Objective,
    /// Constraint set.
    pub constraints: AllocationConstraints,
    /// Capital to allocate.
    pub capital: f64,
    /// Annual risk-free rate for Sharpe ratios.
    pub risk_free_rate: f64,
}

impl Default for AllocationRequest {
    fn default() -> Self {
        Self {
            objective: Objective::MaximizeYield,
            constraints: AllocationConstraints::default(),
            capital: 100_000.0,
            risk_free_rate: 0.01,
        }
    }
}

impl AllocationRequest {
    /// Creates a request with default constraints.
    #[must_use]
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            ..Self::default()
        }
    }

    /// Sets the constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: AllocationConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the capital.
    #[must_use]
    pub fn with_capital(mut self, capital: f64) -> Self {
        self.capital = capital;
        self
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Checks parameters are in range.
    pub fn validate(&self) -> PortfolioResult<()> {
        self.constraints.validate()?;
        if !(self.capital.is_finite() && self.capital > 0.0) {
            return Err(PortfolioError::invalid_config(format!(
                "capital must be positive, got {}",
                self.capital
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(PortfolioError::invalid_config("risk_free_rate must be finite"));
        }
        Ok(())
    }
}

/// Constrained allocation solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationSolver {
    config: OptimizationConfig,
}

impl AllocationSolver {
    /// Solver with default iteration limits and tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with custom limits.
    #[must_use]
    pub fn with_config(config: OptimizationConfig) -> Self {
        Self { config }
    }

    /// The optimizer configuration.
    #[must_use]
    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Solves for portfolio weights.
    ///
    /// The caller's universe is only read; post-processing works on copies.
    ///
    /// # Errors
    ///
    /// - [`PortfolioError::InvalidConfiguration`] for out-of-range parameters,
    ///   an empty universe or an invalid instrument
    /// - [`PortfolioError::InfeasibleProblem`] when no allocation meets the
    ///   constraints
    /// - [`PortfolioError::DegenerateResult`] when the optimizer returns
    ///   unusable weights
    pub fn solve(
        &self,
        universe: &[Instrument],
        request: &AllocationRequest,
    ) -> PortfolioResult<OptimizedPortfolio> {
        request.validate()?;
        if universe.is_empty() {
            return Err(PortfolioError::invalid_config("bond universe is empty"));
        }
        for bond in universe {
            bond.validate()
                .map_err(|e| PortfolioError::invalid_config(e.to_string()))?;
        }

        let system = ConstraintSystem::build(universe, &request.constraints);
        let solved = match request.objective {
            Objective::MaximizeYield => linear::maximize_yield(universe, &system, &self.config),
            Objective::OptimizeSharpe => sharpe::maximize_sharpe(
                universe,
                &system,
                request.risk_free_rate,
                &self.config,
            ),
        };
        let weights = match solved {
            Ok(w) => w,
            Err(e) => {
                warn!(objective = %request.objective, error = %e, "allocation failed");
                return Err(e);
            }
        };

        if weights.len() != universe.len() || weights.iter().any(|w| !w.is_finite()) {
            return Err(PortfolioError::degenerate(
                "optimizer returned a non-finite or mis-sized weight vector",
            ));
        }

        let portfolio = OptimizedPortfolio::from_weights(
            universe,
            &weights,
            request.objective,
            request.capital,
            request.risk_free_rate,
        )?;

        info!(
            objective = %request.objective,
            universe = universe.len(),
            holdings = portfolio.len(),
            yield_rate = portfolio.metrics.yield_rate,
            duration = portfolio.metrics.duration,
            sharpe = portfolio.metrics.sharpe,
            "allocation solved"
        );
        Ok(portfolio)
    }
}

/// Solves with a default [`AllocationSolver`].
pub fn solve_allocation(
    universe: &[Instrument],
    request: &AllocationRequest,
) -> PortfolioResult<OptimizedPortfolio> {
    AllocationSolver::new().solve(universe, request)
}
