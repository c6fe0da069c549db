//! Optimization algorithms.
//!
//! - [`LinearProgram`]: exact linear programs via the two-phase simplex
//! - [`conditional_gradient`]: smooth objectives over a [`Polytope`], using
//!   the simplex as the linear minimization oracle

mod conditional_gradient;
mod simplex;

pub use conditional_gradient::{closest_feasible_point, conditional_gradient};
pub use simplex::{FeasibleBasis, LinearProgram, LpSolution, Polytope, SimplexConfig};

/// Configuration for iterative optimizers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConfig {
    /// Convergence tolerance on the Frank-Wolfe duality gap.
    pub tolerance: f64,
    /// Maximum number of outer iterations.
    pub max_iterations: u32,
    /// Interval width at which the line search stops.
    pub line_search_tolerance: f64,
    /// Settings for the inner linear programs.
    pub simplex: SimplexConfig,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 500,
            line_search_tolerance: 1e-10,
            simplex: SimplexConfig::default(),
        }
    }
}

impl OptimizationConfig {
    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
    /// Last duality gap (an upper bound on suboptimality for convex objectives).
    pub gap: f64,
}
