//! Yield maximization as a linear program.

use bondsmith_core::Instrument;
use bondsmith_math::optimization::{LinearProgram, OptimizationConfig};
use tracing::debug;

use crate::constraints::ConstraintSystem;
use crate::error::{PortfolioError, PortfolioResult, SolverKind};

/// Maximizes `Σ yᵢwᵢ` over the constraint polytope.
pub(crate) fn maximize_yield(
    universe: &[Instrument],
    system: &ConstraintSystem,
    config: &OptimizationConfig,
) -> PortfolioResult<Vec<f64>> {
    let polytope = system.polytope()?;
    let yields: Vec<f64> = universe.iter().map(|b| b.yield_rate).collect();

    let solution = LinearProgram::maximize(yields, polytope)
        .solve(&config.simplex)
        .map_err(|e| PortfolioError::infeasible(SolverKind::Linear, e.to_string()))?;

    debug!(
        pivots = solution.pivots,
        objective = solution.objective_value,
        "yield program solved"
    );
    Ok(solution.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::AllocationConstraints;
    use approx::assert_relative_eq;
    use bondsmith_core::{CreditRating, Sector};

    #[test]
    fn test_picks_highest_yield_mix() {
        let universe = vec![
            Instrument::new("A", "A", Sector::Energy, CreditRating::AA, 3.0, 0.03, 0.1, 100.0)
                .unwrap(),
            Instrument::new("B", "B", Sector::Technology, CreditRating::AA, 5.0, 0.04, 0.1, 100.0)
                .unwrap(),
            Instrument::new("C", "C", Sector::Utilities, CreditRating::AA, 7.0, 0.06, 0.1, 100.0)
                .unwrap(),
        ];
        let constraints = AllocationConstraints::default()
            .with_max_allocation(0.5)
            .with_max_sector_allocation(1.0);
        let system = ConstraintSystem::build(&universe, &constraints);
        let w = maximize_yield(&universe, &system, &OptimizationConfig::default()).unwrap();
        assert_relative_eq!(w[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(w[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(w[2], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_unreachable_duration_is_infeasible() {
        let universe = vec![
            Instrument::new("A", "A", Sector::Energy, CreditRating::AA, 3.0, 0.03, 0.1, 100.0)
                .unwrap(),
            Instrument::new("B", "B", Sector::Technology, CreditRating::AA, 4.0, 0.04, 0.1, 100.0)
                .unwrap(),
        ];
        let constraints = AllocationConstraints::default()
            .with_target_duration(9.0)
            .with_max_allocation(1.0)
            .with_max_sector_allocation(1.0);
        let system = ConstraintSystem::build(&universe, &constraints);
        let err = maximize_yield(&universe, &system, &OptimizationConfig::default()).unwrap_err();
        match err {
            PortfolioError::InfeasibleProblem { solver, message } => {
                assert_eq!(solver, SolverKind::Linear);
                assert!(message.contains("infeasible"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
