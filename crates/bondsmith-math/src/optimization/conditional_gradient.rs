//! Conditional gradient (Frank-Wolfe) method over a polytope.
//!
//! Each iteration minimizes the linearized objective over the feasible
//! region with the simplex, then line-searches along the segment toward
//! that vertex. Iterates are convex combinations of feasible points, so
//! they stay feasible throughout.

use tracing::debug;

use super::simplex::{LinearProgram, Polytope, SimplexConfig};
use super::{OptimizationConfig, OptimizationResult};
use crate::error::{MathError, MathResult};

const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Point of `polytope` nearest to `target` in the L1 norm.
///
/// Solved as the linear program `min Σ(p + q)` subject to `x − p + q = target`
/// and the polytope's own constraints on `x`.
///
/// # Errors
///
/// [`MathError::Infeasible`] if the polytope is empty.
pub fn closest_feasible_point(
    polytope: &Polytope,
    target: &[f64],
    config: &SimplexConfig,
) -> MathResult<Vec<f64>> {
    let n = polytope.dim();
    if target.len() != n {
        return Err(MathError::dimension_mismatch(n, target.len()));
    }

    let mut lifted = polytope.extended(2 * n);
    for (j, t) in target.iter().enumerate() {
        let mut row = vec![0.0; 3 * n];
        row[j] = 1.0;
        row[n + j] = -1.0;
        row[2 * n + j] = 1.0;
        lifted.add_equality(row, *t)?;
    }
    let mut cost = vec![0.0; 3 * n];
    for c in cost.iter_mut().skip(n) {
        *c = 1.0;
    }

    let solution = LinearProgram::minimize(cost, lifted).solve(config)?;
    Ok(solution.x[..n].to_vec())
}

/// Minimizes a smooth `objective` over `polytope` starting from `start`.
///
/// `gradient` must return a vector of length `polytope.dim()`. The run stops
/// when the duality gap `−∇f(x)·(s − x)` drops to `config.tolerance`, when
/// the line search can no longer improve, or after `config.max_iterations`.
/// Hitting the iteration limit is not an error; check
/// [`OptimizationResult::converged`].
///
/// # Errors
///
/// - [`MathError::InvalidInput`] if `start` is not feasible or the
///   objective is not finite there
/// - Errors from the inner simplex solves
pub fn conditional_gradient<F, G>(
    objective: F,
    gradient: G,
    polytope: &Polytope,
    start: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64]) -> Vec<f64>,
{
    let n = polytope.dim();
    if start.len() != n {
        return Err(MathError::dimension_mismatch(n, start.len()));
    }
    if !polytope.contains(start, 1e-7) {
        return Err(MathError::invalid_input(
            "starting point violates the constraints",
        ));
    }

    let mut x = start.to_vec();
    let mut fx = objective(&x);
    if !fx.is_finite() {
        return Err(MathError::invalid_input(format!(
            "objective is not finite at the starting point ({fx})"
        )));
    }

    let mut oracle = polytope.phase_one(&config.simplex)?;
    let mut gap = f64::INFINITY;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        let g = gradient(&x);
        if g.len() != n || g.iter().any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("gradient is not finite"));
        }

        let vertex = oracle.minimize(&g, &config.simplex)?.x;
        let direction: Vec<f64> = vertex.iter().zip(&x).map(|(s, xi)| s - xi).collect();
        gap = -g.iter().zip(&direction).map(|(a, d)| a * d).sum::<f64>();
        if gap <= config.tolerance {
            converged = true;
            break;
        }

        let along = |step: f64| {
            let point: Vec<f64> = x
                .iter()
                .zip(&direction)
                .map(|(xi, d)| xi + step * d)
                .collect();
            objective(&point)
        };
        let mut step = golden_section(&along, 0.0, 1.0, config.line_search_tolerance);
        let mut f_new = along(step);
        let f_full = along(1.0);
        if f_full < f_new {
            step = 1.0;
            f_new = f_full;
        }
        if f_new.is_nan() || f_new >= fx {
            // No descent along the Frank-Wolfe direction within tolerance.
            converged = gap <= config.tolerance.sqrt();
            break;
        }

        for (xi, d) in x.iter_mut().zip(&direction) {
            *xi += step * d;
        }
        fx = f_new;
    }

    debug!(iterations, gap, converged, objective = fx, "conditional gradient finished");

    Ok(OptimizationResult {
        parameters: x,
        objective_value: fx,
        iterations,
        converged,
        gap,
    })
}

/// Golden-section search for the minimum of a unimodal `f` on `[a, b]`.
fn golden_section<F>(f: &F, mut a: f64, mut b: f64, tol: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);
    while b - a > tol {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
    }
    0.5 * (a + b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn simplex_polytope(n: usize) -> Polytope {
        let mut p = Polytope::new(n);
        p.add_equality(vec![1.0; n], 1.0).unwrap();
        p
    }

    #[test]
    fn test_golden_section() {
        let x = golden_section(&|t: f64| (t - 0.3).powi(2), 0.0, 1.0, 1e-10);
        assert_relative_eq!(x, 0.3, epsilon = 1e-8);
    }

    #[test]
    fn test_closest_point_inside_is_itself() {
        let p = simplex_polytope(4);
        let x = closest_feasible_point(&p, &[0.25; 4], &SimplexConfig::default()).unwrap();
        for v in x {
            assert_relative_eq!(v, 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_closest_point_projects() {
        let mut p = simplex_polytope(3);
        p.add_equality(vec![1.0, 2.0, 3.0], 2.8).unwrap();
        let start = [1.0 / 3.0; 3];
        let x = closest_feasible_point(&p, &start, &SimplexConfig::default()).unwrap();
        assert!(p.contains(&x, 1e-9));
    }

    #[test]
    fn test_closest_point_empty_polytope() {
        let mut p = simplex_polytope(2);
        p.set_uniform_upper_bound(0.4);
        let err = closest_feasible_point(&p, &[0.5, 0.5], &SimplexConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::Infeasible { .. }));
    }

    #[test]
    fn test_quadratic_over_simplex() {
        // min Σ (x_i − t_i)² with t inside the simplex → optimum is t
        let target = [0.2, 0.5, 0.3];
        let f = |x: &[f64]| x.iter().zip(&target).map(|(a, b)| (a - b).powi(2)).sum();
        let g = |x: &[f64]| x.iter().zip(&target).map(|(a, b)| 2.0 * (a - b)).collect();
        let p = simplex_polytope(3);
        let result = conditional_gradient(
            f,
            g,
            &p,
            &[1.0, 0.0, 0.0],
            &OptimizationConfig::default().with_max_iterations(2000),
        )
        .unwrap();
        for (x, t) in result.parameters.iter().zip(&target) {
            assert_relative_eq!(x, t, epsilon = 1e-3);
        }
        assert!(p.contains(&result.parameters, 1e-9));
    }

    #[test]
    fn test_linear_objective_reaches_vertex_in_one_step() {
        let p = simplex_polytope(3);
        let c = [0.3, 0.1, 0.2];
        let f = |x: &[f64]| x.iter().zip(&c).map(|(a, b)| a * b).sum();
        let g = |_: &[f64]| c.to_vec();
        let result =
            conditional_gradient(f, g, &p, &[1.0 / 3.0; 3], &OptimizationConfig::default())
                .unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_infeasible_start() {
        let p = simplex_polytope(2);
        let err = conditional_gradient(
            |_| 0.0,
            |_| vec![0.0, 0.0],
            &p,
            &[0.9, 0.9],
            &OptimizationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { .. }));
    }
}
