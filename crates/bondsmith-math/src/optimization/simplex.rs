//! Dense two-phase simplex method.
//!
//! Variables are non-negative with optional finite upper bounds. Upper
//! bounds become explicit `≤` rows. Rows with a negative right-hand side are
//! negated first, so every artificial starts at a non-negative value.
//!
//! Phase one minimizes the sum of artificials. Phase two starts from the
//! resulting [`FeasibleBasis`], which can be re-optimized for any number of
//! objectives without repeating phase one.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{MathError, MathResult};

/// Tolerances and limits for the simplex method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexConfig {
    /// Pivot and reduced-cost tolerance.
    pub tolerance: f64,
    /// Phase-one objective above which the problem is declared infeasible.
    pub feasibility_tolerance: f64,
    /// Hard cap on pivots per phase.
    pub max_pivots: usize,
    /// Consecutive degenerate pivots before switching to Bland's rule.
    pub bland_after: usize,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            feasibility_tolerance: 1e-8,
            max_pivots: 50_000,
            bland_after: 64,
        }
    }
}

/// The region `{x ≥ 0 : A_eq x = b_eq, A_le x ≤ b_le, x ≤ u}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polytope {
    dim: usize,
    equalities: Vec<(Vec<f64>, f64)>,
    inequalities: Vec<(Vec<f64>, f64)>,
    upper_bounds: Vec<Option<f64>>,
}

impl Polytope {
    /// The non-negative orthant in `dim` dimensions.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            equalities: Vec::new(),
            inequalities: Vec::new(),
            upper_bounds: vec![None; dim],
        }
    }

    /// Number of variables.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of equality rows.
    #[must_use]
    pub fn equality_count(&self) -> usize {
        self.equalities.len()
    }

    /// Number of `≤` rows, excluding upper bounds.
    #[must_use]
    pub fn inequality_count(&self) -> usize {
        self.inequalities.len()
    }

    /// Adds `row · x = rhs`.
    pub fn add_equality(&mut self, row: Vec<f64>, rhs: f64) -> MathResult<()> {
        self.check_row(&row)?;
        self.equalities.push((row, rhs));
        Ok(())
    }

    /// Adds `row · x ≤ rhs`.
    pub fn add_inequality(&mut self, row: Vec<f64>, rhs: f64) -> MathResult<()> {
        self.check_row(&row)?;
        self.inequalities.push((row, rhs));
        Ok(())
    }

    /// Sets `x_j ≤ bound` for every variable.
    pub fn set_uniform_upper_bound(&mut self, bound: f64) {
        self.upper_bounds = vec![Some(bound); self.dim];
    }

    /// Sets per-variable upper bounds (`None` means unbounded above).
    pub fn set_upper_bounds(&mut self, bounds: Vec<Option<f64>>) -> MathResult<()> {
        if bounds.len() != self.dim {
            return Err(MathError::dimension_mismatch(self.dim, bounds.len()));
        }
        self.upper_bounds = bounds;
        Ok(())
    }

    /// True if `x` satisfies every constraint within `tol`.
    #[must_use]
    pub fn contains(&self, x: &[f64], tol: f64) -> bool {
        if x.len() != self.dim {
            return false;
        }
        let dot = |row: &[f64]| row.iter().zip(x).map(|(a, b)| a * b).sum::<f64>();
        self.equalities
            .iter()
            .all(|(row, rhs)| (dot(row) - rhs).abs() <= tol)
            && self
                .inequalities
                .iter()
                .all(|(row, rhs)| dot(row) <= rhs + tol)
            && x.iter()
                .zip(&self.upper_bounds)
                .all(|(v, ub)| *v >= -tol && ub.map_or(true, |u| *v <= u + tol))
    }

    /// Embeds the polytope in `dim + extra` dimensions.
    ///
    /// The extra variables are non-negative, unbounded above and absent from
    /// every existing row.
    #[must_use]
    pub fn extended(&self, extra: usize) -> Self {
        let pad = |(row, rhs): &(Vec<f64>, f64)| {
            let mut wide = row.clone();
            wide.resize(self.dim + extra, 0.0);
            (wide, *rhs)
        };
        let mut upper_bounds = self.upper_bounds.clone();
        upper_bounds.resize(self.dim + extra, None);
        Self {
            dim: self.dim + extra,
            equalities: self.equalities.iter().map(pad).collect(),
            inequalities: self.inequalities.iter().map(pad).collect(),
            upper_bounds,
        }
    }

    /// Runs phase one and returns a basic feasible solution.
    ///
    /// # Errors
    ///
    /// [`MathError::Infeasible`] if no point satisfies the constraints,
    /// [`MathError::ConvergenceFailed`] if the pivot cap is hit.
    pub fn phase_one(&self, config: &SimplexConfig) -> MathResult<FeasibleBasis> {
        let n = self.dim;

        // (coefficients, rhs, is_equality)
        let mut rows: Vec<(Vec<f64>, f64, bool)> = Vec::new();
        for (row, rhs) in &self.equalities {
            rows.push((row.clone(), *rhs, true));
        }
        for (row, rhs) in &self.inequalities {
            rows.push((row.clone(), *rhs, false));
        }
        for (j, ub) in self.upper_bounds.iter().enumerate() {
            if let Some(u) = ub {
                let mut unit = vec![0.0; n];
                unit[j] = 1.0;
                rows.push((unit, *u, false));
            }
        }

        let m = rows.len();
        let n_slack = rows.iter().filter(|(_, _, eq)| !eq).count();
        let n_art = rows
            .iter()
            .filter(|(_, rhs, eq)| *eq || *rhs < 0.0)
            .count();
        let art_start = n + n_slack;
        let rhs_col = art_start + n_art;

        let mut tableau = DMatrix::<f64>::zeros(m, rhs_col + 1);
        let mut basis = vec![0usize; m];
        let mut next_slack = n;
        let mut next_art = art_start;
        let mut rhs_scale: f64 = 1.0;

        for (i, (coeffs, rhs, is_eq)) in rows.iter().enumerate() {
            let sign = if *rhs < 0.0 { -1.0 } else { 1.0 };
            for (j, a) in coeffs.iter().enumerate() {
                tableau[(i, j)] = sign * a;
            }
            tableau[(i, rhs_col)] = sign * rhs;
            rhs_scale = rhs_scale.max(rhs.abs());

            if !is_eq {
                // slack for ≤, surplus once the row was flipped to ≥
                tableau[(i, next_slack)] = sign;
                if sign > 0.0 {
                    basis[i] = next_slack;
                }
                next_slack += 1;
            }
            if *is_eq || sign < 0.0 {
                tableau[(i, next_art)] = 1.0;
                basis[i] = next_art;
                next_art += 1;
            }
        }

        let mut cost = vec![0.0; rhs_col];
        for c in cost.iter_mut().skip(art_start) {
            *c = 1.0;
        }
        let pivots = run_simplex(&mut tableau, &mut basis, &cost, config)?;

        let infeasibility: f64 = (0..tableau.nrows())
            .map(|i| cost[basis[i]] * tableau[(i, rhs_col)])
            .sum();
        if infeasibility > config.feasibility_tolerance * rhs_scale {
            return Err(MathError::infeasible(format!(
                "no point satisfies all {m} constraints (phase one residual {infeasibility:.3e})"
            )));
        }

        // Drive remaining (zero-valued) artificials out of the basis.
        for i in (0..tableau.nrows()).rev() {
            if basis[i] < art_start {
                continue;
            }
            let entering = (0..art_start).find(|&j| tableau[(i, j)].abs() > config.tolerance);
            match entering {
                Some(j) => pivot(&mut tableau, &mut basis, i, j),
                None => {
                    tableau = tableau.remove_row(i);
                    basis.remove(i);
                }
            }
        }
        let tableau = tableau.remove_columns(art_start, n_art);

        debug!(
            rows = tableau.nrows(),
            vars = n,
            pivots,
            "simplex phase one complete"
        );

        Ok(FeasibleBasis {
            tableau,
            basis,
            n_struct: n,
        })
    }

    fn check_row(&self, row: &[f64]) -> MathResult<()> {
        if row.len() == self.dim {
            Ok(())
        } else {
            Err(MathError::dimension_mismatch(self.dim, row.len()))
        }
    }
}

/// A basic feasible solution of a [`Polytope`] in tableau form.
#[derive(Debug, Clone)]
pub struct FeasibleBasis {
    tableau: DMatrix<f64>,
    basis: Vec<usize>,
    n_struct: usize,
}

impl FeasibleBasis {
    /// The current vertex.
    #[must_use]
    pub fn vertex(&self) -> Vec<f64> {
        let rhs = self.tableau.ncols() - 1;
        let mut x = vec![0.0; self.n_struct];
        for (i, &b) in self.basis.iter().enumerate() {
            if b < self.n_struct {
                x[b] = self.tableau[(i, rhs)].max(0.0);
            }
        }
        x
    }

    /// Minimizes `c · x` starting from the current basis.
    ///
    /// The basis is left at the optimum, so successive calls with nearby
    /// objectives need few pivots.
    pub fn minimize(&mut self, c: &[f64], config: &SimplexConfig) -> MathResult<LpSolution> {
        if c.len() != self.n_struct {
            return Err(MathError::dimension_mismatch(self.n_struct, c.len()));
        }
        let mut cost = vec![0.0; self.tableau.ncols() - 1];
        cost[..self.n_struct].copy_from_slice(c);
        let pivots = run_simplex(&mut self.tableau, &mut self.basis, &cost, config)?;
        let x = self.vertex();
        let objective_value = x.iter().zip(c).map(|(a, b)| a * b).sum();
        Ok(LpSolution {
            x,
            objective_value,
            pivots,
        })
    }
}

/// Optimal vertex of a linear program.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal point.
    pub x: Vec<f64>,
    /// Objective at `x`, in the sense the program was posed.
    pub objective_value: f64,
    /// Phase-two pivots performed.
    pub pivots: usize,
}

/// A linear program over a [`Polytope`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    objective: Vec<f64>,
    maximize: bool,
    constraints: Polytope,
}

impl LinearProgram {
    /// Minimize `objective · x` over `constraints`.
    #[must_use]
    pub fn minimize(objective: Vec<f64>, constraints: Polytope) -> Self {
        Self {
            objective,
            maximize: false,
            constraints,
        }
    }

    /// Maximize `objective · x` over `constraints`.
    #[must_use]
    pub fn maximize(objective: Vec<f64>, constraints: Polytope) -> Self {
        Self {
            objective,
            maximize: true,
            constraints,
        }
    }

    /// The feasible region.
    #[must_use]
    pub fn constraints(&self) -> &Polytope {
        &self.constraints
    }

    /// Solves the program to global optimality.
    ///
    /// # Errors
    ///
    /// [`MathError::Infeasible`], [`MathError::Unbounded`], or
    /// [`MathError::ConvergenceFailed`] when the pivot cap is reached.
    pub fn solve(&self, config: &SimplexConfig) -> MathResult<LpSolution> {
        if self.objective.len() != self.constraints.dim() {
            return Err(MathError::dimension_mismatch(
                self.constraints.dim(),
                self.objective.len(),
            ));
        }
        let mut basis = self.constraints.phase_one(config)?;
        if self.maximize {
            let negated: Vec<f64> = self.objective.iter().map(|c| -c).collect();
            let mut solution = basis.minimize(&negated, config)?;
            solution.objective_value = -solution.objective_value;
            Ok(solution)
        } else {
            basis.minimize(&self.objective, config)
        }
    }
}

/// Runs primal simplex pivots until no reduced cost is negative.
fn run_simplex(
    tableau: &mut DMatrix<f64>,
    basis: &mut [usize],
    cost: &[f64],
    config: &SimplexConfig,
) -> MathResult<usize> {
    let m = tableau.nrows();
    let rhs = tableau.ncols() - 1;
    let mut degenerate_streak = 0;
    let mut bland = false;

    for pivots in 0..config.max_pivots {
        let mut entering = None;
        let mut most_negative = -config.tolerance;
        for j in 0..rhs {
            let mut reduced = cost[j];
            for i in 0..m {
                reduced -= cost[basis[i]] * tableau[(i, j)];
            }
            if reduced < most_negative {
                entering = Some(j);
                if bland {
                    break;
                }
                most_negative = reduced;
            }
        }
        let Some(col) = entering else {
            return Ok(pivots);
        };

        let mut leaving: Option<usize> = None;
        let mut best_ratio = f64::INFINITY;
        for i in 0..m {
            let a = tableau[(i, col)];
            if a <= config.tolerance {
                continue;
            }
            let ratio = tableau[(i, rhs)].max(0.0) / a;
            let better = match leaving {
                None => true,
                Some(l) => {
                    ratio < best_ratio - 1e-12
                        || (ratio <= best_ratio + 1e-12 && basis[i] < basis[l])
                }
            };
            if better {
                leaving = Some(i);
                best_ratio = ratio;
            }
        }
        let Some(row) = leaving else {
            return Err(MathError::Unbounded);
        };

        if best_ratio <= config.tolerance {
            degenerate_streak += 1;
            if degenerate_streak >= config.bland_after {
                bland = true;
            }
        } else {
            degenerate_streak = 0;
        }
        pivot(tableau, basis, row, col);
    }

    Err(MathError::convergence_failed(
        u32::try_from(config.max_pivots).unwrap_or(u32::MAX),
        f64::NAN,
    ))
}

fn pivot(tableau: &mut DMatrix<f64>, basis: &mut [usize], row: usize, col: usize) {
    let width = tableau.ncols();
    let p = tableau[(row, col)];
    for j in 0..width {
        tableau[(row, j)] /= p;
    }
    for i in 0..tableau.nrows() {
        if i == row {
            continue;
        }
        let factor = tableau[(i, col)];
        if factor == 0.0 {
            continue;
        }
        for j in 0..width {
            let v = tableau[(row, j)];
            tableau[(i, j)] -= factor * v;
        }
    }
    basis[row] = col;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cfg() -> SimplexConfig {
        SimplexConfig::default()
    }

    #[test]
    fn test_textbook_maximization() {
        // max 3x + 5y st x ≤ 4, 2y ≤ 12, 3x + 2y ≤ 18
        let mut p = Polytope::new(2);
        p.add_inequality(vec![1.0, 0.0], 4.0).unwrap();
        p.add_inequality(vec![0.0, 2.0], 12.0).unwrap();
        p.add_inequality(vec![3.0, 2.0], 18.0).unwrap();
        let sol = LinearProgram::maximize(vec![3.0, 5.0], p).solve(&cfg()).unwrap();
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(sol.x[1], 6.0, epsilon = 1e-9);
        assert_relative_eq!(sol.objective_value, 36.0, epsilon = 1e-9);
    }

    #[test]
    fn test_equalities_and_bounds() {
        // max yields st Σx = 1, Σd·x = 5, x ≤ 0.5
        let mut p = Polytope::new(3);
        p.add_equality(vec![1.0, 1.0, 1.0], 1.0).unwrap();
        p.add_equality(vec![3.0, 5.0, 7.0], 5.0).unwrap();
        p.set_uniform_upper_bound(0.5);
        let sol = LinearProgram::maximize(vec![0.03, 0.04, 0.06], p.clone())
            .solve(&cfg())
            .unwrap();
        assert!(p.contains(&sol.x, 1e-9));
        assert_relative_eq!(sol.x[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(sol.x[2], 0.5, epsilon = 1e-9);
        assert_relative_eq!(sol.objective_value, 0.045, epsilon = 1e-12);
    }

    #[test]
    fn test_infeasible() {
        let mut p = Polytope::new(2);
        p.add_equality(vec![1.0, 1.0], 1.0).unwrap();
        p.add_equality(vec![3.0, 4.0], 10.0).unwrap();
        let err = LinearProgram::minimize(vec![1.0, 1.0], p).solve(&cfg()).unwrap_err();
        assert!(matches!(err, MathError::Infeasible { .. }));
    }

    #[test]
    fn test_unbounded() {
        let mut p = Polytope::new(2);
        p.add_inequality(vec![1.0, -1.0], 1.0).unwrap();
        let err = LinearProgram::maximize(vec![1.0, 1.0], p).solve(&cfg()).unwrap_err();
        assert_eq!(err, MathError::Unbounded);
    }

    #[test]
    fn test_negative_rhs_rows() {
        // -x - y ≤ -2  (x + y ≥ 2), minimize x + 2y
        let mut p = Polytope::new(2);
        p.add_inequality(vec![-1.0, -1.0], -2.0).unwrap();
        let sol = LinearProgram::minimize(vec![1.0, 2.0], p).solve(&cfg()).unwrap();
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(sol.x[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_redundant_equality_row_dropped() {
        let mut p = Polytope::new(2);
        p.add_equality(vec![1.0, 1.0], 1.0).unwrap();
        p.add_equality(vec![2.0, 2.0], 2.0).unwrap();
        let sol = LinearProgram::maximize(vec![1.0, 2.0], p).solve(&cfg()).unwrap();
        assert_relative_eq!(sol.x[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_warm_start_reoptimizes() {
        let mut p = Polytope::new(3);
        p.add_equality(vec![1.0, 1.0, 1.0], 1.0).unwrap();
        let mut basis = p.phase_one(&cfg()).unwrap();
        let first = basis.minimize(&[1.0, 2.0, 3.0], &cfg()).unwrap();
        assert_relative_eq!(first.x[0], 1.0, epsilon = 1e-12);
        let second = basis.minimize(&[3.0, 2.0, 1.0], &cfg()).unwrap();
        assert_relative_eq!(second.x[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_checks() {
        let mut p = Polytope::new(2);
        assert!(p.add_equality(vec![1.0], 1.0).is_err());
        assert!(p.set_upper_bounds(vec![None]).is_err());
        let err = LinearProgram::minimize(vec![1.0], p).solve(&cfg()).unwrap_err();
        assert_eq!(err, MathError::dimension_mismatch(2, 1));
    }

    #[test]
    fn test_extended_and_contains() {
        let mut p = Polytope::new(2);
        p.add_equality(vec![1.0, 1.0], 1.0).unwrap();
        p.set_uniform_upper_bound(0.8);
        let wide = p.extended(2);
        assert_eq!(wide.dim(), 4);
        assert!(wide.contains(&[0.5, 0.5, 7.0, 0.0], 1e-12));
        assert!(!wide.contains(&[0.9, 0.1, 0.0, 0.0], 1e-12));
    }
}
