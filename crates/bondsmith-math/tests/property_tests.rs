//! Property-based tests for the numerical kernels.

use bondsmith_math::linear_algebra::cholesky_or_diagonal;
use bondsmith_math::prelude::*;
use nalgebra::DMatrix;
use proptest::prelude::*;

// =============================================================================
// Linear programs
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Budget + box LP: the optimum is feasible and no worse than uniform weights.
    #[test]
    fn lp_optimum_is_feasible_and_dominates_uniform(
        returns in prop::collection::vec(-0.05f64..0.15, 3..12),
        cap in 0.35f64..1.0,
    ) {
        let n = returns.len();
        let mut p = Polytope::new(n);
        p.add_equality(vec![1.0; n], 1.0).unwrap();
        p.set_uniform_upper_bound(cap);

        let sol = LinearProgram::maximize(returns.clone(), p.clone())
            .solve(&SimplexConfig::default())
            .unwrap();
        prop_assert!(p.contains(&sol.x, 1e-8));

        let uniform: f64 = returns.iter().sum::<f64>() / n as f64;
        prop_assert!(sol.objective_value >= uniform - 1e-10);
    }

    /// An upper bound below 1/n makes the budget row unreachable.
    #[test]
    fn lp_reports_infeasible_budget(n in 2usize..10) {
        let mut p = Polytope::new(n);
        p.add_equality(vec![1.0; n], 1.0).unwrap();
        p.set_uniform_upper_bound(0.9 / n as f64);
        let err = LinearProgram::minimize(vec![1.0; n], p)
            .solve(&SimplexConfig::default())
            .unwrap_err();
        prop_assert!(matches!(err, MathError::Infeasible { .. }), "infeasible expected");
    }
}

// =============================================================================
// Factorizations and statistics
// =============================================================================

proptest! {
    /// Diagonal covariance always factors exactly.
    #[test]
    fn cholesky_of_diagonal(vols in prop::collection::vec(0.01f64..0.5, 1..8)) {
        let n = vols.len();
        let cov = DMatrix::from_fn(n, n, |i, j| if i == j { vols[i] * vols[i] } else { 0.0 });
        let factor = cholesky_or_diagonal(&cov, 1e-8);
        prop_assert!(!factor.diagonal_fallback);
        for i in 0..n {
            prop_assert!((factor.lower[(i, i)] - (vols[i] * vols[i] + 1e-8).sqrt()).abs() < 1e-12);
        }
    }

    /// Percentiles are monotone in p and bounded by the sample range.
    #[test]
    fn percentiles_monotone(values in prop::collection::vec(-1e4f64..1e4, 1..200)) {
        let s = bondsmith_math::statistics::sorted(&values);
        let mut last = f64::NEG_INFINITY;
        for p in [0.0, 1.0, 5.0, 25.0, 50.0, 75.0, 95.0, 99.0, 100.0] {
            let v = percentile(&s, p).unwrap();
            prop_assert!(v >= last);
            prop_assert!(v >= s[0] && v <= s[s.len() - 1]);
            last = v;
        }
    }

    /// Histograms count every observation exactly once.
    #[test]
    fn histogram_total(values in prop::collection::vec(-1e3f64..1e3, 1..300), bins in 1usize..60) {
        let h = histogram(&values, bins).unwrap();
        prop_assert_eq!(h.total(), values.len());
        prop_assert_eq!(h.edges.len(), bins + 1);
    }
}
