//! Linear algebra utilities.
//!
//! Dense helpers over `nalgebra::DMatrix` for covariance handling.

use nalgebra::{linalg::Cholesky, DMatrix, DVector};
use tracing::warn;

use crate::error::{MathError, MathResult};

/// Lower-triangular factor `L` with `L Lᵀ ≈ Σ`.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor {
    /// The lower-triangular factor.
    pub lower: DMatrix<f64>,
    /// True when `Σ` was not positive-definite and `L = diag(sqrt(diag(Σ)))`
    /// was used instead. Correlations are lost in that case.
    pub diagonal_fallback: bool,
}

impl CholeskyFactor {
    /// Dimension of the factored matrix.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.lower.nrows()
    }

    /// Computes `L z`.
    ///
    /// # Errors
    ///
    /// Returns an error if `z` does not match the factor dimension.
    pub fn correlate(&self, z: &[f64]) -> MathResult<Vec<f64>> {
        if z.len() != self.dim() {
            return Err(MathError::dimension_mismatch(self.dim(), z.len()));
        }
        let n = self.dim();
        let mut out = vec![0.0; n];
        for i in 0..n {
            let mut acc = 0.0;
            for j in 0..=i {
                acc += self.lower[(i, j)] * z[j];
            }
            out[i] = acc;
        }
        Ok(out)
    }
}

/// Factors `Σ + jitter·I`, falling back to the diagonal square root.
///
/// Never fails: a matrix that is not positive-definite (or not square)
/// yields the diagonal factor with [`CholeskyFactor::diagonal_fallback`] set.
/// Negative diagonal entries are clamped to zero in the fallback.
#[must_use]
pub fn cholesky_or_diagonal(covariance: &DMatrix<f64>, jitter: f64) -> CholeskyFactor {
    let n = covariance.nrows();
    if n == covariance.ncols() {
        let mut regularized = covariance.clone();
        for i in 0..n {
            regularized[(i, i)] += jitter;
        }
        if let Some(chol) = Cholesky::new(regularized) {
            return CholeskyFactor {
                lower: chol.l(),
                diagonal_fallback: false,
            };
        }
    }

    warn!(dim = n, "covariance not positive-definite, using diagonal factor");
    let m = n.min(covariance.ncols());
    let diag = DVector::from_fn(m, |i, _| covariance[(i, i)].max(0.0).sqrt());
    CholeskyFactor {
        lower: DMatrix::from_diagonal(&diag),
        diagonal_fallback: true,
    }
}

/// Computes `wᵀ M w`.
///
/// # Errors
///
/// Returns an error if `M` is not `n × n` for `n = w.len()`.
pub fn quadratic_form(w: &[f64], m: &DMatrix<f64>) -> MathResult<f64> {
    let n = w.len();
    if m.nrows() != n || m.ncols() != n {
        return Err(MathError::dimension_mismatch(n, m.nrows()));
    }
    let mut total = 0.0;
    for i in 0..n {
        if w[i] == 0.0 {
            continue;
        }
        let mut row = 0.0;
        for j in 0..n {
            row += m[(i, j)] * w[j];
        }
        total += w[i] * row;
    }
    Ok(total)
}

/// Computes `M v`.
///
/// # Errors
///
/// Returns an error if the column count of `M` differs from `v.len()`.
pub fn mat_vec(m: &DMatrix<f64>, v: &[f64]) -> MathResult<Vec<f64>> {
    if m.ncols() != v.len() {
        return Err(MathError::dimension_mismatch(m.ncols(), v.len()));
    }
    Ok((0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m[(i, j)] * v[j]).sum())
        .collect())
}

/// Dot product of equal-length slices.
///
/// # Errors
///
/// Returns an error if the lengths differ.
pub fn dot(a: &[f64], b: &[f64]) -> MathResult<f64> {
    if a.len() != b.len() {
        return Err(MathError::dimension_mismatch(a.len(), b.len()));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cholesky_reconstructs() {
        let cov = DMatrix::from_row_slice(2, 2, &[0.04, 0.006, 0.006, 0.09]);
        let f = cholesky_or_diagonal(&cov, 0.0);
        assert!(!f.diagonal_fallback);
        let rebuilt = &f.lower * f.lower.transpose();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(rebuilt[(i, j)], cov[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_falls_back_on_indefinite() {
        let cov = DMatrix::from_row_slice(2, 2, &[0.04, 0.5, 0.5, 0.09]);
        let f = cholesky_or_diagonal(&cov, 1e-8);
        assert!(f.diagonal_fallback);
        assert_relative_eq!(f.lower[(0, 0)], 0.2, epsilon = 1e-12);
        assert_relative_eq!(f.lower[(1, 1)], 0.3, epsilon = 1e-12);
        assert_eq!(f.lower[(1, 0)], 0.0);
    }

    #[test]
    fn test_cholesky_empty() {
        let f = cholesky_or_diagonal(&DMatrix::zeros(0, 0), 1e-8);
        assert_eq!(f.dim(), 0);
    }

    #[test]
    fn test_correlate() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 4.0]);
        let f = cholesky_or_diagonal(&cov, 0.0);
        let x = f.correlate(&[1.0, 1.0]).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
        assert!(f.correlate(&[1.0]).is_err());
    }

    #[test]
    fn test_quadratic_form() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let q = quadratic_form(&[1.0, 2.0], &m).unwrap();
        assert_relative_eq!(q, 2.0 + 4.0 + 12.0);
        assert!(quadratic_form(&[1.0], &m).is_err());
    }

    #[test]
    fn test_mat_vec_and_dot() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(mat_vec(&m, &[1.0, 1.0]).unwrap(), vec![3.0, 7.0]);
        assert_relative_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
    }
}
