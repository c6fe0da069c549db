//! Descriptive statistics for simulated distributions.
//!
//! Percentiles interpolate linearly between closest ranks. Histograms use
//! equal-width bins with the last bin closed on the right.

use crate::error::{MathError, MathResult};

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Observation count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total observations counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Arithmetic mean; 0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`); 0 for an empty slice.
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Returns an ascending copy, NaNs last.
#[must_use]
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Percentile `p` (0..=100) of an ascending slice, interpolating linearly
/// between the two nearest ranks.
///
/// # Errors
///
/// Returns an error for an empty slice or `p` outside `[0, 100]`.
pub fn percentile(sorted_values: &[f64], p: f64) -> MathResult<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(MathError::invalid_input(format!(
            "percentile must be within [0, 100], got {p}"
        )));
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Ok(sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * frac)
}

/// Median of an ascending slice.
///
/// # Errors
///
/// Returns an error for an empty slice.
pub fn median(sorted_values: &[f64]) -> MathResult<f64> {
    percentile(sorted_values, 50.0)
}

/// Builds an equal-width histogram over `[min, max]` of `values`.
///
/// When every value is identical the range is widened to `value ± 0.5`.
///
/// # Errors
///
/// Returns an error for an empty slice, zero bins, or non-finite values.
pub fn histogram(values: &[f64], bins: usize) -> MathResult<Histogram> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if bins == 0 {
        return Err(MathError::invalid_input("histogram needs at least one bin"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("histogram values must be finite"));
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        // floating point can land one bin off near an edge
        if idx > 0 && v < edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Ok(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&v), 5.0);
        assert_relative_eq!(population_std(&v), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std(&[]), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&v, 0.0).unwrap(), 1.0);
        assert_relative_eq!(percentile(&v, 100.0).unwrap(), 4.0);
        assert_relative_eq!(percentile(&v, 50.0).unwrap(), 2.5);
        assert_relative_eq!(percentile(&v, 25.0).unwrap(), 1.75);
        assert_relative_eq!(median(&[3.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_percentile_errors() {
        assert!(percentile(&[], 50.0).is_err());
        assert!(percentile(&[1.0], 101.0).is_err());
    }

    #[test]
    fn test_sorted() {
        assert_eq!(sorted(&[3.0, -1.0, 2.0]), vec![-1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let h = histogram(&values, 10).unwrap();
        assert_eq!(h.bins(), 10);
        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.total(), 100);
        assert_eq!(h.counts[0], 10);
        // last bin is closed: 90..=99
        assert_eq!(h.counts[9], 10);
        assert_relative_eq!(h.edges[10], 99.0);
    }

    #[test]
    fn test_histogram_constant_values() {
        let h = histogram(&[5.0; 7], 50).unwrap();
        assert_relative_eq!(h.edges[0], 4.5);
        assert_relative_eq!(h.edges[50], 5.5);
        assert_eq!(h.total(), 7);
    }

    #[test]
    fn test_histogram_errors() {
        assert!(histogram(&[], 10).is_err());
        assert!(histogram(&[1.0], 0).is_err());
        assert!(histogram(&[f64::NAN], 3).is_err());
    }
}
