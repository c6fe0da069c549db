//! # Bondsmith Math
//!
//! Numerical kernels for the Bondsmith allocation engine.
//!
//! This crate provides:
//!
//! - **Linear Algebra**: Cholesky factors with a diagonal fallback, quadratic forms
//! - **Optimization**: Two-phase simplex for linear programs and a conditional
//!   gradient (Frank-Wolfe) method for smooth objectives over polytopes
//! - **Statistics**: Sample moments, linear-interpolation percentiles, histograms
//! - **Interpolation**: Nelson-Siegel parametric yield curve
//!
//! ## Design Philosophy
//!
//! - **Dense and small**: problem sizes are a few hundred variables at most
//! - **Never panic on bad numerics**: degenerate inputs become errors or flagged fallbacks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, NelsonSiegel};
    pub use crate::linear_algebra::{cholesky_or_diagonal, quadratic_form, CholeskyFactor};
    pub use crate::optimization::{
        closest_feasible_point, conditional_gradient, FeasibleBasis, LinearProgram, LpSolution,
        OptimizationConfig, OptimizationResult, Polytope, SimplexConfig,
    };
    pub use crate::statistics::{histogram, mean, median, percentile, population_std, Histogram};
}

pub use error::{MathError, MathResult};
