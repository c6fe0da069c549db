//! Deterministic stress testing.
//!
//! A fixed catalog of scenarios shifts yields in parallel and rescales
//! rating-based credit spreads; price impact is the first-order duration
//! approximation `ΔP/P ≈ −D Δy`. Convexity is ignored.

mod impact;
mod scenarios;

pub use impact::*;
pub use scenarios::*;
