//! # Bondsmith Config
//!
//! Configuration for every engine operation in one [`EngineConfig`]:
//!
//! - **market**: universe source, size, seed and cache lifetimes
//! - **optimization**: objective, constraints, capital and risk-free rate
//! - **frontier**: duration grid for the efficient frontier
//! - **monte_carlo**, **stress**, **backtest**: risk module parameters
//!
//! Files are TOML or JSON. Every field has a default, so a file only names
//! what it changes. [`Validate`] reports every bad field at once.
//!
//! ```rust
//! use bondsmith_config::{EngineConfig, Validate};
//!
//! let mut config = EngineConfig::default();
//! config.optimization.capital = -1.0;
//! config.backtest.n_periods = 0;
//!
//! let errors = config.validate();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[0].field, "optimization.capital");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod error;

pub use engine::{EngineConfig, OptimizationSettings};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
