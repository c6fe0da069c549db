//! # Bondsmith Market
//!
//! Sources of bond universes and treasury curves for the allocation engine.
//!
//! - [`SyntheticMarket`]: seeded synthetic universe priced off a Nelson-Siegel curve
//! - [`CsvBondLoader`]: curated real-bond CSV files
//! - [`MarketDataService`]: both of the above behind TTL caches
//!
//! The engine crates take a `&[Instrument]` and know nothing about this crate.
//!
//! ## Example
//!
//! ```rust
//! use bondsmith_market::prelude::*;
//!
//! let config = MarketConfig { n_bonds: 30, ..MarketConfig::default() };
//! let mut service = MarketDataService::new(config).unwrap();
//!
//! let first = service.universe().unwrap();
//! let again = service.universe().unwrap();
//! assert_eq!(first, again);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod csv_loader;
pub mod curve;
pub mod error;
pub mod provider;
pub mod synthetic;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use csv_loader::CsvBondLoader;
pub use curve::{CurveParams, CurveSource, FallbackCurveSource, StaticCurveSource, TreasuryCurve};
pub use error::{MarketError, MarketResult};
pub use provider::{DataSource, MarketConfig, MarketDataService};
pub use synthetic::{SyntheticConfig, SyntheticMarket};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::{Clock, ManualClock, SystemClock, TtlCache};
    pub use crate::csv_loader::CsvBondLoader;
    pub use crate::curve::{CurveParams, CurveSource, TreasuryCurve};
    pub use crate::error::{MarketError, MarketResult};
    pub use crate::provider::{DataSource, MarketConfig, MarketDataService};
    pub use crate::synthetic::{SyntheticConfig, SyntheticMarket};
}
