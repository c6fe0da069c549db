//! # Bondsmith Core
//!
//! Foundational types for the Bondsmith fixed income allocation engine.
//!
//! - **Ratings**: [`CreditRating`] on the agency-agnostic AAA..D scale with notches
//! - **Sectors**: [`Sector`] issuer taxonomy
//! - **Instruments**: [`Instrument`], one row of the bond universe table
//! - **Universe**: [`universe`] helpers for grouping and sub-setting instrument tables
//!
//! ## Example
//!
//! ```rust
//! use bondsmith_core::prelude::*;
//!
//! let bond = Instrument::builder()
//!     .id("AAP-1001")
//!     .issuer("Apple")
//!     .sector(Sector::Technology)
//!     .rating(CreditRating::AA)
//!     .duration(5.0)
//!     .yield_rate(0.045)
//!     .volatility(0.06)
//!     .price(97.2)
//!     .build()
//!     .unwrap();
//!
//! assert!(bond.is_investment_grade());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod types;
pub mod universe;

pub use error::{CoreError, CoreResult};
pub use types::{CreditRating, Instrument, InstrumentBuilder, RatingBucket, Sector};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{CreditRating, Instrument, InstrumentBuilder, RatingBucket, Sector};
    pub use crate::universe::{distinct_sectors, indices_where, subset};
}
