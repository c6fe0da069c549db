//! Domain types for the bond universe table.

mod instrument;
mod rating;
mod sector;

pub use instrument::{Instrument, InstrumentBuilder};
pub use rating::{CreditRating, RatingBucket};
pub use sector::Sector;
