//! Curated real-bond CSV files.
//!
//! Expected header: `CUSIP,Issuer,Sector,Rating,Duration,Yield,Price`, with
//! `Yield` quoted in percent. The file carries no volatility, so one is
//! synthesized from the rating and duration with a little seeded noise.

use std::io::Read;
use std::path::Path;

use bondsmith_core::{CreditRating, Instrument, Sector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{MarketError, MarketResult};
use crate::synthetic::round_to;

const VOL_DURATION_SLOPE: f64 = 0.03;
const VOL_DURATION_SCALE: f64 = 30.0;
const VOL_NOISE: f64 = 0.005;
const DEFAULT_RATING_VOL: f64 = 0.10;

// =============================================================================
// CSV RECORD
// =============================================================================

/// CSV record for one bond.
#[derive(Debug, Deserialize)]
struct BondRecord {
    #[serde(rename = "CUSIP")]
    cusip: String,
    #[serde(rename = "Issuer")]
    issuer: String,
    #[serde(rename = "Sector")]
    sector: String,
    #[serde(rename = "Rating")]
    rating: String,
    #[serde(rename = "Duration")]
    duration: f64,
    #[serde(rename = "Yield")]
    yield_pct: f64,
    #[serde(rename = "Price")]
    price: f64,
}

/// Base volatility for a rating before the duration add-on.
#[must_use]
pub fn rating_volatility(rating: CreditRating) -> f64 {
    match rating {
        CreditRating::AAA => 0.04,
        CreditRating::AAPlus => 0.05,
        CreditRating::AA => 0.055,
        CreditRating::AAMinus => 0.06,
        CreditRating::APlus => 0.07,
        CreditRating::A => 0.08,
        CreditRating::AMinus => 0.09,
        CreditRating::BBBPlus => 0.10,
        CreditRating::BBB => 0.11,
        CreditRating::BBBMinus => 0.13,
        CreditRating::BB => 0.16,
        CreditRating::B => 0.22,
        CreditRating::CCC => 0.28,
        _ => DEFAULT_RATING_VOL,
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Loads instruments from a real-bond CSV file.
#[derive(Debug, Clone, Copy)]
pub struct CsvBondLoader {
    seed: u64,
}

impl CsvBondLoader {
    /// Creates a loader whose volatility noise is drawn from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Reads and converts every row of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Io`] if the file cannot be opened and
    /// [`MarketError::Parse`] naming the first bad row otherwise.
    pub fn load_path(&self, path: impl AsRef<Path>) -> MarketResult<Vec<Instrument>> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path)
            .map_err(|e| MarketError::io(path.display().to_string(), e.to_string()))?;
        let bonds = self.load(reader)?;
        info!(path = %path.display(), n_bonds = bonds.len(), "bond file loaded");
        Ok(bonds)
    }

    /// Reads and converts every row from an in-memory or streamed source.
    pub fn load_reader<R: Read>(&self, source: R) -> MarketResult<Vec<Instrument>> {
        self.load(csv::Reader::from_reader(source))
    }

    fn load<R: Read>(&self, mut reader: csv::Reader<R>) -> MarketResult<Vec<Instrument>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut bonds = Vec::new();

        for (index, result) in reader.deserialize::<BondRecord>().enumerate() {
            let row = index + 1;
            let record = result.map_err(|e| MarketError::parse(row, e.to_string()))?;
            bonds.push(convert(row, record, &mut rng)?);
        }

        if bonds.is_empty() {
            return Err(MarketError::invalid_config("bond file contains no rows"));
        }
        debug!(n_bonds = bonds.len(), "bond rows converted");
        Ok(bonds)
    }
}

fn convert(row: usize, record: BondRecord, rng: &mut StdRng) -> MarketResult<Instrument> {
    let rating = CreditRating::parse(&record.rating)
        .ok_or_else(|| MarketError::parse(row, format!("unknown rating '{}'", record.rating)))?;
    let sector = Sector::parse(&record.sector)
        .ok_or_else(|| MarketError::parse(row, format!("unknown sector '{}'", record.sector)))?;

    let volatility = round_to(
        rating_volatility(rating)
            + record.duration / VOL_DURATION_SCALE * VOL_DURATION_SLOPE
            + rng.gen_range(-VOL_NOISE..=VOL_NOISE),
        4,
    );

    Instrument::new(
        record.cusip,
        record.issuer,
        sector,
        rating,
        round_to(record.duration, 1),
        round_to(record.yield_pct, 4) / 100.0,
        volatility,
        round_to(record.price, 2),
    )
    .map_err(|e| MarketError::parse(row, e.to_string()))
}
