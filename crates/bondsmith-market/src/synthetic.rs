//! Seeded synthetic bond universe.
//!
//! Each bond draws an issuer from a fixed 40-name catalog, a rating from the
//! eight-letter scale, and a duration in [1, 15]. Its yield sits on the
//! treasury curve plus a rating spread and ±50 bp of noise. The same seed
//! always produces the same universe.

use bondsmith_core::{CreditRating, Instrument, Sector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::curve::TreasuryCurve;
use crate::error::{MarketError, MarketResult};

/// Default universe size.
pub const DEFAULT_BOND_COUNT: usize = 150;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

const MIN_DURATION: f64 = 1.0;
const MAX_DURATION: f64 = 15.0;
const YIELD_NOISE: f64 = 0.005;
const VOL_NOISE: f64 = 0.01;
const VOL_DURATION_SLOPE: f64 = 0.05;
const MIN_VOLATILITY: f64 = 0.01;

// =============================================================================
// CATALOGS
// =============================================================================

/// Issuers and their sectors.
pub const ISSUERS: [(&str, Sector); 40] = [
    ("Apple", Sector::Technology),
    ("Microsoft", Sector::Technology),
    ("Tesla", Sector::ConsumerDiscretionary),
    ("JPMorgan", Sector::Financials),
    ("Amazon", Sector::ConsumerDiscretionary),
    ("Google", Sector::Technology),
    ("Goldman", Sector::Financials),
    ("Coca-Cola", Sector::ConsumerStaples),
    ("Pfizer", Sector::Healthcare),
    ("Verizon", Sector::Telecommunication),
    ("Exxon Mobil", Sector::Energy),
    ("Chevron", Sector::Energy),
    ("Walmart", Sector::ConsumerStaples),
    ("Procter & Gamble", Sector::ConsumerStaples),
    ("Johnson & Johnson", Sector::ConsumerStaples),
    ("Bank of America", Sector::Financials),
    ("AT&T", Sector::Telecommunication),
    ("Ford", Sector::ConsumerDiscretionary),
    ("General Electric", Sector::Industrials),
    ("Boeing", Sector::Industrials),
    ("Caterpillar", Sector::Industrials),
    ("Disney", Sector::ConsumerDiscretionary),
    ("Intel", Sector::Technology),
    ("IBM", Sector::Technology),
    ("Oracle", Sector::Technology),
    ("Cisco", Sector::Technology),
    ("PepsiCo", Sector::ConsumerStaples),
    ("McDonald's", Sector::ConsumerDiscretionary),
    ("Nike", Sector::ConsumerDiscretionary),
    ("Home Depot", Sector::ConsumerDiscretionary),
    ("Costco", Sector::ConsumerStaples),
    ("Salesforce", Sector::Technology),
    ("Honeywell", Sector::Industrials),
    ("Union Pacific", Sector::Industrials),
    ("UPS", Sector::Industrials),
    ("Lowe's", Sector::ConsumerDiscretionary),
    ("American Express", Sector::Financials),
    ("Medtronic", Sector::Healthcare),
    ("Abbott Labs", Sector::Healthcare),
    ("Bristol Myers Squibb", Sector::Healthcare),
];

/// Spread over treasuries and base volatility for one rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingProfile {
    /// Rating.
    pub rating: CreditRating,
    /// Credit spread as a decimal.
    pub spread: f64,
    /// Volatility before the duration add-on.
    pub base_volatility: f64,
}

const fn profile(rating: CreditRating, spread: f64, base_volatility: f64) -> RatingProfile {
    RatingProfile {
        rating,
        spread,
        base_volatility,
    }
}

/// Ratings the generator draws from, uniformly.
pub const RATING_PROFILES: [RatingProfile; 8] = [
    profile(CreditRating::AAA, 0.005, 0.05),
    profile(CreditRating::AA, 0.008, 0.06),
    profile(CreditRating::A, 0.012, 0.08),
    profile(CreditRating::BBB, 0.020, 0.10),
    profile(CreditRating::BB, 0.040, 0.15),
    profile(CreditRating::B, 0.060, 0.20),
    profile(CreditRating::CCC, 0.090, 0.25),
    profile(CreditRating::D, 0.120, 0.30),
];

// =============================================================================
// GENERATOR
// =============================================================================

/// Generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Number of bonds.
    pub n_bonds: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_bonds: DEFAULT_BOND_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

impl SyntheticConfig {
    /// Sets the universe size.
    #[must_use]
    pub fn with_bonds(mut self, n_bonds: usize) -> Self {
        self.n_bonds = n_bonds;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Synthetic market generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticMarket;

impl SyntheticMarket {
    /// Generates `config.n_bonds` instruments priced off `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_bonds` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bondsmith_market::{SyntheticConfig, SyntheticMarket, TreasuryCurve};
    ///
    /// let curve = TreasuryCurve::fallback().unwrap();
    /// let bonds = SyntheticMarket::generate(SyntheticConfig::default().with_bonds(20), &curve).unwrap();
    /// assert_eq!(bonds.len(), 20);
    /// assert!(bonds.iter().all(|b| b.yield_rate > 0.0));
    /// ```
    pub fn generate(config: SyntheticConfig, curve: &TreasuryCurve) -> MarketResult<Vec<Instrument>> {
        if config.n_bonds == 0 {
            return Err(MarketError::invalid_config("n_bonds must be positive"));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let bonds = (0..config.n_bonds)
            .map(|_| draw_bond(&mut rng, curve))
            .collect::<MarketResult<Vec<_>>>()?;

        info!(
            n_bonds = bonds.len(),
            seed = config.seed,
            "synthetic universe generated"
        );
        Ok(bonds)
    }
}

fn draw_bond(rng: &mut StdRng, curve: &TreasuryCurve) -> MarketResult<Instrument> {
    let (issuer, sector) = ISSUERS[rng.gen_range(0..ISSUERS.len())];
    let profile = RATING_PROFILES[rng.gen_range(0..RATING_PROFILES.len())];
    let duration = round_to(rng.gen_range(MIN_DURATION..=MAX_DURATION), 1);

    let yield_rate =
        curve.base_yield(duration) + profile.spread + rng.gen_range(-YIELD_NOISE..=YIELD_NOISE);
    let price = 100.0 / (1.0 + yield_rate).powf(duration);

    let volatility = round_to(
        profile.base_volatility
            + duration / MAX_DURATION * VOL_DURATION_SLOPE
            + rng.gen_range(-VOL_NOISE..=VOL_NOISE),
        4,
    )
    .max(MIN_VOLATILITY);

    let id = format!("{}-{}", ticker_prefix(issuer), rng.gen_range(1000..=9999));

    Ok(Instrument::new(
        id,
        issuer,
        sector,
        profile.rating,
        duration,
        round_to(yield_rate, 4),
        volatility,
        round_to(price, 2),
    )?)
}

fn ticker_prefix(issuer: &str) -> String {
    issuer.chars().take(3).collect::<String>().to_uppercase()
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
