//! Stress scenario definitions.

use bondsmith_core::CreditRating;
use serde::{Deserialize, Serialize};

/// How a scenario rescales credit spreads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpreadMultiplier {
    /// One multiplier for every rating.
    Uniform(f64),
    /// Separate multipliers for investment-grade and high-yield ratings.
    Tiered {
        /// Applied to investment-grade ratings.
        investment_grade: f64,
        /// Applied to everything else.
        high_yield: f64,
    },
}

impl SpreadMultiplier {
    /// The multiplier that applies to `rating`.
    #[must_use]
    pub fn for_rating(&self, rating: CreditRating) -> f64 {
        match *self {
            Self::Uniform(m) => m,
            Self::Tiered {
                investment_grade,
                high_yield,
            } => {
                if rating.is_investment_grade() {
                    investment_grade
                } else {
                    high_yield
                }
            }
        }
    }
}

impl Default for SpreadMultiplier {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

/// Approximate credit spread over treasuries for a rating.
///
/// Unlisted ratings (including not-rated) get 150bp.
#[must_use]
pub fn base_spread(rating: CreditRating) -> f64 {
    use CreditRating::*;
    match rating {
        AAA => 0.005,
        AAPlus => 0.006,
        AA => 0.007,
        AAMinus => 0.008,
        APlus => 0.009,
        A => 0.010,
        AMinus => 0.012,
        BBBPlus => 0.014,
        BBB => 0.017,
        BBBMinus => 0.020,
        BBPlus => 0.030,
        BB => 0.035,
        BBMinus => 0.040,
        BPlus => 0.045,
        B => 0.050,
        BMinus => 0.060,
        CCCPlus => 0.075,
        CCC => 0.085,
        CCCMinus => 0.095,
        CC => 0.105,
        C => 0.110,
        D => 0.120,
        NotRated => 0.015,
    }
}

/// A named deterministic shock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    /// Catalog key, e.g. `"credit_crisis"`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Parallel yield shift as a decimal.
    pub yield_shift: f64,
    /// Credit spread rescaling.
    pub spread_multiplier: SpreadMultiplier,
    /// Volatility multiplier.
    pub volatility_multiplier: f64,
}

impl StressScenario {
    /// Creates a scenario with no shocks.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            yield_shift: 0.0,
            spread_multiplier: SpreadMultiplier::default(),
            volatility_multiplier: 1.0,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the parallel yield shift.
    #[must_use]
    pub fn with_yield_shift(mut self, shift: f64) -> Self {
        self.yield_shift = shift;
        self
    }

    /// Sets one spread multiplier for all ratings.
    #[must_use]
    pub fn with_spread_multiplier(mut self, multiplier: f64) -> Self {
        self.spread_multiplier = SpreadMultiplier::Uniform(multiplier);
        self
    }

    /// Sets separate investment-grade and high-yield spread multipliers.
    #[must_use]
    pub fn with_tiered_spreads(mut self, investment_grade: f64, high_yield: f64) -> Self {
        self.spread_multiplier = SpreadMultiplier::Tiered {
            investment_grade,
            high_yield,
        };
        self
    }

    /// Sets the volatility multiplier.
    #[must_use]
    pub fn with_volatility_multiplier(mut self, multiplier: f64) -> Self {
        self.volatility_multiplier = multiplier;
        self
    }

    /// Yield change for one instrument: parallel shift plus the change in
    /// its rating's spread.
    #[must_use]
    pub fn yield_change(&self, rating: CreditRating) -> f64 {
        let spread = base_spread(rating);
        let stressed = spread * self.spread_multiplier.for_rating(rating);
        self.yield_shift + (stressed - spread)
    }
}

/// The built-in scenario catalog.
pub mod standard {
    use super::StressScenario;

    /// Keys of every catalog scenario, in catalog order.
    pub const KEYS: [&str; 7] = [
        "rate_shock_up_200",
        "rate_shock_up_100",
        "rate_shock_down_100",
        "credit_crisis",
        "flight_to_quality",
        "stagflation",
        "2008_replay",
    ];

    /// +200bp parallel shift.
    #[must_use]
    pub fn rate_shock_up_200() -> StressScenario {
        StressScenario::new("rate_shock_up_200", "Rate Shock +200bp")
            .with_description("Parallel shift in yields up by 200 basis points")
            .with_yield_shift(0.02)
            .with_volatility_multiplier(1.5)
    }

    /// +100bp parallel shift.
    #[must_use]
    pub fn rate_shock_up_100() -> StressScenario {
        StressScenario::new("rate_shock_up_100", "Rate Shock +100bp")
            .with_description("Parallel shift in yields up by 100 basis points")
            .with_yield_shift(0.01)
            .with_volatility_multiplier(1.2)
    }

    /// -100bp parallel shift.
    #[must_use]
    pub fn rate_shock_down_100() -> StressScenario {
        StressScenario::new("rate_shock_down_100", "Rate Shock -100bp")
            .with_description("Parallel shift in yields down by 100 basis points")
            .with_yield_shift(-0.01)
            .with_volatility_multiplier(1.1)
    }

    /// Spreads triple.
    #[must_use]
    pub fn credit_crisis() -> StressScenario {
        StressScenario::new("credit_crisis", "Credit Crisis")
            .with_description("Credit spreads widen 3x, high-yield volatility spikes")
            .with_yield_shift(0.005)
            .with_spread_multiplier(3.0)
            .with_volatility_multiplier(2.0)
    }

    /// Rates rally; investment grade tightens while high yield widens.
    #[must_use]
    pub fn flight_to_quality() -> StressScenario {
        StressScenario::new("flight_to_quality", "Flight to Quality")
            .with_description("Treasuries rally, investment-grade tightens, junk widens")
            .with_yield_shift(-0.015)
            .with_tiered_spreads(0.7, 2.5)
            .with_volatility_multiplier(1.8)
    }

    /// Rates and spreads rise together.
    #[must_use]
    pub fn stagflation() -> StressScenario {
        StressScenario::new("stagflation", "Stagflation")
            .with_description("Rates rise with widening credit spreads across all tiers")
            .with_yield_shift(0.015)
            .with_spread_multiplier(1.8)
            .with_volatility_multiplier(1.6)
    }

    /// 2008-style spread blowout with rate cuts.
    #[must_use]
    pub fn crisis_2008_replay() -> StressScenario {
        StressScenario::new("2008_replay", "2008 Crisis Replay")
            .with_description("Extreme credit spread widening, rates cut, volatility spike")
            .with_yield_shift(-0.02)
            .with_spread_multiplier(5.0)
            .with_volatility_multiplier(3.0)
    }

    /// Every catalog scenario.
    #[must_use]
    pub fn all() -> Vec<StressScenario> {
        vec![
            rate_shock_up_200(),
            rate_shock_up_100(),
            rate_shock_down_100(),
            credit_crisis(),
            flight_to_quality(),
            stagflation(),
            crisis_2008_replay(),
        ]
    }

    /// Looks up a scenario by key.
    #[must_use]
    pub fn by_key(key: &str) -> Option<StressScenario> {
        all().into_iter().find(|s| s.key == key)
    }

    /// Scenarios for `keys` in the order given; unknown keys are skipped.
    #[must_use]
    pub fn select<S: AsRef<str>>(keys: &[S]) -> Vec<StressScenario> {
        keys.iter().filter_map(|k| by_key(k.as_ref())).collect()
    }
}
