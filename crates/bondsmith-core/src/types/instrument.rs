//! Instrument: one row of the bond universe table.

use serde::{Deserialize, Serialize};

use super::{CreditRating, Sector};
use crate::error::{CoreError, CoreResult};

/// A fixed income instrument as seen by the allocation engine.
///
/// Yields and volatilities are annualized decimals (`0.045` is 4.5%).
/// Duration is in years. Construct through [`Instrument::builder`] or
/// [`Instrument::new`] so the attribute invariants are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Identifier (CUSIP or synthetic ticker).
    pub id: String,
    /// Issuer name.
    pub issuer: String,
    /// Issuer sector.
    pub sector: Sector,
    /// Credit rating.
    pub rating: CreditRating,
    /// Duration in years, strictly positive.
    pub duration: f64,
    /// Annualized yield.
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    /// Annualized return volatility, strictly positive.
    pub volatility: f64,
    /// Price per 100 face.
    pub price: f64,
}

impl Instrument {
    /// Creates a validated instrument.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        issuer: impl Into<String>,
        sector: Sector,
        rating: CreditRating,
        duration: f64,
        yield_rate: f64,
        volatility: f64,
        price: f64,
    ) -> CoreResult<Self> {
        let instrument = Self {
            id: id.into(),
            issuer: issuer.into(),
            sector,
            rating,
            duration,
            yield_rate,
            volatility,
            price,
        };
        instrument.validate()?;
        Ok(instrument)
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> InstrumentBuilder {
        InstrumentBuilder::default()
    }

    /// Checks duration and volatility are finite and positive.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(CoreError::invalid_instrument(
                &self.id,
                format!("duration must be positive, got {}", self.duration),
            ));
        }
        if !(self.volatility.is_finite() && self.volatility > 0.0) {
            return Err(CoreError::invalid_instrument(
                &self.id,
                format!("volatility must be positive, got {}", self.volatility),
            ));
        }
        if !self.yield_rate.is_finite() {
            return Err(CoreError::invalid_instrument(&self.id, "yield must be finite"));
        }
        Ok(())
    }

    /// True if the rating is BBB- or better.
    #[must_use]
    pub fn is_investment_grade(&self) -> bool {
        self.rating.is_investment_grade()
    }
}

/// Builder for [`Instrument`].
#[derive(Debug, Clone, Default)]
pub struct InstrumentBuilder {
    id: Option<String>,
    issuer: Option<String>,
    sector: Sector,
    rating: Option<CreditRating>,
    duration: Option<f64>,
    yield_rate: Option<f64>,
    volatility: Option<f64>,
    price: f64,
}

impl InstrumentBuilder {
    /// Sets the identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the issuer name.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the sector. Defaults to [`Sector::Other`].
    #[must_use]
    pub fn sector(mut self, sector: Sector) -> Self {
        self.sector = sector;
        self
    }

    /// Sets the credit rating.
    #[must_use]
    pub fn rating(mut self, rating: CreditRating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the duration in years.
    #[must_use]
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the annualized yield.
    #[must_use]
    pub fn yield_rate(mut self, yield_rate: f64) -> Self {
        self.yield_rate = Some(yield_rate);
        self
    }

    /// Sets the annualized volatility.
    #[must_use]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the price per 100 face. Defaults to 0.
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Builds and validates the instrument.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or an attribute is
    /// out of range.
    pub fn build(self) -> CoreResult<Instrument> {
        let id = self.id.ok_or_else(|| CoreError::missing_field("id"))?;
        let issuer = self.issuer.unwrap_or_default();
        let rating = self.rating.ok_or_else(|| CoreError::missing_field("rating"))?;
        let duration = self
            .duration
            .ok_or_else(|| CoreError::missing_field("duration"))?;
        let yield_rate = self
            .yield_rate
            .ok_or_else(|| CoreError::missing_field("yield_rate"))?;
        let volatility = self
            .volatility
            .ok_or_else(|| CoreError::missing_field("volatility"))?;

        Instrument::new(
            id, issuer, self.sector, rating, duration, yield_rate, volatility, self.price,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InstrumentBuilder {
        Instrument::builder()
            .id("MIC-2001")
            .issuer("Microsoft")
            .sector(Sector::Technology)
            .rating(CreditRating::AAA)
            .duration(7.5)
            .yield_rate(0.047)
            .volatility(0.075)
            .price(71.0)
    }

    #[test]
    fn test_builder() {
        let bond = sample().build().unwrap();
        assert_eq!(bond.id, "MIC-2001");
        assert_eq!(bond.sector, Sector::Technology);
        assert!(bond.is_investment_grade());
    }

    #[test]
    fn test_builder_missing_field() {
        let err = Instrument::builder().id("X").build().unwrap_err();
        assert_eq!(err, CoreError::missing_field("rating"));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let err = sample().duration(0.0).build().unwrap_err();
        assert!(err.to_string().contains("duration"));
        assert!(sample().duration(-1.0).build().is_err());
    }

    #[test]
    fn test_non_positive_volatility_rejected() {
        let err = sample().volatility(0.0).build().unwrap_err();
        assert!(err.to_string().contains("volatility"));
        assert!(sample().volatility(f64::NAN).build().is_err());
    }

    #[test]
    fn test_serde_uses_yield_key() {
        let bond = sample().build().unwrap();
        let json = serde_json::to_string(&bond).unwrap();
        assert!(json.contains("\"yield\":0.047"));
        let back: Instrument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bond);
    }
}
