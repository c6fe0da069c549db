//! Issuer sector taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Issuer sector used for concentration limits and correlation structure.
///
/// Parsing accepts the display name (`"Consumer Discretionary"`), the
/// variant name (`"ConsumerDiscretionary"`) or the short code (`"CD"`),
/// case-insensitively.
///
/// # Examples
///
/// ```
/// use bondsmith_core::Sector;
///
/// let sector: Sector = "consumer staples".parse().unwrap();
/// assert_eq!(sector, Sector::ConsumerStaples);
/// assert_eq!(sector.to_string(), "Consumer Staples");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Sector {
    /// Hardware, software and semiconductors
    Technology,
    /// Banks, brokers and card issuers
    Financials,
    /// Autos, retail, media and leisure
    ConsumerDiscretionary,
    /// Food, beverage and household products
    ConsumerStaples,
    /// Pharma and medical devices
    Healthcare,
    /// Telecom carriers
    Telecommunication,
    /// Oil and gas
    Energy,
    /// Aerospace, machinery and transport
    Industrials,
    /// Regulated utilities
    Utilities,
    /// Chemicals and mining
    Materials,
    /// REITs and property companies
    RealEstate,
    /// Sovereign and agency issuers
    Government,
    /// Anything unclassified
    #[default]
    Other,
}

impl Sector {
    /// All sectors in declaration order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Technology,
            Self::Financials,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::Healthcare,
            Self::Telecommunication,
            Self::Energy,
            Self::Industrials,
            Self::Utilities,
            Self::Materials,
            Self::RealEstate,
            Self::Government,
            Self::Other,
        ]
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Financials => "Financials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Healthcare => "Healthcare",
            Self::Telecommunication => "Telecommunication",
            Self::Energy => "Energy",
            Self::Industrials => "Industrials",
            Self::Utilities => "Utilities",
            Self::Materials => "Materials",
            Self::RealEstate => "Real Estate",
            Self::Government => "Government",
            Self::Other => "Other",
        }
    }

    /// Short code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Technology => "TECH",
            Self::Financials => "FIN",
            Self::ConsumerDiscretionary => "CD",
            Self::ConsumerStaples => "CS",
            Self::Healthcare => "HC",
            Self::Telecommunication => "TEL",
            Self::Energy => "ENGY",
            Self::Industrials => "IND",
            Self::Utilities => "UTIL",
            Self::Materials => "MAT",
            Self::RealEstate => "RE",
            Self::Government => "GOVT",
            Self::Other => "OTH",
        }
    }

    /// Parses a sector label, returning `None` when unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let alias = match key.as_str() {
            "financial" | "finance" | "banks" => Some(Self::Financials),
            "tech" | "informationtechnology" => Some(Self::Technology),
            "health" | "healthcare" | "medical" => Some(Self::Healthcare),
            "telecom" | "telecommunications" | "communicationservices" => {
                Some(Self::Telecommunication)
            }
            "industrial" => Some(Self::Industrials),
            "utility" => Some(Self::Utilities),
            "sovereign" | "treasury" => Some(Self::Government),
            _ => None,
        };
        alias.or_else(|| {
            Self::all().iter().copied().find(|sector| {
                let name: String = sector
                    .name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                name == key || sector.code().eq_ignore_ascii_case(&key)
            })
        })
    }
}

impl FromStr for Sector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownSector(s.to_string()))
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
