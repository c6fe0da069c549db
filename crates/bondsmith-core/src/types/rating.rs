//! Credit ratings used to classify instruments in the universe table.
//!
//! - [`CreditRating`]: agency-agnostic notch scale from AAA down to D, plus NR
//! - [`RatingBucket`]: letter-grade grouping used for allocation breakdowns

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Agency-agnostic credit rating.
///
/// Ordered from highest quality ([`CreditRating::AAA`]) to lowest
/// ([`CreditRating::D`]). Plain letter grades such as `"BB"` map to the
/// middle notch of their grade.
///
/// # Examples
///
/// ```
/// use bondsmith_core::CreditRating;
///
/// let rating: CreditRating = "BBB-".parse().unwrap();
/// assert!(rating.is_investment_grade());
/// assert_eq!(CreditRating::parse("Ba1"), Some(CreditRating::BBPlus));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CreditRating {
    /// Highest quality
    AAA = 1,
    /// AA+
    AAPlus = 2,
    /// AA
    AA = 3,
    /// AA-
    AAMinus = 4,
    /// A+
    APlus = 5,
    /// A
    A = 6,
    /// A-
    AMinus = 7,
    /// BBB+
    BBBPlus = 8,
    /// BBB
    BBB = 9,
    /// BBB- (investment grade cutoff)
    BBBMinus = 10,
    /// BB+
    BBPlus = 11,
    /// BB
    BB = 12,
    /// BB-
    BBMinus = 13,
    /// B+
    BPlus = 14,
    /// B
    B = 15,
    /// B-
    BMinus = 16,
    /// CCC+
    CCCPlus = 17,
    /// CCC
    CCC = 18,
    /// CCC-
    CCCMinus = 19,
    /// CC
    CC = 20,
    /// C
    C = 21,
    /// In default
    D = 22,
    /// Not rated
    #[default]
    NotRated = 99,
}

const ALL_RATINGS: [CreditRating; 23] = [
    CreditRating::AAA,
    CreditRating::AAPlus,
    CreditRating::AA,
    CreditRating::AAMinus,
    CreditRating::APlus,
    CreditRating::A,
    CreditRating::AMinus,
    CreditRating::BBBPlus,
    CreditRating::BBB,
    CreditRating::BBBMinus,
    CreditRating::BBPlus,
    CreditRating::BB,
    CreditRating::BBMinus,
    CreditRating::BPlus,
    CreditRating::B,
    CreditRating::BMinus,
    CreditRating::CCCPlus,
    CreditRating::CCC,
    CreditRating::CCCMinus,
    CreditRating::CC,
    CreditRating::C,
    CreditRating::D,
    CreditRating::NotRated,
];

const MOODYS: [&str; 23] = [
    "Aaa", "Aa1", "Aa2", "Aa3", "A1", "A2", "A3", "Baa1", "Baa2", "Baa3", "Ba1", "Ba2", "Ba3",
    "B1", "B2", "B3", "Caa1", "Caa2", "Caa3", "Ca", "C", "D", "NR",
];

impl CreditRating {
    /// Every recognized rating, best first, with NR last.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &ALL_RATINGS
    }

    /// Ratings below the investment grade cutoff (BB+ through D, NR excluded).
    ///
    /// This is the default junk set for the allocation constraints.
    #[must_use]
    pub fn non_investment_grade() -> Vec<Self> {
        ALL_RATINGS
            .iter()
            .copied()
            .filter(|r| !r.is_investment_grade() && *r != Self::NotRated)
            .collect()
    }

    /// Numeric score (1 = AAA, 22 = D, 99 = NR).
    #[must_use]
    pub fn score(&self) -> u8 {
        *self as u8
    }

    /// True for BBB- or better.
    #[must_use]
    pub fn is_investment_grade(&self) -> bool {
        *self <= CreditRating::BBBMinus
    }

    /// True for BB+ through C. Defaulted and unrated paper is neither.
    #[must_use]
    pub fn is_high_yield(&self) -> bool {
        *self >= CreditRating::BBPlus && *self <= CreditRating::C
    }

    /// Letter-grade bucket.
    #[must_use]
    pub fn bucket(&self) -> RatingBucket {
        match self {
            Self::AAA => RatingBucket::AAA,
            Self::AAPlus | Self::AA | Self::AAMinus => RatingBucket::AA,
            Self::APlus | Self::A | Self::AMinus => RatingBucket::A,
            Self::BBBPlus | Self::BBB | Self::BBBMinus => RatingBucket::BBB,
            Self::BBPlus | Self::BB | Self::BBMinus => RatingBucket::BB,
            Self::BPlus | Self::B | Self::BMinus => RatingBucket::B,
            Self::CCCPlus | Self::CCC | Self::CCCMinus | Self::CC | Self::C => RatingBucket::CCC,
            Self::D => RatingBucket::Default,
            Self::NotRated => RatingBucket::NotRated,
        }
    }

    /// S&P-style label, e.g. `"BBB-"`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AAA => "AAA",
            Self::AAPlus => "AA+",
            Self::AA => "AA",
            Self::AAMinus => "AA-",
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BBBPlus => "BBB+",
            Self::BBB => "BBB",
            Self::BBBMinus => "BBB-",
            Self::BBPlus => "BB+",
            Self::BB => "BB",
            Self::BBMinus => "BB-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CCCPlus => "CCC+",
            Self::CCC => "CCC",
            Self::CCCMinus => "CCC-",
            Self::CC => "CC",
            Self::C => "C",
            Self::D => "D",
            Self::NotRated => "NR",
        }
    }

    /// Moody's-style label, e.g. `"Baa3"`.
    #[must_use]
    pub fn moodys_label(&self) -> &'static str {
        let idx = ALL_RATINGS.iter().position(|r| r == self).unwrap_or(22);
        MOODYS[idx]
    }

    /// Parses a rating label into the set of notches it covers.
    ///
    /// A bare letter grade with notches (`"AA"`, `"A"`, `"BBB"`, `"BB"`, `"B"`,
    /// `"CCC"`) covers its whole [`RatingBucket`], so `"CCC"` also matches
    /// CCC+, CCC-, CC and C. Any other label covers exactly one notch.
    #[must_use]
    pub fn parse_grade(label: &str) -> Option<Vec<Self>> {
        let rating = Self::parse(label)?;
        let bare = label.trim().to_uppercase();
        if matches!(bare.as_str(), "AA" | "A" | "BBB" | "BB" | "B" | "CCC") {
            Some(rating.bucket().members())
        } else {
            Some(vec![rating])
        }
    }

    /// Parses S&P or Moody's notation. S&P labels are case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(idx) = MOODYS.iter().position(|m| *m == s) {
            return Some(ALL_RATINGS[idx]);
        }
        let upper = s.to_uppercase();
        if matches!(upper.as_str(), "NOT RATED" | "NOTRATED" | "N/A") {
            return Some(Self::NotRated);
        }
        ALL_RATINGS.iter().copied().find(|r| r.label() == upper)
    }
}

impl FromStr for CreditRating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownRating(s.to_string()))
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Letter-grade grouping of [`CreditRating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingBucket {
    /// AAA
    AAA,
    /// AA+, AA, AA-
    AA,
    /// A+, A, A-
    A,
    /// BBB+, BBB, BBB-
    BBB,
    /// BB+, BB, BB-
    BB,
    /// B+, B, B-
    B,
    /// CCC+ down to C
    CCC,
    /// D
    Default,
    /// NR
    NotRated,
}

impl RatingBucket {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AAA => "AAA",
            Self::AA => "AA",
            Self::A => "A",
            Self::BBB => "BBB",
            Self::BB => "BB",
            Self::B => "B",
            Self::CCC => "CCC & Below",
            Self::Default => "Default",
            Self::NotRated => "Not Rated",
        }
    }

    /// True for AAA through BBB.
    #[must_use]
    pub fn is_investment_grade(&self) -> bool {
        matches!(self, Self::AAA | Self::AA | Self::A | Self::BBB)
    }

    /// Ratings in this bucket, best first.
    #[must_use]
    pub fn members(&self) -> Vec<CreditRating> {
        ALL_RATINGS
            .iter()
            .copied()
            .filter(|r| r.bucket() == *self)
            .collect()
    }
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
