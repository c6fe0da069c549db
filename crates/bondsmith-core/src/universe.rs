//! Helpers over a bond universe table (`&[Instrument]`).
//!
//! The engine treats the universe as an ordered slice; positions in the slice
//! are the indices used by weight vectors and constraint member sets.

use std::collections::BTreeSet;

use crate::types::{Instrument, Sector};

/// Sectors that have at least one member, in taxonomy order.
#[must_use]
pub fn distinct_sectors(universe: &[Instrument]) -> Vec<Sector> {
    universe
        .iter()
        .map(|b| b.sector)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Indices of instruments matching `predicate`, ascending.
pub fn indices_where<F>(universe: &[Instrument], predicate: F) -> Vec<usize>
where
    F: Fn(&Instrument) -> bool,
{
    universe
        .iter()
        .enumerate()
        .filter(|(_, b)| predicate(b))
        .map(|(i, _)| i)
        .collect()
}

/// Clones the instruments at `indices` into a new table, preserving order.
///
/// Out-of-range indices are skipped.
#[must_use]
pub fn subset(universe: &[Instrument], indices: &[usize]) -> Vec<Instrument> {
    indices
        .iter()
        .filter_map(|&i| universe.get(i).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreditRating;

    fn bond(id: &str, sector: Sector, rating: CreditRating) -> Instrument {
        Instrument::new(id, "Issuer", sector, rating, 5.0, 0.05, 0.1, 100.0).unwrap()
    }

    fn universe() -> Vec<Instrument> {
        vec![
            bond("A", Sector::Energy, CreditRating::AA),
            bond("B", Sector::Technology, CreditRating::BB),
            bond("C", Sector::Energy, CreditRating::CCC),
        ]
    }

    #[test]
    fn test_distinct_sectors() {
        assert_eq!(
            distinct_sectors(&universe()),
            vec![Sector::Technology, Sector::Energy]
        );
        assert!(distinct_sectors(&[]).is_empty());
    }

    #[test]
    fn test_indices_where() {
        let u = universe();
        assert_eq!(indices_where(&u, |b| !b.is_investment_grade()), vec![1, 2]);
        assert_eq!(indices_where(&u, |b| b.sector == Sector::Energy), vec![0, 2]);
    }

    #[test]
    fn test_subset() {
        let u = universe();
        let s = subset(&u, &[2, 0, 9]);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].id, "C");
        assert_eq!(s[1].id, "A");
    }
}
