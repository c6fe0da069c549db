//! Property-based tests for bondsmith-market.

use bondsmith_market::{SyntheticConfig, SyntheticMarket, TreasuryCurve};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generator_respects_size_and_ranges(n_bonds in 1usize..200, seed in any::<u64>()) {
        let curve = TreasuryCurve::fallback().unwrap();
        let config = SyntheticConfig { n_bonds, seed };
        let bonds = SyntheticMarket::generate(config, &curve).unwrap();

        prop_assert_eq!(bonds.len(), n_bonds);
        for bond in &bonds {
            prop_assert!(bond.yield_rate > 0.0);
            prop_assert!((0.5..=20.0).contains(&bond.duration));
            prop_assert!(bond.volatility > 0.0);
        }
    }

    #[test]
    fn generator_is_deterministic(seed in any::<u64>()) {
        let curve = TreasuryCurve::fallback().unwrap();
        let config = SyntheticConfig { n_bonds: 20, seed };
        prop_assert_eq!(
            SyntheticMarket::generate(config, &curve).unwrap(),
            SyntheticMarket::generate(config, &curve).unwrap()
        );
    }
}
