//! Property-based tests for the risk modules.

use bondsmith_core::{CreditRating, Instrument, Sector};
use bondsmith_risk::prelude::*;
use proptest::prelude::*;

fn any_rating() -> impl Strategy<Value = CreditRating> {
    (0..CreditRating::all().len()).prop_map(|i| CreditRating::all()[i])
}

fn any_sector() -> impl Strategy<Value = Sector> {
    (0..Sector::all().len()).prop_map(|i| Sector::all()[i])
}

fn any_bond() -> impl Strategy<Value = Instrument> {
    (any_sector(), any_rating(), 0.5f64..15.0, 0.005f64..0.12, 0.02f64..0.4).prop_map(
        |(sector, rating, duration, yield_rate, volatility)| {
            Instrument::builder()
                .id("P")
                .sector(sector)
                .rating(rating)
                .duration(duration)
                .yield_rate(yield_rate)
                .volatility(volatility)
                .build()
                .unwrap()
        },
    )
}

/// A universe with weights normalized to one.
fn any_portfolio() -> impl Strategy<Value = PortfolioInputs> {
    prop::collection::vec((any_bond(), 0.01f64..1.0), 1..8).prop_map(|rows| {
        let total: f64 = rows.iter().map(|(_, w)| w).sum();
        let bonds: Vec<Instrument> = rows.iter().map(|(b, _)| b.clone()).collect();
        let weights: Vec<f64> = rows.iter().map(|(_, w)| w / total).collect();
        PortfolioInputs::from_instruments(&bonds, &weights).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn cvar_never_below_var(
        inputs in any_portfolio(),
        seed in any::<u64>(),
        n in 1usize..1500,
        days in 1u32..500,
    ) {
        let config = MonteCarloConfig::default()
            .with_simulations(n)
            .with_horizon_days(days)
            .with_seed(seed);
        let result = run_monte_carlo(&inputs, 100_000.0, &config, &mut config.rng()).unwrap();
        for tail in &result.var_cvar {
            prop_assert!(tail.cvar_dollar >= tail.var_dollar - 1e-9);
            prop_assert!(tail.cvar_pct >= tail.var_pct - 1e-9);
        }
        prop_assert_eq!(result.histogram.iter().map(|b| b.count).sum::<usize>(), n);
    }

    #[test]
    fn backtest_shape_and_risk_free_monotone(
        inputs in any_portfolio(),
        seed in any::<u64>(),
        n_periods in 1usize..40,
        quarterly in any::<bool>(),
    ) {
        let cadence = if quarterly { Cadence::Quarterly } else { Cadence::Monthly };
        let config = BacktestConfig::default()
            .with_periods(n_periods)
            .with_cadence(cadence)
            .with_seed(seed);
        let result = run_backtest(&inputs, 10_000.0, &config, &mut config.rng()).unwrap();
        prop_assert_eq!(result.time_series.len(), n_periods + 1);
        for pair in result.time_series.windows(2) {
            prop_assert!(pair[1].risk_free >= pair[0].risk_free);
        }
        prop_assert!(result.optimized.max_drawdown >= 0.0);
    }

    #[test]
    fn rate_shock_up_hurts_positive_duration(inputs in any_portfolio()) {
        let report = run_stress_test(
            &inputs,
            100_000.0,
            &[standard::rate_shock_up_200()],
            0.04,
        )
        .unwrap();
        prop_assert!(report.scenarios[0].price_impact_pct < 0.0);
    }
}
