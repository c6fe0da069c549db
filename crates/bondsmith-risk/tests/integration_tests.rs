//! Integration tests for bondsmith-risk.
//!
//! Solve an allocation, then run every risk module on the result.

use approx::assert_relative_eq;
use bondsmith_portfolio::prelude::*;
use bondsmith_risk::prelude::*;

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn universe() -> Vec<Instrument> {
    let rows = [
        ("APP-2031", "Apple", Sector::Technology, CreditRating::AA, 3.0, 0.040, 0.06),
        ("JPM-2030", "JPMorgan", Sector::Financials, CreditRating::A, 5.0, 0.045, 0.08),
        ("XOM-2034", "Exxon Mobil", Sector::Energy, CreditRating::BBB, 7.0, 0.050, 0.10),
        ("FOR-2029", "Ford", Sector::ConsumerDiscretionary, CreditRating::BB, 4.0, 0.060, 0.15),
        ("PFE-2033", "Pfizer", Sector::Healthcare, CreditRating::A, 6.0, 0.042, 0.07),
        ("BOE-2035", "Boeing", Sector::Industrials, CreditRating::BBBMinus, 8.0, 0.055, 0.12),
    ];
    rows.iter()
        .map(|(id, issuer, sector, rating, d, y, v)| {
            Instrument::new(*id, *issuer, *sector, *rating, *d, *y, *v, 100.0).unwrap()
        })
        .collect()
}

fn solved() -> OptimizedPortfolio {
    let request = AllocationRequest::new(Objective::OptimizeSharpe)
        .with_constraints(AllocationConstraints::default().with_max_allocation(0.4));
    solve_allocation(&universe(), &request).unwrap()
}

// =============================================================================
// PIPELINE
// =============================================================================

#[test]
fn test_monte_carlo_on_solved_portfolio() {
    let portfolio = solved();
    let inputs = PortfolioInputs::from_portfolio(&portfolio).unwrap();
    assert_eq!(inputs.len(), portfolio.len());

    let config = MonteCarloConfig::default();
    let result = run_monte_carlo(&inputs, portfolio.capital, &config, &mut config.rng()).unwrap();

    assert_eq!(result.n_simulations, 10_000);
    assert_relative_eq!(result.expected_return_annual, portfolio.metrics.yield_rate, epsilon = 1e-9);
    assert_relative_eq!(result.expected_volatility_annual, portfolio.metrics.volatility, epsilon = 1e-9);
    for tail in &result.var_cvar {
        assert!(tail.cvar_dollar >= tail.var_dollar, "{}", tail.label());
    }
    assert!(result.prob_loss > 0.0 && result.prob_loss < 100.0);
}

#[test]
fn test_stress_on_solved_portfolio() {
    let portfolio = solved();
    let inputs = PortfolioInputs::from_portfolio(&portfolio).unwrap();
    let report = run_stress_config(&inputs, portfolio.capital, &StressConfig::default()).unwrap();

    assert_eq!(report.scenarios.len(), 7);
    assert_relative_eq!(report.base_portfolio.duration, portfolio.metrics.duration, epsilon = 1e-9);

    let up = report
        .scenarios
        .iter()
        .find(|s| s.name == "Rate Shock +200bp")
        .unwrap();
    assert!(up.price_impact_pct < 0.0);

    let down = report
        .scenarios
        .iter()
        .find(|s| s.scenario == "rate_shock_down_100")
        .unwrap();
    assert!(down.price_impact_pct > 0.0);

    let crisis = report
        .scenarios
        .iter()
        .find(|s| s.scenario == "credit_crisis")
        .unwrap();
    assert!(crisis.stressed_yield > crisis.base_yield);
}

#[test]
fn test_backtest_on_solved_portfolio() {
    let portfolio = solved();
    let inputs = PortfolioInputs::from_portfolio(&portfolio).unwrap();
    let config = BacktestConfig::default();
    let result = run_backtest(&inputs, portfolio.capital, &config, &mut config.rng()).unwrap();

    assert_eq!(result.time_series.len(), config.n_periods + 1);
    assert_relative_eq!(result.optimized.portfolio_yield, portfolio.metrics.yield_rate, epsilon = 1e-9);
    assert_eq!(
        result.time_series.last().unwrap().optimized,
        result.optimized.final_value
    );
}

#[test]
fn test_whole_pipeline_is_reproducible() {
    let run = || {
        let portfolio = solved();
        let inputs = PortfolioInputs::from_portfolio(&portfolio).unwrap();
        let mc = MonteCarloConfig::default().with_simulations(2_000);
        let bt = BacktestConfig::default();
        (
            serde_json::to_string(&run_monte_carlo(&inputs, 1e5, &mc, &mut mc.rng()).unwrap()).unwrap(),
            serde_json::to_string(&run_backtest(&inputs, 1e5, &bt, &mut bt.rng()).unwrap()).unwrap(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn test_shared_rng_advances() {
    let inputs = PortfolioInputs::from_portfolio(&solved()).unwrap();
    let config = MonteCarloConfig::default().with_simulations(500);
    let mut rng = SimulationRng::from_seed(1);
    let first = run_monte_carlo(&inputs, 1e5, &config, &mut rng).unwrap();
    let second = run_monte_carlo(&inputs, 1e5, &config, &mut rng).unwrap();
    assert_ne!(first.mean_pnl, second.mean_pnl);
}
