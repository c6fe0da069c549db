//! Backtest command implementation.
//!
//! Tracks the optimized portfolio against the equal-weight and risk-free
//! benchmarks over simulated periods.

use anyhow::Result;
use bondsmith_risk::prelude::{run_backtest, BacktestPoint, BacktestResult, Cadence, TrackSummary};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{AllocationArgs, Context, MarketArgs};
use crate::output::{money, pct, print_header, print_json, print_rows, print_signed, print_table};

/// Arguments for the backtest command.
#[derive(Args, Debug)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,

    /// Number of simulated periods
    #[arg(long)]
    pub periods: Option<usize>,

    /// Period length: monthly or quarterly
    #[arg(long)]
    pub cadence: Option<Cadence>,

    /// Simulation seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Serialize, Tabled)]
struct PeriodRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Optimized")]
    optimized: String,
    #[tabled(rename = "Equal Weight")]
    equal_weight: String,
    #[tabled(rename = "Risk Free")]
    risk_free: String,
}

impl From<&BacktestPoint> for PeriodRow {
    fn from(p: &BacktestPoint) -> Self {
        Self {
            period: p.period.clone(),
            optimized: money(p.optimized),
            equal_weight: money(p.equal_weight),
            risk_free: money(p.risk_free),
        }
    }
}

#[derive(Serialize, Tabled)]
struct TrackRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Total Return")]
    total_return: String,
    #[tabled(rename = "Final Value")]
    final_value: String,
    #[tabled(rename = "Max Drawdown")]
    max_drawdown: String,
    #[tabled(rename = "Sharpe")]
    sharpe: String,
}

impl TrackRow {
    fn from_track(strategy: &str, t: &TrackSummary) -> Self {
        Self {
            strategy: strategy.to_string(),
            total_return: pct(t.total_return),
            final_value: money(t.final_value),
            max_drawdown: pct(t.max_drawdown),
            sharpe: format!("{:.4}", t.sharpe),
        }
    }
}

fn track_rows(result: &BacktestResult) -> Vec<TrackRow> {
    vec![
        TrackRow::from_track("Optimized", &result.optimized),
        TrackRow::from_track("Equal Weight", &result.equal_weight),
        TrackRow {
            strategy: "Risk Free".to_string(),
            total_return: pct(result.risk_free.total_return),
            final_value: money(result.risk_free.final_value),
            max_drawdown: pct(0.0),
            sharpe: "-".to_string(),
        },
    ]
}

/// Execute the backtest command.
pub fn execute(args: BacktestArgs, mut ctx: Context) -> Result<()> {
    args.market.apply(&mut ctx.config);
    args.allocation.apply(&mut ctx.config);
    let bt = &mut ctx.config.backtest;
    if let Some(n) = args.periods {
        bt.n_periods = n;
    }
    if let Some(cadence) = args.cadence {
        bt.cadence = cadence;
    }
    if let Some(seed) = args.seed {
        bt.seed = seed;
    }
    let ctx = ctx.validated()?;

    let (portfolio, inputs) = ctx.risk_inputs()?;
    let config = &ctx.config.backtest;
    let result = run_backtest(&inputs, portfolio.capital, config, &mut config.rng())?;
    let periods: Vec<PeriodRow> = result.time_series.iter().map(PeriodRow::from).collect();

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!(
                "Backtest: {} {} periods",
                result.n_periods, result.cadence
            ));
            print_table(&periods)?;
            print_header("Summary");
            print_table(&track_rows(&result))?;
            println!();
            print_signed(
                "Alpha vs equal weight:",
                &pct(result.alpha_vs_benchmark),
                result.alpha_vs_benchmark,
            );
            print_signed(
                "Alpha vs risk free:",
                &pct(result.alpha_vs_riskfree),
                result.alpha_vs_riskfree,
            );
            Ok(())
        }
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_rows(&periods, &result, ctx.format),
    }
}
