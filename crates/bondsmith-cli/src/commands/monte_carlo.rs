//! Monte Carlo command implementation.
//!
//! Optimizes first, then simulates the portfolio's P&L distribution.

use anyhow::Result;
use bondsmith_risk::{run_monte_carlo, MonteCarloResult, TailRisk};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::optimize::metric_rows;
use crate::commands::{AllocationArgs, Context, MarketArgs};
use crate::output::{money, print_header, print_json, print_rows, print_table, KeyValue};

/// Arguments for the monte-carlo command.
#[derive(Args, Debug)]
pub struct MonteCarloArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,

    /// Number of simulated paths
    #[arg(short = 'n', long)]
    pub simulations: Option<usize>,

    /// Holding period in trading days
    #[arg(long)]
    pub horizon_days: Option<u32>,

    /// Confidence level, repeatable (e.g. --confidence 0.95 --confidence 0.99)
    #[arg(long = "confidence")]
    pub confidence_levels: Vec<f64>,

    /// Simulation seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show the P&L histogram
    #[arg(long)]
    pub histogram: bool,
}

#[derive(Serialize, Tabled)]
struct TailRow {
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "VaR")]
    var_dollar: String,
    #[tabled(rename = "CVaR")]
    cvar_dollar: String,
    #[tabled(rename = "VaR (log %)")]
    var_pct: String,
    #[tabled(rename = "CVaR (log %)")]
    cvar_pct: String,
}

impl From<&TailRisk> for TailRow {
    fn from(t: &TailRisk) -> Self {
        Self {
            confidence: t.label(),
            var_dollar: money(t.var_dollar),
            cvar_dollar: money(t.cvar_dollar),
            var_pct: format!("{:.2}", t.var_pct),
            cvar_pct: format!("{:.2}", t.cvar_pct),
        }
    }
}

#[derive(Serialize, Tabled)]
struct BinRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Paths")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn summary_rows(r: &MonteCarloResult) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Simulations", r.n_simulations.to_string()),
        KeyValue::new("Horizon (days)", r.time_horizon_days.to_string()),
        KeyValue::new("Expected Return (ann.)", format!("{:.2}%", r.expected_return_annual)),
        KeyValue::new("Volatility (ann.)", format!("{:.2}%", r.expected_volatility_annual)),
        KeyValue::new("Mean P&L", money(r.mean_pnl)),
        KeyValue::new("Median P&L", money(r.median_pnl)),
        KeyValue::new("Std Dev P&L", money(r.std_pnl)),
        KeyValue::new("Worst Path", money(r.min_pnl)),
        KeyValue::new("Best Path", money(r.max_pnl)),
        KeyValue::new("Probability of Loss", format!("{:.2}%", r.prob_loss)),
    ]
}

/// Execute the monte-carlo command.
pub fn execute(args: MonteCarloArgs, mut ctx: Context) -> Result<()> {
    args.market.apply(&mut ctx.config);
    args.allocation.apply(&mut ctx.config);
    let mc = &mut ctx.config.monte_carlo;
    if let Some(n) = args.simulations {
        mc.n_simulations = n;
    }
    if let Some(days) = args.horizon_days {
        mc.time_horizon_days = days;
    }
    if !args.confidence_levels.is_empty() {
        mc.confidence_levels = args.confidence_levels.clone();
    }
    if let Some(seed) = args.seed {
        mc.seed = seed;
    }
    let ctx = ctx.validated()?;

    let (portfolio, inputs) = ctx.risk_inputs()?;
    let config = &ctx.config.monte_carlo;
    let result = run_monte_carlo(&inputs, portfolio.capital, config, &mut config.rng())?;

    let tails: Vec<TailRow> = result.var_cvar.iter().map(TailRow::from).collect();
    match ctx.format {
        OutputFormat::Table => {
            print_header("Portfolio");
            print_table(&metric_rows(&portfolio))?;
            print_header("Simulated P&L");
            print_table(&summary_rows(&result))?;
            print_header("Value at Risk");
            print_table(&tails)?;

            if args.histogram {
                let bins: Vec<BinRow> = result
                    .histogram
                    .iter()
                    .map(|b| BinRow {
                        from: money(b.bin_start),
                        to: money(b.bin_end),
                        count: b.count,
                        share: format!("{:.2}%", b.frequency * 100.0),
                    })
                    .collect();
                print_header("P&L Histogram");
                print_table(&bins)?;
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_rows(&tails, &result, ctx.format),
    }
}
