//! Stress command implementation.

use anyhow::Result;
use bondsmith_risk::prelude::{run_stress_config, ScenarioResult, StressReport};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{AllocationArgs, Context, MarketArgs};
use crate::output::{
    money, pct, print_header, print_json, print_rows, print_signed, print_table, KeyValue,
};

/// Arguments for the stress command.
#[derive(Args, Debug)]
pub struct StressArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,

    /// Scenario key to run, repeatable; all scenarios when omitted
    #[arg(long = "scenario", value_name = "KEY")]
    pub scenarios: Vec<String>,

    /// Risk-free rate for the stressed Sharpe ratios
    #[arg(long)]
    pub stress_risk_free: Option<f64>,
}

#[derive(Serialize, Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Scenario")]
    name: String,
    #[tabled(rename = "Yield")]
    stressed_yield: String,
    #[tabled(rename = "Change (bp)")]
    yield_change_bp: String,
    #[tabled(rename = "Price Impact")]
    price_impact: String,
    #[tabled(rename = "P&L")]
    pnl: String,
    #[tabled(rename = "Volatility")]
    stressed_volatility: String,
    #[tabled(rename = "Sharpe")]
    stressed_sharpe: String,
}

impl From<&ScenarioResult> for ScenarioRow {
    fn from(s: &ScenarioResult) -> Self {
        Self {
            name: s.name.clone(),
            stressed_yield: pct(s.stressed_yield),
            yield_change_bp: format!("{:+.0}", s.yield_change_bp),
            price_impact: pct(s.price_impact_pct),
            pnl: money(s.pnl),
            stressed_volatility: pct(s.stressed_volatility),
            stressed_sharpe: format!("{:.4}", s.stressed_sharpe),
        }
    }
}

fn baseline_rows(report: &StressReport) -> Vec<KeyValue> {
    let b = &report.base_portfolio;
    vec![
        KeyValue::new("Capital", money(b.capital)),
        KeyValue::new("Yield", pct(b.yield_rate)),
        KeyValue::new("Duration", format!("{:.2}", b.duration)),
        KeyValue::new("Volatility", pct(b.volatility)),
        KeyValue::new("Sharpe Ratio", format!("{:.4}", b.sharpe)),
    ]
}

/// Execute the stress command.
pub fn execute(args: StressArgs, mut ctx: Context) -> Result<()> {
    args.market.apply(&mut ctx.config);
    args.allocation.apply(&mut ctx.config);
    if !args.scenarios.is_empty() {
        ctx.config.stress.scenario_keys = Some(args.scenarios.clone());
    }
    if let Some(rate) = args.stress_risk_free {
        ctx.config.stress.risk_free_rate = rate;
    }
    let ctx = ctx.validated()?;

    let (portfolio, inputs) = ctx.risk_inputs()?;
    let report = run_stress_config(&inputs, portfolio.capital, &ctx.config.stress)?;
    let rows: Vec<ScenarioRow> = report.scenarios.iter().map(ScenarioRow::from).collect();

    match ctx.format {
        OutputFormat::Table => {
            print_header("Base Portfolio");
            print_table(&baseline_rows(&report))?;
            print_header("Stress Scenarios");
            print_table(&rows)?;
            if let Some(worst) = report.worst() {
                println!();
                print_signed(
                    "Worst scenario:",
                    &format!("{} ({})", worst.name, money(worst.pnl)),
                    worst.pnl,
                );
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&report),
        OutputFormat::Csv => print_rows(&rows, &report, ctx.format),
    }
}
