//! Optimize command implementation.
//!
//! Solves the allocation and prints holdings, metrics and breakdowns.

use anyhow::Result;
use bondsmith_portfolio::{AllocationBreakdown, OptimizedPortfolio};
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{AllocationArgs, Context, MarketArgs};
use crate::output::{money, pct, print_header, print_json, print_rows, print_table, KeyValue};

/// Arguments for the optimize command.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,

    /// Also show allocation by rating, sector and issuer
    #[arg(short, long)]
    pub breakdown: bool,
}

#[derive(Serialize, Tabled)]
struct AllocationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Issuer")]
    issuer: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Duration")]
    duration: f64,
    #[tabled(rename = "Yield")]
    #[serde(rename = "yield")]
    yield_rate: String,
    #[tabled(rename = "Allocation")]
    allocation_pct: String,
    #[tabled(rename = "Investment")]
    investment: String,
}

#[derive(Serialize, Tabled)]
struct BucketRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Bonds")]
    count: usize,
    #[tabled(rename = "Allocation")]
    allocation_pct: String,
    #[tabled(rename = "Investment")]
    investment: String,
    #[tabled(rename = "Avg Yield")]
    avg_yield: String,
    #[tabled(rename = "Avg Duration")]
    avg_duration: String,
}

#[derive(Serialize)]
struct OptimizeOutput<'a> {
    #[serde(flatten)]
    portfolio: &'a OptimizedPortfolio,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<AllocationBreakdown>,
}

fn allocation_rows(portfolio: &OptimizedPortfolio) -> Vec<AllocationRow> {
    portfolio
        .allocations
        .iter()
        .map(|a| AllocationRow {
            id: a.instrument.id.clone(),
            issuer: a.instrument.issuer.clone(),
            sector: a.instrument.sector.to_string(),
            rating: a.instrument.rating.to_string(),
            duration: a.instrument.duration,
            yield_rate: pct(a.instrument.yield_rate),
            allocation_pct: format!("{:.2}%", a.allocation_pct),
            investment: money(a.investment.to_f64().unwrap_or_default()),
        })
        .collect()
}

fn bucket_rows<'a, K: ToString + 'a>(
    buckets: impl IntoIterator<Item = (K, &'a bondsmith_portfolio::BucketMetrics)>,
) -> Vec<BucketRow> {
    buckets
        .into_iter()
        .map(|(key, m)| BucketRow {
            group: key.to_string(),
            count: m.count,
            allocation_pct: format!("{:.2}%", m.allocation_pct),
            investment: money(m.investment.to_f64().unwrap_or_default()),
            avg_yield: pct(m.avg_yield),
            avg_duration: format!("{:.2}", m.avg_duration),
        })
        .collect()
}

/// Summary lines shared with the risk commands.
pub(crate) fn metric_rows(portfolio: &OptimizedPortfolio) -> Vec<KeyValue> {
    let m = &portfolio.metrics;
    vec![
        KeyValue::new("Objective", portfolio.objective.to_string()),
        KeyValue::new("Holdings", portfolio.len().to_string()),
        KeyValue::new("Capital", money(portfolio.capital)),
        KeyValue::new("Yield", pct(m.yield_rate)),
        KeyValue::new("Duration", format!("{:.2}", m.duration)),
        KeyValue::new("Volatility", pct(m.volatility)),
        KeyValue::new("Sharpe Ratio", format!("{:.4}", m.sharpe)),
    ]
}

/// Execute the optimize command.
pub fn execute(args: OptimizeArgs, mut ctx: Context) -> Result<()> {
    args.market.apply(&mut ctx.config);
    args.allocation.apply(&mut ctx.config);
    let ctx = ctx.validated()?;

    let (universe, portfolio) = ctx.optimize()?;
    let breakdown = args.breakdown.then(|| portfolio.breakdown());
    let rows = allocation_rows(&portfolio);

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!(
                "Allocation ({} of {} bonds held)",
                portfolio.len(),
                universe.len()
            ));
            print_table(&rows)?;
            print_header("Portfolio Metrics");
            print_table(&metric_rows(&portfolio))?;

            if let Some(b) = &breakdown {
                print_header("By Rating");
                print_table(&bucket_rows(b.by_rating.iter().map(|(k, v)| (*k, v))))?;
                print_header("By Sector");
                print_table(&bucket_rows(b.sectors_by_weight()))?;
                print_header("By Issuer");
                print_table(&bucket_rows(b.issuers_by_weight()))?;
                println!(
                    "\nInvestment grade {:.2}%, high yield {:.2}%",
                    b.investment_grade_pct(),
                    b.high_yield_pct()
                );
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&OptimizeOutput {
            portfolio: &portfolio,
            breakdown,
        }),
        OutputFormat::Csv => print_rows(&rows, &rows, ctx.format),
    }
}
