//! Universe command implementation.
//!
//! Lists the generated or loaded bonds, or summarizes them by rating.

use std::collections::BTreeMap;

use anyhow::Result;
use bondsmith_core::{CreditRating, Instrument};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{Context, MarketArgs};
use crate::output::{pct, print_header, print_rows};

/// Arguments for the universe command.
#[derive(Args, Debug)]
pub struct UniverseArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Show at most this many bonds
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Summarize by rating instead of listing bonds
    #[arg(short, long)]
    pub summary: bool,
}

#[derive(Serialize, Tabled)]
struct BondRow {
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
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Price")]
    price: f64,
}

impl From<&Instrument> for BondRow {
    fn from(b: &Instrument) -> Self {
        Self {
            id: b.id.clone(),
            issuer: b.issuer.clone(),
            sector: b.sector.to_string(),
            rating: b.rating.to_string(),
            duration: b.duration,
            yield_rate: pct(b.yield_rate),
            volatility: pct(b.volatility),
            price: b.price,
        }
    }
}

#[derive(Serialize, Tabled)]
struct RatingRow {
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Bonds")]
    count: usize,
    #[tabled(rename = "Avg Yield")]
    avg_yield: String,
    #[tabled(rename = "Avg Duration")]
    avg_duration: String,
    #[tabled(rename = "Avg Volatility")]
    avg_volatility: String,
}

fn summarize(bonds: &[Instrument]) -> Vec<RatingRow> {
    let mut groups: BTreeMap<CreditRating, Vec<&Instrument>> = BTreeMap::new();
    for bond in bonds {
        groups.entry(bond.rating).or_default().push(bond);
    }
    groups
        .into_iter()
        .map(|(rating, members)| {
            let n = members.len() as f64;
            let avg = |f: fn(&Instrument) -> f64| members.iter().map(|b| f(b)).sum::<f64>() / n;
            RatingRow {
                rating: rating.to_string(),
                count: members.len(),
                avg_yield: pct(avg(|b| b.yield_rate)),
                avg_duration: format!("{:.2}", avg(|b| b.duration)),
                avg_volatility: pct(avg(|b| b.volatility)),
            }
        })
        .collect()
}

/// Execute the universe command.
pub fn execute(args: UniverseArgs, mut ctx: Context) -> Result<()> {
    args.market.apply(&mut ctx.config);
    let ctx = ctx.validated()?;

    let mut bonds = ctx.universe()?;
    let total = bonds.len();

    if args.summary {
        let rows = summarize(&bonds);
        if ctx.format == OutputFormat::Table {
            print_header(&format!("Universe: {total} bonds"));
        }
        return print_rows(&rows, &rows, ctx.format);
    }

    if let Some(limit) = args.limit {
        bonds.truncate(limit);
    }
    let rows: Vec<BondRow> = bonds.iter().map(BondRow::from).collect();
    if ctx.format == OutputFormat::Table {
        print_header(&format!("Universe: showing {} of {total} bonds", rows.len()));
    }
    print_rows(&rows, &bonds, ctx.format)
}
