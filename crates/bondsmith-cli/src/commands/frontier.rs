//! Frontier command implementation.

use anyhow::Result;
use bondsmith_portfolio::{efficient_frontier, AllocationSolver, FrontierPoint};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{AllocationArgs, Context, MarketArgs};
use crate::output::{pct, print_header, print_rows, print_warning};

/// Arguments for the frontier command.
#[derive(Args, Debug)]
pub struct FrontierArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,

    /// Shortest target duration
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Longest target duration
    #[arg(long)]
    pub max_duration: Option<f64>,

    /// Number of grid points
    #[arg(long)]
    pub points: Option<usize>,

    /// Solve grid points one at a time
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Serialize, Tabled)]
struct FrontierRow {
    #[tabled(rename = "Target")]
    target_duration: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Yield")]
    #[serde(rename = "yield")]
    yield_rate: String,
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Sharpe")]
    sharpe: String,
}

impl From<&FrontierPoint> for FrontierRow {
    fn from(p: &FrontierPoint) -> Self {
        Self {
            target_duration: format!("{:.2}", p.target_duration),
            duration: format!("{:.2}", p.duration),
            yield_rate: pct(p.yield_rate),
            volatility: pct(p.volatility),
            sharpe: format!("{:.4}", p.sharpe),
        }
    }
}

/// Execute the frontier command.
pub fn execute(args: FrontierArgs, mut ctx: Context) -> Result<()> {
    args.market.apply(&mut ctx.config);
    args.allocation.apply(&mut ctx.config);
    let frontier = &mut ctx.config.frontier;
    if let Some(v) = args.min_duration {
        frontier.min_duration = v;
    }
    if let Some(v) = args.max_duration {
        frontier.max_duration = v;
    }
    if let Some(v) = args.points {
        frontier.points = v;
    }
    if args.sequential {
        frontier.parallel = false;
    }
    let ctx = ctx.validated()?;

    let universe = ctx.universe()?;
    let request = ctx.config.allocation_request()?;
    let points = efficient_frontier(
        &universe,
        &request,
        &ctx.config.frontier,
        &AllocationSolver::new(),
    )?;

    let requested = ctx.config.frontier.points;
    if points.len() < requested {
        print_warning(&format!(
            "{} of {requested} target durations had no feasible allocation",
            requested - points.len()
        ));
    }

    let rows: Vec<FrontierRow> = points.iter().map(FrontierRow::from).collect();
    if ctx.format == OutputFormat::Table {
        print_header("Efficient Frontier (Sharpe-optimal at each duration)");
    }
    print_rows(&rows, &points, ctx.format)
}
