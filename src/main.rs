//! # Campaign Report
//!
//! Joins a cost feed and a revenue feed into a daily (optionally hourly)
//! campaign performance report, with Eastern Time stamps normalized to UTC
//!
//! ## Key Components
//! - [`run_report`] - End-to-end pipeline from feed CSVs to the report CSV
//! - [`cli::Args`] - Command-line configuration

mod cli;
mod feed;
mod output;
mod report;
mod rollup;
mod timezone;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use crate::cli::Args;

fn run_report(args: &Args) -> Result<()> {
    let from = rollup::parse_report_date(&args.date_from).context("Invalid --date-from")?;
    let to = rollup::parse_report_date(&args.date_to).context("Invalid --date-to")?;

    let cost_raw = feed::load_cost_feed(&args.cost)?;
    let revenue_raw = feed::load_revenue_feed(&args.revenue)?;
    debug!(
        "Loaded {} cost rows and {} revenue rows",
        cost_raw.len(),
        revenue_raw.len()
    );

    let cost_rows = feed::normalize_cost_rows(cost_raw)?;
    let revenue_rows = feed::normalize_revenue_rows(revenue_raw)?;

    let cost_rows = rollup::retain_day_range(cost_rows, |r| r.stamp.day, from, to);
    let revenue_rows = rollup::retain_day_range(revenue_rows, |r| r.stamp.day, from, to);
    debug!(
        "{} cost rows and {} revenue rows within {}..{}",
        cost_rows.len(),
        revenue_rows.len(),
        from,
        to
    );

    let cost_daily = rollup::daily_cost(&cost_rows);
    let revenue_daily = rollup::daily_revenue(&revenue_rows);
    let mut rows = report::build_report(cost_daily, revenue_daily);

    if args.hourly {
        let cost_hourly = rollup::hourly_cost(&cost_rows);
        let revenue_hourly = rollup::hourly_revenue(&revenue_rows);
        debug!(
            "{} cost and {} revenue hourly buckets",
            cost_hourly.len(),
            revenue_hourly.len()
        );
        report::enrich_hourly(&mut rows, &cost_hourly, &revenue_hourly);
    }

    report::sort_rows(&mut rows);
    output::write_report(&rows, &args.out, args.hourly)?;

    println!("Wrote {} ({} rows)", args.out, rows.len());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    }

    run_report(&args)
}
