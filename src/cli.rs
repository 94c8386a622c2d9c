//! # CLI Module
//!
//! Command-line interface definition for adreport-rs
//!
//! ## Key Components
//! - [`Args`] - Report run configuration

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Campaign Report - daily cost/revenue reconciliation in UTC"
)]
pub struct Args {
    /// Cost feed CSV path
    #[arg(long, default_value = "cost_1.csv")]
    pub cost: String,

    /// Revenue feed CSV path
    #[arg(long, default_value = "revenue_1.csv")]
    pub revenue: String,

    /// First UTC day to report, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub date_from: String,

    /// Last UTC day to report, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub date_to: String,

    /// Output CSV path
    #[arg(long, default_value = "report.csv")]
    pub out: String,

    /// Add hourly profitability columns to the report
    #[arg(long)]
    pub hourly: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
