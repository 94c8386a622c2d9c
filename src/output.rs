//! # Output Module
//!
//! Renders sorted report rows to the output CSV
//!
//! ## Key Components
//! - [`write_report`] - Write the report with its fixed column set
//! - [`format_value`] - Float rendering with NaN as an empty field

use anyhow::{Context, Result};
use csv::Writer;

use crate::report::ReportRow;

const OUT_DATE_FMT: &str = "%Y/%m/%d";

const BASE_COLUMNS: &[&str] = &[
    "date",
    "campaign_id",
    "campaign_name",
    "total_revenue",
    "total_cost",
    "total_profit",
    "total_clicks",
    "total_roi",
    "avg_cpc",
];

const HOURLY_COLUMNS: &[&str] = &["hourly_avg_revenue", "positive_profit_hours"];

/// Undefined metrics (NaN) render as an empty field. Whole numbers keep a
/// trailing `.0` (the `{:?}` float repr).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:?}", value)
    }
}

pub fn render_header(hourly: bool) -> Vec<&'static str> {
    let mut columns = BASE_COLUMNS.to_vec();
    if hourly {
        columns.extend_from_slice(HOURLY_COLUMNS);
    }
    columns
}

pub fn render_row(row: &ReportRow) -> Vec<String> {
    let mut record = vec![
        row.day.format(OUT_DATE_FMT).to_string(),
        row.campaign_id.clone(),
        row.campaign_name.clone(),
        format_value(row.total_revenue),
        format_value(row.total_cost),
        format_value(row.total_profit),
        format_value(row.total_clicks),
        format_value(row.total_roi),
        format_value(row.avg_cpc),
    ];
    if let Some(metrics) = row.hourly {
        record.push(format_value(metrics.hourly_avg_revenue));
        record.push(metrics.positive_profit_hours.to_string());
    }
    record
}

/// Write the full report in one pass. Nothing touches the output path until
/// the whole pipeline has already succeeded.
pub fn write_report(rows: &[ReportRow], path: &str, hourly: bool) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("Failed to create report file {}", path))?;
    writer
        .write_record(render_header(hourly))
        .context("Failed to write report header")?;
    for row in rows {
        writer
            .write_record(render_row(row))
            .context("Failed to write report row")?;
    }
    writer.flush().context("Failed to flush report file")?;
    Ok(())
}
