//! # Report Module
//!
//! Reconciles the cost and revenue aggregates into report rows and derives
//! profit, cost-per-click, and ROI metrics
//!
//! ## Key Components
//! - [`safe_div`] - Division that yields NaN instead of faulting on zero
//! - [`build_report`] - Full outer join of the daily aggregates
//! - [`enrich_hourly`] - Per-day hourly profitability columns
//! - [`sort_rows`] - Output ordering by (day, campaign)

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::rollup::{DailyCost, DayKey, HourKey};

/// One output row per (day, campaign) present in either feed's aggregate.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub day: NaiveDate,
    pub campaign_id: String,
    pub campaign_name: String,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_clicks: f64,
    pub total_roi: f64,
    pub avg_cpc: f64,
    pub hourly: Option<HourlyMetrics>,
}

#[derive(Debug, Clone, Copy)]
pub struct HourlyMetrics {
    pub hourly_avg_revenue: f64,
    pub positive_profit_hours: u64,
}

/// Element-wise safe division: NaN when the denominator is zero, `a / b`
/// otherwise. NaN operands propagate per IEEE-754.
pub fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}

/// Full outer join of the daily aggregates on (day, campaign). A key present
/// on one side only gets the other side's numerics as zero and an empty
/// campaign name; no key is ever dropped.
pub fn build_report(
    cost_daily: HashMap<DayKey, DailyCost>,
    mut revenue_daily: HashMap<DayKey, f64>,
) -> Vec<ReportRow> {
    let mut rows = Vec::with_capacity(cost_daily.len().max(revenue_daily.len()));

    for ((day, campaign_id), cost) in cost_daily {
        let total_revenue = revenue_daily
            .remove(&(day, campaign_id.clone()))
            .unwrap_or(0.0);
        rows.push(derive_metrics(
            day,
            campaign_id,
            cost.campaign_name,
            total_revenue,
            cost.total_cost,
            cost.total_clicks,
        ));
    }

    // Whatever is left saw revenue but no spend that day.
    for ((day, campaign_id), total_revenue) in revenue_daily {
        rows.push(derive_metrics(day, campaign_id, String::new(), total_revenue, 0.0, 0.0));
    }

    rows
}

fn derive_metrics(
    day: NaiveDate,
    campaign_id: String,
    campaign_name: String,
    total_revenue: f64,
    total_cost: f64,
    total_clicks: f64,
) -> ReportRow {
    let total_profit = total_revenue - total_cost;
    let avg_cpc = safe_div(total_cost, total_clicks);

    // ROI is per-click revenue over per-click cost, not revenue over cost.
    // The two differ whenever clicks are zero.
    let revenue_per_click = safe_div(total_revenue, total_clicks);
    let cost_per_click = safe_div(total_cost, total_clicks);
    let total_roi = safe_div(revenue_per_click, cost_per_click);

    ReportRow {
        day,
        campaign_id,
        campaign_name,
        total_revenue,
        total_cost,
        total_profit,
        total_clicks,
        total_roi,
        avg_cpc,
        hourly: None,
    }
}

/// Join the hourly aggregates (outer, zero-filled) and fold them into the two
/// per-day enrichment columns. Every report row gets a value; a day/campaign
/// with no hourly buckets at all defaults to zero.
pub fn enrich_hourly(
    rows: &mut [ReportRow],
    cost_hourly: &HashMap<HourKey, f64>,
    revenue_hourly: &HashMap<HourKey, f64>,
) {
    let mut buckets: HashMap<HourKey, (f64, f64)> = HashMap::new();
    for (key, &cost) in cost_hourly {
        buckets.entry(key.clone()).or_insert((0.0, 0.0)).0 = cost;
    }
    for (key, &revenue) in revenue_hourly {
        buckets.entry(key.clone()).or_insert((0.0, 0.0)).1 = revenue;
    }

    #[derive(Default)]
    struct DayFold {
        bucket_count: u64,
        revenue_sum: f64,
        positive_hours: u64,
    }

    let mut per_day: HashMap<DayKey, DayFold> = HashMap::new();
    for ((day, _hour, campaign_id), (cost, revenue)) in buckets {
        let fold = per_day.entry((day, campaign_id)).or_default();
        fold.bucket_count += 1;
        fold.revenue_sum += revenue;
        // Strictly positive; a break-even hour does not count.
        if revenue - cost > 0.0 {
            fold.positive_hours += 1;
        }
    }

    for row in rows.iter_mut() {
        let metrics = per_day
            .get(&(row.day, row.campaign_id.clone()))
            .map(|fold| HourlyMetrics {
                hourly_avg_revenue: fold.revenue_sum / fold.bucket_count as f64,
                positive_profit_hours: fold.positive_hours,
            })
            .unwrap_or(HourlyMetrics {
                hourly_avg_revenue: 0.0,
                positive_profit_hours: 0,
            });
        row.hourly = Some(metrics);
    }
}

pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| {
        a.day
            .cmp(&b.day)
            .then_with(|| a.campaign_id.cmp(&b.campaign_id))
    });
}
