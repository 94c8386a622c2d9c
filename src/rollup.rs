//! # Rollup Module
//!
//! Date-window filtering and per-key aggregation of normalized feed rows
//!
//! ## Key Components
//! - [`parse_report_date`] - Parse YYYY-MM-DD window bounds
//! - [`retain_day_range`] - Inclusive UTC day window filter
//! - [`daily_cost`] / [`daily_revenue`] - Daily aggregates per campaign
//! - [`hourly_cost`] / [`hourly_revenue`] - Hourly aggregates per campaign

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use crate::feed::{CostRow, RevenueRow};

pub type DayKey = (NaiveDate, String);
pub type HourKey = (NaiveDate, DateTime<Utc>, String);

#[derive(Debug, Clone)]
pub struct DailyCost {
    pub campaign_name: String,
    pub total_cost: f64,
    pub total_clicks: f64,
}

/// Parse a UTC report window bound in YYYY-MM-DD format
pub fn parse_report_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Date must be in YYYY-MM-DD format, got: {}", raw))
}

/// Keep rows whose UTC day falls inside the inclusive window. An inverted
/// window keeps nothing.
pub fn retain_day_range<T>(
    rows: Vec<T>,
    day_of: impl Fn(&T) -> NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<T> {
    rows.into_iter()
        .filter(|row| {
            let day = day_of(row);
            day >= from && day <= to
        })
        .collect()
}

/// Sum cost and clicks per (day, campaign). The campaign name is the
/// lexicographic minimum over the group, which keeps the pick deterministic
/// regardless of input row order (SQL MIN() semantics over text).
pub fn daily_cost(rows: &[CostRow]) -> HashMap<DayKey, DailyCost> {
    let mut map: HashMap<DayKey, DailyCost> = HashMap::new();
    for row in rows {
        let entry = map
            .entry((row.stamp.day, row.campaign_id.clone()))
            .or_insert_with(|| DailyCost {
                campaign_name: row.campaign_name.clone(),
                total_cost: 0.0,
                total_clicks: 0.0,
            });
        if row.campaign_name < entry.campaign_name {
            entry.campaign_name = row.campaign_name.clone();
        }
        entry.total_cost += row.cost;
        entry.total_clicks += row.clicks;
    }
    map
}

pub fn daily_revenue(rows: &[RevenueRow]) -> HashMap<DayKey, f64> {
    let mut map: HashMap<DayKey, f64> = HashMap::new();
    for row in rows {
        *map.entry((row.stamp.day, row.campaign_id.clone()))
            .or_insert(0.0) += row.revenue;
    }
    map
}

pub fn hourly_cost(rows: &[CostRow]) -> HashMap<HourKey, f64> {
    let mut map: HashMap<HourKey, f64> = HashMap::new();
    for row in rows {
        *map.entry((row.stamp.day, row.stamp.hour, row.campaign_id.clone()))
            .or_insert(0.0) += row.cost;
    }
    map
}

pub fn hourly_revenue(rows: &[RevenueRow]) -> HashMap<HourKey, f64> {
    let mut map: HashMap<HourKey, f64> = HashMap::new();
    for row in rows {
        *map.entry((row.stamp.day, row.stamp.hour, row.campaign_id.clone()))
            .or_insert(0.0) += row.revenue;
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timezone::{UtcStamp, hour_floor};
    use chrono::TimeZone;

    fn stamp_at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> UtcStamp {
        let instant = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
        UtcStamp {
            instant,
            day: instant.date_naive(),
            hour: hour_floor(instant),
        }
    }

    fn cost_row(id: &str, name: &str, clicks: f64, cost: f64, stamp: UtcStamp) -> CostRow {
        CostRow {
            campaign_id: id.to_string(),
            campaign_name: name.to_string(),
            clicks,
            cost,
            stamp,
        }
    }

    fn revenue_row(id: &str, revenue: f64, stamp: UtcStamp) -> RevenueRow {
        RevenueRow {
            campaign_id: id.to_string(),
            revenue,
            stamp,
        }
    }

    #[test]
    fn test_parse_report_date() {
        assert_eq!(
            parse_report_date("2019-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
        );
        assert!(parse_report_date("01/01/2019").is_err());
    }

    #[test]
    fn test_retain_day_range_is_inclusive() {
        let rows = vec![
            cost_row("A", "Ads", 1.0, 1.0, stamp_at(2019, 1, 1, 0, 0)),
            cost_row("A", "Ads", 1.0, 1.0, stamp_at(2019, 1, 2, 12, 0)),
            cost_row("A", "Ads", 1.0, 1.0, stamp_at(2019, 1, 3, 23, 59)),
            cost_row("A", "Ads", 1.0, 1.0, stamp_at(2019, 1, 4, 0, 0)),
        ];
        let from = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2019, 1, 3).unwrap();
        let kept = retain_day_range(rows, |r| r.stamp.day, from, to);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_inverted_range_keeps_nothing() {
        let rows = vec![cost_row("A", "Ads", 1.0, 1.0, stamp_at(2019, 1, 2, 0, 0))];
        let from = NaiveDate::from_ymd_opt(2019, 1, 3).unwrap();
        let to = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        assert!(retain_day_range(rows, |r| r.stamp.day, from, to).is_empty());
    }

    #[test]
    fn test_daily_cost_sums_per_campaign() {
        let rows = vec![
            cost_row("A", "Ads", 10.0, 5.0, stamp_at(2019, 1, 1, 3, 0)),
            cost_row("A", "Ads", 2.0, 1.5, stamp_at(2019, 1, 1, 20, 0)),
            cost_row("B", "Banners", 4.0, 2.0, stamp_at(2019, 1, 1, 3, 0)),
        ];
        let map = daily_cost(&rows);
        assert_eq!(map.len(), 2);
        let day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let a = &map[&(day, "A".to_string())];
        assert_eq!(a.total_clicks, 12.0);
        assert_eq!(a.total_cost, 6.5);
    }

    #[test]
    fn test_campaign_name_pick_is_order_independent() {
        let day_stamp = stamp_at(2019, 1, 1, 3, 0);
        let forward = vec![
            cost_row("A", "zeta", 1.0, 1.0, day_stamp),
            cost_row("A", "alpha", 1.0, 1.0, day_stamp),
        ];
        let backward = vec![
            cost_row("A", "alpha", 1.0, 1.0, day_stamp),
            cost_row("A", "zeta", 1.0, 1.0, day_stamp),
        ];
        let day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let key = (day, "A".to_string());
        assert_eq!(daily_cost(&forward)[&key].campaign_name, "alpha");
        assert_eq!(daily_cost(&backward)[&key].campaign_name, "alpha");
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(daily_cost(&[]).is_empty());
        assert!(daily_revenue(&[]).is_empty());
    }

    #[test]
    fn test_hourly_sums_match_daily_sum() {
        let rows = vec![
            revenue_row("A", 3.0, stamp_at(2019, 1, 1, 3, 10)),
            revenue_row("A", 4.0, stamp_at(2019, 1, 1, 3, 50)),
            revenue_row("A", 5.0, stamp_at(2019, 1, 1, 9, 0)),
        ];
        let hourly = hourly_revenue(&rows);
        assert_eq!(hourly.len(), 2);
        let hourly_total: f64 = hourly.values().sum();
        let day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let daily = daily_revenue(&rows);
        assert_eq!(hourly_total, daily[&(day, "A".to_string())]);
    }
}
