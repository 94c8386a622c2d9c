//! # Feed Module
//!
//! Parses the cost and revenue feed CSVs and stamps each row with its UTC
//! instant and bucket keys
//!
//! ## Key Components
//! - [`RawCostRecord`] / [`RawRevenueRecord`] - Deserialized feed rows
//! - [`load_cost_feed`] / [`load_revenue_feed`] - Read a feed from disk
//! - [`normalize_cost_rows`] / [`normalize_revenue_rows`] - Attach UTC buckets

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufReader, Read};

use crate::timezone::{LocalTimeResolver, UtcStamp};

pub const TIMESTAMP_COLUMN: &str = "data_date";

/// Numeric feed columns are tolerant: anything unparsable counts as zero.
/// Timestamps are the opposite; see [`LocalTimeResolver::resolve`].
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(0.0))
}

#[derive(Debug, Deserialize)]
pub struct RawCostRecord {
    pub campaign_id: String,
    pub campaign_name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub clicks: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub cost: f64,
    pub data_date: String,
}

#[derive(Debug, Deserialize)]
pub struct RawRevenueRecord {
    pub campaign_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub revenue: f64,
    pub data_date: String,
}

/// Cost feed row with its UTC buckets attached.
#[derive(Debug, Clone)]
pub struct CostRow {
    pub campaign_id: String,
    pub campaign_name: String,
    pub clicks: f64,
    pub cost: f64,
    pub stamp: UtcStamp,
}

/// Revenue feed row with its UTC buckets attached.
#[derive(Debug, Clone)]
pub struct RevenueRow {
    pub campaign_id: String,
    pub revenue: f64,
    pub stamp: UtcStamp,
}

pub fn load_cost_feed(path: &str) -> Result<Vec<RawCostRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open cost feed {}", path))?;
    parse_cost_feed(BufReader::new(file))
}

pub fn load_revenue_feed(path: &str) -> Result<Vec<RawRevenueRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open revenue feed {}", path))?;
    parse_revenue_feed(BufReader::new(file))
}

pub fn parse_cost_feed<R: Read>(reader: R) -> Result<Vec<RawCostRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for record in rdr.deserialize() {
        records.push(record.context("Failed to parse cost feed row")?);
    }
    Ok(records)
}

pub fn parse_revenue_feed<R: Read>(reader: R) -> Result<Vec<RawRevenueRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for record in rdr.deserialize() {
        records.push(record.context("Failed to parse revenue feed row")?);
    }
    Ok(records)
}

/// Resolve every cost row's local timestamp to UTC, in feed order so the
/// resolver sees chronological context across daylight-saving transitions.
pub fn normalize_cost_rows(records: Vec<RawCostRecord>) -> Result<Vec<CostRow>> {
    let mut resolver = LocalTimeResolver::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let stamp = resolver.resolve(&record.data_date, "cost", TIMESTAMP_COLUMN)?;
        rows.push(CostRow {
            campaign_id: record.campaign_id,
            campaign_name: record.campaign_name,
            clicks: record.clicks,
            cost: record.cost,
            stamp,
        });
    }
    Ok(rows)
}

pub fn normalize_revenue_rows(records: Vec<RawRevenueRecord>) -> Result<Vec<RevenueRow>> {
    let mut resolver = LocalTimeResolver::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let stamp = resolver.resolve(&record.data_date, "revenue", TIMESTAMP_COLUMN)?;
        rows.push(RevenueRow {
            campaign_id: record.campaign_id,
            revenue: record.revenue,
            stamp,
        });
    }
    Ok(rows)
}
