//! # Timezone Module
//!
//! Converts the feeds' Eastern Time wall-clock stamps into UTC instants and
//! the day/hour bucket keys all grouping runs on
//!
//! ## Key Components
//! - [`LocalTimeResolver`] - Stateful local-to-UTC resolution in feed order
//! - [`UtcStamp`] - A UTC instant with its derived day and hour buckets
//! - [`hour_floor`] - Truncate an instant to the start of its hour

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

/// All feed timestamps are Eastern Time wall-clock values.
pub const SOURCE_TZ: Tz = chrono_tz::America::New_York;

const LOCAL_FORMAT: &str = "%m/%d/%y %H:%M";

// Longest DST gap the forward shift will scan across.
const MAX_GAP_MINUTES: i64 = 180;

lazy_static! {
    // Two-digit fields only; chrono alone would also accept unpadded values.
    static ref LOCAL_SHAPE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{2} \d{2}:\d{2}$").unwrap();
}

/// A UTC instant plus the grouping keys derived from it. `day` and `hour`
/// always come from `instant`; they are never set independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcStamp {
    pub instant: DateTime<Utc>,
    pub day: NaiveDate,
    pub hour: DateTime<Utc>,
}

impl UtcStamp {
    fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            day: instant.date_naive(),
            hour: hour_floor(instant),
        }
    }
}

pub fn hour_floor(instant: DateTime<Utc>) -> DateTime<Utc> {
    let secs = instant.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(instant)
}

/// Resolves one feed's timestamp column in input order.
///
/// Ambiguous fall-back times are disambiguated against the previously
/// resolved instant so a contiguous block stays non-decreasing in UTC.
/// Nonexistent spring-forward times shift to the next valid instant.
pub struct LocalTimeResolver {
    tz: Tz,
    last_utc: Option<DateTime<Utc>>,
}

impl LocalTimeResolver {
    pub fn new() -> Self {
        Self {
            tz: SOURCE_TZ,
            last_utc: None,
        }
    }

    /// Strict parse: a value that is not exactly `MM/DD/YY HH:MM` aborts the
    /// run with the feed name, column, and offending value.
    pub fn resolve(&mut self, raw: &str, feed: &str, column: &str) -> Result<UtcStamp> {
        let naive = parse_local(raw).with_context(|| {
            format!("Invalid timestamp in {} feed column '{}': '{}'", feed, column, raw)
        })?;
        let local = self.localize(naive)?;
        let instant = local.with_timezone(&Utc);
        self.last_utc = Some(instant);
        Ok(UtcStamp::from_instant(instant))
    }

    fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(local) => Ok(local),
            LocalResult::Ambiguous(earliest, latest) => {
                // The earlier offset wins unless it would land at or behind
                // an already-resolved instant.
                let stepped_back = self
                    .last_utc
                    .is_some_and(|prev| earliest.with_timezone(&Utc) <= prev);
                Ok(if stepped_back { latest } else { earliest })
            }
            LocalResult::None => self.shift_forward(naive),
        }
    }

    fn shift_forward(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        let mut probe = naive;
        for _ in 0..MAX_GAP_MINUTES {
            probe = probe + Duration::minutes(1);
            match self.tz.from_local_datetime(&probe) {
                LocalResult::Single(local) => return Ok(local),
                LocalResult::Ambiguous(earliest, _) => return Ok(earliest),
                LocalResult::None => {}
            }
        }
        bail!("Local time {} does not exist in {}", naive, self.tz)
    }
}

fn parse_local(raw: &str) -> Result<NaiveDateTime> {
    if !LOCAL_SHAPE.is_match(raw) {
        bail!("expected MM/DD/YY HH:MM");
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT).map_err(Into::into)
}
