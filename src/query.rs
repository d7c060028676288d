//! Decides which single request the data source gets asked for.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use crate::utils::time::date_to_query_param;

/// Range bounds are always sent as calendar dates of this zone, whatever zone the caller is in.
pub const QUERY_TIME_ZONE: Tz = chrono_tz::Asia::Shanghai;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum QueryWindow {
    LastNDays { n: u32 },
    Range { start: NaiveDate, end: NaiveDate },
}

impl QueryWindow {
    /// Path and query of the `/api/day` endpoint serving this window.
    pub fn path(&self) -> String {
        match self {
            QueryWindow::LastNDays { n } => format!("/api/day/{n}"),
            QueryWindow::Range { start, end } => format!(
                "/api/day/range?start={}&end={}",
                date_to_query_param(*start),
                date_to_query_param(*end)
            ),
        }
    }

    /// Day count usable for `/api/cumulative`. Explicit ranges have none.
    pub fn day_count(&self) -> Option<u32> {
        match self {
            QueryWindow::LastNDays { n } => Some(*n),
            QueryWindow::Range { .. } => None,
        }
    }
}

impl Display for QueryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryWindow::LastNDays { n } => write!(f, "last {n} days"),
            QueryWindow::Range { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

/// Resolves raw inputs into a window. A complete range always wins over the day count. A missing,
/// zero or negative day count without a complete range means nothing should be requested.
pub fn resolve_query(
    last_n_days: Option<i64>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<QueryWindow> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            warn!("Range start {start} is after its end {end}");
        }
        return Some(QueryWindow::Range { start, end });
    }

    last_n_days
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .map(|n| QueryWindow::LastNDays { n })
}

/// Parses a day count typed by a user. Anything that isn't an integer is treated as no value.
pub fn parse_day_count(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Calendar date of an instant, as the data source understands dates.
pub fn query_date<Z: TimeZone>(instant: &DateTime<Z>) -> NaiveDate {
    instant.with_timezone(&QUERY_TIME_ZONE).date_naive()
}
