use chrono::NaiveDate;

use super::calendar::weekday_abbrev;

pub const SECONDS_IN_MINUTE: u64 = 60;
pub const SECONDS_IN_HOUR: u64 = 3600;
pub const SECONDS_IN_DAY: u64 = 86400;

/// Entries with at least this many minutes (ignoring whole hours) get a tomato marker in the
/// log table.
const POMODORO_MINUTES: u64 = 25;

/// This is the standard way of converting a date to a string in worktally. Also used for query
/// parameters.
pub fn date_to_query_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Label used on charts, for example `2024-01-01 (Mon)`. The fixed width date prefix makes
/// lexical order of labels equal to chronological order.
pub fn date_label(date: NaiveDate) -> String {
    format!("{} ({})", date_to_query_param(date), weekday_abbrev(date))
}

pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn seconds_to_hours(seconds: f64) -> f64 {
    seconds / SECONDS_IN_HOUR as f64
}

pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / SECONDS_IN_MINUTE as f64
}

/// Formats a duration as `HH:MM:SS`. Hours are not wrapped, so 30 hours is `30:00:00`.
pub fn format_clock_duration(seconds: u64) -> String {
    let hours = seconds / SECONDS_IN_HOUR;
    let minutes = (seconds % SECONDS_IN_HOUR) / SECONDS_IN_MINUTE;
    let seconds = seconds % SECONDS_IN_MINUTE;

    let mut value = format!("{hours:02}:{minutes:02}:{seconds:02}");
    if minutes >= POMODORO_MINUTES {
        value.push_str(" 🍅");
    }
    value
}
