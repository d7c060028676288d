use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::query::{parse_day_count, query_date, resolve_query, QueryWindow};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct WindowArgs {
    #[arg(
        long,
        short = 'n',
        default_value = "7",
        help = "Last n days. Ignored once both --start and --end are given"
    )]
    days: String,
    #[arg(
        long,
        short,
        help = "Start of the range. Examples are \"yesterday\", \"last monday\", \"15/03/2025\""
    )]
    start: Option<String>,
    #[arg(
        long,
        short,
        help = "End of the range. Examples are \"today\", \"15/03/2025\""
    )]
    end: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl WindowArgs {
    /// Window made of a day count only, for commands without range flags.
    pub fn days_only(days: impl Into<String>) -> Self {
        Self {
            days: days.into(),
            start: None,
            end: None,
            date_style: DateStyle::Uk,
        }
    }
}

pub fn resolve_window(args: WindowArgs) -> Result<QueryWindow> {
    resolve_window_at(args, Local::now())
}

/// Also turns an unusable combination of flags into a cli error instead of a request. Relative
/// and bare dates are read in the zone of `now`.
pub fn resolve_window_at<Tz>(
    WindowArgs {
        days,
        start,
        end,
        date_style,
    }: WindowArgs,
    now: DateTime<Tz>,
) -> Result<QueryWindow>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let dialect: chrono_english::Dialect = date_style.into();
    let start = parse_bound("start", start, now.clone(), dialect)?;
    let end = parse_bound("end", end, now, dialect)?;

    resolve_query(parse_day_count(&days), start, end).ok_or_else(|| {
        Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!(
                    "Nothing to query. Use a positive --days instead of \"{days}\" or give both --start and --end"
                ),
            )
            .into()
    })
}

fn parse_bound<Tz>(
    name: &str,
    value: Option<String>,
    now: DateTime<Tz>,
    dialect: chrono_english::Dialect,
) -> Result<Option<NaiveDate>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    match value.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => Ok(Some(query_date(&v))),
        Some(Err(e)) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate {name} date {e}"),
            )
            .into()),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::query::QueryWindow;

    use super::{resolve_window_at, DateStyle, WindowArgs};

    fn args(days: &str, start: Option<&str>, end: Option<&str>) -> WindowArgs {
        WindowArgs {
            days: days.into(),
            start: start.map(Into::into),
            end: end.map(Into::into),
            date_style: DateStyle::Uk,
        }
    }

    /// Noon in the query zone's offset, so bare dates map onto themselves.
    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 16, 12, 0, 0)
            .unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_default_days() {
        let window = resolve_window_at(WindowArgs::days_only("7"), now()).unwrap();
        assert_eq!(window, QueryWindow::LastNDays { n: 7 });
    }

    #[test]
    fn test_explicit_range_wins() {
        let window =
            resolve_window_at(args("30", Some("10/03/2025"), Some("15/03/2025")), now()).unwrap();
        assert_eq!(
            window,
            QueryWindow::Range {
                start: date(2025, 3, 10),
                end: date(2025, 3, 15)
            }
        );
    }

    #[test]
    fn test_range_bounds_move_into_query_zone() {
        // Midnight at +14:00 is still the previous afternoon at +08:00.
        let now = FixedOffset::east_opt(14 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 16, 12, 0, 0)
            .unwrap();
        let window =
            resolve_window_at(args("7", Some("10/03/2025"), Some("15/03/2025")), now).unwrap();
        assert_eq!(
            window,
            QueryWindow::Range {
                start: date(2025, 3, 9),
                end: date(2025, 3, 14)
            }
        );

        let window = resolve_window_at(
            args("7", Some("10/03/2025"), Some("15/03/2025")),
            Utc.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(
            window,
            QueryWindow::Range {
                start: date(2025, 3, 10),
                end: date(2025, 3, 15)
            }
        );
    }

    #[test]
    fn test_us_date_style() {
        let mut us = args("7", Some("03/10/2025"), Some("03/15/2025"));
        us.date_style = DateStyle::Us;
        let window = resolve_window_at(us, now()).unwrap();
        assert_eq!(
            window,
            QueryWindow::Range {
                start: date(2025, 3, 10),
                end: date(2025, 3, 15)
            }
        );
    }

    #[test]
    fn test_unusable_input_is_an_error() {
        assert!(resolve_window_at(args("0", None, None), now()).is_err());
        assert!(resolve_window_at(args("many", Some("10/03/2025"), None), now()).is_err());
        assert!(resolve_window_at(args("7", Some("not a date at all"), None), now()).is_err());
    }

    #[test]
    fn test_half_range_uses_days() {
        let window = resolve_window_at(args("3", None, Some("15/03/2025")), now()).unwrap();
        assert_eq!(window, QueryWindow::LastNDays { n: 3 });
    }
}
