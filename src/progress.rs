//! Elapsed-time fractions of the current hour, day, month and year.
//!
//! Every fraction counts whole seconds elapsed since the start of its period, so each one is
//! exactly `0.0` at the period boundary and stays below `1.0` during the last second. Days of
//! the month and of the year are both counted 0-based for that reason.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike};
use serde::Serialize;

use crate::utils::{
    calendar::{day_of_year, days_in_month, days_in_year},
    time::{SECONDS_IN_DAY, SECONDS_IN_HOUR},
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProgressSnapshot {
    pub hour: f64,
    pub day: f64,
    pub month: f64,
    pub year: f64,
}

/// Computes progress using the wall clock time of `now` in its own time zone.
pub fn compute_progress<Tz: TimeZone>(now: &DateTime<Tz>) -> ProgressSnapshot {
    progress_at(now.naive_local())
}

pub fn progress_at(now: NaiveDateTime) -> ProgressSnapshot {
    let date = now.date();
    let since_midnight = u64::from(now.num_seconds_from_midnight());

    let hour = fraction(since_midnight % SECONDS_IN_HOUR, SECONDS_IN_HOUR);
    let day = fraction(since_midnight, SECONDS_IN_DAY);

    let month_elapsed = u64::from(date.day0()) * SECONDS_IN_DAY + since_midnight;
    let month_length = u64::from(days_in_month(date.year(), date.month0())) * SECONDS_IN_DAY;

    let year_elapsed = u64::from(day_of_year(date) - 1) * SECONDS_IN_DAY + since_midnight;
    let year_length = u64::from(days_in_year(date.year())) * SECONDS_IN_DAY;

    ProgressSnapshot {
        hour,
        day,
        month: fraction(month_elapsed, month_length),
        year: fraction(year_elapsed, year_length),
    }
}

fn fraction(elapsed: u64, whole: u64) -> f64 {
    elapsed as f64 / whole as f64
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDateTime};

    use super::{compute_progress, progress_at, ProgressSnapshot};

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_start_of_year_is_zero() {
        assert_eq!(
            progress_at(at("2024-01-01 00:00:00")),
            ProgressSnapshot::default()
        );
    }

    #[test]
    fn test_mid_period_values() {
        let progress = progress_at(at("2024-02-15 12:30:00"));
        let since_midnight = 12. * 3600. + 30. * 60.;

        assert_close(progress.hour, 0.5);
        assert_close(progress.day, since_midnight / 86400.);
        assert_close(
            progress.month,
            (14. * 86400. + since_midnight) / (29. * 86400.),
        );
        assert_close(
            progress.year,
            (45. * 86400. + since_midnight) / (366. * 86400.),
        );
    }

    #[test]
    fn test_hour_fraction_is_only_current_hour() {
        let progress = progress_at(at("2023-06-10 17:15:00"));
        assert_close(progress.hour, 0.25);
    }

    #[test]
    fn test_last_second_stays_below_one() {
        let progress = progress_at(at("2023-12-31 23:59:59"));
        for value in [progress.hour, progress.day, progress.month, progress.year] {
            assert!(value < 1.0, "{progress:?}");
            assert!(value > 0.99, "{progress:?}");
        }
    }

    #[test]
    fn test_midnight_boundary_is_consistent() {
        let before = progress_at(at("2023-03-31 23:59:59"));
        let after = progress_at(at("2023-04-01 00:00:00"));

        assert_eq!(after.hour, 0.);
        assert_eq!(after.day, 0.);
        assert_eq!(after.month, 0.);
        // The year keeps growing across a month boundary without a jump.
        assert!(after.year > before.year);
        assert_close(after.year - before.year, 1. / (365. * 86400.));
    }

    #[test]
    fn test_uses_wall_clock_of_the_zone() {
        let now: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2024-01-01T16:30:00Z").unwrap();
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();

        let progress = compute_progress(&now.with_timezone(&shanghai));

        assert_close(progress.hour, 0.5);
        assert_close(progress.day, 1800. / 86400.);
        assert_close(progress.month, (86400. + 1800.) / (31. * 86400.));
    }

    #[test]
    fn test_progress_is_idempotent() {
        let moment = at("2024-07-04 09:08:07");
        assert_eq!(progress_at(moment), progress_at(moment));
    }
}
