use tracing::debug;

use crate::{
    source::entities::DailyTotal,
    utils::time::{date_label, seconds_to_hours},
};

use super::Series;

pub const AVERAGE_LABEL: &str = "Avg";

const DAILY_DECIMALS: usize = 1;
const CUMULATIVE_DECIMALS: usize = 2;

/// Days sorted by their rendered label.
fn labeled_days(total: &DailyTotal) -> Vec<(String, u64)> {
    let mut days = total
        .iter()
        .map(|(date, seconds)| (date_label(*date), *seconds))
        .collect::<Vec<_>>();
    days.sort_by(|a, b| a.0.cmp(&b.0));
    days
}

/// Hours worked per day followed by an `Avg` point. The average is taken over raw seconds, before
/// any rounding. An empty input gives an empty series, without the average.
pub fn daily_totals_with_average(total: &DailyTotal) -> Series {
    let days = labeled_days(total);
    let mut series = Series::with_decimals(DAILY_DECIMALS);

    if days.is_empty() {
        debug!("No daily totals to aggregate");
        return series;
    }

    let mut sum = 0u64;
    for (label, seconds) in days.iter() {
        sum = sum.saturating_add(*seconds);
        series.push(label.clone(), seconds_to_hours(*seconds as f64));
    }

    let average = sum as f64 / days.len() as f64;
    series.push(AVERAGE_LABEL, seconds_to_hours(average));

    debug!("Aggregated {} daily totals, average {average}s", days.len());
    series
}

/// Running total of hours, day by day. Each point is the sum of all days up to and including it.
pub fn cumulative_totals(total: &DailyTotal) -> Series {
    let mut series = Series::with_decimals(CUMULATIVE_DECIMALS);
    let mut running = 0u64;
    for (label, seconds) in labeled_days(total) {
        running = running.saturating_add(seconds);
        series.push(label, seconds_to_hours(running as f64));
    }
    debug!("Accumulated {} days into {running}s", series.len());
    series
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::source::entities::DailyTotal;

    use super::{cumulative_totals, daily_totals_with_average, AVERAGE_LABEL};

    fn totals(values: &[(&str, u64)]) -> DailyTotal {
        values
            .iter()
            .map(|(date, seconds)| (date.parse::<NaiveDate>().unwrap(), *seconds))
            .collect()
    }

    #[test]
    fn test_daily_totals_example() {
        let series = daily_totals_with_average(&totals(&[
            ("2024-01-02", 7200),
            ("2024-01-01", 3600),
        ]));

        assert_eq!(
            series.labels(),
            &["2024-01-01 (Mon)", "2024-01-02 (Tue)", AVERAGE_LABEL]
        );
        assert_eq!(series.formatted_values(), vec!["1.0", "2.0", "1.5"]);
    }

    #[test]
    fn test_daily_totals_order_and_length() {
        let input = totals(&[
            ("2023-12-31", 100),
            ("2024-02-29", 5000),
            ("2024-01-15", 0),
            ("2022-06-01", 86400),
        ]);
        let series = daily_totals_with_average(&input);

        assert_eq!(series.len(), input.len() + 1);
        let days = &series.labels()[..input.len()];
        let mut sorted = days.to_vec();
        sorted.sort();
        assert_eq!(days, sorted.as_slice());
        assert_eq!(days[0], "2022-06-01 (Wed)");
        assert_eq!(series.labels().last().unwrap(), AVERAGE_LABEL);
    }

    #[test]
    fn test_average_uses_raw_seconds() {
        // 0.14h, 0.14h and 0.19h. Averaging the rounded values would give 0.1h.
        let series = daily_totals_with_average(&totals(&[
            ("2024-01-01", 504),
            ("2024-01-02", 504),
            ("2024-01-03", 684),
        ]));
        assert_eq!(series.formatted_values(), vec!["0.1", "0.1", "0.2", "0.2"]);
    }

    #[test]
    fn test_empty_totals_have_no_average() {
        let series = daily_totals_with_average(&DailyTotal::new());
        assert!(series.is_empty());
        assert!(cumulative_totals(&DailyTotal::new()).is_empty());
    }

    #[test]
    fn test_cumulative_example() {
        let series = cumulative_totals(&totals(&[("2024-01-01", 3600), ("2024-01-02", 7200)]));
        assert_eq!(series.formatted_values(), vec!["1.00", "3.00"]);
        assert_eq!(series.labels(), &["2024-01-01 (Mon)", "2024-01-02 (Tue)"]);
    }

    #[test]
    fn test_cumulative_is_non_decreasing_prefix_sum() {
        let input = totals(&[
            ("2024-03-05", 1234),
            ("2024-03-01", 0),
            ("2024-03-03", 40000),
            ("2024-03-02", 7),
        ]);
        let series = cumulative_totals(&input);

        assert_eq!(series.len(), input.len());
        for pair in series.values().windows(2) {
            assert!(pair[0] <= pair[1], "{:?}", series.values());
        }
        let total: u64 = input.values().sum();
        assert_eq!(
            *series.values().last().unwrap(),
            crate::utils::time::round_to(total as f64 / 3600., 2)
        );
    }

    #[test]
    fn test_huge_totals_saturate() {
        let input = totals(&[("2024-01-01", u64::MAX), ("2024-01-02", u64::MAX)]);

        let daily = daily_totals_with_average(&input);
        assert_eq!(daily.len(), 3);
        assert!(daily.values().iter().all(|v| v.is_finite()));

        let cumulative = cumulative_totals(&input);
        assert_eq!(cumulative.values()[0], cumulative.values()[1]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let input = totals(&[("2024-01-01", 3599), ("2024-01-09", 12345)]);
        assert_eq!(
            daily_totals_with_average(&input),
            daily_totals_with_average(&input)
        );
        assert_eq!(cumulative_totals(&input), cumulative_totals(&input));
    }
}
