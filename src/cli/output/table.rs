use chrono::NaiveDate;

use crate::{
    aggregate::task_share::TaskUsage,
    source::entities::{DailyLog, LogEntry},
    utils::{
        percentage::Percentage,
        time::{date_to_query_param, format_clock_duration},
    },
};

/// Rows of the log table. Newest days come first, entries within a day stay in source order. The
/// date is only printed on the first row of its day.
pub fn log_rows(log: &DailyLog) -> Vec<String> {
    log.days()
        .rev()
        .flat_map(|(date, entries)| {
            entries
                .iter()
                .enumerate()
                .map(move |(index, entry)| log_row(date, index == 0, entry))
        })
        .collect()
}

fn log_row(date: NaiveDate, first_of_day: bool, entry: &LogEntry) -> String {
    let date = if first_of_day {
        date_to_query_param(date)
    } else {
        String::new()
    };
    format!(
        "{date:<10}\t{}\t{}\t{}\t{}",
        entry.project,
        entry.task,
        entry.start,
        format_clock_duration(entry.duration)
    )
}

/// Rows of the task table, dropping tasks below `min_share`. Task order is kept.
pub fn task_rows(usages: &[TaskUsage], min_share: Percentage) -> Vec<String> {
    usages
        .iter()
        .filter(|usage| usage.percentage >= min_share)
        .map(|usage| {
            format!(
                "{:.2}\t{}\t{}",
                usage.percentage,
                format_clock_duration(usage.seconds),
                usage.label()
            )
        })
        .collect()
}
