use std::collections::HashMap;

use tracing::debug;

use crate::{
    source::entities::DailyLog,
    utils::{
        percentage::{seconds_percentage, Percentage},
        time::{round_to, seconds_to_hours},
    },
};

use super::Series;

const SHARE_DECIMALS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskUsage {
    /// `project - task`
    pub key: String,
    pub seconds: u64,
    pub percentage: Percentage,
}

impl TaskUsage {
    fn new(key: String) -> Self {
        Self {
            key,
            seconds: 0,
            percentage: Percentage::ZERO,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} ({:.*}h)",
            self.key,
            SHARE_DECIMALS,
            round_to(seconds_to_hours(self.seconds as f64), SHARE_DECIMALS)
        )
    }
}

/// Returns time spent per task across all days, in the order tasks first appear in the log, plus
/// the total of all entries. When nothing was logged every task gets 0%.
pub fn analyze_tasks(log: &DailyLog) -> (Vec<TaskUsage>, u64) {
    let mut positions = HashMap::<String, usize>::new();
    let mut usages = Vec::<TaskUsage>::new();
    let mut total = 0u64;

    for entry in log.entries() {
        total = total.saturating_add(entry.duration);
        let key = entry.task_key();
        let position = *positions.entry(key).or_insert_with_key(|key| {
            usages.push(TaskUsage::new(key.clone()));
            usages.len() - 1
        });
        let usage = &mut usages[position];
        usage.seconds = usage.seconds.saturating_add(entry.duration);
    }

    for usage in usages.iter_mut() {
        usage.percentage = seconds_percentage(usage.seconds, total).rounded(SHARE_DECIMALS);
    }

    debug!("Found {} tasks sharing {total}s", usages.len());
    (usages, total)
}

/// Percentage of total time per task, labeled `<project> - <task> (<hours>h)`.
pub fn task_share_series(log: &DailyLog) -> Series {
    let (usages, _) = analyze_tasks(log);
    let mut series = Series::with_decimals(SHARE_DECIMALS);
    for usage in usages {
        series.push(usage.label(), *usage.percentage);
    }
    series
}
