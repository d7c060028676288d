pub mod bars;
pub mod table;

use std::io::{self, Write};

use anyhow::Result;

use crate::{
    aggregate::{snapshot::NormalizedSnapshots, task_share::TaskUsage, Series},
    progress::ProgressSnapshot,
    source::entities::DailyLog,
    utils::percentage::Percentage,
};

fn print_rows(title: &str, rows: Vec<String>) {
    println!("{title}");
    if rows.is_empty() {
        println!("Nothing logged");
    }
    for row in rows {
        println!("{row}");
    }
}

pub fn print_series(title: &str, series: &Series, unit: &str) {
    print_rows(title, bars::series_rows(series, unit));
}

pub fn print_snapshots(title: &str, snapshots: &NormalizedSnapshots) {
    print_series(title, &snapshots.series, &snapshots.unit.to_string());
}

pub fn print_tasks(usages: &[TaskUsage], min_share: Percentage) {
    print_rows("Share\tDuration\tTask", table::task_rows(usages, min_share));
}

pub fn print_log(log: &DailyLog) {
    print_rows("Date      \tProject\tTask\tStart\tDuration", table::log_rows(log));
}

/// Prints progress bars. With `redraw` the previous bars are overwritten in place.
pub fn print_progress(snapshot: &ProgressSnapshot, day_of_month: u32, redraw: bool) -> Result<()> {
    let rows = bars::progress_rows(snapshot, day_of_month);
    let mut stdout = io::stdout().lock();
    if redraw {
        // Move the cursor up over the previous bars.
        write!(stdout, "\x1b[{}A", rows.len())?;
    }
    for row in rows {
        writeln!(stdout, "\x1b[2K{row}")?;
    }
    stdout.flush()?;
    Ok(())
}
