//! Terminal dashboard for time logged on projects and tasks.
//! Pulls daily work logs from a remote API and turns them into per day totals, running totals,
//! task shares and cumulative trends, next to live progress through the current hour, day, month
//! and year.
//!

pub mod aggregate;
pub mod cli;
pub mod dashboard;
pub mod progress;
pub mod query;
pub mod source;
pub mod utils;
