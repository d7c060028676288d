use std::fmt::Display;

use serde::Serialize;
use tracing::debug;

use crate::{
    source::entities::CumulativeSnapshot,
    utils::time::{seconds_to_hours, seconds_to_minutes, SECONDS_IN_HOUR},
};

use super::Series;

const SNAPSHOT_DECIMALS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapshotUnit {
    Minutes,
    Hours,
}

impl SnapshotUnit {
    /// A whole series switches to hours once its last point reaches one hour.
    fn for_last_total(total: u64) -> Self {
        if total >= SECONDS_IN_HOUR {
            SnapshotUnit::Hours
        } else {
            SnapshotUnit::Minutes
        }
    }

    fn convert(self, seconds: u64) -> f64 {
        match self {
            SnapshotUnit::Minutes => seconds_to_minutes(seconds as f64),
            SnapshotUnit::Hours => seconds_to_hours(seconds as f64),
        }
    }
}

impl Display for SnapshotUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotUnit::Minutes => write!(f, "min"),
            SnapshotUnit::Hours => write!(f, "h"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSnapshots {
    pub unit: SnapshotUnit,
    pub series: Series,
}

/// Rescales pre-aggregated running totals into a single unit. Only the last snapshot decides the
/// unit, earlier points never do.
pub fn normalize_snapshots(snapshots: &[CumulativeSnapshot]) -> NormalizedSnapshots {
    let unit = snapshots
        .last()
        .map_or(SnapshotUnit::Minutes, |last| SnapshotUnit::for_last_total(last.total));

    let mut series = Series::with_decimals(SNAPSHOT_DECIMALS);
    for snapshot in snapshots {
        series.push(snapshot.end_time.clone(), unit.convert(snapshot.total));
    }

    debug!("Normalized {} snapshots into {unit}", series.len());
    NormalizedSnapshots { unit, series }
}
