use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::{
    aggregate::{
        daily::{cumulative_totals, daily_totals_with_average},
        snapshot::{normalize_snapshots, NormalizedSnapshots},
        task_share::task_share_series,
        Series,
    },
    query::QueryWindow,
    source::{
        entities::{DailyLog, DayLogData},
        FetchError, WorkLogSource,
    },
};

/// Everything derived from a single response of the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub window: QueryWindow,
    /// Sequence number of the refresh that produced this state.
    pub sequence: u64,
    pub daily: Series,
    pub trend: Series,
    pub tasks: Series,
    pub logs: DailyLog,
}

impl DashboardState {
    pub fn derive(window: QueryWindow, sequence: u64, data: DayLogData) -> Self {
        Self {
            window,
            sequence,
            daily: daily_totals_with_average(&data.total),
            trend: cumulative_totals(&data.total),
            tasks: task_share_series(&data.logs),
            logs: data.logs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published { sequence: u64 },
    /// A newer refresh started while this one was in flight, so its result was dropped.
    Stale { sequence: u64, latest: u64 },
}

/// Holds the latest derived state. Refreshes may overlap; every refresh is numbered when it starts
/// and only the most recently started one is allowed to publish.
pub struct DashboardStore<S> {
    source: S,
    latest_request: AtomicU64,
    state: watch::Sender<Option<Arc<DashboardState>>>,
}

impl<S: WorkLogSource> DashboardStore<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            source,
            latest_request: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DashboardState>>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<Arc<DashboardState>> {
        self.state.borrow().clone()
    }

    /// Fetches day logs for the window and republishes every series derived from them.
    #[instrument(skip(self))]
    pub async fn refresh(&self, window: QueryWindow) -> Result<RefreshOutcome, FetchError> {
        let sequence = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting refresh {sequence}");

        let data = self.source.day_logs(&window).await?;

        let latest = self.latest_request.load(Ordering::SeqCst);
        if latest != sequence {
            debug!("Dropping refresh {sequence}, {latest} is newer");
            return Ok(RefreshOutcome::Stale { sequence, latest });
        }

        let derived = Arc::new(DashboardState::derive(window, sequence, data));
        // A newer refresh may have published between the check above and this point.
        let published = self.state.send_if_modified(|current| {
            if current.as_ref().is_some_and(|c| c.sequence > sequence) {
                return false;
            }
            *current = Some(derived);
            true
        });

        if published {
            info!("Published refresh {sequence} for {window}");
            Ok(RefreshOutcome::Published { sequence })
        } else {
            let latest = self.latest_request.load(Ordering::SeqCst);
            debug!("Dropping refresh {sequence}, {latest} published first");
            Ok(RefreshOutcome::Stale { sequence, latest })
        }
    }

    /// Cumulative snapshots over the last `days` days, normalized to a single unit. They come
    /// from their own endpoint, so day logs are neither fetched nor republished.
    #[instrument(skip(self))]
    pub async fn cumulative_snapshots(&self, days: u32) -> Result<NormalizedSnapshots, FetchError> {
        let snapshots = self.source.cumulative(days).await?;
        Ok(normalize_snapshots(&snapshots))
    }
}
