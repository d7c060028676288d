use std::time::Duration;

use chrono::TimeZone;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    progress::{compute_progress, ProgressSnapshot},
    utils::clock::Clock,
};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

pub fn progress_channel() -> (
    watch::Sender<ProgressSnapshot>,
    watch::Receiver<ProgressSnapshot>,
) {
    watch::channel(ProgressSnapshot::default())
}

/// Recomputes [ProgressSnapshot] on a fixed period and publishes it. Only the latest snapshot is
/// kept, a slow subscriber just skips intermediate ones.
pub struct ProgressTicker<Z: TimeZone> {
    next: watch::Sender<ProgressSnapshot>,
    shutdown: CancellationToken,
    period: Duration,
    time_provider: Box<dyn Clock>,
    zone: Z,
}

impl<Z> ProgressTicker<Z>
where
    Z: TimeZone + Send + Sync + 'static,
    Z::Offset: Send + Sync,
{
    pub fn new(
        next: watch::Sender<ProgressSnapshot>,
        shutdown: CancellationToken,
        period: Duration,
        time_provider: Box<dyn Clock>,
        zone: Z,
    ) -> Self {
        Self {
            next,
            shutdown,
            period,
            time_provider,
            zone,
        }
    }

    fn tick(&self) -> ProgressSnapshot {
        let now = self.time_provider.time().with_timezone(&self.zone);
        compute_progress(&now)
    }

    /// Executes the ticker loop until cancelled or until every subscriber is gone.
    pub async fn run(self) {
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.period;

            let snapshot = self.tick();
            trace!("Publishing {snapshot:?}");
            if self.next.send(snapshot).is_err() {
                debug!("Nobody listens to progress anymore");
                return;
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("Progress ticker cancelled");
                    return
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }
        }
    }
}
