//! Fire-and-forget analytics recording.
//!
//! [`AnalyticsRecorder`] hands entries to a background writer over an
//! unbounded channel, so recording never waits on the repository.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::repository::{AnalyticsEntry, AnalyticsRepository};

/// Destination for analytics entries. `record` must return immediately.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, entry: AnalyticsEntry);
}

/// Channel-backed sink feeding a background repository writer.
#[derive(Clone)]
pub struct AnalyticsRecorder {
    tx: mpsc::UnboundedSender<AnalyticsEntry>,
}

impl AnalyticsRecorder {
    /// Spawns the writer task. It exits, flushing the repository, once every
    /// recorder clone has been dropped.
    pub fn spawn<R>(repository: R) -> (Self, JoinHandle<()>)
    where
        R: AnalyticsRepository + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_entries(repository, rx));
        (Self { tx }, handle)
    }
}

impl AnalyticsSink for AnalyticsRecorder {
    fn record(&self, entry: AnalyticsEntry) {
        if self.tx.send(entry).is_err() {
            debug!(target: "runtime::analytics", "analytics writer stopped; entry dropped");
        }
    }
}

async fn write_entries<R: AnalyticsRepository>(
    mut repository: R,
    mut rx: mpsc::UnboundedReceiver<AnalyticsEntry>,
) {
    while let Some(entry) = rx.recv().await {
        if let Err(e) = repository.append(&entry) {
            warn!(
                target: "runtime::analytics",
                session = %entry.session,
                event_type = %entry.event_type,
                error = %e,
                "Failed to append analytics entry"
            );
        }
    }

    if let Err(e) = repository.flush() {
        warn!(target: "runtime::analytics", error = %e, "Failed to flush analytics log");
    }
    debug!(target: "runtime::analytics", "Analytics writer stopped");
}
