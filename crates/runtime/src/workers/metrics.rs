//! Commentary metrics and statistics.
//!
//! Tracks narrative request outcomes, latency, and what happened to each
//! bubble afterwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Commentary metrics tracked by the coordinator.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct CommentaryMetrics {
    /// Narrative requests issued (one per commentary event)
    requests: AtomicU64,

    /// Requests that returned a line in time
    successes: AtomicU64,

    /// Requests abandoned at the timeout
    timeouts: AtomicU64,

    /// Requests that returned an error
    failures: AtomicU64,

    /// Bubbles that reached the screen
    shown: AtomicU64,

    /// Pending or visible bubbles replaced by a newer event
    superseded: AtomicU64,

    /// Events whose bubble was never shown, for any reason
    suppressed: AtomicU64,

    /// Sum of successful request latencies, in milliseconds
    total_latency_ms: AtomicU64,
}

impl CommentaryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, latency: Duration) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(latency.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shown(&self) {
        self.shown.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn shown(&self) -> u64 {
        self.shown.load(Ordering::Relaxed)
    }

    pub fn superseded(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Average latency of successful requests.
    pub fn avg_latency(&self) -> Duration {
        let successes = self.successes();
        if successes == 0 {
            Duration::ZERO
        } else {
            let total = self.total_latency_ms.load(Ordering::Relaxed);
            Duration::from_millis(total / successes)
        }
    }

    /// Returns success rate as a percentage (0-100).
    pub fn success_rate(&self) -> f64 {
        let successes = self.successes();
        let total = successes + self.timeouts() + self.failures();

        if total == 0 {
            100.0
        } else {
            (successes as f64 / total as f64) * 100.0
        }
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Note: individual fields are read atomically but the snapshot as a
    /// whole may be inconsistent while requests are in flight.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            successes: self.successes(),
            timeouts: self.timeouts(),
            failures: self.failures(),
            shown: self.shown(),
            superseded: self.superseded(),
            suppressed: self.suppressed(),
            avg_latency: self.avg_latency(),
            success_rate: self.success_rate(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub successes: u64,
    pub timeouts: u64,
    pub failures: u64,
    pub shown: u64,
    pub superseded: u64,
    pub suppressed: u64,
    pub avg_latency: Duration,
    pub success_rate: f64,
}
