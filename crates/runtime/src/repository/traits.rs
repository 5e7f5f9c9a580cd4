//! Repository contracts for runtime records.

use super::error::Result;
use super::types::AnalyticsEntry;

/// Append-only store for narrative request outcomes.
pub trait AnalyticsRepository: Send + Sync {
    /// Append one entry to the log.
    fn append(&mut self, entry: &AnalyticsEntry) -> Result<()>;

    /// Flush buffered entries to the underlying store.
    fn flush(&mut self) -> Result<()>;

    /// Number of entries written so far.
    fn len(&self) -> Result<u64>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<R: AnalyticsRepository + ?Sized> AnalyticsRepository for Box<R> {
    fn append(&mut self, entry: &AnalyticsEntry) -> Result<()> {
        (**self).append(entry)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn len(&self) -> Result<u64> {
        (**self).len()
    }
}
