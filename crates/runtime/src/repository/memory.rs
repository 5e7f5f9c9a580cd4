//! In-memory analytics log.

use std::sync::{Arc, RwLock};

use super::error::{RepositoryError, Result};
use super::traits::AnalyticsRepository;
use super::types::AnalyticsEntry;

/// In-memory analytics log for testing and development.
///
/// Cloning shares the underlying buffer, so a test can hand one clone to the
/// runtime and inspect the entries through another.
#[derive(Clone, Default)]
pub struct InMemoryAnalyticsLog {
    entries: Arc<RwLock<Vec<AnalyticsEntry>>>,
}

impl InMemoryAnalyticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all entries (for testing/debugging).
    pub fn entries(&self) -> Result<Vec<AnalyticsEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries.clone())
    }
}

impl AnalyticsRepository for InMemoryAnalyticsLog {
    fn append(&mut self, entry: &AnalyticsEntry) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        entries.push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // No-op for in-memory - already "flushed"
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries.len() as u64)
    }
}
