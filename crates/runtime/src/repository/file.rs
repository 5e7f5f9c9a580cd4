//! Append-only JSON-lines analytics log.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::{RepositoryError, Result};
use super::traits::AnalyticsRepository;
use super::types::AnalyticsEntry;

/// File-based analytics log, one JSON object per line.
pub struct FileAnalyticsLog {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl FileAnalyticsLog {
    /// Create a new log file.
    ///
    /// # Errors
    ///
    /// Returns error if the file already exists (prevents accidental overwrites).
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if path.exists() {
            return Err(RepositoryError::LogAlreadyExists(
                path.display().to_string(),
            ));
        }

        let file = OpenOptions::new().create_new(true).write(true).open(path)?;
        tracing::debug!("Created analytics log: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Open a log for appending, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let written = if path.exists() {
            Self::read_all(path)?.len() as u64
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!(
            "Opened analytics log: {} with {} entries",
            path.display(),
            written
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written,
        })
    }

    /// Read every entry of a log file. Blank lines are skipped.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<AnalyticsEntry>> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| RepositoryError::CorruptedData {
                line: index + 1,
                reason: e.to_string(),
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnalyticsRepository for FileAnalyticsLog {
    fn append(&mut self, entry: &AnalyticsEntry) -> Result<()> {
        let line = serde_json::to_string(entry).map_err(|e| RepositoryError::Json(e.to_string()))?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(self.written)
    }
}

impl Drop for FileAnalyticsLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush analytics log {}: {}", self.path.display(), e);
        }
    }
}
