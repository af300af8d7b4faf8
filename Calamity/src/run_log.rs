//! Failure log for a remap run
//!
//! Rows append failures from any worker thread; the log is written to
//! `log-<timestamp>.txt` once every row has finished. The file is written
//! even when nothing failed, so an empty file means a clean run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};

use crate::error::{Error, Result};

/// One recorded failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the failure was recorded
    pub timestamp: DateTime<Local>,
    /// Raw context identifying the row (usually the hash list line)
    pub context: String,
    /// What went wrong
    pub detail: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn now(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            context: context.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.context,
            self.detail
        )
    }
}

/// Append-only, thread-safe failure log
#[derive(Debug)]
pub struct RunLog {
    started_at: DateTime<Local>,
    entries: Mutex<Vec<LogEntry>>,
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLog {
    /// Start a new log; the file name is stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Local::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Record a failure. Safe to call from any thread.
    pub fn append(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    /// Snapshot of the entries in append order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Number of recorded failures
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has failed
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// File name this log flushes to
    pub fn file_name(&self) -> String {
        format!("log-{}.txt", self.started_at.format("%Y%m%d-%H%M%S%.3f"))
    }

    /// Render all entries, one per line
    pub fn render(&self) -> String {
        self.lock()
            .iter()
            .map(|entry| format!("{entry}\n"))
            .collect()
    }

    /// Write the log into `dir` and return the file path.
    ///
    /// Consumes the log: it is flushed exactly once, after the run.
    pub fn flush(self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| Error::path_io("failed to create directory", dir, e))?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render()).map_err(|e| Error::path_io("failed to write", &path, e))?;
        tracing::info!("Wrote {} failure(s) to {}", self.len(), path.display());
        Ok(path)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panicking row cannot leave the Vec half-pushed
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
