//! Shared status log.
//!
//! Created once at startup and handed to every component that reports to
//! the user. Clones share the same underlying buffer. Every entry is also
//! forwarded to the `log` facade.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub level: StatusLevel,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct StatusLog {
    entries: Arc<Mutex<VecDeque<StatusEntry>>>,
    capacity: usize,
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new(200)
    }
}

impl StatusLog {
    /// A log keeping at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(StatusLevel::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(StatusLevel::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(StatusLevel::Error, message.into());
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<StatusEntry> {
        self.lock().back().cloned()
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, level: StatusLevel, message: String) {
        match level {
            StatusLevel::Info => log::info!("{message}"),
            StatusLevel::Warning => log::warn!("{message}"),
            StatusLevel::Error => log::error!("{message}"),
        }
        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(StatusEntry { level, message });
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<StatusEntry>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
