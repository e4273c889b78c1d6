//! In-memory activity log shown on the dashboard.
//!
//! A bounded ring of human-readable events, newest first. Entries are never
//! re-read by the system itself; when the buffer is full the oldest entry is
//! evicted.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Maximum number of retained entries
pub const DEFAULT_CAPACITY: usize = 50;

/// One logged event
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl ActivityEntry {
    /// Render as `[HH:MM:SS] message`
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Bounded event buffer, newest entries first
#[derive(Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, evicting the oldest entry on overflow
    pub fn record<S: Into<String>>(&mut self, message: S) {
        self.entries.push_front(ActivityEntry {
            timestamp: Local::now(),
            message: message.into(),
        });
        self.entries.truncate(self.capacity);
    }

    /// Entries ordered newest first
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any retained entry contains the given fragment
    pub fn contains(&self, fragment: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(fragment))
    }
}
