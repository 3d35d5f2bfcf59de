//! The game event log.
//!
//! An ordered, append-only sequence of human-readable entries tagged with the
//! turn they happened on. Every successful effect resolution appends at least
//! one entry before the host sees the structured outcome; hosts translate new
//! entries into animations, sounds, or a combat-log panel.
//!
//! This is gameplay state, not diagnostics. Engine diagnostics (unknown
//! selector tags, dispatch misses) go to the `log` crate instead.

use serde::{Deserialize, Serialize};

/// One entry in the event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Turn number the event happened on.
    pub turn: u32,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Turn {}] {}", self.turn, self.message)
    }
}

/// Monotonically growing event log for one game.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LogEntry>,
    /// Index of the first entry not yet handed to the host.
    cursor: usize,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, turn: u32, message: impl Into<String>) {
        let entry = LogEntry {
            turn,
            message: message.into(),
        };
        log::debug!("{}", entry);
        self.entries.push(entry);
    }

    /// All entries so far.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries appended since the last call; advances the host cursor.
    pub fn drain_new(&mut self) -> Vec<LogEntry> {
        let new = self.entries[self.cursor..].to_vec();
        self.cursor = self.entries.len();
        new
    }

    /// Drop entries past `len`. Used to roll back a failed resolution.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
        self.cursor = self.cursor.min(self.entries.len());
    }

    /// Reset for a new game.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
