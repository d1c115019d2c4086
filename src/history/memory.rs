//! In-process navigation history
//!
//! Behaves like a browser session history for one page: a stack of entries
//! with a cursor. Pushing after going back drops the forward entries.

use super::types::HistoryPort;
use tracing::debug;

/// Session history held in memory
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    /// Path the query strings are attached to (e.g. `/a/customers`)
    base_path: String,
    /// Encoded query strings, oldest first
    entries: Vec<String>,
    /// Index of the current entry
    cursor: usize,
}

// Never empty: a history holds at least its initial entry
#[allow(clippy::len_without_is_empty)]
impl MemoryHistory {
    /// Create a history whose first entry is `initial_query`
    pub fn new(base_path: impl Into<String>, initial_query: impl Into<String>) -> Self {
        let initial = initial_query.into();
        Self {
            base_path: base_path.into(),
            entries: vec![initial.trim_start_matches('?').to_string()],
            cursor: 0,
        }
    }

    /// Create a history starting at a full location such as
    /// `/a/customers?offset=50&limit=50`
    pub fn from_location(location: &str) -> Self {
        let location = location.split('#').next().unwrap_or("");
        match location.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(location, ""),
        }
    }

    /// Path the entries are attached to
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Query string of the current entry (no leading `?`)
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Full address of the current entry
    pub fn location(&self) -> String {
        let query = self.current();
        if query.is_empty() {
            self.base_path.clone()
        } else {
            format!("{}?{}", self.base_path, query)
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Index of the current entry
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether there is an entry before the current one
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Whether there is an entry after the current one
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Move to the previous entry, returning its query string
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Move to the next entry, returning its query string
    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

impl HistoryPort for MemoryHistory {
    fn push(&mut self, encoded_query: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries
            .push(encoded_query.trim_start_matches('?').to_string());
        self.cursor = self.entries.len() - 1;
        debug!("History push: {}", self.location());
    }
}
