//! List query types
//!
//! The canonical query the customer list is derived from.

use serde::{Deserialize, Serialize};

/// Offset used when the URL does not carry one
pub const DEFAULT_OFFSET: u32 = 0;

/// Page size used when the URL does not carry one
pub const DEFAULT_LIMIT: u32 = 50;

/// Free-text filter plus page window
///
/// In normal operation `offset` is a multiple of `limit`: it starts at zero
/// and only moves in steps of `limit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    /// Free-text filter (empty means no filter)
    pub q: String,
    /// Index of the first record on the page
    pub offset: u32,
    /// Page size, always positive
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    /// Create a query
    pub fn new(q: impl Into<String>, offset: u32, limit: u32) -> Self {
        Self {
            q: q.into(),
            offset,
            limit,
        }
    }

    /// Default query with a different page size
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Query for a new search: the filter changes and the offset resets
    #[must_use]
    pub fn searching(&self, text: impl Into<String>) -> Self {
        Self {
            q: text.into(),
            offset: 0,
            limit: self.limit,
        }
    }

    /// Same filter and page size at another offset
    #[must_use]
    pub fn at_offset(&self, offset: u32) -> Self {
        Self {
            q: self.q.clone(),
            offset,
            limit: self.limit,
        }
    }

    /// Offset of the following page
    pub fn next_offset(&self) -> u32 {
        self.offset.saturating_add(self.limit)
    }

    /// Offset of the preceding page, `None` on the first page
    pub fn previous_offset(&self) -> Option<u32> {
        if self.offset == 0 {
            None
        } else {
            Some(self.offset.saturating_sub(self.limit))
        }
    }

    /// Whether a free-text filter is active
    pub fn has_filter(&self) -> bool {
        !self.q.is_empty()
    }

    /// Encoded form with a leading `?`, as used in URLs and fetches
    pub fn search(&self) -> String {
        format!("?{}", super::encode(self))
    }
}

impl std::fmt::Display for ListQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::encode(self))
    }
}
