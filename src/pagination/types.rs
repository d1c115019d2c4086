//! Pagination controller types
//!
//! Events, states and outcomes of the list state machine.

use crate::error::{Error, Result};
use crate::query::ListQuery;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a page change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDirection {
    /// Towards higher offsets
    Next,
    /// Towards offset zero
    Previous,
}

impl FromStr for PageDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            other => Err(Error::Other(format!("Unknown page direction: {other}"))),
        }
    }
}

/// User action on the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// Search submitted (button or Enter) with the current input text
    SearchSubmitted(String),
    /// Previous or Next clicked
    PageRequested(PageDirection),
}

impl ListEvent {
    /// Search event
    pub fn search(text: impl Into<String>) -> Self {
        Self::SearchSubmitted(text.into())
    }

    /// Next page event
    pub fn next() -> Self {
        Self::PageRequested(PageDirection::Next)
    }

    /// Previous page event
    pub fn previous() -> Self {
        Self::PageRequested(PageDirection::Previous)
    }
}

/// Why a request was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Initial load from the URL
    Bootstrap,
    /// New free-text filter
    Search,
    /// Page change
    Page(PageDirection),
    /// Back/forward navigation to an existing history entry
    Restore,
}

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing in flight
    Idle,
    /// Waiting for the latest issued request
    Fetching {
        /// Sequence number of the latest request
        seq: u64,
        /// Query being fetched
        query: ListQuery,
    },
}

impl ControllerState {
    /// Whether a request is in flight
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching { .. })
    }
}

/// Handle of an issued request
///
/// Returned by `begin` and handed back to `complete` with the fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Monotonic per-controller sequence number
    pub seq: u64,
    /// Query to fetch
    pub query: ListQuery,
    /// What triggered the request
    pub kind: RequestKind,
}

/// A failed fetch, surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Query that failed to load
    pub query: ListQuery,
    /// Human-readable cause
    pub message: String,
    /// Whether trying again may succeed
    pub retryable: bool,
}

impl FetchFailure {
    /// Build from a fetch error
    pub fn from_error(query: ListQuery, error: &Error) -> Self {
        Self {
            query,
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load ?{}: {}", self.query, self.message)
    }
}

/// Result of completing (or declining) a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The page was loaded and the query committed
    Committed,
    /// The fetch failed; the previous page and query are kept
    FetchFailed(FetchFailure),
    /// A newer request was issued meanwhile; the response was discarded
    Stale,
    /// The event did not apply (Previous on the first page)
    Ignored,
}

impl Outcome {
    /// Whether the query was committed
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }

    /// The failure, if the fetch failed
    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::FetchFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Previous/Next enablement derived from the committed page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordances {
    /// Offset is past the first page
    pub has_previous: bool,
    /// The last page was full, so more may exist
    pub has_more: bool,
}

impl Affordances {
    /// Derive from a committed query and the size of its page
    ///
    /// `has_more` is a heuristic: a full page suggests more records; the
    /// total count is not consulted.
    pub fn derive(query: &ListQuery, page_len: usize) -> Self {
        Self {
            has_previous: query.offset > 0,
            has_more: page_len >= query.limit as usize,
        }
    }
}

/// Result of the initial load
#[derive(Debug)]
pub struct Bootstrap {
    /// Outcome of the initial fetch
    pub outcome: Outcome,
    /// Set when the URL query was malformed and defaults were used instead
    pub malformed: Option<Error>,
}
