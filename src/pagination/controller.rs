//! Pagination controller
//!
//! Holds the committed list query and page, turns user events into requests
//! and commits their results.
//!
//! Every search or page change runs, in order: encode the query, push it onto
//! the history, fetch. The URL therefore shows the requested state while the
//! fetch is in flight. The committed query (and with it the offset driving
//! the Previous/Next affordances) only changes once the fetch succeeds.
//!
//! Each request gets a sequence number. Only the latest one may commit;
//! responses to older requests are discarded. Dropping a `dispatch`,
//! `bootstrap` or `restore` future mid-fetch leaves the committed state as it
//! was and the controller `Idle`.

use super::types::{
    Affordances, Bootstrap, ControllerState, FetchFailure, ListEvent, Outcome, PageDirection,
    PendingRequest, RequestKind,
};
use crate::error::Result;
use crate::fetch::{CollectionFetcher, PageResult};
use crate::history::HistoryPort;
use crate::query::{decode_or_default, decode_with, encode, ListQuery};
use crate::types::Customer;
use tracing::{debug, warn};

/// State machine behind the paginated, searchable list
#[derive(Debug)]
pub struct PaginationController<F, H> {
    fetcher: F,
    history: H,
    /// Defaults for parameters missing from the URL
    defaults: ListQuery,
    /// Query of the page currently displayed
    query: ListQuery,
    /// Page currently displayed
    page: PageResult,
    state: ControllerState,
    /// Sequence number of the latest issued request
    last_seq: u64,
    last_failure: Option<FetchFailure>,
}

impl<F: CollectionFetcher, H: HistoryPort> PaginationController<F, H> {
    /// Create a controller with the default query (`offset=0`, `limit=50`)
    pub fn new(fetcher: F, history: H) -> Self {
        Self::with_defaults(fetcher, history, ListQuery::default())
    }

    /// Create a controller with custom defaults (e.g. another page size)
    pub fn with_defaults(fetcher: F, history: H, defaults: ListQuery) -> Self {
        Self {
            fetcher,
            history,
            query: defaults.clone(),
            defaults,
            page: PageResult::default(),
            state: ControllerState::Idle,
            last_seq: 0,
            last_failure: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Query of the page currently displayed
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Committed offset
    pub fn offset(&self) -> u32 {
        self.query.offset
    }

    /// Page size
    pub fn limit(&self) -> u32 {
        self.query.limit
    }

    /// Committed free-text filter
    pub fn search_text(&self) -> &str {
        &self.query.q
    }

    /// Page currently displayed
    pub fn page(&self) -> &PageResult {
        &self.page
    }

    /// Records currently displayed
    pub fn items(&self) -> &[Customer] {
        &self.page.items
    }

    /// Total count reported with the current page
    pub fn total_count(&self) -> u64 {
        self.page.total_count
    }

    /// Current state
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Whether the latest request is still in flight
    pub fn is_loading(&self) -> bool {
        self.state.is_fetching()
    }

    /// Failure of the latest request, cleared by the next commit
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// Previous/Next enablement
    pub fn affordances(&self) -> Affordances {
        Affordances::derive(&self.query, self.page.len())
    }

    /// Previous is enabled exactly when the offset is past zero
    pub fn has_previous(&self) -> bool {
        self.affordances().has_previous
    }

    /// Next is enabled exactly when the current page is full
    pub fn has_more(&self) -> bool {
        self.affordances().has_more
    }

    /// Sequence number of the latest issued request (0 before any)
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// The history port
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the history port (for back/forward)
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// The fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Initial load: adopt the URL's query and fetch it
    ///
    /// A malformed URL falls back to the defaults; the error is reported in
    /// the result. Nothing is pushed onto the history since the URL already
    /// holds this state.
    pub async fn bootstrap(&mut self, raw_query: &str) -> Bootstrap {
        let (query, malformed) = decode_or_default(raw_query, &self.defaults);
        self.query = query.clone();
        let pending = self.issue(query, RequestKind::Bootstrap);
        let outcome = self.run(pending).await;
        Bootstrap { outcome, malformed }
    }

    /// Load the state of a history entry the user navigated to
    ///
    /// Does not push. Fails only if the entry's query is malformed.
    pub async fn restore(&mut self, raw_query: &str) -> Result<Outcome> {
        let query = decode_with(raw_query, &self.defaults)?;
        let pending = self.issue(query, RequestKind::Restore);
        Ok(self.run(pending).await)
    }

    /// Handle a user event end to end: begin, fetch, complete
    pub async fn dispatch(&mut self, event: ListEvent) -> Outcome {
        match self.begin(event) {
            Some(pending) => self.run(pending).await,
            None => Outcome::Ignored,
        }
    }

    /// Start handling a user event: compute the next query, encode it and
    /// push it onto the history
    ///
    /// Returns `None` when the event does not apply (Previous on the first
    /// page); in that case nothing is pushed or fetched.
    pub fn begin(&mut self, event: ListEvent) -> Option<PendingRequest> {
        let (query, kind) = match event {
            ListEvent::SearchSubmitted(text) => (self.query.searching(text), RequestKind::Search),
            ListEvent::PageRequested(PageDirection::Next) => (
                self.query.at_offset(self.query.next_offset()),
                RequestKind::Page(PageDirection::Next),
            ),
            ListEvent::PageRequested(PageDirection::Previous) => {
                let Some(offset) = self.query.previous_offset() else {
                    debug!("Previous requested on the first page, ignoring");
                    return None;
                };
                (
                    self.query.at_offset(offset),
                    RequestKind::Page(PageDirection::Previous),
                )
            }
        };

        self.history.push(&encode(&query));
        Some(self.issue(query, kind))
    }

    /// Finish a request with its fetch result
    ///
    /// Commits the query and page on success. A failure keeps the current
    /// query and page. Results of anything but the latest request are
    /// discarded.
    pub fn complete(&mut self, pending: PendingRequest, result: Result<PageResult>) -> Outcome {
        if pending.seq != self.last_seq {
            debug!(
                "Discarding response #{} for ?{} (latest is #{})",
                pending.seq, pending.query, self.last_seq
            );
            return Outcome::Stale;
        }

        self.state = ControllerState::Idle;

        match result {
            Ok(page) => {
                debug!(
                    "Committed ?{} with {} of {} records",
                    pending.query,
                    page.len(),
                    page.total_count
                );
                self.query = pending.query;
                self.page = page;
                self.last_failure = None;
                Outcome::Committed
            }
            Err(e) => {
                warn!("Fetch for ?{} failed: {}", pending.query, e);
                let failure = FetchFailure::from_error(pending.query, &e);
                self.last_failure = Some(failure.clone());
                Outcome::FetchFailed(failure)
            }
        }
    }

    /// Abandon the in-flight request, if any
    ///
    /// Its response will be discarded when it arrives.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_fetching() {
            return false;
        }
        self.last_seq += 1;
        self.state = ControllerState::Idle;
        debug!("Cancelled in-flight list request");
        true
    }

    fn issue(&mut self, query: ListQuery, kind: RequestKind) -> PendingRequest {
        self.last_seq += 1;
        let seq = self.last_seq;
        debug!("Request #{} ({:?}): ?{}", seq, kind, query);
        self.state = ControllerState::Fetching {
            seq,
            query: query.clone(),
        };
        PendingRequest { seq, query, kind }
    }

    async fn run(&mut self, pending: PendingRequest) -> Outcome {
        let result = {
            let guard = InFlight {
                state: &mut self.state,
                seq: pending.seq,
                armed: true,
            };
            let result = self.fetcher.refresh(&pending.query).await;
            guard.disarm();
            result
        };
        self.complete(pending, result)
    }
}

/// Puts the controller back to `Idle` when a fetch future is dropped before
/// it resolves
struct InFlight<'a> {
    state: &'a mut ControllerState,
    seq: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if matches!(self.state, ControllerState::Fetching { seq, .. } if *seq == self.seq) {
            debug!("Request #{} abandoned before it resolved", self.seq);
            *self.state = ControllerState::Idle;
        }
    }
}
