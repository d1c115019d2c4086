//! Tests for the pagination controller

use super::*;
use crate::error::{Error, Result};
use crate::fetch::{CollectionFetcher, PageResult};
use crate::history::{HistoryPort, MemoryHistory};
use crate::query::ListQuery;
use crate::types::Customer;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;
use tokio_test::assert_ok;

// ============================================================================
// Fixtures
// ============================================================================

/// Fetcher answering from a queue; an empty queue yields an empty page
#[derive(Default)]
struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<PageResult>>>,
    requests: Mutex<Vec<ListQuery>>,
}

impl ScriptedFetcher {
    fn respond(self, result: Result<PageResult>) -> Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    fn requests(&self) -> Vec<ListQuery> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CollectionFetcher for ScriptedFetcher {
    async fn refresh(&self, query: &ListQuery) -> Result<PageResult> {
        self.requests.lock().unwrap().push(query.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PageResult::default()))
    }
}

fn page_of(count: usize) -> PageResult {
    let items = (0..count)
        .map(|i| Customer::new(format!("cus_{i:03}")))
        .collect();
    PageResult::new(items, 500)
}

fn network_error() -> Error {
    Error::http_status(503, "upstream unavailable")
}

fn controller(fetcher: ScriptedFetcher) -> PaginationController<ScriptedFetcher, MemoryHistory> {
    PaginationController::new(fetcher, MemoryHistory::new("/a/customers", ""))
}

// ============================================================================
// Bootstrap
// ============================================================================

#[tokio::test]
async fn test_bootstrap_fetches_url_query() {
    let fetcher = ScriptedFetcher::default().respond(Ok(page_of(50)));
    let mut controller = controller(fetcher);

    let bootstrap = controller.bootstrap("?offset=50&limit=50").await;

    assert!(bootstrap.outcome.is_committed());
    assert!(bootstrap.malformed.is_none());
    assert_eq!(controller.query(), &ListQuery::new("", 50, 50));
    assert_eq!(
        controller.fetcher().requests(),
        vec![ListQuery::new("", 50, 50)]
    );
    assert!(controller.has_more());
    assert!(controller.has_previous());
    // The URL already holds this state
    assert_eq!(controller.history().len(), 1);
}

#[tokio::test]
async fn test_bootstrap_short_page_disables_next() {
    let fetcher = ScriptedFetcher::default().respond(Ok(page_of(12)));
    let mut controller = controller(fetcher);

    controller.bootstrap("?offset=50&limit=50").await;

    assert_eq!(controller.items().len(), 12);
    assert!(!controller.has_more());
}

#[tokio::test]
async fn test_bootstrap_without_params_uses_defaults() {
    let mut controller = controller(ScriptedFetcher::default());

    controller.bootstrap("").await;

    assert_eq!(
        controller.fetcher().requests(),
        vec![ListQuery::new("", 0, 50)]
    );
    assert!(!controller.has_previous());
}

#[tokio::test]
async fn test_bootstrap_malformed_falls_back() {
    let fetcher = ScriptedFetcher::default().respond(Ok(page_of(3)));
    let mut controller = controller(fetcher);

    let bootstrap = controller.bootstrap("?offset=ten&limit=50").await;

    assert!(matches!(
        bootstrap.malformed,
        Some(Error::MalformedQuery { ref param, .. }) if param == "offset"
    ));
    assert!(bootstrap.outcome.is_committed());
    assert_eq!(controller.query(), &ListQuery::default());
}

#[tokio::test]
async fn test_failed_bootstrap_still_adopts_url_query() {
    let fetcher = ScriptedFetcher::default().respond(Err(network_error()));
    let mut controller = controller(fetcher);

    let bootstrap = controller.bootstrap("?offset=100&limit=50").await;

    assert!(matches!(bootstrap.outcome, Outcome::FetchFailed(_)));
    assert_eq!(controller.query(), &ListQuery::new("", 100, 50));
    assert!(controller.items().is_empty());
    assert!(controller.has_previous());
    assert!(!controller.has_more());
    assert!(controller.last_failure().is_some());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_bootstrap_uses_custom_default_limit() {
    let mut controller = PaginationController::with_defaults(
        ScriptedFetcher::default(),
        MemoryHistory::new("/a/customers", ""),
        ListQuery::with_limit(20),
    );

    controller.bootstrap("?q=ada").await;

    assert_eq!(
        controller.fetcher().requests(),
        vec![ListQuery::new("ada", 0, 20)]
    );
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_resets_offset() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Ok(page_of(4)));
    let mut controller = controller(fetcher);
    controller.bootstrap("?offset=100&limit=50").await;
    assert_eq!(controller.offset(), 100);

    let outcome = controller.dispatch(ListEvent::search("foo")).await;

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(controller.offset(), 0);
    assert_eq!(controller.search_text(), "foo");
    assert_eq!(
        controller.fetcher().requests().last(),
        Some(&ListQuery::new("foo", 0, 50))
    );
    assert_eq!(controller.history().current(), "q=foo&offset=0&limit=50");
}

#[tokio::test]
async fn test_empty_search_drops_q_from_url() {
    let mut controller = controller(ScriptedFetcher::default());
    controller.bootstrap("?q=old&offset=50&limit=50").await;

    controller.dispatch(ListEvent::search("")).await;

    assert_eq!(controller.history().current(), "offset=0&limit=50");
    assert_eq!(controller.search_text(), "");
}

// ============================================================================
// Page Changes
// ============================================================================

#[tokio::test]
async fn test_next_advances_offset_after_fetch() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Ok(page_of(50)));
    let mut controller = controller(fetcher);
    controller.bootstrap("?offset=50&limit=50").await;

    let outcome = controller.dispatch(ListEvent::next()).await;

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(controller.offset(), 100);
    assert_eq!(
        controller.fetcher().requests().last(),
        Some(&ListQuery::new("", 100, 50))
    );
    assert_eq!(controller.history().current(), "offset=100&limit=50");
}

#[tokio::test]
async fn test_previous_steps_back_one_page() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Ok(page_of(50)));
    let mut controller = controller(fetcher);
    controller.bootstrap("?offset=100&limit=50").await;

    controller.dispatch(ListEvent::previous()).await;

    assert_eq!(
        controller.fetcher().requests().last(),
        Some(&ListQuery::new("", 50, 50))
    );
    assert_eq!(controller.offset(), 50);
}

#[tokio::test]
async fn test_page_change_keeps_filter() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Ok(page_of(50)));
    let mut controller = controller(fetcher);
    controller.bootstrap("?q=smith&offset=0&limit=50").await;

    controller.dispatch(ListEvent::next()).await;

    assert_eq!(controller.query(), &ListQuery::new("smith", 50, 50));
    assert_eq!(controller.history().current(), "q=smith&offset=50&limit=50");
}

#[tokio::test]
async fn test_previous_on_first_page_is_ignored() {
    let mut controller = controller(ScriptedFetcher::default().respond(Ok(page_of(50))));
    controller.bootstrap("").await;
    let requests_before = controller.fetcher().requests().len();

    let outcome = controller.dispatch(ListEvent::previous()).await;

    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(controller.offset(), 0);
    assert_eq!(controller.history().len(), 1);
    assert_eq!(controller.fetcher().requests().len(), requests_before);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_fetch_failure_keeps_page_and_offset() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Err(network_error()));
    let mut controller = controller(fetcher);
    controller.bootstrap("?offset=50&limit=50").await;
    let items_before = controller.items().to_vec();

    let outcome = controller.dispatch(ListEvent::next()).await;

    let failure = outcome.failure().expect("fetch should fail");
    assert_eq!(failure.query, ListQuery::new("", 100, 50));
    assert!(failure.retryable);
    assert_eq!(controller.offset(), 50);
    assert_eq!(controller.items(), items_before.as_slice());
    assert_eq!(controller.last_failure(), Some(failure));
    assert!(!controller.is_loading());
    // The requested state was already pushed before the fetch
    assert_eq!(controller.history().current(), "offset=100&limit=50");
}

#[tokio::test]
async fn test_success_clears_failure_notice() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Err(network_error()))
        .respond(Ok(page_of(50)));
    let mut controller = controller(fetcher);
    controller.bootstrap("").await;

    controller.dispatch(ListEvent::next()).await;
    assert!(controller.last_failure().is_some());

    controller.dispatch(ListEvent::next()).await;
    assert!(controller.last_failure().is_none());
    assert_eq!(controller.offset(), 50);
}

// ============================================================================
// Fetch-gated Commit
// ============================================================================

#[tokio::test]
async fn test_offset_commits_only_after_completion() {
    let mut controller = controller(ScriptedFetcher::default().respond(Ok(page_of(50))));
    controller.bootstrap("").await;

    let pending = controller.begin(ListEvent::next()).unwrap();

    assert_eq!(pending.query, ListQuery::new("", 50, 50));
    assert_eq!(pending.kind, RequestKind::Page(PageDirection::Next));
    assert!(controller.is_loading());
    assert_eq!(controller.offset(), 0);
    assert!(!controller.has_previous());
    assert_eq!(controller.history().current(), "offset=50&limit=50");

    let outcome = controller.complete(pending, Ok(page_of(50)));

    assert!(outcome.is_committed());
    assert_eq!(controller.offset(), 50);
    assert!(controller.has_previous());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_encode_push_fetch_order() {
    struct LoggingHistory(Arc<Mutex<Vec<String>>>);

    impl HistoryPort for LoggingHistory {
        fn push(&mut self, encoded_query: &str) {
            self.0.lock().unwrap().push(format!("push {encoded_query}"));
        }
    }

    struct LoggingFetcher(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl CollectionFetcher for LoggingFetcher {
        async fn refresh(&self, query: &ListQuery) -> Result<PageResult> {
            self.0.lock().unwrap().push(format!("fetch {query}"));
            Ok(page_of(50))
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut controller = PaginationController::new(
        LoggingFetcher(Arc::clone(&log)),
        LoggingHistory(Arc::clone(&log)),
    );

    controller.dispatch(ListEvent::search("ada")).await;

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "push q=ada&offset=0&limit=50".to_string(),
            "fetch q=ada&offset=0&limit=50".to_string(),
        ]
    );
}

// ============================================================================
// Overlapping Requests
// ============================================================================

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let mut controller = controller(ScriptedFetcher::default().respond(Ok(page_of(50))));
    controller.bootstrap("").await;

    let next = controller.begin(ListEvent::next()).unwrap();
    let search = controller.begin(ListEvent::search("ada")).unwrap();
    assert!(search.seq > next.seq);

    assert_eq!(controller.complete(search, Ok(page_of(3))), Outcome::Committed);
    assert_eq!(controller.complete(next, Ok(page_of(50))), Outcome::Stale);

    assert_eq!(controller.query(), &ListQuery::new("ada", 0, 50));
    assert_eq!(controller.items().len(), 3);
}

#[tokio::test]
async fn test_older_response_arriving_first_is_discarded() {
    let mut controller = controller(ScriptedFetcher::default().respond(Ok(page_of(50))));
    controller.bootstrap("").await;

    let first = controller.begin(ListEvent::next()).unwrap();
    let second = controller.begin(ListEvent::search("ada")).unwrap();

    assert_eq!(controller.complete(first, Err(network_error())), Outcome::Stale);
    assert!(controller.is_loading());
    assert!(controller.last_failure().is_none());

    assert!(controller.complete(second, Ok(page_of(1))).is_committed());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_cancel_discards_in_flight_response() {
    let mut controller = controller(ScriptedFetcher::default().respond(Ok(page_of(50))));
    controller.bootstrap("").await;

    let pending = controller.begin(ListEvent::next()).unwrap();
    assert!(controller.cancel());
    assert!(!controller.is_loading());
    assert!(!controller.cancel());

    assert_eq!(controller.complete(pending, Ok(page_of(50))), Outcome::Stale);
    assert_eq!(controller.offset(), 0);
}

/// Fetcher whose requests never resolve
struct StalledFetcher;

#[async_trait]
impl CollectionFetcher for StalledFetcher {
    async fn refresh(&self, _query: &ListQuery) -> Result<PageResult> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_dropped_dispatch_returns_to_idle() {
    let mut controller =
        PaginationController::new(StalledFetcher, MemoryHistory::new("/a/customers", ""));

    let elapsed = tokio::time::timeout(
        Duration::from_millis(20),
        controller.dispatch(ListEvent::next()),
    )
    .await;

    assert!(elapsed.is_err());
    assert!(!controller.is_loading());
    assert_eq!(controller.state(), &ControllerState::Idle);
    assert_eq!(controller.offset(), 0);
    assert_eq!(controller.last_seq(), 1);
    assert_eq!(controller.history().current(), "offset=50&limit=50");
}

#[tokio::test]
async fn test_dropped_bootstrap_returns_to_idle() {
    let mut controller =
        PaginationController::new(StalledFetcher, MemoryHistory::new("/a/customers", ""));

    let elapsed = tokio::time::timeout(
        Duration::from_millis(20),
        controller.bootstrap("?offset=50&limit=50"),
    )
    .await;

    assert!(elapsed.is_err());
    assert!(!controller.is_loading());
    assert!(controller.items().is_empty());
}

// ============================================================================
// History Navigation
// ============================================================================

#[tokio::test]
async fn test_restore_after_back_does_not_push() {
    let fetcher = ScriptedFetcher::default()
        .respond(Ok(page_of(50)))
        .respond(Ok(page_of(50)))
        .respond(Ok(page_of(50)));
    let mut controller = controller(fetcher);
    controller.bootstrap("?offset=0&limit=50").await;
    controller.dispatch(ListEvent::next()).await;
    assert_eq!(controller.offset(), 50);

    let previous_entry = controller.history_mut().back().unwrap().to_string();
    let outcome = assert_ok!(controller.restore(&previous_entry).await);

    assert!(outcome.is_committed());
    assert_eq!(controller.offset(), 0);
    assert_eq!(controller.history().len(), 2);
    assert!(controller.history().can_go_forward());
}

#[tokio::test]
async fn test_restore_rejects_malformed_entry() {
    let mut controller = controller(ScriptedFetcher::default());

    let result = controller.restore("offset=x").await;

    assert!(matches!(result, Err(Error::MalformedQuery { .. })));
    assert_eq!(controller.last_seq(), 0);
}

// ============================================================================
// Affordances and Types
// ============================================================================

#[test_case(0, 50, 50 => Affordances { has_previous: false, has_more: true } ; "first full page")]
#[test_case(0, 50, 12 => Affordances { has_previous: false, has_more: false } ; "first short page")]
#[test_case(50, 50, 50 => Affordances { has_previous: true, has_more: true } ; "middle page")]
#[test_case(100, 50, 0 => Affordances { has_previous: true, has_more: false } ; "past the end")]
fn test_affordances(offset: u32, limit: u32, page_len: usize) -> Affordances {
    Affordances::derive(&ListQuery::new("", offset, limit), page_len)
}

#[test]
fn test_page_direction_from_str() {
    assert_eq!("next".parse::<PageDirection>().unwrap(), PageDirection::Next);
    assert_eq!("Previous".parse::<PageDirection>().unwrap(), PageDirection::Previous);
    assert_eq!("prev".parse::<PageDirection>().unwrap(), PageDirection::Previous);
    assert!("sideways".parse::<PageDirection>().is_err());
}

#[test]
fn test_fetch_failure_display() {
    let failure = FetchFailure::from_error(ListQuery::new("", 50, 50), &network_error());
    assert_eq!(
        failure.to_string(),
        "Failed to load ?offset=50&limit=50: HTTP 503: upstream unavailable"
    );
}

#[test]
fn test_new_controller_is_idle() {
    let controller = controller(ScriptedFetcher::default());
    assert_eq!(controller.state(), &ControllerState::Idle);
    assert_eq!(controller.affordances(), Affordances::default());
    assert_eq!(controller.total_count(), 0);
}
