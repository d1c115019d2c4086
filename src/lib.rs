// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Customer Console
//!
//! Paginated, searchable customer list for an administrative console.
//!
//! The list state lives in the URL: the query string carries the free-text
//! filter (`q`), the page offset and the page size. Every search or page
//! change pushes a new history entry before fetching, so the address is
//! always shareable and back/forward walk prior states.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use customer_console::fetch::HttpCollectionFetcher;
//! use customer_console::history::MemoryHistory;
//! use customer_console::http::{HttpClient, HttpClientConfig};
//! use customer_console::pagination::{ListEvent, PaginationController};
//!
//! #[tokio::main]
//! async fn main() -> customer_console::Result<()> {
//!     let config = HttpClientConfig::builder()
//!         .base_url("https://admin.example.com/admin")
//!         .build();
//!     let fetcher = HttpCollectionFetcher::customers(HttpClient::with_config(config)?);
//!     let history = MemoryHistory::from_location("/a/customers?offset=50&limit=50");
//!
//!     let mut list = PaginationController::new(fetcher, history);
//!     list.bootstrap("?offset=50&limit=50").await;
//!     list.dispatch(ListEvent::next()).await;
//!
//!     assert_eq!(list.offset(), 100);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   URL ──▶ query::decode ──▶ PaginationController ◀── ListEvent (search / next / prev)
//!                                 │
//!            ┌────────────────────┼─────────────────────┐
//!            ▼                    ▼                     ▼
//!      query::encode ──▶ HistoryPort::push ──▶ CollectionFetcher::refresh
//!                                                       │
//!                                  commit (latest request only) ◀┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types
pub mod types;

/// Query string codec
pub mod query;

/// Navigation history port
pub mod history;

/// HTTP client with retry and rate limiting
pub mod http;

/// Collection fetching
pub mod fetch;

/// List/pagination state machine
pub mod pagination;

/// List/detail routing
pub mod router;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::ConsoleConfig;
pub use pagination::{ListEvent, Outcome, PageDirection, PaginationController};
pub use query::ListQuery;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
