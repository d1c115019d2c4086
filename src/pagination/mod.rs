//! Pagination module
//!
//! The list query/pagination state machine.
//!
//! # Overview
//!
//! ```text
//! Idle ── SearchSubmitted(text) ──▶ Fetching {q: text, offset: 0}  ──ok──▶ Idle (committed)
//! Idle ── PageRequested(next)   ──▶ Fetching {offset + limit}      ──ok──▶ Idle (committed)
//! Idle ── PageRequested(prev)   ──▶ Fetching {offset - limit}      ──ok──▶ Idle (committed)
//!                                                  └──err──▶ Idle (unchanged, FetchFailed)
//! ```

mod controller;
mod types;

pub use controller::PaginationController;
pub use types::{
    Affordances, Bootstrap, ControllerState, FetchFailure, ListEvent, Outcome, PageDirection,
    PendingRequest, RequestKind,
};

#[cfg(test)]
mod tests;
