//! History synchronizer module
//!
//! Keeps the address bar a canonical, shareable representation of the list
//! state by pushing every encoded query as a new history entry.

mod memory;
mod types;

pub use memory::MemoryHistory;
pub use types::HistoryPort;
