//! History port trait
//!
//! The navigation history is the one piece of ambient mutable state the list
//! touches. It is injected so the controller never reaches for a global.

/// Navigation history the list writes its query into
pub trait HistoryPort: Send {
    /// Replace the query portion of the current address with
    /// `encoded_query` (no leading `?`) as a new history entry.
    ///
    /// Never reloads the document and never replaces the current entry.
    fn push(&mut self, encoded_query: &str);
}

impl<H: HistoryPort + ?Sized> HistoryPort for &mut H {
    fn push(&mut self, encoded_query: &str) {
        (**self).push(encoded_query);
    }
}

impl<H: HistoryPort + ?Sized> HistoryPort for Box<H> {
    fn push(&mut self, encoded_query: &str) {
        (**self).push(encoded_query);
    }
}
