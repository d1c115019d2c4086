//! Interactive browse session
//!
//! Drives a [`PaginationController`] from typed commands. Back/forward walk
//! the in-memory history and reload the entry they land on.

use super::commands::{BrowseCommand, BROWSE_HELP};
use super::render::ListView;
use crate::error::{Error, Result};
use crate::fetch::CollectionFetcher;
use crate::history::MemoryHistory;
use crate::pagination::{Bootstrap, ListEvent, Outcome, PaginationController};
use crate::router::ListDetailRouter;

/// What the session wants shown after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The list changed (or failed to); redraw it
    View(Outcome),
    /// Redraw without a transition
    Redraw,
    /// Print a line
    Message(String),
    /// End the session
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum Travel {
    Back,
    Forward,
}

/// Browse session over an HTTP or scripted fetcher
#[derive(Debug)]
pub struct BrowseSession<F> {
    controller: PaginationController<F, MemoryHistory>,
    router: ListDetailRouter,
}

impl<F: CollectionFetcher> BrowseSession<F> {
    /// Create a session
    pub fn new(controller: PaginationController<F, MemoryHistory>, router: ListDetailRouter) -> Self {
        Self { controller, router }
    }

    /// Load the starting page from the history's current entry
    pub async fn start(&mut self) -> Bootstrap {
        let initial = self.controller.history().current().to_string();
        self.controller.bootstrap(&initial).await
    }

    /// The underlying controller
    pub fn controller(&self) -> &PaginationController<F, MemoryHistory> {
        &self.controller
    }

    /// Snapshot for rendering
    pub fn view(&self) -> ListView {
        ListView::of(&self.controller)
    }

    /// Run one command
    pub async fn execute(&mut self, command: BrowseCommand) -> Result<Reply> {
        let reply = match command {
            BrowseCommand::Search(text) => Reply::View(
                self.controller
                    .dispatch(ListEvent::SearchSubmitted(text))
                    .await,
            ),
            BrowseCommand::Page(direction) => Reply::View(
                self.controller
                    .dispatch(ListEvent::PageRequested(direction))
                    .await,
            ),
            BrowseCommand::Back => self.travel(Travel::Back).await?,
            BrowseCommand::Forward => self.travel(Travel::Forward).await?,
            BrowseCommand::Open(target) => {
                let id = self.record_id(&target)?;
                Reply::Message(format!("Detail: {}", self.router.detail_href(&id)))
            }
            BrowseCommand::Url => Reply::Message(self.controller.history().location()),
            BrowseCommand::Show => Reply::Redraw,
            BrowseCommand::Help => Reply::Message(BROWSE_HELP.to_string()),
            BrowseCommand::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Move through the history and load the entry landed on
    ///
    /// The cursor is moved back if that entry does not commit, so it keeps
    /// pointing at what the list shows.
    async fn travel(&mut self, travel: Travel) -> Result<Reply> {
        let history = self.controller.history_mut();
        let landed = match travel {
            Travel::Back => history.back(),
            Travel::Forward => history.forward(),
        }
        .map(str::to_string);

        let Some(entry) = landed else {
            let edge = match travel {
                Travel::Back => "oldest",
                Travel::Forward => "newest",
            };
            return Ok(Reply::Message(format!("Already at the {edge} entry")));
        };

        let restored = self.controller.restore(&entry).await;
        if !matches!(restored, Ok(Outcome::Committed)) {
            let history = self.controller.history_mut();
            match travel {
                Travel::Back => history.forward(),
                Travel::Forward => history.back(),
            };
        }
        restored.map(Reply::View)
    }

    /// A 1-based row number on the current page, or a literal identifier
    fn record_id(&self, target: &str) -> Result<String> {
        let items = self.controller.items();
        match target.parse::<usize>() {
            Ok(row) if (1..=items.len()).contains(&row) => Ok(items[row - 1].id.clone()),
            Ok(row) if items.iter().all(|c| c.id != target) => Err(Error::Other(format!(
                "No row {row} on this page ({} rows)",
                items.len()
            ))),
            _ => Ok(target.to_string()),
        }
    }
}
