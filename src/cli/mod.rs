//! CLI module
//!
//! Command-line front end of the customer list.
//!
//! # Commands
//!
//! - `list` - Load and print one page
//! - `browse` - Interactive search/pagination session
//! - `route` - Resolve a list/detail path

mod commands;
mod render;
mod runner;
mod session;

pub use commands::{BrowseCommand, Cli, Commands, OutputFormat, BROWSE_HELP};
pub use render::{render_json, render_pretty, ListView};
pub use runner::Runner;
pub use session::{BrowseSession, Reply};
