//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::pagination::PageDirection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Customer list for the administrative console
#[derive(Parser, Debug)]
#[command(name = "customer-console")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Console configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Admin API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and print one page of the list
    List {
        /// List address or query string, e.g. "?q=ada&offset=50&limit=50"
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Browse the list interactively (commands read from stdin)
    Browse {
        /// Starting address or query string
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Resolve a path against the list/detail routes
    Route {
        /// Path such as /a/customers/cus_01
        path: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one view per line)
    Json,
    /// Human-readable table
    Pretty,
}

/// A line typed into the browse session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Submit a search (an empty text clears the filter)
    Search(String),
    /// Change page
    Page(PageDirection),
    /// Go back one history entry
    Back,
    /// Go forward one history entry
    Forward,
    /// Open a record by row number or identifier
    Open(String),
    /// Show the current address
    Url,
    /// Redraw the current page
    Show,
    /// List commands
    Help,
    /// Leave the session
    Quit,
}

impl BrowseCommand {
    /// Parse one input line; `None` for blank lines
    ///
    /// Enter on a line starting with `/` submits the rest as a search, the
    /// same as `search <text>`.
    pub fn parse(line: &str) -> Option<Result<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(text) = line.strip_prefix('/') {
            return Some(Ok(Self::Search(text.trim().to_string())));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Ok(Self::Search(rest.to_string())),
            "next" | "n" => Ok(Self::Page(PageDirection::Next)),
            "previous" | "prev" | "p" => Ok(Self::Page(PageDirection::Previous)),
            "back" | "b" => Ok(Self::Back),
            "forward" | "f" => Ok(Self::Forward),
            "open" | "o" if !rest.is_empty() => Ok(Self::Open(rest.to_string())),
            "open" | "o" => Err(Error::Other("usage: open <row|id>".to_string())),
            "url" => Ok(Self::Url),
            "show" | "ls" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(Error::Other(format!(
                "unknown command '{other}' (type 'help')"
            ))),
        };
        Some(command)
    }
}

/// Help text of the browse session
pub const BROWSE_HELP: &str = "\
Commands:
  search <text>   filter the list (also: /<text>); empty text clears
  next | prev     change page
  back | forward  walk the navigation history
  open <row|id>   show the detail address of a record
  url             print the current address
  show            redraw the page
  quit            leave";
