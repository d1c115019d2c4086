//! CLI runner - executes commands

use super::commands::{BrowseCommand, Cli, Commands, OutputFormat};
use super::render::{render_json, render_pretty, ListView};
use super::session::{BrowseSession, Reply};
use crate::config::ConsoleConfig;
use crate::error::{Error, Result};
use crate::fetch::HttpCollectionFetcher;
use crate::history::MemoryHistory;
use crate::http::HttpClient;
use crate::pagination::{Bootstrap, Outcome, PaginationController};
use crate::query::query_part;
use crate::router::{ListDetailRouter, Route};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List { url } => self.list(url).await,
            Commands::Browse { url } => self.browse(url).await,
            Commands::Route { path } => self.route(path),
        }
    }

    /// Load configuration, applying command-line overrides
    fn load_config(&self) -> Result<ConsoleConfig> {
        let mut config = match (&self.cli.config, &self.cli.base_url) {
            (Some(path), _) => ConsoleConfig::from_file(path)?,
            (None, Some(base_url)) => ConsoleConfig::new(base_url),
            (None, None) => {
                return Err(Error::config(
                    "No admin API configured (use --config or --base-url)",
                ))
            }
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Router for the configured mount point
    ///
    /// The default mount is used only when no configuration was given.
    fn router(&self) -> Result<ListDetailRouter> {
        if self.cli.config.is_none() && self.cli.base_url.is_none() {
            return Ok(ListDetailRouter::default());
        }
        let config = self.load_config()?;
        Ok(ListDetailRouter::new(config.detail_mount))
    }

    /// Build a session starting at `url` (an address or a bare query string)
    fn session(&self, url: &str) -> Result<BrowseSession<HttpCollectionFetcher>> {
        let config = self.load_config()?;
        info!(
            "Listing {} from {}",
            config.resource, config.base_url
        );

        let client = HttpClient::with_config(config.http_client_config())?;
        let fetcher = HttpCollectionFetcher::new(client, &config.resource)
            .with_items_key(config.items_key())
            .with_count_key(&config.count_key);

        let router = ListDetailRouter::new(&config.detail_mount);
        let raw_query = if url.contains('?') { query_part(url) } else { url };
        let history = MemoryHistory::new(router.mount(), raw_query);

        let controller =
            PaginationController::with_defaults(fetcher, history, config.default_query());
        Ok(BrowseSession::new(controller, router))
    }

    /// Print one page
    async fn list(&self, url: &str) -> Result<()> {
        let mut session = self.session(url)?;
        let bootstrap = session.start().await;
        self.report_malformed(&bootstrap);

        if let Outcome::FetchFailed(failure) = bootstrap.outcome {
            return Err(Error::Other(failure.to_string()));
        }

        self.print_view(&session.view())
    }

    /// Interactive session on stdin
    async fn browse(&self, url: &str) -> Result<()> {
        let mut session = self.session(url)?;
        let bootstrap = session.start().await;
        self.report_malformed(&bootstrap);
        self.print_view(&session.view())?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let command = match BrowseCommand::parse(&line) {
                None => continue,
                Some(Ok(command)) => command,
                Some(Err(e)) => {
                    eprintln!("{e}");
                    continue;
                }
            };

            match session.execute(command).await {
                Ok(Reply::View(_) | Reply::Redraw) => self.print_view(&session.view())?,
                Ok(Reply::Message(message)) => println!("{message}"),
                Ok(Reply::Quit) => break,
                Err(e) => eprintln!("{e}"),
            }
        }

        Ok(())
    }

    /// Resolve a path and print the route
    fn route(&self, path: &str) -> Result<()> {
        let route = self.router()?.resolve(path)?;
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&route)?),
            OutputFormat::Pretty => match route {
                Route::List => println!("list"),
                Route::Detail { id } => println!("detail {id}"),
            },
        }
        Ok(())
    }

    fn report_malformed(&self, bootstrap: &Bootstrap) {
        if let Some(e) = &bootstrap.malformed {
            warn!("Using default list query: {}", e);
            eprintln!("warning: {e}; showing the first page instead");
        }
    }

    fn print_view(&self, view: &ListView) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", render_json(view)?),
            OutputFormat::Pretty => println!("{}\n", render_pretty(view)),
        }
        Ok(())
    }
}
