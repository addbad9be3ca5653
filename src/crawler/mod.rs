//! Crawl orchestration
//!
//! This module contains the crawl core:
//! - The worker loop that drains the frontier
//! - The controller that seeds, supervises, and shuts down the pool
//! - The fetcher and extractor collaborator traits with their production
//!   implementations

mod controller;
mod extractor;
mod fetcher;
mod worker;

pub use controller::{Controller, CrawlSummary};
pub use extractor::{Extractor, HtmlExtractor};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use worker::Worker;

use crate::config::Config;
use crate::storage::{PageStore, SqliteStore};
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete crawl with the production collaborators
///
/// Wires the SQLite store, the HTTP fetcher, and the HTML extractor to a
/// [`Controller`] and runs it to completion.
///
/// # Example
///
/// ```no_run
/// use linkloom::config::load_config;
/// use linkloom::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> linkloom::Result<()> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = crawl(config).await?;
/// println!("crawled {} pages", summary.crawled);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlSummary> {
    let store: Arc<dyn PageStore> =
        Arc::new(SqliteStore::open(Path::new(&config.output.database_path))?);
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(
        &config.user_agent,
        config.crawler.fetch_timeout(),
    )?);
    let extractor: Arc<dyn Extractor> = Arc::new(HtmlExtractor);

    let controller = Controller::new(config, fetcher, extractor, store);
    controller.run().await
}
