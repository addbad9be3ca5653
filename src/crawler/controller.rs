//! Crawl controller - lifecycle driver
//!
//! The controller owns the frontier and the worker pool: it starts the
//! workers, seeds the frontier with validated seed URLs, waits for the
//! termination invariant (empty queue, zero outstanding cycles), closes the
//! frontier, and joins every worker before reading the final counters.
//! Storage is never touched after the join completes.

use crate::config::Config;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::worker::Worker;
use crate::frontier::{Frontier, OfferOutcome};
use crate::state::PageStatus;
use crate::storage::PageStore;
use crate::url::normalize_url;
use crate::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counters reported at the end of a run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Total URL records written
    pub total_urls: u64,
    /// Pages fetched and processed successfully
    pub crawled: u64,
    /// Pages whose fetch failed
    pub failed: u64,
    /// Distinct link edges recorded
    pub edges: u64,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Main crawl lifecycle driver
pub struct Controller {
    config: Arc<Config>,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    store: Arc<dyn PageStore>,
}

impl Controller {
    /// Creates a controller with explicit collaborators
    ///
    /// The frontier is owned here and handed to workers by reference
    /// counting; nothing else in the process holds crawl state.
    pub fn new(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        store: Arc<dyn PageStore>,
    ) -> Self {
        let frontier = Arc::new(Frontier::new(
            config.crawler.max_depth,
            config.crawler.frontier_capacity as usize,
        ));

        Self {
            config: Arc::new(config),
            frontier,
            fetcher,
            extractor,
            store,
        }
    }

    /// Runs the crawl to completion and returns the final counters
    pub async fn run(&self) -> Result<CrawlSummary> {
        let started = Instant::now();

        // Workers start first so seeding cannot deadlock against a small
        // frontier capacity: a blocked seed offer needs a draining worker.
        let mut handles = Vec::with_capacity(self.config.crawler.num_workers as usize);
        for id in 0..self.config.crawler.num_workers as usize {
            let worker = Worker::new(
                id,
                Arc::clone(&self.frontier),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.extractor),
                Arc::clone(&self.store),
                self.config.crawler.politeness_delay(),
            );
            handles.push(tokio::spawn(worker.run()));
        }

        let seeded = self.seed().await;
        if seeded == 0 {
            tracing::warn!("no seed URLs were admitted, nothing to crawl");
        }

        self.frontier.wait_idle().await;
        tracing::info!("frontier drained, signalling workers to stop");
        self.frontier.close();

        for handle in handles {
            handle.await?;
        }

        let summary = self.summarize(started.elapsed())?;
        tracing::info!(
            "crawl complete: {} crawled, {} failed, {} edges in {:?}",
            summary.crawled,
            summary.failed,
            summary.edges,
            summary.elapsed
        );

        Ok(summary)
    }

    /// Validates and offers each seed URL at depth 0
    ///
    /// Seeds go through the same dedup as discovered links, so a seed listed
    /// twice is admitted once.
    async fn seed(&self) -> usize {
        let mut admitted = 0;

        for raw in &self.config.crawler.seed_urls {
            let url = match normalize_url(raw, None) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("skipping invalid seed {}: {}", raw, e);
                    continue;
                }
            };

            match self.frontier.offer(url.clone(), 0).await {
                Ok(OfferOutcome::Admitted) => {
                    if let Err(e) = self.store.register_url(url.as_str(), 0) {
                        tracing::warn!("failed to register seed {}: {}", url, e);
                    }
                    admitted += 1;
                }
                Ok(outcome) => {
                    tracing::debug!("seed {} not admitted: {:?}", url, outcome);
                }
                Err(e) => {
                    tracing::warn!("could not enqueue seed {}: {}", url, e);
                }
            }
        }

        tracing::info!("seeded frontier with {} URLs", admitted);
        admitted
    }

    /// Reads the final counters from storage
    fn summarize(&self, elapsed: Duration) -> Result<CrawlSummary> {
        Ok(CrawlSummary {
            total_urls: self.store.count_urls()?,
            crawled: self.store.count_by_status(PageStatus::Crawled)?,
            failed: self.store.count_by_status(PageStatus::Failed)?,
            edges: self.store.count_edges()?,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerConfig, OutputConfig, UserAgentConfig};
    use crate::crawler::extractor::HtmlExtractor;
    use crate::crawler::fetcher::{FetchError, FetchedPage};
    use crate::storage::SqliteStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use url::Url;

    /// Canned page served by the in-memory fetcher
    enum Fixture {
        Html(String),
        Broken,
    }

    /// In-memory fetcher over a fixed link graph, counting hits per URL
    struct MemoryFetcher {
        pages: HashMap<String, Fixture>,
        hits: Mutex<HashMap<String, usize>>,
    }

    impl MemoryFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                hits: Mutex::new(HashMap::new()),
            }
        }

        /// Adds a page whose body links to the given URLs
        fn page(mut self, url: &str, links: &[&str]) -> Self {
            let anchors: String = links
                .iter()
                .map(|l| format!(r#"<a href="{}">link</a>"#, l))
                .collect();
            let body = format!("<html><body>{}</body></html>", anchors);
            self.pages.insert(url.to_string(), Fixture::Html(body));
            self
        }

        /// Adds a page whose fetch always fails
        fn broken(mut self, url: &str) -> Self {
            self.pages.insert(url.to_string(), Fixture::Broken);
            self
        }

        fn hits_for(&self, url: &str) -> usize {
            *self.hits.lock().unwrap().get(url).unwrap_or(&0)
        }
    }

    #[async_trait]
    impl Fetcher for MemoryFetcher {
        async fn fetch(&self, url: &Url) -> std::result::Result<FetchedPage, FetchError> {
            *self
                .hits
                .lock()
                .unwrap()
                .entry(url.as_str().to_string())
                .or_insert(0) += 1;

            match self.pages.get(url.as_str()) {
                Some(Fixture::Html(body)) => Ok(FetchedPage {
                    status_code: 200,
                    body: body.clone(),
                }),
                Some(Fixture::Broken) => Err(FetchError::Network("connection refused".into())),
                None => Err(FetchError::BadStatus(404)),
            }
        }
    }

    fn test_config(seeds: &[&str], max_depth: u32, num_workers: u32) -> Config {
        Config {
            crawler: CrawlerConfig {
                seed_urls: seeds.iter().map(|s| s.to_string()).collect(),
                max_depth,
                num_workers,
                frontier_capacity: 64,
                fetch_timeout_ms: 1000,
                politeness_delay_ms: 0,
            },
            user_agent: UserAgentConfig {
                crawler_name: "TestCrawler".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig {
                database_path: ":memory:".to_string(),
            },
        }
    }

    async fn run_crawl(
        config: Config,
        fetcher: Arc<MemoryFetcher>,
    ) -> (CrawlSummary, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let controller = Controller::new(
            config,
            fetcher,
            Arc::new(HtmlExtractor),
            Arc::clone(&store) as Arc<dyn PageStore>,
        );
        let summary = controller.run().await.unwrap();
        (summary, store)
    }

    #[tokio::test]
    async fn test_depth_bounded_crawl_with_backlink_and_failure() {
        // a links to b and c; b links back to a and on to d; c is broken.
        // With max_depth 1, d (depth 2) is never fetched but its edge exists.
        let fetcher = Arc::new(
            MemoryFetcher::new()
                .page("https://a.test/", &["https://b.test/", "https://c.test/"])
                .page("https://b.test/", &["https://a.test/", "https://d.test/"])
                .broken("https://c.test/"),
        );

        let (summary, store) =
            run_crawl(test_config(&["https://a.test/"], 1, 3), Arc::clone(&fetcher)).await;

        assert_eq!(
            store.url_status("https://a.test/").unwrap(),
            Some(PageStatus::Crawled)
        );
        assert_eq!(
            store.url_status("https://b.test/").unwrap(),
            Some(PageStatus::Crawled)
        );
        assert_eq!(
            store.url_status("https://c.test/").unwrap(),
            Some(PageStatus::Failed)
        );

        // d was never admitted, but the edge pointing at it was recorded
        assert_eq!(fetcher.hits_for("https://d.test/"), 0);
        assert!(store
            .has_edge("https://b.test/", "https://d.test/")
            .unwrap());

        // b links back to a; a is fetched exactly once regardless
        assert_eq!(fetcher.hits_for("https://a.test/"), 1);
        assert_eq!(fetcher.hits_for("https://b.test/"), 1);

        assert_eq!(summary.crawled, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.edges, 4);
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates() {
        let fetcher = Arc::new(
            MemoryFetcher::new()
                .page("https://a.test/", &["https://b.test/"])
                .page("https://b.test/", &["https://a.test/"]),
        );

        let run = run_crawl(test_config(&["https://a.test/"], 5, 2), Arc::clone(&fetcher));
        let (summary, _store) = tokio::time::timeout(Duration::from_secs(10), run)
            .await
            .expect("cyclic graph must not hang the crawl");

        assert_eq!(summary.crawled, 2);
        assert_eq!(fetcher.hits_for("https://a.test/"), 1);
        assert_eq!(fetcher.hits_for("https://b.test/"), 1);
    }

    #[tokio::test]
    async fn test_worker_count_does_not_change_results() {
        fn graph() -> MemoryFetcher {
            MemoryFetcher::new()
                .page(
                    "https://a.test/",
                    &["https://b.test/", "https://c.test/", "https://d.test/"],
                )
                .page("https://b.test/", &["https://e.test/", "https://a.test/"])
                .page("https://c.test/", &["https://e.test/"])
                .page("https://d.test/", &[])
                .page("https://e.test/", &["https://f.test/"])
                .page("https://f.test/", &[])
        }

        let (summary_one, store_one) = run_crawl(
            test_config(&["https://a.test/"], 3, 1),
            Arc::new(graph()),
        )
        .await;
        let (summary_many, store_many) = run_crawl(
            test_config(&["https://a.test/"], 3, 8),
            Arc::new(graph()),
        )
        .await;

        assert_eq!(summary_one.total_urls, summary_many.total_urls);
        assert_eq!(summary_one.crawled, summary_many.crawled);
        assert_eq!(summary_one.failed, summary_many.failed);
        assert_eq!(summary_one.edges, summary_many.edges);

        for url in [
            "https://a.test/",
            "https://b.test/",
            "https://c.test/",
            "https://d.test/",
            "https://e.test/",
            "https://f.test/",
        ] {
            assert_eq!(
                store_one.url_status(url).unwrap(),
                store_many.url_status(url).unwrap(),
                "status diverged for {}",
                url
            );
        }
    }

    #[tokio::test]
    async fn test_duplicate_seeds_admitted_once() {
        let fetcher = Arc::new(MemoryFetcher::new().page("https://a.test/", &[]));

        let (summary, _store) = run_crawl(
            test_config(&["https://a.test/", "https://a.test/"], 1, 2),
            Arc::clone(&fetcher),
        )
        .await;

        assert_eq!(fetcher.hits_for("https://a.test/"), 1);
        assert_eq!(summary.total_urls, 1);
    }

    #[tokio::test]
    async fn test_invalid_seed_skipped_and_crawl_still_terminates() {
        let fetcher = Arc::new(MemoryFetcher::new().page("https://a.test/", &[]));

        let (summary, _store) = run_crawl(
            test_config(&["ftp://bad.test/", "https://a.test/"], 1, 2),
            Arc::clone(&fetcher),
        )
        .await;

        assert_eq!(summary.crawled, 1);
        assert_eq!(summary.total_urls, 1);
    }

    #[tokio::test]
    async fn test_no_admitted_seeds_completes_immediately() {
        let fetcher = Arc::new(MemoryFetcher::new());

        let run = run_crawl(test_config(&["ftp://bad.test/"], 1, 2), fetcher);
        let (summary, _store) = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("a crawl with no work must still terminate");

        assert_eq!(summary.total_urls, 0);
        assert_eq!(summary.edges, 0);
    }

    #[tokio::test]
    async fn test_depth_zero_crawls_only_seeds() {
        let fetcher = Arc::new(
            MemoryFetcher::new()
                .page("https://a.test/", &["https://b.test/"])
                .page("https://b.test/", &[]),
        );

        let (summary, store) =
            run_crawl(test_config(&["https://a.test/"], 0, 2), Arc::clone(&fetcher)).await;

        assert_eq!(summary.crawled, 1);
        assert_eq!(fetcher.hits_for("https://b.test/"), 0);
        // The outbound edge is still part of the recorded graph
        assert!(store
            .has_edge("https://a.test/", "https://b.test/")
            .unwrap());
    }

    #[tokio::test]
    async fn test_normalized_variants_fetch_once() {
        // Both spellings collapse to https://a.test/page
        let fetcher = Arc::new(
            MemoryFetcher::new()
                .page(
                    "https://a.test/",
                    &["https://A.TEST/page/", "https://a.test/page#frag"],
                )
                .page("https://a.test/page", &[]),
        );

        let (summary, _store) =
            run_crawl(test_config(&["https://a.test/"], 2, 2), Arc::clone(&fetcher)).await;

        assert_eq!(fetcher.hits_for("https://a.test/page"), 1);
        assert_eq!(summary.crawled, 2);
        // One edge: both anchors point at the same normalized target
        assert_eq!(summary.edges, 1);
    }
}
