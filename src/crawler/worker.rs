//! Crawl worker
//!
//! Each worker drains the frontier in a loop: take a target, fetch it,
//! persist the page record, extract and offer child links, mark the cycle
//! done, then observe the politeness delay. Workers never talk to each
//! other; the frontier is the only coordination point.

use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::frontier::{CrawlTarget, Frontier, FrontierError, OfferOutcome};
use crate::state::PageStatus;
use crate::storage::PageStore;
use crate::url::normalize_url;
use std::sync::Arc;
use std::time::Duration;

/// A single crawl worker
pub struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    store: Arc<dyn PageStore>,
    politeness_delay: Duration,
}

/// Calls `mark_done` on the frontier when dropped
///
/// Holding the guard for the whole cycle guarantees exactly one `mark_done`
/// per taken target, on every exit path including a panic mid-cycle.
struct CycleGuard<'a> {
    frontier: &'a Frontier,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.frontier.mark_done();
    }
}

impl Worker {
    pub fn new(
        id: usize,
        frontier: Arc<Frontier>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        store: Arc<dyn PageStore>,
        politeness_delay: Duration,
    ) -> Self {
        Self {
            id,
            frontier,
            fetcher,
            extractor,
            store,
            politeness_delay,
        }
    }

    /// Runs the worker loop until the frontier closes
    pub async fn run(self) {
        tracing::debug!("worker {} started", self.id);

        loop {
            let Some(target) = self.frontier.take().await else {
                break;
            };

            {
                let _guard = CycleGuard {
                    frontier: &self.frontier,
                };
                self.crawl_one(&target).await;
            }

            if !self.politeness_delay.is_zero() {
                tokio::time::sleep(self.politeness_delay).await;
            }
        }

        tracing::debug!("worker {} stopped", self.id);
    }

    /// Executes one fetch-extract-enqueue cycle
    ///
    /// Persistence failures are logged and never abort the cycle: a lost
    /// write must not disturb the dedup or termination bookkeeping.
    async fn crawl_one(&self, target: &CrawlTarget) {
        let url_str = target.url.as_str();
        tracing::info!("crawling {} (depth {})", url_str, target.depth);

        if let Err(e) = self
            .store
            .upsert_url(url_str, None, PageStatus::InProgress, target.depth)
        {
            tracing::warn!("failed to record in-progress state for {}: {}", url_str, e);
        }

        match self.fetcher.fetch(&target.url).await {
            Ok(page) => {
                tracing::debug!("fetched {} (HTTP {})", url_str, page.status_code);

                if let Err(e) = self.store.upsert_url(
                    url_str,
                    Some(&page.body),
                    PageStatus::Crawled,
                    target.depth,
                ) {
                    tracing::warn!("failed to persist page {}: {}", url_str, e);
                }

                let links = self.extractor.extract_links(&page.body, &target.url);
                self.offer_children(target, &links).await;
            }
            Err(e) => {
                tracing::warn!("fetch failed for {}: {}", url_str, e);

                if let Err(e) =
                    self.store
                        .upsert_url(url_str, None, PageStatus::Failed, target.depth)
                {
                    tracing::warn!("failed to persist failure for {}: {}", url_str, e);
                }
            }
        }
    }

    /// Normalizes, records, and offers each candidate child link
    ///
    /// The edge is persisted for every valid child, even when the child
    /// itself is rejected for depth or dedup reasons: the link exists in the
    /// graph whether or not we crawl its far end.
    async fn offer_children(&self, parent: &CrawlTarget, links: &[String]) {
        let child_depth = parent.depth + 1;

        for raw in links {
            let child = match normalize_url(raw, Some(&parent.url)) {
                Ok(url) => url,
                Err(e) => {
                    // Invalid candidates are discarded, not treated as errors
                    tracing::debug!("discarding link {}: {}", raw, e);
                    continue;
                }
            };

            if let Err(e) = self.store.insert_edge(parent.url.as_str(), child.as_str()) {
                tracing::warn!("failed to persist edge {} -> {}: {}", parent.url, child, e);
            }

            match self.frontier.offer(child.clone(), child_depth).await {
                Ok(OfferOutcome::Admitted) => {
                    if let Err(e) = self.store.register_url(child.as_str(), child_depth) {
                        tracing::warn!("failed to register {}: {}", child, e);
                    }
                }
                Ok(OfferOutcome::AlreadyVisited | OfferOutcome::DepthExceeded) => {}
                Err(FrontierError::Full(waited)) => {
                    tracing::warn!(
                        "frontier full, giving up on {} after waiting {:?}",
                        child,
                        waited
                    );
                }
            }
        }
    }
}
