//! HTTP fetcher collaborator
//!
//! The crawl core reaches the network only through the [`Fetcher`] trait, so
//! the orchestration logic can be exercised against in-memory fakes. The
//! production implementation wraps a shared reqwest client with per-request
//! timeouts.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final HTTP status code (2xx)
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Errors that terminate a fetch
///
/// Every variant maps to a terminal `failed` page record; fetches are never
/// retried within a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    BadStatus(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// Collaborator that retrieves page content for a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the page at `url`, bounded by the client's request timeout
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with the crawler's user agent and timeouts
///
/// The user agent follows the `Name/Version (+ContactURL; ContactEmail)`
/// convention so site operators can identify and reach us.
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_error)?;

        Ok(FetchedPage {
            status_code: status.as_u16(),
            body,
        })
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}
