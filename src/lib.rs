//! Linkloom: a bounded-concurrency web crawler
//!
//! Given a set of seed URLs, linkloom explores the link graph up to a fixed
//! depth, fetching each page exactly once, persisting page content and link
//! edges, and terminating deterministically once the reachable graph is
//! exhausted.
//!
//! The orchestration core lives in [`frontier`] (deduplicating work queue)
//! and [`crawler`] (worker pool and controller). Fetching, link extraction,
//! and storage sit behind traits so the core can be exercised without the
//! network or a real database.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for linkloom operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for linkloom operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use frontier::{CrawlTarget, Frontier, OfferOutcome};
pub use state::PageStatus;
pub use url::normalize_url;
