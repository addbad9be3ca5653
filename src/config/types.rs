use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for linkloom
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from, at depth 0
    #[serde(rename = "seed-urls")]
    pub seed_urls: Vec<String>,

    /// Maximum link distance from a seed
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of concurrent crawl workers
    #[serde(rename = "num-workers")]
    pub num_workers: u32,

    /// Maximum number of queued targets in the frontier
    #[serde(rename = "frontier-capacity")]
    pub frontier_capacity: u32,

    /// Per-request fetch timeout in milliseconds
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Pause each worker observes between cycles, in milliseconds
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
