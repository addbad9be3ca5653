//! Persistence gateway
//!
//! Crawled pages and link edges are written through the [`PageStore`] trait.
//! The crawl core only ever writes during a run; reads exist for the stats
//! surface and for tests. Every write is an idempotent upsert keyed on the
//! URL or the edge pair, so concurrent workers can call the store without
//! further coordination.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::state::PageStatus;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence backends
///
/// Implementations must be safe to call concurrently from any worker. A
/// failed write is reported to the caller, who logs it and carries on; it
/// must never corrupt the in-memory dedup or termination state.
pub trait PageStore: Send + Sync {
    /// Creates a pending record for a URL if none exists yet
    ///
    /// Never downgrades an existing record: the child a parent registers may
    /// already have been taken and crawled by another worker.
    fn register_url(&self, url: &str, depth: u32) -> StorageResult<()>;

    /// Inserts or replaces the record for a URL
    fn upsert_url(
        &self,
        url: &str,
        content: Option<&str>,
        status: PageStatus,
        depth: u32,
    ) -> StorageResult<()>;

    /// Records a discovered link edge; duplicate pairs are ignored
    fn insert_edge(&self, source: &str, target: &str) -> StorageResult<()>;

    /// Returns the stored status of a URL, if a record exists
    fn url_status(&self, url: &str) -> StorageResult<Option<PageStatus>>;

    /// Returns true if the given edge has been recorded
    fn has_edge(&self, source: &str, target: &str) -> StorageResult<bool>;

    /// Counts URL records with the given status
    fn count_by_status(&self, status: PageStatus) -> StorageResult<u64>;

    /// Counts all URL records
    fn count_urls(&self) -> StorageResult<u64>;

    /// Counts all recorded edges
    fn count_edges(&self) -> StorageResult<u64>;
}
