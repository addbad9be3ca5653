//! SQLite-backed page store

use crate::state::PageStatus;
use crate::storage::{PageStore, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite schema: one row per URL, one row per distinct edge
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    content TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    depth INTEGER NOT NULL DEFAULT 0,
    crawled_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_url TEXT NOT NULL,
    target_url TEXT NOT NULL,
    crawled_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (source_url, target_url)
);

CREATE INDEX IF NOT EXISTS idx_urls_status ON urls (status);
CREATE INDEX IF NOT EXISTS idx_links_source ON links (source_url);
";

/// SQLite implementation of [`PageStore`]
///
/// A single connection is shared behind a mutex. SQLite serializes writers
/// anyway, and the mutex keeps the handle free of any thread affinity.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path and ensures the
    /// schema exists
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database, mainly for tests
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl PageStore for SqliteStore {
    fn register_url(&self, url: &str, depth: u32) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO urls (url, status, depth) VALUES (?1, ?2, ?3)",
            params![url, PageStatus::Pending.as_str(), depth],
        )?;
        Ok(())
    }

    fn upsert_url(
        &self,
        url: &str,
        content: Option<&str>,
        status: PageStatus,
        depth: u32,
    ) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO urls (url, content, status, depth) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (url) DO UPDATE SET
                content = excluded.content,
                status = excluded.status,
                depth = excluded.depth,
                crawled_at = CURRENT_TIMESTAMP",
            params![url, content, status.as_str(), depth],
        )?;
        Ok(())
    }

    fn insert_edge(&self, source: &str, target: &str) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO links (source_url, target_url) VALUES (?1, ?2)",
            params![source, target],
        )?;
        Ok(())
    }

    fn url_status(&self, url: &str) -> StorageResult<Option<PageStatus>> {
        let conn = self.conn.lock().unwrap();
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM urls WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status.as_deref().and_then(PageStatus::from_str))
    }

    fn has_edge(&self, source: &str, target: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM links WHERE source_url = ?1 AND target_url = ?2",
            params![source, target],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn count_by_status(&self, status: PageStatus) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_urls(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_edges(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
