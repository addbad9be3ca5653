//! Page status lifecycle
//!
//! A URL's persisted record moves through a small state machine over a run:
//! `Pending -> InProgress -> {Crawled | Failed}`. The terminal states are
//! never left within a single run, because a URL is admitted to the frontier
//! at most once.

/// Crawl status of a URL record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStatus {
    /// Admitted to the frontier but not yet taken by a worker
    Pending,
    /// A worker is mid-cycle on this URL
    InProgress,
    /// Fetched successfully, links extracted
    Crawled,
    /// Fetch failed (timeout, network error, or bad status)
    Failed,
}

impl PageStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [PageStatus; 4] = [
        PageStatus::Pending,
        PageStatus::InProgress,
        PageStatus::Crawled,
        PageStatus::Failed,
    ];

    /// String form used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Pending => "pending",
            PageStatus::InProgress => "in_progress",
            PageStatus::Crawled => "crawled",
            PageStatus::Failed => "failed",
        }
    }

    /// Parses the database string form
    pub fn from_str(s: &str) -> Option<PageStatus> {
        match s {
            "pending" => Some(PageStatus::Pending),
            "in_progress" => Some(PageStatus::InProgress),
            "crawled" => Some(PageStatus::Crawled),
            "failed" => Some(PageStatus::Failed),
            _ => None,
        }
    }

    /// Returns true if this status never changes again within a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, PageStatus::Crawled | PageStatus::Failed)
    }

    /// Checks whether the lifecycle allows moving to `next`
    pub fn can_transition(&self, next: PageStatus) -> bool {
        matches!(
            (self, next),
            (PageStatus::Pending, PageStatus::InProgress)
                | (PageStatus::InProgress, PageStatus::Crawled)
                | (PageStatus::InProgress, PageStatus::Failed)
        )
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
