//! Concurrent crawl frontier
//!
//! The frontier is the single source of truth for what work remains and what
//! has ever been admitted. It couples a bounded queue of (URL, depth) targets
//! with the visited set and an outstanding-work counter, so that admission
//! (dedup check, enqueue, counter increment) is one atomic step under a
//! single lock.
//!
//! Termination protocol: every admitted target is eventually taken by a
//! worker, which must call [`Frontier::mark_done`] exactly once when its
//! cycle finishes. The crawl is complete when the queue is empty and the
//! outstanding counter is zero. Queue emptiness alone is not enough: a worker
//! still mid-cycle may enqueue more targets.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use url::Url;

/// How long an offer waits on a full queue before giving up
pub const DEFAULT_OFFER_TIMEOUT: Duration = Duration::from_secs(30);

/// A unit of crawl work: a normalized URL and its link distance from a seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub depth: u32,
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    /// The URL was admitted and will be crawled
    Admitted,
    /// The URL has already been admitted at some point during this run
    AlreadyVisited,
    /// The URL is deeper than the configured maximum
    DepthExceeded,
}

/// Errors surfaced by frontier operations
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("frontier at capacity, offer timed out after {0:?}")]
    Full(Duration),
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlTarget>,
    visited: HashSet<String>,
    /// Targets admitted but not yet marked done
    outstanding: usize,
    /// Set by close(); take() returns None from then on
    closed: bool,
}

/// Bounded, deduplicating work queue shared by all workers
///
/// All mutation of the visited set and the outstanding counter happens
/// through [`offer`](Frontier::offer) and [`mark_done`](Frontier::mark_done);
/// no other component touches them.
pub struct Frontier {
    state: Mutex<FrontierState>,
    /// Wakes workers blocked in take()
    work_available: Notify,
    /// Wakes offerers blocked on a full queue
    space_available: Notify,
    /// Wakes the controller once the termination invariant holds
    idle: Notify,
    max_depth: u32,
    capacity: usize,
    offer_timeout: Duration,
}

impl Frontier {
    /// Creates a frontier with the default offer timeout
    pub fn new(max_depth: u32, capacity: usize) -> Self {
        Self::with_offer_timeout(max_depth, capacity, DEFAULT_OFFER_TIMEOUT)
    }

    /// Creates a frontier with an explicit offer timeout
    pub fn with_offer_timeout(max_depth: u32, capacity: usize, offer_timeout: Duration) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            work_available: Notify::new(),
            space_available: Notify::new(),
            idle: Notify::new(),
            max_depth,
            capacity: capacity.max(1),
            offer_timeout,
        }
    }

    /// Offers a URL at the given depth
    ///
    /// Rejects targets past the depth limit or already admitted during this
    /// run. While the queue is at capacity the call blocks, up to the offer
    /// timeout, rather than silently dropping the target; an elapsed timeout
    /// surfaces as [`FrontierError::Full`] and the caller logs it without
    /// retrying.
    ///
    /// Admission inserts into the visited set, enqueues the target, and
    /// increments the outstanding counter as one atomic step, so two
    /// concurrent offers of the same normalized URL yield exactly one
    /// `Admitted`.
    pub async fn offer(&self, url: Url, depth: u32) -> Result<OfferOutcome, FrontierError> {
        if depth > self.max_depth {
            return Ok(OfferOutcome::DepthExceeded);
        }

        let key = url.as_str().to_string();
        let deadline = tokio::time::Instant::now() + self.offer_timeout;

        loop {
            // Arm the space notification before checking state, so a take()
            // that frees a slot between the check and the wait still wakes us.
            let space = self.space_available.notified();

            {
                let mut state = self.state.lock().unwrap();

                if state.visited.contains(&key) {
                    return Ok(OfferOutcome::AlreadyVisited);
                }

                if state.queue.len() < self.capacity {
                    state.visited.insert(key.clone());
                    state.queue.push_back(CrawlTarget {
                        url: url.clone(),
                        depth,
                    });
                    state.outstanding += 1;
                    drop(state);
                    self.work_available.notify_one();
                    return Ok(OfferOutcome::Admitted);
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(FrontierError::Full(self.offer_timeout));
            }
            if tokio::time::timeout_at(deadline, space).await.is_err() {
                return Err(FrontierError::Full(self.offer_timeout));
            }
        }
    }

    /// Takes the next target, waiting until work arrives or the frontier
    /// closes
    ///
    /// Returns `None` once the frontier has been closed; workers use this as
    /// their stop signal.
    pub async fn take(&self) -> Option<CrawlTarget> {
        loop {
            let work = self.work_available.notified();

            {
                let mut state = self.state.lock().unwrap();

                if let Some(target) = state.queue.pop_front() {
                    let more_queued = !state.queue.is_empty();
                    drop(state);
                    self.space_available.notify_one();
                    if more_queued {
                        self.work_available.notify_one();
                    }
                    return Some(target);
                }

                if state.closed {
                    drop(state);
                    // Cascade the shutdown wakeup to the next sleeping worker
                    self.work_available.notify_one();
                    return None;
                }
            }

            work.await;
        }
    }

    /// Records completion of one taken target
    ///
    /// Must be called exactly once per `take()` that returned a target, on
    /// every exit path of the worker cycle.
    pub fn mark_done(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.outstanding > 0, "mark_done without matching offer");
        state.outstanding = state.outstanding.saturating_sub(1);
        let idle = state.outstanding == 0 && state.queue.is_empty();
        drop(state);

        if idle {
            self.idle.notify_one();
        }
    }

    /// Resolves once no queued and no outstanding work remains
    ///
    /// This is the termination invariant: the queue is empty and every
    /// admitted target has been marked done, so no future offer can arrive.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();

            {
                let state = self.state.lock().unwrap();
                if state.outstanding == 0 && state.queue.is_empty() {
                    return;
                }
            }

            idle.await;
        }
    }

    /// Closes the frontier: all current and future `take()` calls return
    /// `None`
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        drop(state);
        self.work_available.notify_one();
    }

    /// Number of targets currently queued (not counting ones held by workers)
    pub fn queued_len(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// Number of distinct URLs ever admitted
    pub fn visited_count(&self) -> usize {
        self.state.lock().unwrap().visited.len()
    }
}
