//! Latest-result cache for the upload/display layer
//!
//! A [`ResultCache`] holds the most recently completed reconciliation. Publishing
//! swaps in a new `Arc` snapshot under a write lock, so a reader either sees the
//! previous run or the new one, never a mix. Each cache is an ordinary value owned by
//! whoever manages the session; there is no process-wide instance.

use crate::types::ReconciliationResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Identifier handed out for each published run
pub type RunId = u64;

/// A completed run as stored in the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRun {
    pub id: RunId,
    pub result: ReconciliationResult,
}

/// Holds the latest reconciliation result of one session
#[derive(Debug, Default)]
pub struct ResultCache {
    latest: RwLock<Option<Arc<CachedRun>>>,
    next_id: AtomicU64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached result with a new run
    pub fn publish(&self, result: ReconciliationResult) -> RunId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let run = Arc::new(CachedRun { id, result });

        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *latest = Some(run);
        debug!(run_id = id, "published reconciliation result");
        id
    }

    /// The most recently published run
    pub fn latest(&self) -> Option<Arc<CachedRun>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The run with the given id, if it is still the latest
    ///
    /// Returns `None` once a newer run has replaced it.
    pub fn get(&self, id: RunId) -> Option<Arc<CachedRun>> {
        self.latest().filter(|run| run.id == id)
    }

    /// Drop the cached result (end of session)
    pub fn clear(&self) {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *latest = None;
    }
}
