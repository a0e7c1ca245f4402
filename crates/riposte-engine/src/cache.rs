//! Process-wide LRU cache of selected answers.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde::{Deserialize, Serialize};

use riposte_core::types::Confidence;

use crate::error::EngineError;
use crate::fingerprint::Fingerprint;

/// A cached answer and the confidence it was selected with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub answer: String,
    pub confidence: Confidence,
}

/// Capacity-bounded fingerprint → answer store with LRU eviction.
///
/// Both `get` hits and `put` count as access; inserting into a full cache
/// evicts the least-recently-accessed entry, with never-accessed entries
/// aging out in insertion order. One lock per instance, held only for the
/// in-memory operation; callers must not hold it across a generation call.
pub struct ResponseCache {
    entries: Mutex<LruCache<Fingerprint, CacheEntry>>,
}

impl ResponseCache {
    /// Create a cache with space for `capacity` entries.
    ///
    /// A capacity of 0 cannot serve traffic and fails fast.
    pub fn new(capacity: usize) -> Result<Self, EngineError> {
        let capacity =
            NonZeroUsize::new(capacity).ok_or(EngineError::CacheCapacity(capacity))?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Look up an entry, refreshing its recency on a hit.
    ///
    /// A miss has no side effect.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("cache lock poisoned: {}", e);
                return None;
            }
        };
        entries.get(fingerprint).cloned()
    }

    /// Insert or replace an entry, refreshing its recency.
    pub fn put(&self, fingerprint: Fingerprint, entry: CacheEntry) -> Result<(), EngineError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| EngineError::Internal(format!("cache lock poisoned: {}", e)))?;
        entries.put(fingerprint, entry);
        Ok(())
    }

    /// Whether an entry exists, without touching its recency.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains(fingerprint))
            .unwrap_or(false)
    }

    /// Current number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
