//! Memo Statistics Module
//!
//! Tracks how a memoized function's cache is performing.

use serde::Serialize;

// == Memo Stats ==
/// Counters for a single memoized function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoStats {
    /// Calls answered from the cache
    pub hits: u64,
    /// Calls that had to invoke the wrapped function
    pub misses: u64,
    /// Results written to the cache
    pub stores: u64,
    /// Results the accept policy refused to cache
    pub rejections: u64,
    /// Entries removed because their max age elapsed
    pub expirations: u64,
}

impl MemoStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_store(&mut self) {
        self.stores += 1;
    }

    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}
