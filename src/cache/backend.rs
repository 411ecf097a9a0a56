//! Cache Backend Module
//!
//! Capability set every memoizer store has to provide.

use crate::error::{MemoError, Result};

// == Cache Backend ==
/// String-keyed storage for memoized values.
///
/// A backend is owned by a single memoized function. Eviction policies
/// (size bounds, LRU) live here; the memoizer only drives TTL expiry.
pub trait CacheBackend<V>: Send {
    /// Returns true if an entry exists for `key`.
    fn has(&self, key: &str) -> bool;

    /// Returns the stored value for `key`, if any.
    fn get(&mut self, key: &str) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// Returns the keys evicted to make room, so their expiry timers can be
    /// cancelled. Unbounded stores return an empty list.
    fn set(&mut self, key: String, value: V) -> Vec<String>;

    /// Removes the entry for `key`. Returns true if one existed.
    fn delete(&mut self, key: &str) -> bool;

    /// Removes every entry.
    ///
    /// Optional capability: stores that cannot clear keep this default,
    /// which fails with [`MemoError::Unsupported`].
    fn clear(&mut self) -> Result<()> {
        Err(MemoError::Unsupported(
            "This cache doesn't support clear".to_string(),
        ))
    }
}

// == Cache Factory ==
/// Builds the backend for a memoized function. Called once, at wrap time.
pub type CacheFactory<V> = Box<dyn FnOnce() -> Box<dyn CacheBackend<V>> + Send>;
