//! Cache Module
//!
//! Pluggable storage for memoized results: the backend trait plus an
//! unbounded map and an LRU-bounded store.

mod backend;
mod lru;
mod memory;
mod stats;

// Re-export public types
pub use backend::{CacheBackend, CacheFactory};
pub use lru::LruCache;
pub use memory::MemoryCache;
pub use stats::MemoStats;
