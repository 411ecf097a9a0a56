//! LRU Cache Module
//!
//! Capacity-bounded backend evicting the least recently used key.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::cache::CacheBackend;
use crate::error::Result;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug, Default)]
pub(crate) struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == LRU Cache ==
/// Store holding at most `capacity` entries.
///
/// Inserting a new key into a full store evicts the least recently used
/// one. Both `get` and `set` count as a use; `has` does not.
#[derive(Debug)]
pub struct LruCache<V> {
    entries: HashMap<String, V>,
    lru: LruTracker,
    capacity: usize,
    evictions: u64,
}

impl<V> LruCache<V> {
    // == Constructor ==
    /// Creates a store bounded to `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            capacity: capacity.max(1),
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries evicted to make room so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> CacheBackend<V> for LruCache<V>
where
    V: Clone + Send,
{
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key).cloned()?;
        self.lru.touch(key);
        Some(value)
    }

    fn set(&mut self, key: String, value: V) -> Vec<String> {
        let mut evicted = Vec::new();

        while !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            let Some(oldest) = self.lru.evict_oldest() else {
                break;
            };
            self.entries.remove(&oldest);
            self.evictions += 1;
            debug!(key = %oldest, "LRU eviction");
            evicted.push(oldest);
        }

        self.lru.touch(&key);
        self.entries.insert(key, value);
        evicted
    }

    fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.lru.clear();
        Ok(())
    }
}
