//! Memory Cache Module
//!
//! Default backend: an unbounded HashMap.

use std::collections::HashMap;

use crate::cache::CacheBackend;
use crate::error::Result;

// == Memory Cache ==
/// Unbounded in-memory store. Entries only leave through delete, clear or
/// memoizer-driven expiry.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: HashMap<String, V>,
}

impl<V> MemoryCache<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheBackend<V> for MemoryCache<V>
where
    V: Clone + Send,
{
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&mut self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: String, value: V) -> Vec<String> {
        self.entries.insert(key, value);
        Vec::new()
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}
