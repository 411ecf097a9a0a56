//! Memo State Module
//!
//! Cache state shared between a memoized function and its background tasks.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::{CacheBackend, MemoStats};
use crate::error::Result;
use crate::key::KeyBuilder;
use crate::policy::ExpiryTracker;
use crate::tasks::spawn_expiry_task;

// == Memo State ==
/// Backend, armed expiry timers and counters of one memoized function.
pub(crate) struct MemoState<V> {
    backend: Box<dyn CacheBackend<V>>,
    expiry: ExpiryTracker,
    stats: MemoStats,
}

impl<V> MemoState<V> {
    fn new(backend: Box<dyn CacheBackend<V>>) -> Self {
        Self {
            backend,
            expiry: ExpiryTracker::new(),
            stats: MemoStats::new(),
        }
    }

    // == Lookup ==
    /// Returns the cached value for `key`, recording a hit or a miss.
    fn lookup(&mut self, key: &str) -> Option<V> {
        self.evict_if_expired(key);

        if self.backend.has(key) {
            if let Some(value) = self.backend.get(key) {
                self.stats.record_hit();
                debug!("Memo hit for key {}", key);
                return Some(value);
            }
        }

        self.stats.record_miss();
        debug!("Memo miss for key {}", key);
        None
    }

    fn contains(&mut self, key: &str) -> bool {
        self.evict_if_expired(key);
        self.backend.has(key)
    }

    fn insert(&mut self, key: String, value: V) {
        for evicted in self.backend.set(key, value) {
            if self.expiry.disarm(&evicted) {
                debug!("Cancelled expiry timer of evicted key {}", evicted);
            }
        }
        self.stats.record_store();
    }

    // == Expire ==
    /// Removes `key` on behalf of a firing timer, unless that timer's
    /// generation has been superseded, deleted or cleared meanwhile.
    pub(crate) fn expire(&mut self, key: &str, generation: u64) {
        if !self.expiry.complete(key, generation) {
            debug!(
                "Ignoring stale expiry timer generation {} for key {}",
                generation, key
            );
            return;
        }
        if self.backend.delete(key) {
            self.stats.record_expiration();
            debug!("Expired key {}", key);
        }
    }

    /// Deadline check at lookup time, for when the timer task has not run
    /// (or cannot run because no runtime is available).
    fn evict_if_expired(&mut self, key: &str) {
        if self.expiry.is_expired(key) {
            self.expiry.disarm(key);
            if self.backend.delete(key) {
                self.stats.record_expiration();
                debug!("Expired key {} at lookup", key);
            }
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        self.expiry.disarm(key);
        self.backend.delete(key)
    }

    fn clear(&mut self) -> Result<()> {
        self.backend.clear()?;
        self.expiry.disarm_all();
        Ok(())
    }
}

// == Memo Core ==
/// Key derivation plus shared state, common to sync and async memoizers.
pub(crate) struct MemoCore<A, V> {
    key: Arc<dyn KeyBuilder<A>>,
    state: Arc<Mutex<MemoState<V>>>,
    max_age: Option<Duration>,
}

impl<A, V> Clone for MemoCore<A, V> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            state: Arc::clone(&self.state),
            max_age: self.max_age,
        }
    }
}

impl<A, V> MemoCore<A, V>
where
    V: Send + 'static,
{
    pub(crate) fn new(
        key: Arc<dyn KeyBuilder<A>>,
        backend: Box<dyn CacheBackend<V>>,
        max_age: Option<Duration>,
    ) -> Self {
        Self {
            key,
            state: Arc::new(Mutex::new(MemoState::new(backend))),
            max_age,
        }
    }

    /// Derives the key for `args`. `None` means the call bypasses the cache.
    pub(crate) fn key_for(&self, args: &A) -> Option<String> {
        match self.key.build(args) {
            Ok(key) => Some(key),
            Err(err) => {
                warn!("Bypassing memo cache, key derivation failed: {}", err);
                None
            }
        }
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<V> {
        self.state.lock().lookup(key)
    }

    // == Store ==
    /// Caches `value` under `key` and arms its expiry timer, if configured.
    pub(crate) fn store(&self, key: String, value: V) {
        let mut state = self.state.lock();
        state.insert(key.clone(), value);
        debug!("Stored result for key {}", key);

        let Some(max_age) = self.max_age else {
            return;
        };
        if let Some(generation) = state.expiry.arm(&key, max_age) {
            let weak = Arc::downgrade(&self.state);
            if let Some(task) = spawn_expiry_task(weak, key.clone(), generation, max_age) {
                state.expiry.attach(&key, generation, task);
            }
        }
    }

    pub(crate) fn reject(&self, key: &str) {
        self.state.lock().stats.record_rejection();
        debug!("Accept policy rejected result for key {}", key);
    }

    pub(crate) fn delete(&self, args: &A) -> bool {
        match self.key_for(args) {
            Some(key) => self.state.lock().remove(&key),
            None => false,
        }
    }

    pub(crate) fn contains(&self, args: &A) -> bool {
        match self.key_for(args) {
            Some(key) => self.state.lock().contains(&key),
            None => false,
        }
    }

    pub(crate) fn clear(&self) -> Result<()> {
        self.state.lock().clear()
    }

    pub(crate) fn stats(&self) -> MemoStats {
        self.state.lock().stats.clone()
    }
}
