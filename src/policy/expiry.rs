//! Expiry Policy Module
//!
//! Per-key expiry timers with generations, so a timer armed for an older
//! entry can never remove a newer one stored under the same key.

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

// == Max Age ==
/// Converts a max age in milliseconds. Zero or negative means never expire.
pub fn max_age_from_millis(millis: i64) -> Option<Duration> {
    u64::try_from(millis)
        .ok()
        .map(Duration::from_millis)
        .and_then(normalize_max_age)
}

/// A zero duration means never expire, and so does one too large to
/// compute a deadline for (such as `Duration::MAX`).
pub fn normalize_max_age(max_age: Duration) -> Option<Duration> {
    if max_age.is_zero() {
        return None;
    }
    Instant::now().checked_add(max_age).map(|_| max_age)
}

// == Expiry Timer ==
/// Deadline armed for one generation of a cache entry.
///
/// Dropping the timer aborts its pending removal task.
#[derive(Debug)]
pub(crate) struct ExpiryTimer {
    /// Generation of the entry this timer was armed for
    generation: u64,
    /// Absolute expiry time, fixed at insertion
    expires_at: Instant,
    task: Option<JoinHandle<()>>,
}

impl ExpiryTimer {
    fn new(generation: u64, max_age: Duration) -> Option<Self> {
        Some(Self {
            generation,
            expires_at: Instant::now().checked_add(max_age)?,
            task: None,
        })
    }

    /// Boundary condition: expired once now >= expires_at.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// == Expiry Tracker ==
/// Armed timers by cache key. At most one timer is live per key.
#[derive(Debug, Default)]
pub(crate) struct ExpiryTracker {
    timers: HashMap<String, ExpiryTimer>,
    next_generation: u64,
}

impl ExpiryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Arm ==
    /// Arms a fresh timer for `key`, superseding (and aborting) any previous
    /// one. Returns the new generation.
    ///
    /// Returns `None`, leaving `key` without a timer, if the deadline is
    /// past what `Instant` can represent.
    pub fn arm(&mut self, key: &str, max_age: Duration) -> Option<u64> {
        self.next_generation += 1;
        let generation = self.next_generation;

        let Some(timer) = ExpiryTimer::new(generation, max_age) else {
            self.timers.remove(key);
            debug!("Max age {:?} never elapses, key {} stays unarmed", max_age, key);
            return None;
        };

        if let Some(stale) = self.timers.insert(key.to_string(), timer) {
            debug!(
                "Superseded expiry timer generation {} for key {}",
                stale.generation, key
            );
        }

        Some(generation)
    }

    /// Hands the removal task to the timer of `generation`.
    ///
    /// Aborts the task if that generation is no longer current.
    pub fn attach(&mut self, key: &str, generation: u64, task: JoinHandle<()>) {
        match self.timers.get_mut(key) {
            Some(timer) if timer.generation == generation => timer.task = Some(task),
            _ => task.abort(),
        }
    }

    pub fn is_current(&self, key: &str, generation: u64) -> bool {
        self.timers
            .get(key)
            .is_some_and(|timer| timer.generation == generation)
    }

    /// Returns true if `key` has an armed timer whose deadline has passed.
    pub fn is_expired(&self, key: &str) -> bool {
        self.timers.get(key).is_some_and(ExpiryTimer::is_expired)
    }

    // == Complete ==
    /// Called by a firing timer. Retires the timer and returns true only if
    /// `generation` is still the current one for `key`.
    pub fn complete(&mut self, key: &str, generation: u64) -> bool {
        if !self.is_current(key, generation) {
            return false;
        }
        if let Some(mut timer) = self.timers.remove(key) {
            // The firing task is the caller; don't abort it.
            timer.task.take();
        }
        true
    }

    /// Cancels the timer for `key`. Returns true if one was armed.
    pub fn disarm(&mut self, key: &str) -> bool {
        self.timers.remove(key).is_some()
    }

    /// Cancels every armed timer.
    pub fn disarm_all(&mut self) {
        self.timers.clear();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
