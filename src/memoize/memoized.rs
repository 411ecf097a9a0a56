//! Memoized Function Module
//!
//! Synchronous memoization.

use std::fmt;

use crate::cache::MemoStats;
use crate::error::Result;
use crate::memoize::state::MemoCore;
use crate::memoize::MemoizeOptions;
use crate::policy::AcceptPolicy;

/// Wraps `func` so its results are cached by argument.
///
/// # Example
/// ```
/// use mini_memo::{memoize, MemoizeOptions};
///
/// let add = memoize(|(a, b): (i32, i32)| a + b, MemoizeOptions::new());
/// assert_eq!(add.call((2, 3)), 5);
/// assert_eq!(add.call((2, 3)), 5);
/// assert_eq!(add.stats().hits, 1);
/// ```
pub fn memoize<A, V, F>(func: F, options: MemoizeOptions<A, V>) -> Memoized<A, V>
where
    A: 'static,
    V: Clone + Send + 'static,
    F: Fn(A) -> V + Send + Sync + 'static,
{
    let MemoizeOptions {
        cache,
        max_age,
        key,
        value_accept,
    } = options;

    Memoized {
        func: Box::new(func),
        accept: value_accept,
        core: MemoCore::new(key, cache(), max_age),
    }
}

// == Memoized ==
/// A synchronous function with a result cache in front of it.
///
/// Concurrent misses on the same key each invoke the function; there is no
/// in-flight de-duplication.
pub struct Memoized<A, V> {
    func: Box<dyn Fn(A) -> V + Send + Sync>,
    accept: Option<AcceptPolicy<V>>,
    core: MemoCore<A, V>,
}

impl<A, V> Memoized<A, V>
where
    V: Clone + Send + 'static,
{
    // == Call ==
    /// Returns the cached result for `args`, or invokes the function.
    ///
    /// A fresh result is returned whether or not the accept policy lets it
    /// into the cache.
    pub fn call(&self, args: A) -> V {
        let Some(key) = self.core.key_for(&args) else {
            return (self.func)(args);
        };

        if let Some(cached) = self.core.lookup(&key) {
            return cached;
        }

        let value = (self.func)(args);
        match &self.accept {
            Some(policy) if !policy.accepts_value(&value) => self.core.reject(&key),
            _ => self.core.store(key, value.clone()),
        }
        value
    }

    /// Removes the entry for `args`. Returns true if one was cached.
    pub fn delete(&self, args: &A) -> bool {
        self.core.delete(args)
    }

    /// Removes every entry.
    ///
    /// Fails with [`MemoError::Unsupported`](crate::MemoError::Unsupported)
    /// if the backend cannot clear.
    pub fn clear(&self) -> Result<()> {
        self.core.clear()
    }

    /// Returns true if a result for `args` is currently cached.
    pub fn contains(&self, args: &A) -> bool {
        self.core.contains(args)
    }

    pub fn stats(&self) -> MemoStats {
        self.core.stats()
    }
}

impl<A, V> fmt::Debug for Memoized<A, V>
where
    V: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("accept", &self.accept)
            .field("stats", &self.core.stats())
            .finish_non_exhaustive()
    }
}
