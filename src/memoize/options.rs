//! Memoize Options Module
//!
//! Explicit per-function configuration; there are no global defaults.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::{CacheBackend, CacheFactory, LruCache, MemoryCache};
use crate::config::Config;
use crate::key::{JsonKey, KeyBuilder};
use crate::memoize::SharedResult;
use crate::policy::{max_age_from_millis, normalize_max_age, AcceptPolicy};

// == Memoize Options ==
/// Configuration for one memoized function.
///
/// - `V`: what the cache stores (the value, or the shared future for async)
/// - `T`, `E`: what the accept policy inspects (defaults suit sync functions)
///
/// | Option | Default |
/// |--------|---------|
/// | `cache` | fresh [`MemoryCache`] |
/// | `max_age` | never expire |
/// | `cache_key` | [`JsonKey`] |
/// | `value_accept` | cache every result |
pub struct MemoizeOptions<A, V, T = V, E = Infallible> {
    pub(crate) cache: CacheFactory<V>,
    pub(crate) max_age: Option<Duration>,
    pub(crate) key: Arc<dyn KeyBuilder<A>>,
    pub(crate) value_accept: Option<AcceptPolicy<T, E>>,
}

/// Options for [`memoize_async`](crate::memoize_async): the cache stores
/// shared futures, the accept policy sees their settled `Result`.
pub type AsyncMemoizeOptions<A, T, E> = MemoizeOptions<A, SharedResult<T, E>, T, E>;

impl<A, V, T, E> MemoizeOptions<A, V, T, E>
where
    A: 'static,
    V: Clone + Send + 'static,
{
    /// Default options with a custom key builder, for argument types that
    /// do not implement `Serialize`.
    pub fn with_key<K>(key: K) -> Self
    where
        K: KeyBuilder<A> + 'static,
    {
        Self {
            cache: Box::new(|| Box::new(MemoryCache::<V>::new()) as Box<dyn CacheBackend<V>>),
            max_age: None,
            key: Arc::new(key),
            value_accept: None,
        }
    }

    /// Sets the factory building the cache backend.
    pub fn cache<F, B>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> B + Send + 'static,
        B: CacheBackend<V> + 'static,
    {
        self.cache = Box::new(move || Box::new(factory()) as Box<dyn CacheBackend<V>>);
        self
    }

    /// Entries expire this long after being stored. Zero means never.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = normalize_max_age(max_age);
        self
    }

    /// Same as [`max_age`](Self::max_age) in milliseconds; zero or negative
    /// means never.
    pub fn max_age_ms(mut self, millis: i64) -> Self {
        self.max_age = max_age_from_millis(millis);
        self
    }

    pub fn cache_key<K>(mut self, key: K) -> Self
    where
        K: KeyBuilder<A> + 'static,
    {
        self.key = Arc::new(key);
        self
    }

    /// Only results for which `predicate(error, result)` returns true are
    /// cached.
    pub fn value_accept<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Option<&E>, Option<&T>) -> bool + Send + Sync + 'static,
    {
        self.value_accept = Some(AcceptPolicy::new(predicate));
        self
    }

    pub fn accept_policy(mut self, policy: AcceptPolicy<T, E>) -> Self {
        self.value_accept = Some(policy);
        self
    }
}

impl<A, V, T, E> MemoizeOptions<A, V, T, E>
where
    A: Serialize + 'static,
    V: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_key(JsonKey)
    }

    /// Options derived from environment configuration.
    ///
    /// A non-zero `max_entries` selects an [`LruCache`] of that capacity.
    pub fn from_config(config: &Config) -> Self {
        let options = Self::new().max_age_ms(config.max_age_ms);
        match config.max_entries {
            0 => options,
            capacity => options.cache(move || LruCache::new(capacity)),
        }
    }
}

impl<A, V, T, E> Default for MemoizeOptions<A, V, T, E>
where
    A: Serialize + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, V, T, E> fmt::Debug for MemoizeOptions<A, V, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizeOptions")
            .field("max_age", &self.max_age)
            .field("value_accept", &self.value_accept.is_some())
            .finish_non_exhaustive()
    }
}
