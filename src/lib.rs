//! Mini Memo - A function-result memoizer
//!
//! Caches results by argument with pluggable backends, TTL expiry, custom
//! key derivation and conditional caching for sync and async functions.

pub mod cache;
pub mod config;
pub mod error;
pub mod interval;
pub mod key;
pub mod memoize;
pub mod policy;
mod tasks;

pub use cache::{CacheBackend, LruCache, MemoStats, MemoryCache};
pub use config::Config;
pub use error::{MemoError, Result};
pub use key::{JsonKey, KeyBuilder, ZERO_ARITY_KEY};
pub use memoize::{
    memoize, memoize_async, AsyncMemoizeOptions, MemoizeOptions, Memoized, MemoizedAsync,
    SharedResult,
};
