//! Memoize Module
//!
//! Wraps functions so their results are cached by argument.
//!
//! - [`memoize`] for synchronous `Fn(A) -> V`
//! - [`memoize_async`] for `Fn(A) -> impl Future<Output = Result<T, E>>`
//!
//! Several arguments are passed as a tuple, no arguments as `()`.

mod memoized;
mod memoized_async;
mod options;
pub(crate) mod state;


pub use memoized::{memoize, Memoized};
pub use memoized_async::{memoize_async, MemoizedAsync, SharedResult};
pub use options::{AsyncMemoizeOptions, MemoizeOptions};
