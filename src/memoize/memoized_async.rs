//! Async Memoized Function Module
//!
//! Memoization of functions returning futures. The cache holds the shared
//! future itself, so every reader awaits one single computation.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::cache::MemoStats;
use crate::error::Result;
use crate::memoize::state::MemoCore;
use crate::memoize::AsyncMemoizeOptions;
use crate::policy::AcceptPolicy;
use crate::tasks::spawn_settle_task;

/// Cloneable handle on a pending or settled async result.
pub type SharedResult<T, E> = Shared<BoxFuture<'static, std::result::Result<T, E>>>;

type AsyncFn<A, T, E> = dyn Fn(A) -> BoxFuture<'static, std::result::Result<T, E>> + Send + Sync;

/// Wraps an async `func` so its results are cached by argument.
///
/// Without an accept policy the pending future is cached immediately. With
/// one, caching waits until the future settles, which requires a Tokio
/// runtime to drive it.
pub fn memoize_async<A, T, E, F, Fut>(
    func: F,
    options: AsyncMemoizeOptions<A, T, E>,
) -> MemoizedAsync<A, T, E>
where
    A: 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
{
    let AsyncMemoizeOptions {
        cache,
        max_age,
        key,
        value_accept,
    } = options;

    MemoizedAsync {
        func: Box::new(move |args| func(args).boxed()),
        accept: value_accept,
        core: MemoCore::new(key, cache(), max_age),
    }
}

// == Memoized Async ==
/// An async function with a result cache in front of it.
pub struct MemoizedAsync<A, T, E> {
    func: Box<AsyncFn<A, T, E>>,
    accept: Option<AcceptPolicy<T, E>>,
    core: MemoCore<A, SharedResult<T, E>>,
}

impl<A, T, E> MemoizedAsync<A, T, E>
where
    A: 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    // == Call ==
    /// Returns the cached future for `args`, or starts a new computation.
    ///
    /// Never waits for the result: a miss hands back the pending future
    /// straight away. Errors reach the caller through that future.
    pub fn call(&self, args: A) -> SharedResult<T, E> {
        let Some(key) = self.core.key_for(&args) else {
            return (self.func)(args).shared();
        };

        if let Some(pending) = self.core.lookup(&key) {
            return pending;
        }

        let pending = (self.func)(args).shared();
        match &self.accept {
            None => self.core.store(key, pending.clone()),
            Some(policy) => {
                spawn_settle_task(self.core.clone(), policy.clone(), key, pending.clone());
            }
        }
        pending
    }

    /// Removes the entry for `args`. Returns true if one was cached.
    pub fn delete(&self, args: &A) -> bool {
        self.core.delete(args)
    }

    /// Removes every entry, failing if the backend cannot clear.
    pub fn clear(&self) -> Result<()> {
        self.core.clear()
    }

    pub fn contains(&self, args: &A) -> bool {
        self.core.contains(args)
    }

    pub fn stats(&self) -> MemoStats {
        self.core.stats()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[tokio::test]
    async fn test_pending_future_is_cached_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = memoize_async(
            move |x: u32| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok::<_, String>(x * 2)
                }
            },
            AsyncMemoizeOptions::new(),
        );

        let first = memo.call(4);
        let second = memo.call(4);

        assert!(first.ptr_eq(&second));
        assert!(memo.contains(&4));
        assert_eq!(first.await, Ok(8));
        assert_eq!(second.await, Ok(8));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_accept_policy_waits_for_settlement() {
        let (tx, rx) = oneshot::channel::<u32>();
        let rx = Arc::new(parking_lot::Mutex::new(Some(rx)));
        let memo = memoize_async(
            move |_: ()| {
                let rx = rx.lock().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|e| e.to_string()),
                        None => Err("called twice".to_string()),
                    }
                }
            },
            AsyncMemoizeOptions::<(), u32, String>::new().value_accept(|err, _| err.is_none()),
        );

        let pending = memo.call(());
        let mut polled = task::spawn(pending.clone());
        assert_pending!(polled.poll());
        assert!(!memo.contains(&()));

        tx.send(7).unwrap();
        assert_eq!(pending.clone().await, Ok(7));

        // Let the settle task store the entry.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(memo.contains(&()));

        let cached = memo.call(());
        assert!(cached.ptr_eq(&pending));
        assert_ready_eq!(task::spawn(cached).poll(), Ok(7));
    }

    #[tokio::test]
    async fn test_rejected_error_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = memoize_async(
            move |_: ()| {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                async move { Err::<u32, String>(format!("attempt {attempt} failed")) }
            },
            AsyncMemoizeOptions::<(), u32, String>::new().value_accept(|err, _| err.is_none()),
        );

        assert_eq!(memo.call(()).await, Err("attempt 0 failed".to_string()));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!memo.contains(&()));

        assert_eq!(memo.call(()).await, Err("attempt 1 failed".to_string()));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(memo.stats().rejections, 2);
    }

    #[tokio::test]
    async fn test_accepted_error_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = memoize_async(
            move |id: u64| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Err::<String, String>(format!("user {id} not found")) }
            },
            AsyncMemoizeOptions::<u64, String, String>::new()
                .value_accept(|err, _| err.is_some_and(|e| e.ends_with("not found"))),
        );

        assert!(memo.call(9).await.is_err());
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(memo.call(9).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_with_accept_policy_each_invoke_function() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = memoize_async(
            move |x: u32| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, String>(x + 1) }
            },
            AsyncMemoizeOptions::<u32, u32, String>::new().value_accept(|err, _| err.is_none()),
        );

        // Neither result has settled, so the second call misses too.
        let first = memo.call(1);
        let second = memo.call(1);
        assert!(!first.ptr_eq(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert_eq!(first.await, Ok(2));
        assert_eq!(second.await, Ok(2));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(memo.call(1).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let memo = memoize_async(
            |x: i32| async move { Ok::<_, ()>(x) },
            AsyncMemoizeOptions::new(),
        );

        let _ = memo.call(1);
        let _ = memo.call(2);

        assert!(memo.delete(&1));
        assert!(!memo.contains(&1));
        assert!(memo.contains(&2));

        memo.clear().unwrap();
        assert!(!memo.contains(&2));
    }

    #[test]
    fn test_accept_policy_without_runtime_skips_caching() {
        let memo = memoize_async(
            |x: i32| async move { Ok::<_, ()>(x) },
            AsyncMemoizeOptions::<i32, i32, ()>::new().value_accept(|_, _| true),
        );

        let pending = memo.call(5);
        assert_eq!(futures::executor::block_on(pending), Ok(5));
        assert!(!memo.contains(&5));
    }
}
