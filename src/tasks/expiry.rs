//! Expiry Task
//!
//! One-shot timer removing a single cache entry.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::memoize::state::MemoState;

/// Spawns a task that removes `key` after `max_age`, provided `generation`
/// is still the key's current timer when it fires.
///
/// The task holds a weak reference, so dropping the memoized function turns
/// it into a no-op. Returns `None` outside a Tokio runtime; expiry is then
/// enforced at lookup time only.
pub(crate) fn spawn_expiry_task<V>(
    state: Weak<Mutex<MemoState<V>>>,
    key: String,
    generation: u64,
    max_age: Duration,
) -> Option<JoinHandle<()>>
where
    V: Send + 'static,
{
    let Ok(handle) = Handle::try_current() else {
        debug!(
            "No Tokio runtime, expiry of key {} will be checked lazily",
            key
        );
        return None;
    };

    Some(handle.spawn(async move {
        tokio::time::sleep(max_age).await;

        match state.upgrade() {
            Some(state) => state.lock().expire(&key, generation),
            None => debug!("Memoized function dropped before key {} expired", key),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::MemoryCache;
    use crate::key::JsonKey;
    use crate::memoize::state::MemoCore;

    fn core(max_age: Duration) -> MemoCore<u32, u32> {
        MemoCore::new(
            Arc::new(JsonKey),
            Box::new(MemoryCache::new()),
            Some(max_age),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_task_removes_entry() {
        let core = core(Duration::from_millis(50));
        core.store("[1]".to_string(), 10);

        assert!(core.contains(&1));

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(!core.contains(&1));
        assert_eq!(core.stats().expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_task_keeps_entry_before_deadline() {
        let core = core(Duration::from_secs(10));
        core.store("[1]".to_string(), 10);

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(core.lookup("[1]"), Some(10));
        assert_eq!(core.stats().expirations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_task_is_noop_after_drop() {
        let core = core(Duration::from_millis(50));
        core.store("[1]".to_string(), 10);
        drop(core);

        // Dropping the state aborts its timers; nothing may panic.
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    #[test]
    fn test_expiry_without_runtime_is_lazy() {
        let core = core(Duration::from_millis(20));
        core.store("[1]".to_string(), 10);

        assert!(core.contains(&1));
        std::thread::sleep(Duration::from_millis(40));

        assert_eq!(core.lookup("[1]"), None);
        assert_eq!(core.stats().expirations, 1);
    }
}
