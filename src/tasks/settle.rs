//! Settle Task
//!
//! Continuation deciding, once an async result settles, whether to cache it.

use tokio::runtime::Handle;
use tracing::warn;

use crate::memoize::state::MemoCore;
use crate::memoize::SharedResult;
use crate::policy::AcceptPolicy;

/// Spawns a task awaiting `pending` and caching it under `key` if `policy`
/// accepts the outcome.
///
/// What gets stored is `pending` itself, so later hits resolve to the same
/// settled result. Outside a Tokio runtime the result stays uncached.
pub(crate) fn spawn_settle_task<A, T, E>(
    core: MemoCore<A, SharedResult<T, E>>,
    policy: AcceptPolicy<T, E>,
    key: String,
    pending: SharedResult<T, E>,
) where
    A: 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let Ok(handle) = Handle::try_current() else {
        warn!(
            "No Tokio runtime, async result for key {} will not be cached",
            key
        );
        return;
    };

    handle.spawn(async move {
        let outcome = pending.clone().await;
        if policy.accepts_outcome(&outcome) {
            core.store(key, pending);
        } else {
            core.reject(&key);
        }
    });
}
