//! Policy Module
//!
//! Decides what gets cached and for how long.
//!
//! - Accept: whether a computed result (sync value or settled future) is cacheable
//! - Expiry: fixed max age per entry, enforced by cancellable timers

mod accept;
mod expiry;

pub use accept::AcceptPolicy;
pub use expiry::{max_age_from_millis, normalize_max_age};
pub(crate) use expiry::ExpiryTracker;
