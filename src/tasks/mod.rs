//! Background Tasks Module
//!
//! Deferred work a memoized function schedules on the ambient Tokio runtime.
//!
//! # Tasks
//! - Expiry: removes one cache entry once its max age has elapsed
//! - Settle: applies the accept policy to an async result once it settles

mod expiry;
mod settle;

pub(crate) use expiry::spawn_expiry_task;
pub(crate) use settle::spawn_settle_task;
