//! Accept Policy Module
//!
//! Predicate gating which results are written to the cache.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

type Predicate<T, E> = dyn Fn(Option<&E>, Option<&T>) -> bool + Send + Sync;

// == Accept Policy ==
/// Decides whether a computed result may be cached.
///
/// The predicate receives `(error, result)`:
/// - synchronous values: `(None, Some(&value))`
/// - settled futures: `(None, Some(&ok))` on success, `(Some(&err), None)` on failure
pub struct AcceptPolicy<T, E = Infallible> {
    predicate: Arc<Predicate<T, E>>,
}

impl<T, E> AcceptPolicy<T, E> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(Option<&E>, Option<&T>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Checks a synchronously computed value.
    pub fn accepts_value(&self, value: &T) -> bool {
        (self.predicate)(None, Some(value))
    }

    /// Checks the outcome of a settled future.
    pub fn accepts_outcome(&self, outcome: &Result<T, E>) -> bool {
        match outcome {
            Ok(value) => (self.predicate)(None, Some(value)),
            Err(err) => (self.predicate)(Some(err), None),
        }
    }
}

impl<T, E> Clone for AcceptPolicy<T, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T, E> fmt::Debug for AcceptPolicy<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptPolicy").finish_non_exhaustive()
    }
}
