//! Interval Index Module
//!
//! Contract of the interval-tree collaborator whose queries get memoized,
//! plus a linear-scan implementation of it.

use serde::Serialize;

use crate::error::{MemoError, Result};

/// An interval stored in an index together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalMatch<V> {
    pub start: i64,
    pub end: i64,
    pub value: V,
}

impl<V> IntervalMatch<V> {
    /// Intervals are half-open: `start <= point < end`.
    pub fn contains(&self, point: i64) -> bool {
        self.start <= point && point < self.end
    }
}

// == Interval Index ==
/// Stabbing-query index over half-open `[start, end)` intervals.
pub trait IntervalIndex<V> {
    /// Adds an interval. Fails unless `start < end`.
    fn insert(&mut self, start: i64, end: i64, value: V) -> Result<()>;

    /// Returns every interval containing `point`.
    fn find(&self, point: i64) -> Vec<IntervalMatch<V>>;

    /// Runs [`find`](Self::find) for each point, in order.
    fn batch_find(&self, points: &[i64]) -> Vec<Vec<IntervalMatch<V>>> {
        points.iter().map(|point| self.find(*point)).collect()
    }
}

// == Naive Interval Index ==
/// Checks every stored interval on each query.
#[derive(Debug, Clone, Default)]
pub struct NaiveIntervalIndex<V> {
    entries: Vec<IntervalMatch<V>>,
}

impl<V> NaiveIntervalIndex<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> IntervalIndex<V> for NaiveIntervalIndex<V> {
    fn insert(&mut self, start: i64, end: i64, value: V) -> Result<()> {
        if start >= end {
            return Err(MemoError::InvalidInterval { start, end });
        }
        self.entries.push(IntervalMatch { start, end, value });
        Ok(())
    }

    fn find(&self, point: i64) -> Vec<IntervalMatch<V>> {
        self.entries
            .iter()
            .filter(|entry| entry.contains(point))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> NaiveIntervalIndex<&'static str> {
        let mut index = NaiveIntervalIndex::new();
        index.insert(0, 10, "a").unwrap();
        index.insert(5, 15, "b").unwrap();
        index.insert(20, 30, "c").unwrap();
        index
    }

    #[test]
    fn test_find_overlapping() {
        let found: Vec<_> = index().find(7).into_iter().map(|m| m.value).collect();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_find_is_half_open() {
        let index = index();
        assert_eq!(index.find(10).len(), 1);
        assert_eq!(index.find(20)[0].value, "c");
        assert!(index.find(30).is_empty());
    }

    #[test]
    fn test_batch_find_preserves_order() {
        let results = index().batch_find(&[25, 100, 0]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0][0].value, "c");
        assert!(results[1].is_empty());
        assert_eq!(results[2][0].value, "a");
    }

    #[test]
    fn test_insert_rejects_empty_or_reversed() {
        let mut index = NaiveIntervalIndex::new();
        assert!(matches!(
            index.insert(5, 5, ()),
            Err(MemoError::InvalidInterval { start: 5, end: 5 })
        ));
        assert!(index.insert(9, 3, ()).is_err());
        assert!(index.is_empty());
    }
}
