//! Sample indices of the rows currently in the waterfall.

use std::collections::VecDeque;

/// Default number of rows whose origin is remembered.
pub const DEFAULT_HISTORY_CAPACITY: usize = 800;

/// Bounded newest-first record of each painted row's `sample_index`.
///
/// Entry `k` belongs to buffer row `k`. Pushing beyond capacity drops the
/// oldest entry.
#[derive(Debug, Clone)]
pub struct SampleIndexHistory {
    entries: VecDeque<i64>,
    capacity: usize,
}

impl SampleIndexHistory {
    pub fn new(capacity: usize) -> Self {
        SampleIndexHistory {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records the newest row.
    pub fn push(&mut self, sample_index: i64) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(sample_index);
        self.entries.truncate(self.capacity);
    }

    /// Sample index of buffer row `row`, if that row has been painted.
    pub fn index_at(&self, row: usize) -> Option<i64> {
        self.entries.get(row).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SampleIndexHistory {
    fn default() -> Self {
        SampleIndexHistory::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut history = SampleIndexHistory::new(4);
        history.push(100);
        history.push(200);
        history.push(300);
        assert_eq!(history.index_at(0), Some(300));
        assert_eq!(history.index_at(2), Some(100));
        assert_eq!(history.index_at(3), None);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = SampleIndexHistory::default();
        for i in 0..1000 {
            history.push(i);
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(history.index_at(0), Some(999));
        assert_eq!(history.index_at(799), Some(200));
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut history = SampleIndexHistory::new(0);
        history.push(1);
        assert!(history.is_empty());
    }
}
