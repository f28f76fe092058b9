//! Dirty range bookkeeping.
//!
//! Invalidations arrive from the edit thread while a render may be
//! draining, so the set carries its own lock. Ranges are kept sorted and
//! disjoint: inserting a range that overlaps or touches existing ones
//! merges them into a single entry.

use nodecut_core::TimeRange;
use parking_lot::Mutex;

/// A sorted, disjoint set of time ranges awaiting re-render.
#[derive(Debug, Default)]
pub struct DirtyRangeSet {
    ranges: Mutex<Vec<TimeRange>>,
}

impl DirtyRangeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range, merging it with any overlapping or adjacent entries.
    /// Empty ranges are ignored.
    pub fn insert(&self, range: TimeRange) {
        if range.is_empty() {
            return;
        }
        let mut ranges = self.ranges.lock();
        let mut merged = range;
        ranges.retain(|existing| match merged.try_combine(*existing) {
            Some(combined) => {
                merged = combined;
                false
            }
            None => true,
        });
        let at = ranges
            .iter()
            .position(|r| r.start > merged.start)
            .unwrap_or(ranges.len());
        ranges.insert(at, merged);
    }

    /// Remove and return all pending ranges, in time order.
    pub fn drain(&self) -> Vec<TimeRange> {
        std::mem::take(&mut *self.ranges.lock())
    }

    /// A snapshot of the pending ranges.
    pub fn snapshot(&self) -> Vec<TimeRange> {
        self.ranges.lock().clone()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.ranges.lock().is_empty()
    }

    /// Drop all pending ranges.
    pub fn clear(&self) {
        self.ranges.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodecut_core::RationalTime;

    fn range(start: i64, end: i64) -> TimeRange {
        TimeRange::new(RationalTime::new(start, 1), RationalTime::new(end, 1))
    }

    #[test]
    fn test_adjacent_ranges_merge() {
        let set = DirtyRangeSet::new();
        set.insert(range(5, 10));
        set.insert(range(10, 15));
        assert_eq!(set.snapshot(), vec![range(5, 15)]);
    }

    #[test]
    fn test_disjoint_ranges_stay_separate() {
        let set = DirtyRangeSet::new();
        set.insert(range(0, 2));
        set.insert(range(5, 7));
        assert_eq!(set.snapshot(), vec![range(0, 2), range(5, 7)]);
    }

    #[test]
    fn test_insert_bridges_multiple_entries() {
        let set = DirtyRangeSet::new();
        set.insert(range(0, 2));
        set.insert(range(4, 6));
        set.insert(range(8, 10));
        // Spans the gap between the first two, touches the third
        set.insert(range(1, 8));
        assert_eq!(set.snapshot(), vec![range(0, 10)]);
    }

    #[test]
    fn test_inserts_keep_time_order() {
        let set = DirtyRangeSet::new();
        set.insert(range(10, 12));
        set.insert(range(0, 2));
        set.insert(range(5, 6));
        assert_eq!(set.snapshot(), vec![range(0, 2), range(5, 6), range(10, 12)]);
    }

    #[test]
    fn test_empty_range_is_ignored() {
        let set = DirtyRangeSet::new();
        set.insert(range(3, 3));
        assert!(set.is_empty());
    }

    #[test]
    fn test_drain_empties_the_set() {
        let set = DirtyRangeSet::new();
        set.insert(range(0, 1));
        assert_eq!(set.drain(), vec![range(0, 1)]);
        assert!(set.is_empty());
    }
}
