//! Property tests for the half-open range algebra.

use nodecut_core::{RationalTime, TimeRange};
use proptest::prelude::*;

fn rational(numer: i64) -> RationalTime {
    RationalTime::new(numer, 1000)
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in 0i64..10_000, b in 1i64..5_000, c in 0i64..10_000, d in 1i64..5_000) {
        let x = TimeRange::new(rational(a), rational(a + b));
        let y = TimeRange::new(rational(c), rational(c + d));
        prop_assert_eq!(x.overlaps(y), y.overlaps(x));
    }

    #[test]
    fn combine_covers_both_inputs(a in 0i64..10_000, b in 1i64..5_000, c in 0i64..10_000, d in 1i64..5_000) {
        let x = TimeRange::new(rational(a), rational(a + b));
        let y = TimeRange::new(rational(c), rational(c + d));
        if let Some(combined) = x.try_combine(y) {
            prop_assert!(combined.contains_range(x));
            prop_assert!(combined.contains_range(y));
            prop_assert_eq!(combined.start, x.start.min(y.start));
            prop_assert_eq!(combined.end, x.end.max(y.end));
        } else {
            prop_assert!(!x.overlaps(y));
            prop_assert!(!x.is_adjacent(y));
        }
    }

    #[test]
    fn intersection_is_contained(a in 0i64..10_000, b in 1i64..5_000, c in 0i64..10_000, d in 1i64..5_000) {
        let x = TimeRange::new(rational(a), rational(a + b));
        let y = TimeRange::new(rational(c), rational(c + d));
        if let Some(i) = x.intersection(y) {
            prop_assert!(x.contains_range(i));
            prop_assert!(y.contains_range(i));
        }
    }
}
