//! Time representation for frame-accurate editing
//!
//! Uses rational numbers to avoid floating-point accumulation errors.
//! All time values are represented as numerator/denominator pairs.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A rational time value representing a point in time.
/// Uses rational arithmetic to maintain frame-accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    /// Time value as a rational number (seconds)
    value: Rational64,
}

impl RationalTime {
    /// Create a new RationalTime from numerator and denominator.
    /// The time is `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Create a RationalTime from a frame number and frame rate.
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        Self {
            value: Rational64::new(frames * rate.denominator as i64, rate.numerator as i64),
        }
    }

    /// Create a RationalTime from a sample index and sample rate.
    #[inline]
    pub fn from_samples(samples: i64, sample_rate: u32) -> Self {
        Self {
            value: Rational64::new(samples, sample_rate as i64),
        }
    }

    /// Create a RationalTime from seconds as a float.
    /// Note: May introduce small precision errors.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        const PRECISION: i64 = 1_000_000;
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Convert to frame number at the given frame rate.
    #[inline]
    pub fn to_frames(self, rate: FrameRate) -> i64 {
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        // Floor to get the frame number
        *frames.numer() / *frames.denom()
    }

    /// Convert to a sample index at the given sample rate (floored).
    #[inline]
    pub fn to_samples(self, sample_rate: u32) -> i64 {
        let samples = self.value * Rational64::from_integer(sample_rate as i64);
        *samples.numer() / *samples.denom()
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Get the absolute value of this time.
    #[inline]
    pub fn abs(self) -> Self {
        if *self.value.numer() < 0 {
            Self { value: -self.value }
        } else {
            self
        }
    }

    /// Clamp this time into `[min, max]`.
    pub fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    /// Raw numerator of the reduced fraction.
    #[inline]
    pub fn numer(self) -> i64 {
        *self.value.numer()
    }

    /// Raw denominator of the reduced fraction.
    #[inline]
    pub fn denom(self) -> i64 {
        *self.value.denom()
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl Mul<i64> for RationalTime {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self {
            value: self.value * rhs,
        }
    }
}

impl Div<i64> for RationalTime {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self {
            value: self.value / rhs,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame.
    #[inline]
    pub fn frame_duration(self) -> RationalTime {
        RationalTime::new(self.denominator as i64, self.numerator as i64)
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// A half-open time interval `[start, end)`.
///
/// Invariant: `start <= end`. A zero-length range is empty and contains
/// no time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: RationalTime,
    /// End time (exclusive)
    pub end: RationalTime,
}

impl TimeRange {
    /// Create a new time range from start and end times.
    ///
    /// Panics if `end < start`.
    #[inline]
    pub fn new(start: RationalTime, end: RationalTime) -> Self {
        assert!(start <= end, "TimeRange start must not exceed end");
        Self { start, end }
    }

    /// Create a time range from start and duration.
    #[inline]
    pub fn from_start_duration(start: RationalTime, duration: RationalTime) -> Self {
        Self::new(start, start + duration)
    }

    /// Duration of the range.
    #[inline]
    pub fn duration(self) -> RationalTime {
        self.end - self.start
    }

    /// Whether this range is zero-length.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: RationalTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Check if another range lies entirely within this one.
    pub fn contains_range(self, other: Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Check if two half-open ranges intersect.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if two ranges are exactly adjacent (one ends where the other starts).
    pub fn is_adjacent(self, other: Self) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// Combine two ranges into the single contiguous range covering both.
    ///
    /// Only defined when the ranges overlap or are exactly adjacent; calling
    /// this on disjoint non-adjacent ranges is a contract violation and
    /// panics.
    pub fn combine(self, other: Self) -> Self {
        assert!(
            self.overlaps(other) || self.is_adjacent(other),
            "combine requires overlapping or adjacent ranges: {:?} / {:?}",
            self,
            other
        );
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Checked form of [`combine`](Self::combine); returns `None` for
    /// disjoint non-adjacent ranges.
    pub fn try_combine(self, other: Self) -> Option<Self> {
        if self.overlaps(other) || self.is_adjacent(other) {
            Some(Self {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            })
        } else {
            None
        }
    }

    /// Compute the intersection of two ranges, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: RationalTime::ZERO,
        end: RationalTime::ZERO,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(a: i64, b: i64) -> TimeRange {
        TimeRange::new(RationalTime::new(a, 1), RationalTime::new(b, 1))
    }

    #[test]
    fn test_rational_time_frames() {
        let rate = FrameRate::FPS_24;
        let time = RationalTime::from_frames(48, rate);
        assert_eq!(time.to_seconds_f64(), 2.0);
        assert_eq!(time.to_frames(rate), 48);
    }

    #[test]
    fn test_rational_time_samples() {
        let time = RationalTime::from_samples(48000, 48000);
        assert_eq!(time.to_seconds_f64(), 1.0);
        assert_eq!(time.to_samples(48000), 48000);
        // Non-integer sample positions floor
        assert_eq!(RationalTime::new(1, 3).to_samples(48000), 16000);
    }

    #[test]
    fn test_time_arithmetic() {
        let a = RationalTime::new(1, 2); // 0.5 seconds
        let b = RationalTime::new(1, 4); // 0.25 seconds
        let sum = a + b;
        assert_eq!(sum.to_seconds_f64(), 0.75);
    }

    #[test]
    fn test_time_range_overlap() {
        let a = range(0, 10);
        let b = range(5, 15);
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));

        let intersection = a.intersection(b).unwrap();
        assert_eq!(intersection, range(5, 10));
    }

    #[test]
    fn test_half_open_ranges_do_not_overlap_at_boundary() {
        let a = range(0, 5);
        let b = range(5, 10);
        assert!(!a.overlaps(b));
        assert!(a.is_adjacent(b));
        assert!(b.is_adjacent(a));
    }

    #[test]
    fn test_empty_range_contains_nothing() {
        let empty = range(3, 3);
        assert!(empty.is_empty());
        assert!(!empty.contains(RationalTime::new(3, 1)));
    }

    #[test]
    fn test_combine_overlapping() {
        let combined = range(0, 10).combine(range(5, 15));
        assert_eq!(combined, range(0, 15));
    }

    #[test]
    fn test_combine_adjacent() {
        let combined = range(5, 10).combine(range(10, 15));
        assert_eq!(combined, range(5, 15));
    }

    #[test]
    #[should_panic]
    fn test_combine_disjoint_panics() {
        let _ = range(0, 5).combine(range(10, 15));
    }

    #[test]
    fn test_try_combine_disjoint() {
        assert_eq!(range(0, 5).try_combine(range(10, 15)), None);
        assert_eq!(range(0, 5).try_combine(range(5, 15)), Some(range(0, 15)));
    }

    #[test]
    fn test_combine_covers_both_and_no_more() {
        let a = range(2, 8);
        let b = range(6, 12);
        let c = a.combine(b);
        assert!(c.contains_range(a));
        assert!(c.contains_range(b));
        assert_eq!(c.start, a.start.min(b.start));
        assert_eq!(c.end, a.end.max(b.end));
    }
}
