// src/common/range.rs

//! Closed value ranges, range checks and linear remapping between ranges.

use super::error::ConfigError;
use core::fmt::Debug;
use core::str::FromStr;

/// Numeric domain a [`Range`] can be defined over.
pub trait RangeValue: Copy + PartialOrd + Debug + FromStr {
    /// Remaps `value` from `from` into `to`. `from` is known to have non-zero width.
    fn remap(value: Self, from: &Range<Self>, to: &Range<Self>) -> Self;

    /// False for values that can never be ordered (NaN).
    fn is_comparable(self) -> bool;
}

impl RangeValue for f32 {
    fn remap(value: f32, from: &Range<f32>, to: &Range<f32>) -> f32 {
        to.lower + (value - from.lower) * (to.upper - to.lower) / (from.upper - from.lower)
    }

    fn is_comparable(self) -> bool {
        !self.is_nan()
    }
}

impl RangeValue for i32 {
    /// Widths and offset are taken in `i64` so full-span ranges cannot wrap;
    /// the offset is scaled in `f64` and truncated toward zero. Results past
    /// the `i32` bounds saturate.
    fn remap(value: i32, from: &Range<i32>, to: &Range<i32>) -> i32 {
        let in_width = (from.upper as i64 - from.lower as i64) as f64;
        let out_width = (to.upper as i64 - to.lower as i64) as f64;
        let offset = (value as i64 - from.lower as i64) as f64 * out_width / in_width;
        let mapped = to.lower as i64 + offset as i64;
        mapped.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    fn is_comparable(self) -> bool {
        true
    }
}

// --- Range ---

/// Closed interval `[lower, upper]`. Equality is value based.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Range<T> {
    lower: T,
    upper: T,
}

impl<T: RangeValue> Range<T> {
    /// Creates a range, rejecting `lower > upper` and NaN bounds.
    pub fn new(lower: T, upper: T) -> Result<Self, ConfigError> {
        if !lower.is_comparable() || !upper.is_comparable() || lower > upper {
            return Err(ConfigError::InvertedRange);
        }
        Ok(Range { lower, upper })
    }

    #[inline]
    pub fn lower(&self) -> T {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> T {
        self.upper
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.lower <= value && value <= self.upper
    }

    #[inline]
    pub fn is_zero_width(&self) -> bool {
        self.lower == self.upper
    }
}

impl<T> Range<T> {
    /// Const constructor for the built-in tables. Callers guarantee ordering.
    pub(crate) const fn from_bounds(lower: T, upper: T) -> Self {
        Range { lower, upper }
    }
}

/// `lower <= value <= upper`.
#[inline]
pub fn is_in_range<T: RangeValue>(value: T, range: &Range<T>) -> bool {
    range.contains(value)
}

/// Linearly remaps `value` from `from` onto `to`:
/// `to.lower + (value - from.lower) * (to.upper - to.lower) / (from.upper - from.lower)`.
///
/// Integer values are truncated toward zero after the scaling. A zero-width
/// `from` range is a configuration error.
pub fn linear_map<T: RangeValue>(value: T, from: &Range<T>, to: &Range<T>) -> Result<T, ConfigError> {
    if from.is_zero_width() {
        return Err(ConfigError::ZeroWidthRange);
    }
    Ok(T::remap(value, from, to))
}

/// Maps `value` from the hardware range onto the standard range, or returns
/// it untouched when both ranges are equal.
pub fn normalize_value<T: RangeValue>(
    value: T,
    hardware: &Range<T>,
    standard: &Range<T>,
) -> Result<T, ConfigError> {
    if hardware == standard {
        return Ok(value);
    }
    linear_map(value, hardware, standard)
}
