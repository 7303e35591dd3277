//! Nearest-coordinate lookup on monotonic axes.
//!
//! Axes may run in either direction and need not be evenly spaced. The
//! direction is taken from the axis endpoints unless the caller states it.
//!
//! # Examples
//!
//! ```rust
//! use coverage_subset::axis::{index_of_nearest, indices_of_nearest};
//!
//! let levels = [1000.0, 850.0, 700.0, 500.0];
//! assert_eq!(indices_of_nearest(&levels, 800.0).unwrap(), (1, 2));
//! assert_eq!(index_of_nearest(&levels, 800.0).unwrap(), 1);
//! ```

use std::cmp::Ordering;

use crate::error::{Result, SubsetError};

/// Ordering of the values along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Direction of an axis, taken from its first and last values.
    ///
    /// Axes with fewer than two values, or equal endpoints, are ascending.
    pub fn of<T: PartialOrd>(axis: &[T]) -> Self {
        match (axis.first(), axis.last()) {
            (Some(first), Some(last)) if first > last => Direction::Descending,
            _ => Direction::Ascending,
        }
    }

    /// Compare two values in axis order: `Less` means `a` comes before `b`.
    fn compare<T: PartialOrd>(self, a: &T, b: &T) -> Option<Ordering> {
        let ord = a.partial_cmp(b)?;
        Some(match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        })
    }
}

/// Bracketing indices `(lo, hi)` of `x` on an axis of either direction.
///
/// See [`indices_of_nearest_in`].
pub fn indices_of_nearest<T: PartialOrd>(axis: &[T], x: T) -> Result<(usize, usize)> {
    indices_of_nearest_in(axis, x, Direction::of(axis))
}

/// Bracketing indices `(lo, hi)` of `x` on an axis with a known direction.
///
/// - `x` equal to `axis[i]` gives `(i, i)`.
/// - `x` before the first value gives `(0, 0)`.
/// - `x` past the last value gives `(n - 1, n - 1)`.
/// - `x` strictly between `axis[i]` and `axis[i + 1]` gives `(i, i + 1)`.
pub fn indices_of_nearest_in<T: PartialOrd>(
    axis: &[T],
    x: T,
    direction: Direction,
) -> Result<(usize, usize)> {
    let n = axis.len();
    if n == 0 {
        return Err(SubsetError::EmptyAxis);
    }
    let cmp = |v: &T| direction.compare(v, &x).ok_or(SubsetError::UnorderedQuery);

    if cmp(&axis[0])? != Ordering::Less {
        return Ok((0, 0));
    }
    if cmp(&axis[n - 1])? != Ordering::Greater {
        return Ok((n - 1, n - 1));
    }

    // axis[lo] < x < axis[hi] in axis order
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        match cmp(&axis[mid])? {
            Ordering::Equal => return Ok((mid, mid)),
            Ordering::Less => lo = mid,
            Ordering::Greater => hi = mid,
        }
    }
    Ok((lo, hi))
}

/// Index of the axis value closest to `x`.
///
/// Equidistant neighbours resolve to the lower index.
pub fn index_of_nearest(axis: &[f64], x: f64) -> Result<usize> {
    let (lo, hi) = indices_of_nearest(axis, x)?;
    Ok(closer(axis, x, lo, hi))
}

/// Like [`index_of_nearest`] for an axis with a known direction.
pub fn index_of_nearest_in(axis: &[f64], x: f64, direction: Direction) -> Result<usize> {
    let (lo, hi) = indices_of_nearest_in(axis, x, direction)?;
    Ok(closer(axis, x, lo, hi))
}

fn closer(axis: &[f64], x: f64, lo: usize, hi: usize) -> usize {
    if (axis[lo] - x).abs() <= (axis[hi] - x).abs() {
        lo
    } else {
        hi
    }
}
