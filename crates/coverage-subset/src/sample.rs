//! Reading range values by coordinate.

use covjson::Coverage;

use crate::axis::index_of_nearest;
use crate::error::{Result, SubsetError};

/// Index on a named domain axis closest to `value`.
pub fn nearest_index(coverage: &Coverage, axis: &str, value: f64) -> Result<usize> {
    let values = coverage.domain.axis_values(axis)?;
    index_of_nearest(&values, value)
}

/// Range value at the domain position nearest to the given coordinates.
///
/// `coords` pairs axis names with query values, e.g. `[("x", lon), ("y", lat)]`.
/// Range axes not named in `coords` must have a single step. `Ok(None)` is a
/// missing value at that position.
pub fn nearest_value(
    coverage: &Coverage,
    key: &str,
    coords: &[(&str, f64)],
) -> Result<Option<f32>> {
    let range = coverage
        .range(key)
        .ok_or_else(|| SubsetError::ParameterNotFound(key.to_string()))?;

    let mut index = Vec::with_capacity(coords.len());
    for &(axis, value) in coords {
        if range.axis_position(axis).is_some() {
            index.push((axis, nearest_index(coverage, axis, value)?));
        }
    }

    Ok(range.get(&index)?)
}
