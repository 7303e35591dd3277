//! Test data generators for range buffers and axes.

/// Creates a grid with predictable values.
///
/// Each cell value is `col * 1000 + row`, in row-major order, so
/// `grid[row * width + col] == col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::sequential_grid;
///
/// let grid = sequential_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], Some(1000.0));
/// assert_eq!(grid[10], Some(1.0));
/// ```
pub fn sequential_grid(width: usize, height: usize) -> Vec<Option<f32>> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(Some((col * 1000 + row) as f32));
        }
    }
    data
}

/// Replaces every `n`th value (starting at index 0) with a missing value.
pub fn with_missing_every(mut values: Vec<Option<f32>>, n: usize) -> Vec<Option<f32>> {
    if n > 0 {
        values.iter_mut().step_by(n).for_each(|v| *v = None);
    }
    values
}

/// An evenly spaced axis of `n` values.
///
/// A negative `step` gives a descending axis.
pub fn regular_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}
