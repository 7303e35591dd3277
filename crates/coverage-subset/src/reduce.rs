//! Argmin/argmax over range buffers with missing entries.
//!
//! Missing entries (`None`) are skipped. An all-missing buffer yields
//! `None`, which callers must handle as a normal outcome. Ties keep the
//! first occurrence. NaN is a value like any other here; it never compares
//! better than the current best, so it only wins when it is the first
//! present entry.

use covjson::Coverage;

use crate::error::{Result, SubsetError};

/// Index of the smallest present value, or `None` if every entry is missing.
pub fn null_arg_min<T: PartialOrd>(values: &[Option<T>]) -> Option<usize> {
    arg_best(values, |candidate, best| candidate < best)
}

/// Index of the largest present value, or `None` if every entry is missing.
pub fn null_arg_max<T: PartialOrd>(values: &[Option<T>]) -> Option<usize> {
    arg_best(values, |candidate, best| candidate > best)
}

fn arg_best<T, F>(values: &[Option<T>], better: F) -> Option<usize>
where
    F: Fn(&T, &T) -> bool,
{
    let mut best: Option<(usize, &T)> = None;
    for (i, value) in values.iter().enumerate() {
        let Some(value) = value else { continue };
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Smallest and largest present values in one pass.
pub fn null_min_max<T: PartialOrd + Copy>(values: &[Option<T>]) -> Option<(T, T)> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((
            if v < lo { v } else { lo },
            if v > hi { v } else { hi },
        )),
    })
}

/// Value extent of one range of a coverage, for legend scaling.
///
/// `Ok(None)` means the range holds no present values.
pub fn range_extent(coverage: &Coverage, key: &str) -> Result<Option<(f32, f32)>> {
    let range = coverage
        .range(key)
        .ok_or_else(|| SubsetError::ParameterNotFound(key.to_string()))?;
    Ok(null_min_max(&range.values))
}
