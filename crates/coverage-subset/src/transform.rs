//! Derived coverages.
//!
//! Each transform returns a new [`Coverage`] that shares every untouched
//! part with its source through `Arc`s. The source coverage and everything
//! reachable from it are never modified.

use std::collections::HashMap;
use std::sync::Arc;

use covjson::{Category, CovJsonError, Coverage, Domain, NdArray, Parameter};
use tracing::debug;

use crate::error::{Result, SubsetError};
use crate::polygon::Polygon;

/// Copy of `coverage` with its parameter map replaced.
pub fn with_parameters(
    coverage: &Coverage,
    parameters: HashMap<String, Arc<Parameter>>,
) -> Coverage {
    Coverage {
        parameters: Arc::new(parameters),
        ..coverage.clone()
    }
}

/// Copy of `coverage` with the categories of one parameter replaced.
///
/// Sibling parameters stay shared with the source.
pub fn with_categories(
    coverage: &Coverage,
    key: &str,
    categories: Vec<Category>,
) -> Result<Coverage> {
    let parameter = coverage
        .parameter(key)
        .ok_or_else(|| SubsetError::ParameterNotFound(key.to_string()))?;

    let mut replaced = Parameter::clone(parameter);
    replaced.observed_property.categories = Some(categories);

    let mut parameters = HashMap::clone(&coverage.parameters);
    parameters.insert(key.to_string(), Arc::new(replaced));

    Ok(with_parameters(coverage, parameters))
}

/// Copy of `coverage` whose range values are missing outside `polygon`.
///
/// Horizontal positions come from the domain's `x`/`y` axes, or from the
/// `x`/`y` components of a composite axis (trajectories). Ranges that do
/// not vary along a horizontal axis of length 1 are masked as a whole.
pub fn mask_by_polygon(coverage: &Coverage, polygon: &Polygon) -> Result<Coverage> {
    let footprint = Footprint::of(&coverage.domain, polygon)?;

    let mut ranges = HashMap::with_capacity(coverage.ranges.len());
    for (key, range) in coverage.ranges.iter() {
        ranges.insert(key.clone(), Arc::new(footprint.mask(range)?));
    }

    debug!(
        ranges = ranges.len(),
        inside = footprint.inside_count(),
        "Masked coverage by polygon"
    );

    Ok(Coverage {
        ranges: Arc::new(ranges),
        ..coverage.clone()
    })
}

/// Which horizontal positions of a domain fall inside the mask polygon.
enum Footprint {
    /// Separate x and y axes; `inside` is indexed by `iy * x_len + ix`.
    Grid {
        x_len: usize,
        y_len: usize,
        inside: Vec<bool>,
    },
    /// Composite axis carrying x and y; `inside` is indexed by tuple.
    Composite { axis: String, inside: Vec<bool> },
}

impl Footprint {
    fn of(domain: &Domain, polygon: &Polygon) -> Result<Self> {
        let bounds = polygon
            .bounds()
            .ok_or_else(|| SubsetError::invalid_polygon("polygon has no vertices"))?;
        let test = |x: f64, y: f64| bounds.contains_point(x, y) && polygon.contains(x, y);

        if let Some((name, axis, _)) = domain.composite_axis_for("x") {
            let xs = axis.component_values("x")?;
            let ys = axis.component_values("y")?;
            let inside = xs.iter().zip(&ys).map(|(&x, &y)| test(x, y)).collect();
            return Ok(Footprint::Composite {
                axis: name.to_string(),
                inside,
            });
        }

        let xs = domain.axis_values("x")?;
        let ys = domain.axis_values("y")?;
        let mut inside = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                inside.push(test(x, y));
            }
        }

        Ok(Footprint::Grid {
            x_len: xs.len(),
            y_len: ys.len(),
            inside,
        })
    }

    fn inside_count(&self) -> usize {
        match self {
            Footprint::Grid { inside, .. } | Footprint::Composite { inside, .. } => {
                inside.iter().filter(|&&b| b).count()
            }
        }
    }

    fn mask(&self, range: &NdArray) -> Result<NdArray> {
        range.validate()?;
        let values = match self {
            Footprint::Grid {
                x_len,
                y_len,
                inside,
            } => {
                let x = AxisStride::of(range, dimension(range, "x", *x_len)?);
                let y = AxisStride::of(range, dimension(range, "y", *y_len)?);
                mask_values(range, |i| inside[y.index(i) * x_len + x.index(i)])
            }
            Footprint::Composite { axis, inside } => {
                let tuple = AxisStride::of(range, dimension(range, axis, inside.len())?);
                mask_values(range, |i| inside[tuple.index(i)])
            }
        };
        Ok(range.with_values(values))
    }
}

/// Position of a domain axis in a range, checking the sizes agree.
///
/// `None` means the range does not vary along the axis, which is only
/// allowed for axes of length 1.
fn dimension(range: &NdArray, axis: &str, axis_len: usize) -> Result<Option<usize>> {
    match range.axis_position(axis) {
        Some(p) if range.shape()[p] == axis_len => Ok(Some(p)),
        Some(p) => Err(CovJsonError::shape_mismatch(format!(
            "range has {} steps along '{}', domain has {}",
            range.shape()[p],
            axis,
            axis_len
        ))
        .into()),
        None if axis_len == 1 => Ok(None),
        None => Err(CovJsonError::MissingIndex(axis.to_string()).into()),
    }
}

/// Recovers the index along one range axis from a row-major flat index.
///
/// An axis the range does not vary along always yields 0.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisStride {
    stride: usize,
    len: usize,
}

impl AxisStride {
    fn of(range: &NdArray, position: Option<usize>) -> Self {
        match position {
            Some(p) => {
                let shape = range.shape();
                Self {
                    stride: shape[p + 1..].iter().product(),
                    len: shape[p],
                }
            }
            None => Self { stride: 1, len: 1 },
        }
    }

    fn index(self, flat: usize) -> usize {
        flat / self.stride % self.len
    }
}

fn mask_values(range: &NdArray, inside: impl Fn(usize) -> bool) -> Vec<Option<f32>> {
    range
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| v.filter(|_| inside(i)))
        .collect()
}
