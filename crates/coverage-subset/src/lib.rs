//! Coverage subsetting primitives.
//!
//! - [`axis`]: nearest-coordinate search on ascending or descending axes
//! - [`reduce`]: argmin/argmax that skips missing values
//! - [`polygon`]: even-odd point-in-polygon tests
//! - [`transform`]: derived coverages with replaced parameters, categories
//!   or polygon-masked ranges
//! - [`sample`]: range reads by coordinate
//!
//! All functions are pure; none of them modify their inputs.

pub mod axis;
pub mod error;
pub mod polygon;
pub mod reduce;
pub mod sample;
pub mod transform;

pub use axis::{
    index_of_nearest, index_of_nearest_in, indices_of_nearest, indices_of_nearest_in, Direction,
};
pub use error::{Result, SubsetError};
pub use polygon::{contains, Bounds, Polygon};
pub use reduce::{null_arg_max, null_arg_min, null_min_max, range_extent};
pub use sample::{nearest_index, nearest_value};
pub use transform::{mask_by_polygon, with_categories, with_parameters};
