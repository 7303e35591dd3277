//! CoverageJSON data model.
//!
//! This crate provides the types used across the workspace to describe
//! coverages: their domain axes, range arrays and parameter metadata.
//! Documents are read with serde; nested parts are reference-counted so
//! derived coverages share everything they do not replace.
//!
//! # Example
//!
//! ```rust
//! use covjson::{Coverage, Domain, NdArray, ObservedProperty, Parameter, Unit};
//!
//! let sst = Parameter::new(ObservedProperty::new("Sea surface temperature").with_id("sst"))
//!     .with_unit(Unit::kelvin());
//!
//! let coverage = Coverage::new(Domain::grid(vec![0.0, 1.0], vec![50.0], None, None))
//!     .with_parameter(
//!         "SST",
//!         sst,
//!         NdArray::dense(vec![280.0, 281.5], vec![1, 2], vec!["y".into(), "x".into()]),
//!     );
//!
//! assert_eq!(coverage.range("SST").unwrap().values.len(), 2);
//! ```

pub mod coverage;
pub mod errors;
pub mod parameters;

pub use coverage::{
    parse_timestamp_millis, Axis, AxisValue, Coverage, CoverageType, Domain, DomainType, NdArray,
    ReferenceSystem, ReferenceSystemConnection,
};
pub use errors::{CovJsonError, CovJsonResult};
pub use parameters::{
    Category, CategoryCode, I18nString, ObservedProperty, Parameter, Unit, UnitSymbol,
};
