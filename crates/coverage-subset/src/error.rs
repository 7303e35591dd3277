//! Error types for coverage subsetting.

use covjson::CovJsonError;
use thiserror::Error;

/// Errors that can occur while searching or transforming coverages.
#[derive(Error, Debug)]
pub enum SubsetError {
    /// Nearest-neighbour search on an axis with no values.
    #[error("cannot search an empty axis")]
    EmptyAxis,

    /// The query value has no ordering against the axis (NaN).
    #[error("query value is not comparable with the axis")]
    UnorderedQuery,

    /// The coverage has no parameter with this key.
    #[error("parameter not found: {0}")]
    ParameterNotFound(String),

    /// The polygon cannot be used for masking.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Underlying coverage model error.
    #[error(transparent)]
    Coverage(#[from] CovJsonError),
}

impl SubsetError {
    /// Create an InvalidPolygon error.
    pub fn invalid_polygon(msg: impl Into<String>) -> Self {
        Self::InvalidPolygon(msg.into())
    }
}

/// Result type for subsetting operations.
pub type Result<T> = std::result::Result<T, SubsetError>;
