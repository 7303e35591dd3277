//! CoverageJSON model error types.

use thiserror::Error;

/// Result type alias using CovJsonError.
pub type CovJsonResult<T> = Result<T, CovJsonError>;

/// Errors raised while reading or indexing a coverage.
#[derive(Debug, Error)]
pub enum CovJsonError {
    /// The domain has no axis with this name.
    #[error("Axis not found: {0}")]
    AxisNotFound(String),

    /// The axis holds values that cannot be searched as numbers.
    #[error("Axis '{0}' is not numeric")]
    NonNumericAxis(String),

    /// A string axis value is not an ISO 8601 timestamp.
    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// An index along an axis exceeds the array shape.
    #[error("Index {index} out of bounds for axis '{axis}' of size {size}")]
    IndexOutOfBounds {
        axis: String,
        index: usize,
        size: usize,
    },

    /// No index was given for an axis with more than one step.
    #[error("Missing index for axis '{0}'")]
    MissingIndex(String),

    /// The array shape disagrees with its values or axis names.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CovJsonError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CovJsonError::IndexOutOfBounds {
            axis: "x".to_string(),
            index: 5,
            size: 3,
        };
        let display = format!("{}", err);
        assert!(display.contains("axis 'x'"));
        assert!(display.contains("size 3"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CovJsonError = json_err.into();
        assert!(matches!(err, CovJsonError::Json(_)));
    }
}
