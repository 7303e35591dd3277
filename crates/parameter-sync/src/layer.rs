//! The layer surface the reconciler depends on.

use covjson::Parameter;
use serde::{Deserialize, Serialize};

/// Unique identifier for a displayed layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A layer that may display a parameter.
///
/// The reconciler never creates layers; it only indexes handles it is given.
pub trait ParameterSource {
    /// Stable identity of the layer.
    fn layer_id(&self) -> &LayerId;

    /// The parameter shown by the layer, if any.
    fn parameter(&self) -> Option<&Parameter>;

    /// Current (min, max) of the displayed values, for shared legend scaling.
    fn value_extent(&self) -> Option<(f64, f64)> {
        None
    }
}

/// Merge value extents: the smallest minimum and the largest maximum.
pub fn combine_extents<I>(extents: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    extents
        .into_iter()
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}
