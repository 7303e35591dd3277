//! Coverage parameters presented as map layers.

use covjson::{Coverage, Parameter};
use coverage_subset::range_extent;
use parameter_sync::{LayerId, ParameterSource};

/// One parameter of one loaded coverage.
///
/// The layer id is `<source>#<key>`, so the same key in two files yields two
/// distinct layers.
#[derive(Debug, Clone)]
pub struct CoverageLayer {
    id: LayerId,
    key: String,
    parameter: Parameter,
    extent: Option<(f64, f64)>,
}

impl CoverageLayer {
    /// Build one layer per parameter of `coverage`, in key order.
    pub fn from_coverage(source: &str, coverage: &Coverage) -> coverage_subset::Result<Vec<Self>> {
        let mut layers = Vec::new();
        for key in coverage.parameter_keys() {
            let Some(parameter) = coverage.parameter(key) else {
                continue;
            };
            // A parameter without a range has nothing to scale a legend by
            let extent = match coverage.range(key) {
                Some(_) => range_extent(coverage, key)?.map(|(lo, hi)| (lo as f64, hi as f64)),
                None => None,
            };
            layers.push(Self {
                id: LayerId::new(format!("{}#{}", source, key)),
                key: key.to_string(),
                parameter: Parameter::clone(parameter),
                extent,
            });
        }
        Ok(layers)
    }

    /// Parameter key within the source coverage.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl ParameterSource for CoverageLayer {
    fn layer_id(&self) -> &LayerId {
        &self.id
    }

    fn parameter(&self) -> Option<&Parameter> {
        Some(&self.parameter)
    }

    fn value_extent(&self) -> Option<(f64, f64)> {
        self.extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::profile_coverage;

    #[test]
    fn test_one_layer_per_parameter() {
        let layers = CoverageLayer::from_coverage("argo.json", &profile_coverage()).unwrap();
        let ids: Vec<&str> = layers.iter().map(|l| l.layer_id().as_str()).collect();
        assert_eq!(ids, vec!["argo.json#PSAL", "argo.json#TEMP"]);
        assert!(layers.iter().all(|l| l.parameter().is_some()));
    }
}
