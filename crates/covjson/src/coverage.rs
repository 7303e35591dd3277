//! CoverageJSON coverage types.
//!
//! A coverage associates a domain (a set of axes) with one range array per
//! parameter. Every nested part of a [`Coverage`] sits behind an [`Arc`] so
//! derived coverages can share whatever they do not replace.
//!
//! See: <https://covjson.org/>

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use crate::errors::{CovJsonError, CovJsonResult};
use crate::parameters::Parameter;

/// A CoverageJSON coverage document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coverage {
    /// Document type (always "Coverage" for single coverage).
    #[serde(rename = "type")]
    pub type_: CoverageType,

    /// The domain defining the coverage's spatial/temporal extent.
    pub domain: Arc<Domain>,

    /// Parameter definitions keyed by range key.
    #[serde(default)]
    pub parameters: Arc<HashMap<String, Arc<Parameter>>>,

    /// Data ranges for each parameter.
    #[serde(default)]
    pub ranges: Arc<HashMap<String, Arc<NdArray>>>,
}

impl Coverage {
    /// Create an empty coverage over a domain.
    pub fn new(domain: Domain) -> Self {
        Self {
            type_: CoverageType::Coverage,
            domain: Arc::new(domain),
            parameters: Arc::default(),
            ranges: Arc::default(),
        }
    }

    /// Add a parameter with its range.
    pub fn with_parameter(mut self, key: &str, param: Parameter, range: NdArray) -> Self {
        Arc::make_mut(&mut self.parameters).insert(key.to_string(), Arc::new(param));
        Arc::make_mut(&mut self.ranges).insert(key.to_string(), Arc::new(range));
        self
    }

    /// Parse a coverage from a JSON string.
    pub fn from_json_str(json: &str) -> CovJsonResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a coverage from a reader.
    pub fn from_reader<R: Read>(reader: R) -> CovJsonResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Look up a parameter by range key.
    pub fn parameter(&self, key: &str) -> Option<&Arc<Parameter>> {
        self.parameters.get(key)
    }

    /// Look up a range by key.
    pub fn range(&self, key: &str) -> Option<&Arc<NdArray>> {
        self.ranges.get(key)
    }

    /// Parameter keys in sorted order.
    pub fn parameter_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.parameters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Coverage type.
///
/// Only single coverages are read; a `CoverageCollection` document fails to
/// deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CoverageType {
    Coverage,
}

/// The domain of a coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Domain {
    /// Domain type (always "Domain").
    #[serde(rename = "type", default = "domain_tag")]
    pub type_: String,

    /// The domain type (Point, Grid, etc.).
    #[serde(rename = "domainType")]
    pub domain_type: DomainType,

    /// Axis definitions.
    pub axes: HashMap<String, Axis>,

    /// Reference systems for axes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referencing: Option<Vec<ReferenceSystemConnection>>,
}

fn domain_tag() -> String {
    "Domain".to_string()
}

fn geographic_referencing() -> ReferenceSystemConnection {
    ReferenceSystemConnection {
        coordinates: vec!["x".to_string(), "y".to_string()],
        system: ReferenceSystem::Geographic {
            id: "http://www.opengis.net/def/crs/OGC/1.3/CRS84".to_string(),
        },
    }
}

fn floats(values: Vec<f64>) -> Axis {
    Axis::Values {
        values: values.into_iter().map(AxisValue::Float).collect(),
    }
}

impl Domain {
    /// Create a domain from raw parts.
    pub fn new(domain_type: DomainType, axes: HashMap<String, Axis>) -> Self {
        Self {
            type_: domain_tag(),
            domain_type,
            axes,
            referencing: Some(vec![geographic_referencing()]),
        }
    }

    /// Create a grid domain.
    pub fn grid(
        x_values: Vec<f64>,
        y_values: Vec<f64>,
        t_values: Option<Vec<String>>,
        z_values: Option<Vec<f64>>,
    ) -> Self {
        let mut axes = HashMap::new();
        axes.insert("x".to_string(), floats(x_values));
        axes.insert("y".to_string(), floats(y_values));

        if let Some(t) = t_values {
            axes.insert(
                "t".to_string(),
                Axis::Values {
                    values: t.into_iter().map(AxisValue::String).collect(),
                },
            );
        }

        if let Some(z) = z_values {
            axes.insert("z".to_string(), floats(z));
        }

        Self::new(DomainType::Grid, axes)
    }

    /// Create a vertical profile domain at a single horizontal position.
    pub fn vertical_profile(x: f64, y: f64, z_values: Vec<f64>) -> Self {
        let mut axes = HashMap::new();
        axes.insert("x".to_string(), floats(vec![x]));
        axes.insert("y".to_string(), floats(vec![y]));
        axes.insert("z".to_string(), floats(z_values));

        Self::new(DomainType::VerticalProfile, axes)
    }

    /// Create a trajectory domain from (t, x, y) tuples.
    pub fn trajectory(points: Vec<(String, f64, f64)>) -> Self {
        let values = points
            .into_iter()
            .map(|(t, x, y)| vec![AxisValue::String(t), AxisValue::Float(x), AxisValue::Float(y)])
            .collect();

        let mut axes = HashMap::new();
        axes.insert(
            "composite".to_string(),
            Axis::Composite {
                data_type: "tuple".to_string(),
                coordinates: vec!["t".to_string(), "x".to_string(), "y".to_string()],
                values,
            },
        );

        Self::new(DomainType::Trajectory, axes)
    }

    /// Look up an axis by name.
    pub fn axis(&self, name: &str) -> CovJsonResult<&Axis> {
        self.axes
            .get(name)
            .ok_or_else(|| CovJsonError::AxisNotFound(name.to_string()))
    }

    /// Numeric values of a named axis (timestamps as epoch milliseconds).
    pub fn axis_values(&self, name: &str) -> CovJsonResult<Vec<f64>> {
        self.axis(name)?.numeric_values(name)
    }

    /// Find the composite axis carrying a coordinate, with the coordinate's tuple position.
    pub fn composite_axis_for(&self, coordinate: &str) -> Option<(&str, &Axis, usize)> {
        self.axes.iter().find_map(|(name, axis)| {
            axis.component_position(coordinate)
                .map(|pos| (name.as_str(), axis, pos))
        })
    }
}

/// Domain types supported by CoverageJSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DomainType {
    Point,
    PointSeries,
    VerticalProfile,
    Grid,
    Trajectory,
    Section,
    MultiPoint,
    MultiPointSeries,
    Polygon,
    PolygonSeries,
    MultiPolygon,
    MultiPolygonSeries,
}

/// An axis in the domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Axis {
    /// Tuple-valued axis, e.g. the (t, x, y) path of a trajectory.
    Composite {
        #[serde(rename = "dataType")]
        data_type: String,
        coordinates: Vec<String>,
        values: Vec<Vec<AxisValue>>,
    },
    /// Regular axis defined by start, stop, and number of points.
    Regular { start: f64, stop: f64, num: usize },
    /// Explicit list of values.
    Values { values: Vec<AxisValue> },
}

impl Axis {
    /// Get the number of values in this axis.
    pub fn len(&self) -> usize {
        match self {
            Axis::Values { values } => values.len(),
            Axis::Regular { num, .. } => *num,
            Axis::Composite { values, .. } => values.len(),
        }
    }

    /// Check if axis is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of a named coordinate inside a composite tuple.
    pub fn component_position(&self, coordinate: &str) -> Option<usize> {
        match self {
            Axis::Composite { coordinates, .. } => coordinates.iter().position(|c| c == coordinate),
            _ => None,
        }
    }

    /// Values of this axis as numbers.
    ///
    /// Regular axes are expanded; timestamps become epoch milliseconds.
    /// `name` is only used for error reporting.
    pub fn numeric_values(&self, name: &str) -> CovJsonResult<Vec<f64>> {
        match self {
            Axis::Values { values } => values.iter().map(AxisValue::as_number).collect(),
            Axis::Regular { start, stop, num } => Ok(match *num {
                0 => Vec::new(),
                1 => vec![*start],
                n => {
                    let step = (stop - start) / (n - 1) as f64;
                    (0..n).map(|i| start + step * i as f64).collect()
                }
            }),
            Axis::Composite { .. } => Err(CovJsonError::NonNumericAxis(name.to_string())),
        }
    }

    /// Numeric values of one component of a composite axis.
    pub fn component_values(&self, coordinate: &str) -> CovJsonResult<Vec<f64>> {
        let pos = self
            .component_position(coordinate)
            .ok_or_else(|| CovJsonError::AxisNotFound(coordinate.to_string()))?;

        match self {
            Axis::Composite { values, .. } => values
                .iter()
                .map(|tuple| {
                    tuple
                        .get(pos)
                        .ok_or_else(|| {
                            CovJsonError::shape_mismatch(format!(
                                "composite tuple has no '{}' component",
                                coordinate
                            ))
                        })
                        .and_then(AxisValue::as_number)
                })
                .collect(),
            _ => Err(CovJsonError::AxisNotFound(coordinate.to_string())),
        }
    }
}

/// A value on an axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AxisValue {
    /// Floating-point value (coordinates, levels).
    Float(f64),
    /// String value (timestamps).
    String(String),
}

impl AxisValue {
    /// Numeric form of the value; timestamps become epoch milliseconds.
    pub fn as_number(&self) -> CovJsonResult<f64> {
        match self {
            AxisValue::Float(v) => Ok(*v),
            AxisValue::String(s) => parse_timestamp_millis(s),
        }
    }
}

/// Parse an ISO 8601 timestamp (or bare date) into epoch milliseconds.
pub fn parse_timestamp_millis(s: &str) -> CovJsonResult<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis() as f64);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
        .ok_or_else(|| CovJsonError::InvalidTimestamp(s.to_string()))
}

/// Connection between axes and their reference system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceSystemConnection {
    /// Axes that use this reference system.
    pub coordinates: Vec<String>,

    /// The reference system.
    pub system: ReferenceSystem,
}

/// Reference system definitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ReferenceSystem {
    /// Geographic coordinate reference system.
    #[serde(rename = "GeographicCRS")]
    Geographic {
        /// CRS identifier URI.
        id: String,
    },

    /// Projected coordinate reference system.
    #[serde(rename = "ProjectedCRS")]
    Projected {
        /// CRS identifier URI.
        id: String,
    },

    /// Temporal reference system.
    #[serde(rename = "TemporalRS")]
    Temporal {
        /// Calendar system (e.g., "Gregorian").
        calendar: String,
    },

    /// Vertical reference system.
    #[serde(rename = "VerticalCRS")]
    Vertical {
        /// CRS identifier URI.
        #[serde(default)]
        id: Option<String>,
    },

    /// Identifier-based reference system.
    #[serde(rename = "IdentifierRS")]
    Identifier {
        /// Target concept URI.
        #[serde(rename = "targetConcept")]
        target_concept: serde_json::Value,
    },
}

/// N-dimensional array containing range values.
///
/// `None` entries are missing values; they are never encoded as NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NdArray {
    /// Type (always "NdArray").
    #[serde(rename = "type", default = "ndarray_tag")]
    pub type_: String,

    /// Data type of values.
    #[serde(rename = "dataType")]
    pub data_type: String,

    /// Names of axes in order.
    #[serde(rename = "axisNames", skip_serializing_if = "Option::is_none")]
    pub axis_names: Option<Vec<String>>,

    /// Shape of the array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,

    /// The data values (may contain null for missing data).
    pub values: Vec<Option<f32>>,
}

fn ndarray_tag() -> String {
    "NdArray".to_string()
}

impl NdArray {
    /// Create a scalar (single value) array.
    pub fn scalar(value: Option<f32>) -> Self {
        Self {
            type_: ndarray_tag(),
            data_type: "float".to_string(),
            axis_names: None,
            shape: None,
            values: vec![value],
        }
    }

    /// Create an N-dimensional array with missing data support.
    pub fn new(values: Vec<Option<f32>>, shape: Vec<usize>, axis_names: Vec<String>) -> Self {
        Self {
            type_: ndarray_tag(),
            data_type: "float".to_string(),
            axis_names: Some(axis_names),
            shape: Some(shape),
            values,
        }
    }

    /// Create a fully populated N-dimensional array.
    pub fn dense(values: Vec<f32>, shape: Vec<usize>, axis_names: Vec<String>) -> Self {
        Self::new(values.into_iter().map(Some).collect(), shape, axis_names)
    }

    /// Same array metadata with a different value buffer.
    pub fn with_values(&self, values: Vec<Option<f32>>) -> Self {
        Self {
            type_: self.type_.clone(),
            data_type: self.data_type.clone(),
            axis_names: self.axis_names.clone(),
            shape: self.shape.clone(),
            values,
        }
    }

    /// Axis names, empty for scalars.
    pub fn axis_names(&self) -> &[String] {
        self.axis_names.as_deref().unwrap_or(&[])
    }

    /// Shape, empty for scalars.
    pub fn shape(&self) -> &[usize] {
        self.shape.as_deref().unwrap_or(&[])
    }

    /// Position of an axis in `axisNames`.
    pub fn axis_position(&self, axis: &str) -> Option<usize> {
        self.axis_names().iter().position(|a| a == axis)
    }

    /// Check that shape, axis names and value count agree.
    pub fn validate(&self) -> CovJsonResult<()> {
        let names = self.axis_names();
        let shape = self.shape();
        if names.len() != shape.len() {
            return Err(CovJsonError::shape_mismatch(format!(
                "{} axis names for {} dimensions",
                names.len(),
                shape.len()
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != self.values.len() {
            return Err(CovJsonError::shape_mismatch(format!(
                "shape {:?} needs {} values, found {}",
                shape,
                expected,
                self.values.len()
            )));
        }
        Ok(())
    }

    /// Row-major flat index for per-axis indices.
    ///
    /// Axes of size 1 may be omitted from `index`.
    pub fn flat_index(&self, index: &[(&str, usize)]) -> CovJsonResult<usize> {
        self.validate()?;
        let mut flat = 0;
        for (name, &size) in self.axis_names().iter().zip(self.shape()) {
            let i = match index.iter().find(|(axis, _)| axis == name) {
                Some(&(_, i)) => i,
                None if size == 1 => 0,
                None => return Err(CovJsonError::MissingIndex(name.clone())),
            };
            if i >= size {
                return Err(CovJsonError::IndexOutOfBounds {
                    axis: name.clone(),
                    index: i,
                    size,
                });
            }
            flat = flat * size + i;
        }
        Ok(flat)
    }

    /// Read a value by per-axis indices.
    pub fn get(&self, index: &[(&str, usize)]) -> CovJsonResult<Option<f32>> {
        let flat = self.flat_index(index)?;
        Ok(self.values[flat])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ObservedProperty, Unit};

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_coverage_with_parameter() {
        let param = Parameter::new(ObservedProperty::new("Temperature")).with_unit(Unit::kelvin());
        let domain = Domain::grid(vec![1.0, 2.0], vec![10.0], None, None);
        let cov = Coverage::new(domain).with_parameter(
            "TMP",
            param,
            NdArray::dense(vec![288.5, 289.0], vec![1, 2], names(&["y", "x"])),
        );

        assert!(cov.parameter("TMP").is_some());
        assert_eq!(cov.range("TMP").unwrap().values[0], Some(288.5));
        assert_eq!(cov.parameter_keys(), vec!["TMP"]);
    }

    #[test]
    fn test_domain_grid() {
        let domain = Domain::grid(
            vec![-97.5, -97.4, -97.3],
            vec![35.1, 35.2, 35.3],
            None,
            Some(vec![850.0, 700.0, 500.0]),
        );

        assert_eq!(domain.domain_type, DomainType::Grid);
        assert_eq!(domain.axes["x"].len(), 3);
        assert_eq!(domain.axes["z"].len(), 3);
        assert_eq!(domain.axis_values("z").unwrap(), vec![850.0, 700.0, 500.0]);
        assert!(matches!(domain.axis("t"), Err(CovJsonError::AxisNotFound(_))));
    }

    #[test]
    fn test_regular_axis_expansion() {
        let axis = Axis::Regular {
            start: 0.0,
            stop: 10.0,
            num: 6,
        };
        assert_eq!(axis.numeric_values("x").unwrap(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let single = Axis::Regular {
            start: 5.0,
            stop: 5.0,
            num: 1,
        };
        assert_eq!(single.numeric_values("x").unwrap(), vec![5.0]);
    }

    #[test]
    fn test_time_axis_as_millis() {
        let domain = Domain::grid(
            vec![0.0],
            vec![0.0],
            Some(vec![
                "2024-01-01T00:00:00Z".to_string(),
                "2024-01-01T01:00:00Z".to_string(),
            ]),
            None,
        );
        let t = domain.axis_values("t").unwrap();
        assert_eq!(t[1] - t[0], 3_600_000.0);
        assert_eq!(parse_timestamp_millis("2024-01-01").unwrap(), t[0]);
        assert!(matches!(
            parse_timestamp_millis("yesterday"),
            Err(CovJsonError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_trajectory_composite_axis() {
        let domain = Domain::trajectory(vec![
            ("2024-01-01T00:00:00Z".to_string(), 1.0, 10.0),
            ("2024-01-01T00:10:00Z".to_string(), 2.0, 11.0),
        ]);

        let (name, axis, pos) = domain.composite_axis_for("y").unwrap();
        assert_eq!(name, "composite");
        assert_eq!(pos, 2);
        assert_eq!(axis.component_values("x").unwrap(), vec![1.0, 2.0]);
        assert!(matches!(
            domain.axis_values("composite"),
            Err(CovJsonError::NonNumericAxis(_))
        ));
    }

    #[test]
    fn test_axis_deserialization_variants() {
        let json = r#"{
            "type": "Domain",
            "domainType": "Trajectory",
            "axes": {
                "composite": {
                    "dataType": "tuple",
                    "coordinates": ["t", "x", "y"],
                    "values": [["2024-01-01T00:00:00Z", 1, 20], ["2024-01-01T00:10:00Z", 2, 21]]
                },
                "z": { "values": [5] },
                "r": { "start": 0, "stop": 1, "num": 3 }
            }
        }"#;
        let domain: Domain = serde_json::from_str(json).unwrap();
        assert!(matches!(domain.axes["composite"], Axis::Composite { .. }));
        assert!(matches!(domain.axes["z"], Axis::Values { .. }));
        assert!(matches!(domain.axes["r"], Axis::Regular { num: 3, .. }));
    }

    #[test]
    fn test_ndarray_flat_index_row_major() {
        let arr = NdArray::dense(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            vec![1, 2, 3],
            names(&["t", "y", "x"]),
        );

        assert_eq!(arr.flat_index(&[("y", 1), ("x", 2)]).unwrap(), 5);
        assert_eq!(arr.get(&[("x", 1), ("y", 0)]).unwrap(), Some(2.0));
        assert!(matches!(
            arr.flat_index(&[("x", 1)]),
            Err(CovJsonError::MissingIndex(_))
        ));
        assert!(matches!(
            arr.flat_index(&[("y", 2), ("x", 0)]),
            Err(CovJsonError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_ndarray_scalar_and_validation() {
        let arr = NdArray::scalar(None);
        assert_eq!(arr.get(&[]).unwrap(), None);

        let bad = NdArray::dense(vec![1.0, 2.0], vec![3], names(&["x"]));
        assert!(matches!(bad.validate(), Err(CovJsonError::ShapeMismatch(_))));
    }

    #[test]
    fn test_coverage_document_parsing() {
        let json = r#"{
            "type": "Coverage",
            "domain": {
                "type": "Domain",
                "domainType": "Grid",
                "axes": { "x": { "values": [1, 2] }, "y": { "values": [10] } }
            },
            "parameters": {
                "SST": {
                    "type": "Parameter",
                    "observedProperty": { "id": "sst", "label": { "en": "Sea surface temperature" } },
                    "unit": { "symbol": "K" }
                }
            },
            "ranges": {
                "SST": {
                    "type": "NdArray",
                    "dataType": "float",
                    "axisNames": ["y", "x"],
                    "shape": [1, 2],
                    "values": [271.5, null]
                }
            }
        }"#;
        let cov = Coverage::from_json_str(json).unwrap();
        let sst = cov.range("SST").unwrap();
        assert_eq!(sst.values, vec![Some(271.5), None]);
        assert_eq!(cov.parameter("SST").unwrap().observed_property.id.as_deref(), Some("sst"));

        let cov2 = Coverage::from_reader(json.as_bytes()).unwrap();
        assert_eq!(cov, cov2);
    }

    #[test]
    fn test_coverage_collection_is_rejected() {
        let json = r#"{
            "type": "CoverageCollection",
            "domain": {
                "type": "Domain",
                "domainType": "Grid",
                "axes": { "x": { "values": [1] }, "y": { "values": [10] } }
            },
            "parameters": {},
            "ranges": {},
            "coverages": []
        }"#;
        assert!(matches!(Coverage::from_json_str(json), Err(CovJsonError::Json(_))));
    }
}
