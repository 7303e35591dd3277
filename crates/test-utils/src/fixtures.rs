//! Common test fixtures for coverage tests.
//!
//! Parameters and small coverages that mirror the data the layers display:
//! gridded ocean temperature, vertical profiles and ship trajectories.

use covjson::{Category, Coverage, Domain, NdArray, ObservedProperty, Parameter, Unit};

use crate::generators::sequential_grid;

/// Observed property identifiers used by the fixtures.
pub mod ids {
    /// CF standard name for sea water temperature
    pub const SEA_WATER_TEMPERATURE: &str =
        "http://vocab.nerc.ac.uk/standard_name/sea_water_temperature/";

    /// CF standard name for practical salinity
    pub const SEA_WATER_PRACTICAL_SALINITY: &str =
        "http://vocab.nerc.ac.uk/standard_name/sea_water_practical_salinity/";

    /// CF standard name for absolute salinity
    pub const SEA_WATER_ABSOLUTE_SALINITY: &str =
        "http://vocab.nerc.ac.uk/standard_name/sea_water_absolute_salinity/";

    /// Land cover classification
    pub const LAND_COVER: &str = "http://example.org/def/land-cover";

    /// UCUM Kelvin
    pub const UNIT_KELVIN: &str = "http://www.opengis.net/def/uom/UCUM/K";

    /// UCUM degree Celsius
    pub const UNIT_CELSIUS: &str = "http://www.opengis.net/def/uom/UCUM/Cel";
}

/// A polygon ring covering x in [1, 2] and y in [10, 20].
pub const RECTANGLE: [(f64, f64); 4] = [(1.0, 10.0), (2.0, 10.0), (2.0, 20.0), (1.0, 20.0)];

fn sea_water_temperature() -> ObservedProperty {
    ObservedProperty::new("Sea water temperature").with_id(ids::SEA_WATER_TEMPERATURE)
}

/// Sea water temperature in Kelvin.
pub fn sea_temperature() -> Parameter {
    Parameter::new(sea_water_temperature()).with_unit(Unit::kelvin().with_id(ids::UNIT_KELVIN))
}

/// Sea water temperature in degrees Celsius.
pub fn sea_temperature_celsius() -> Parameter {
    Parameter::new(sea_water_temperature()).with_unit(Unit::celsius().with_id(ids::UNIT_CELSIUS))
}

/// Practical salinity (dimensionless PSS-78).
pub fn practical_salinity() -> Parameter {
    Parameter::new(ObservedProperty::new("Salinity").with_id(ids::SEA_WATER_PRACTICAL_SALINITY))
        .with_unit(Unit::practical_salinity())
}

/// Absolute salinity, labelled like practical salinity but a different quantity.
pub fn absolute_salinity() -> Parameter {
    Parameter::new(ObservedProperty::new("Salinity").with_id(ids::SEA_WATER_ABSOLUTE_SALINITY))
        .with_unit(Unit::practical_salinity())
}

/// Categorical land cover parameter.
pub fn land_cover() -> Parameter {
    Parameter::new(ObservedProperty::new("Land cover").with_id(ids::LAND_COVER)).with_categories(
        vec![
            Category::new("water", "Water").with_color("#1f78b4"),
            Category::new("forest", "Forest").with_color("#33a02c"),
            Category::new("urban", "Urban").with_color("#e31a1c"),
        ],
    )
}

fn names(n: &[&str]) -> Vec<String> {
    n.iter().map(|s| s.to_string()).collect()
}

/// A `width` x `height` grid over x in [0, width) and y in [0, height).
///
/// The `SST` range holds [`sequential_grid`] values.
pub fn grid_coverage(width: usize, height: usize) -> Coverage {
    let xs = (0..width).map(|i| i as f64).collect();
    let ys = (0..height).map(|j| j as f64).collect();
    Coverage::new(Domain::grid(xs, ys, None, None)).with_parameter(
        "SST",
        sea_temperature(),
        NdArray::new(sequential_grid(width, height), vec![height, width], names(&["y", "x"])),
    )
}

/// A temperature and salinity profile at (-20, 45) with a descending pressure-like axis.
pub fn profile_coverage() -> Coverage {
    Coverage::new(Domain::vertical_profile(-20.0, 45.0, vec![1000.0, 850.0, 700.0, 500.0]))
        .with_parameter(
            "TEMP",
            sea_temperature(),
            NdArray::new(
                vec![Some(285.0), Some(280.5), None, Some(271.0)],
                vec![4],
                names(&["z"]),
            ),
        )
        .with_parameter(
            "PSAL",
            practical_salinity(),
            NdArray::new(
                vec![Some(35.1), Some(35.0), Some(34.8), None],
                vec![4],
                names(&["z"]),
            ),
        )
}

/// A four-point ship track crossing x = 1.5.
pub fn trajectory_coverage() -> Coverage {
    let points = vec![
        ("2024-01-15T12:00:00Z".to_string(), 0.5, 15.0),
        ("2024-01-15T12:10:00Z".to_string(), 1.2, 15.0),
        ("2024-01-15T12:20:00Z".to_string(), 1.8, 16.0),
        ("2024-01-15T12:30:00Z".to_string(), 2.5, 16.0),
    ];
    Coverage::new(Domain::trajectory(points)).with_parameter(
        "TEMP",
        sea_temperature(),
        NdArray::dense(vec![290.0, 290.5, 291.0, 291.5], vec![4], names(&["composite"])),
    )
}
