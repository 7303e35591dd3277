//! Point-in-polygon tests for spatial masking.
//!
//! Containment uses the even-odd ray casting rule over every ring of the
//! polygon, so hole rings exclude their interior without special casing.
//! Points lying exactly on an edge get whatever answer the crossing test
//! produces for that edge: left and bottom edges of a square tend to count
//! as inside while right and top edges count as outside. Callers that need
//! a closed boundary must buffer the polygon themselves.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsetError};

/// Axis-aligned bounds of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Whether a point falls within the bounds (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// A polygon made of rings of (x, y) vertices.
///
/// The first ring is the outer boundary, further rings are holes. Rings may
/// be open or closed (first vertex repeated at the end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    rings: Vec<Vec<(f64, f64)>>,
}

impl Polygon {
    /// Create a polygon from rings.
    pub fn new(rings: Vec<Vec<(f64, f64)>>) -> Self {
        Self { rings }
    }

    /// Create a single-ring polygon.
    pub fn from_ring(ring: Vec<(f64, f64)>) -> Self {
        Self { rings: vec![ring] }
    }

    /// Create a polygon from GeoJSON-style ring arrays.
    pub fn from_geojson(coordinates: &[Vec<[f64; 2]>]) -> Self {
        Self {
            rings: coordinates
                .iter()
                .map(|ring| ring.iter().map(|p| (p[0], p[1])).collect())
                .collect(),
        }
    }

    /// Parse a WKT POLYGON string.
    ///
    /// Accepts `POLYGON((x1 y1, x2 y2, x3 y3, x1 y1))`, optionally followed
    /// by hole rings: `POLYGON((outer...),(hole...))`.
    pub fn from_wkt(wkt: &str) -> Result<Self> {
        let wkt = wkt.trim();
        if !wkt.to_uppercase().starts_with("POLYGON") {
            return Err(SubsetError::invalid_polygon("Expected POLYGON format"));
        }

        let start = wkt
            .find('(')
            .ok_or_else(|| SubsetError::invalid_polygon("Missing opening parenthesis"))?;
        let end = wkt
            .rfind(')')
            .ok_or_else(|| SubsetError::invalid_polygon("Missing closing parenthesis"))?;
        if end <= start {
            return Err(SubsetError::invalid_polygon("Invalid parenthesis order"));
        }

        let mut rings = Vec::new();
        let mut depth = 0;
        let mut current = String::new();
        for ch in wkt[start + 1..end].chars() {
            match ch {
                '(' => {
                    depth += 1;
                    current.clear();
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        rings.push(parse_ring(current.trim())?);
                    }
                }
                ',' if depth == 0 => {}
                _ if depth > 0 => current.push(ch),
                _ if ch.is_whitespace() => {}
                _ => {
                    return Err(SubsetError::invalid_polygon(format!(
                        "Unexpected character '{}' between rings",
                        ch
                    )))
                }
            }
        }

        if depth != 0 {
            return Err(SubsetError::invalid_polygon("Unbalanced parentheses"));
        }
        if rings.is_empty() {
            return Err(SubsetError::invalid_polygon("POLYGON must contain a ring"));
        }
        Ok(Self { rings })
    }

    /// The rings of this polygon, outer boundary first.
    pub fn rings(&self) -> &[Vec<(f64, f64)>] {
        &self.rings
    }

    /// Bounding box of all vertices, or `None` for a polygon without vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.rings.iter().flatten();
        let &(x0, y0) = points.next()?;
        Some(points.fold(
            Bounds {
                min_x: x0,
                min_y: y0,
                max_x: x0,
                max_y: y0,
            },
            |b, &(x, y)| Bounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        ))
    }

    /// Check if a point is inside the polygon.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.rings
            .iter()
            .fold(false, |inside, ring| inside ^ ring_contains(ring, x, y))
    }
}

/// Check if a point is inside a polygon (even-odd rule).
pub fn contains(x: f64, y: f64, polygon: &Polygon) -> bool {
    polygon.contains(x, y)
}

/// Ray casting against one ring; rings with fewer than 3 vertices contain nothing.
pub fn ring_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

fn parse_ring(coords: &str) -> Result<Vec<(f64, f64)>> {
    let points = coords
        .split(',')
        .map(|pair| {
            let pair = pair.trim();
            let parts: Vec<&str> = pair.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(SubsetError::invalid_polygon(format!(
                    "Expected 'x y' format, got '{}'",
                    pair
                )));
            }
            let parse = |s: &str| {
                s.parse::<f64>().map_err(|_| {
                    SubsetError::invalid_polygon(format!("Invalid coordinate '{}'", s))
                })
            };
            Ok((parse(parts[0])?, parse(parts[1])?))
        })
        .collect::<Result<Vec<_>>>()?;

    if points.len() < 3 {
        return Err(SubsetError::invalid_polygon(
            "Ring must have at least 3 points",
        ));
    }
    Ok(points)
}
