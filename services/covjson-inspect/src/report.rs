//! Serializable reports printed by the CLI.

use std::fmt;

use covjson::{Coverage, I18nString, Parameter};
use coverage_subset::{mask_by_polygon, range_extent, Polygon};
use parameter_sync::{GroupView, ParameterSource};
use serde::Serialize;

use crate::layer::CoverageLayer;

fn unit_text(parameter: &Parameter) -> Option<String> {
    let unit = parameter.unit.as_ref()?;
    unit.symbol
        .as_ref()
        .map(|s| s.value().to_string())
        .or_else(|| unit.label.as_ref().map(|l| l.text().to_string()))
        .or_else(|| unit.id.clone())
}

fn label_text(parameter: &Parameter) -> Option<String> {
    parameter.display_label().map(str::to_string)
}

/// Legend extent of one range.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtentReport {
    pub key: String,
    pub label: Option<String>,
    pub unit: Option<String>,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub missing: usize,
    pub total: usize,
}

impl ExtentReport {
    /// Extents of every range in `coverage`, or just `only` when given.
    pub fn collect(coverage: &Coverage, only: Option<&str>) -> coverage_subset::Result<Vec<Self>> {
        let keys: Vec<&str> = match only {
            Some(key) => vec![key],
            None => coverage.parameter_keys(),
        };

        let mut reports = Vec::with_capacity(keys.len());
        for key in keys {
            let extent = range_extent(coverage, key)?;
            let (missing, total) = coverage
                .range(key)
                .map(|r| (r.values.iter().filter(|v| v.is_none()).count(), r.values.len()))
                .unwrap_or((0, 0));
            let parameter = coverage.parameter(key);
            reports.push(Self {
                key: key.to_string(),
                label: parameter.and_then(|p| label_text(p)),
                unit: parameter.and_then(|p| unit_text(p)),
                min: extent.map(|(lo, _)| lo),
                max: extent.map(|(_, hi)| hi),
                missing,
                total,
            });
        }
        Ok(reports)
    }
}

impl fmt::Display for ExtentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(label) = &self.label {
            write!(f, " ({})", label)?;
        }
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => write!(f, ": {} .. {}", lo, hi)?,
            _ => write!(f, ": no values")?,
        }
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        write!(f, " [{}/{} missing]", self.missing, self.total)
    }
}

/// Effect of a polygon mask on one range.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaskReport {
    pub key: String,
    pub present_before: usize,
    pub present_after: usize,
}

impl fmt::Display for MaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} values inside",
            self.key, self.present_after, self.present_before
        )
    }
}

/// Mask `coverage` by `polygon`, returning the masked copy and per-range counts.
pub fn mask_summary(
    coverage: &Coverage,
    polygon: &Polygon,
) -> coverage_subset::Result<(Coverage, Vec<MaskReport>)> {
    let masked = mask_by_polygon(coverage, polygon)?;
    let present = |cov: &Coverage, key: &str| {
        cov.range(key)
            .map(|r| r.values.iter().filter(|v| v.is_some()).count())
            .unwrap_or(0)
    };

    let reports = coverage
        .parameter_keys()
        .into_iter()
        .filter(|key| coverage.range(key).is_some())
        .map(|key| MaskReport {
            key: key.to_string(),
            present_before: present(coverage, key),
            present_after: present(&masked, key),
        })
        .collect();
    Ok((masked, reports))
}

/// One parameter group across all loaded files.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupReport {
    pub id: String,
    pub observed_property: Option<String>,
    pub label: Option<String>,
    pub unit: Option<String>,
    pub layers: Vec<String>,
    pub extent: Option<(f64, f64)>,
}

impl From<&GroupView<CoverageLayer>> for GroupReport {
    fn from(view: &GroupView<CoverageLayer>) -> Self {
        Self {
            id: view.id.to_string(),
            observed_property: view.parameter.observed_property.id.clone(),
            label: view
                .parameter
                .observed_property
                .label
                .as_ref()
                .map(I18nString::text)
                .map(str::to_string),
            unit: unit_text(&view.parameter),
            layers: view.layers().iter().map(|l| l.layer_id().to_string()).collect(),
            extent: view.combined_extent(),
        }
    }
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(label) = &self.label {
            write!(f, " {}", label)?;
        }
        if let Some(unit) = &self.unit {
            write!(f, " [{}]", unit)?;
        }
        if let Some((lo, hi)) = self.extent {
            write!(f, " {} .. {}", lo, hi)?;
        }
        for layer in &self.layers {
            write!(f, "\n  {}", layer)?;
        }
        Ok(())
    }
}
