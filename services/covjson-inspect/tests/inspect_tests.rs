//! End-to-end tests over CoverageJSON files on disk.

use std::path::{Path, PathBuf};

use covjson::Coverage;
use covjson_inspect::report::{mask_summary, ExtentReport};
use covjson_inspect::{group_files, load_coverage};
use coverage_subset::{nearest_value, Polygon};
use parameter_sync::SyncConfig;
use tempfile::TempDir;
use test_utils::fixtures::*;

fn write(dir: &Path, name: &str, coverage: &Coverage) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(coverage).unwrap()).unwrap();
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_written_coverage() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "profile.json", &profile_coverage());

    let loaded = load_coverage(&path).unwrap();
    assert_eq!(loaded.parameter_keys(), vec!["PSAL", "TEMP"]);
    assert_eq!(nearest_value(&loaded, "TEMP", &[("z", 840.0)]).unwrap(), Some(280.5));
}

#[test]
fn test_load_reports_bad_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"type\": \"Coverage\"").unwrap();

    let err = load_coverage(&path).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
    assert!(load_coverage(&dir.path().join("absent.json")).is_err());
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_extents_for_all_parameters() {
    let reports = ExtentReport::collect(&profile_coverage(), None).unwrap();
    let keys: Vec<&str> = reports.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["PSAL", "TEMP"]);
    assert_eq!(reports[0].missing, 1);
    assert!(reports[1].to_string().starts_with("TEMP"));
}

#[test]
fn test_mask_trajectory_by_wkt() {
    let polygon = Polygon::from_wkt("POLYGON((1 10, 2 10, 2 20, 1 20, 1 10))").unwrap();
    let (masked, reports) = mask_summary(&trajectory_coverage(), &polygon).unwrap();

    assert_eq!(reports[0].present_before, 4);
    assert_eq!(reports[0].present_after, 2);
    let values = &masked.range("TEMP").unwrap().values;
    assert_eq!(values, &vec![None, Some(290.5), Some(291.0), None]);
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_groups_across_files() {
    let dir = TempDir::new().unwrap();
    let argo = write(dir.path(), "argo.json", &profile_coverage());
    let ship = write(dir.path(), "ship.json", &trajectory_coverage());

    let reports = group_files(&[argo, ship], &SyncConfig::default()).await.unwrap();

    // PSAL alone, TEMP shared by both files
    assert_eq!(reports.len(), 2);
    let temp = reports
        .iter()
        .find(|r| r.observed_property.as_deref() == Some(ids::SEA_WATER_TEMPERATURE))
        .unwrap();
    assert_eq!(temp.layers.len(), 2);
    assert!(temp.layers.iter().all(|l| l.ends_with("#TEMP")));
    assert_eq!(temp.extent, Some((271.0, 291.5)));
}
