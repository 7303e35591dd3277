//! Library side of the `covjson-inspect` CLI.
//!
//! Loading, layer adaptation and report building live here so they can be
//! tested without spawning the binary.

pub mod layer;
pub mod report;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use covjson::Coverage;
use parameter_sync::{GroupEvent, ParameterSync, SyncConfig, SyncService};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::layer::CoverageLayer;
use crate::report::GroupReport;

/// Read a CoverageJSON document from disk.
pub fn load_coverage(path: &Path) -> Result<Coverage> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let coverage = Coverage::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse CoverageJSON from {}", path.display()))?;
    debug!(
        path = %path.display(),
        domain_type = ?coverage.domain.domain_type,
        parameters = coverage.parameters.len(),
        "Loaded coverage"
    );
    Ok(coverage)
}

/// Load every file and group their parameters on a reconciler task.
pub async fn group_files(files: &[PathBuf], config: &SyncConfig) -> Result<Vec<GroupReport>> {
    let (handle, task) = SyncService::spawn(ParameterSync::new(), config);
    let mut events = handle.subscribe();

    for file in files {
        let coverage = load_coverage(file)?;
        let source = file.display().to_string();
        let layers = CoverageLayer::from_coverage(&source, &coverage)
            .with_context(|| format!("Failed to read ranges of {}", source))?;
        for layer in layers {
            let key = layer.key().to_string();
            let group = handle.add_layer(Arc::new(layer)).await?;
            debug!(source = %source, key = %key, group = ?group, "Attached layer");
        }
    }

    loop {
        match events.try_recv() {
            Ok(GroupEvent::Added(view)) => info!(group = %view.id, "Parameter group created"),
            Ok(GroupEvent::Removed(view)) => info!(group = %view.id, "Parameter group removed"),
            Err(TryRecvError::Lagged(n)) => warn!(skipped = n, "Missed group events"),
            Err(_) => break,
        }
    }

    let reports = handle.groups().await?.iter().map(GroupReport::from).collect();

    drop(handle);
    task.await.context("Parameter sync task failed")?;
    Ok(reports)
}

/// Parse `axis=value` pairs such as `x=12.5`.
pub fn parse_coord(s: &str) -> std::result::Result<(String, f64), String> {
    let (axis, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected AXIS=VALUE, got '{}'", s))?;
    let axis = axis.trim();
    if axis.is_empty() {
        return Err(format!("missing axis name in '{}'", s));
    }
    let value = value.trim();
    let number = match value.parse::<f64>() {
        Ok(n) => n,
        Err(_) => covjson::parse_timestamp_millis(value)
            .map_err(|_| format!("'{}' is neither a number nor a timestamp", value))?,
    };
    Ok((axis.to_string(), number))
}
