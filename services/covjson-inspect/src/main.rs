//! CoverageJSON inspector
//!
//! Reads CoverageJSON documents from disk and reports legend extents,
//! nearest-coordinate reads, polygon masks and parameter groups.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use coverage_subset::{nearest_value, Polygon};
use covjson_inspect::report::{mask_summary, ExtentReport};
use covjson_inspect::{group_files, load_coverage, parse_coord};
use parameter_sync::SyncConfig;

/// CoverageJSON inspector
#[derive(Parser, Debug)]
#[command(name = "covjson-inspect")]
#[command(about = "Inspect CoverageJSON documents")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "COVJSON_INSPECT_JSON_LOGS", global = true)]
    json_logs: bool,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Legend extent of each range
    Extent {
        file: PathBuf,

        /// Only report this parameter key
        #[arg(short, long)]
        parameter: Option<String>,
    },

    /// Range value nearest to a coordinate
    Sample {
        file: PathBuf,

        /// Parameter key to read
        #[arg(short, long)]
        parameter: String,

        /// Axis coordinate as AXIS=VALUE; repeat per axis
        #[arg(short, long = "coord", value_parser = parse_coord, required = true)]
        coords: Vec<(String, f64)>,
    },

    /// Mask all ranges by a WKT polygon
    Mask {
        file: PathBuf,

        /// POLYGON((x y, ...)) with optional hole rings
        #[arg(long)]
        wkt: String,

        /// Write the masked coverage to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Group the parameters of several documents by equivalence
    Groups {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    debug!(command = ?args.command, "Starting covjson-inspect");

    match &args.command {
        Command::Extent { file, parameter } => {
            let coverage = load_coverage(file)?;
            let reports = ExtentReport::collect(&coverage, parameter.as_deref())
                .with_context(|| format!("Failed to compute extents for {}", file.display()))?;
            print_all(&reports, args.json)?;
        }
        Command::Sample {
            file,
            parameter,
            coords,
        } => {
            let coverage = load_coverage(file)?;
            let query: Vec<(&str, f64)> = coords.iter().map(|(a, v)| (a.as_str(), *v)).collect();
            let value = nearest_value(&coverage, parameter, &query)
                .with_context(|| format!("Failed to read {} from {}", parameter, file.display()))?;
            if args.json {
                println!("{}", serde_json::json!({ "parameter": parameter, "value": value }));
            } else {
                match value {
                    Some(v) => println!("{}: {}", parameter, v),
                    None => println!("{}: missing", parameter),
                }
            }
        }
        Command::Mask { file, wkt, output } => {
            let coverage = load_coverage(file)?;
            let polygon = Polygon::from_wkt(wkt).context("Invalid mask polygon")?;
            let (masked, reports) = mask_summary(&coverage, &polygon)
                .with_context(|| format!("Failed to mask {}", file.display()))?;
            print_all(&reports, args.json)?;

            if let Some(path) = output {
                let out = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                serde_json::to_writer(BufWriter::new(out), &masked)?;
                info!(path = %path.display(), "Wrote masked coverage");
            }
        }
        Command::Groups { files } => {
            let reports = group_files(files, &SyncConfig::from_env()).await?;
            print_all(&reports, args.json)?;
        }
    }

    Ok(())
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_all<T: Serialize + std::fmt::Display>(reports: &[T], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            println!("{}", report);
        }
    }
    Ok(())
}
