//! Pitch Report CLI Binary
//!
//! Runs the full batch report over one CSV export and writes the map images
//! plus a JSON summary into the output directory.
//!
//! # Usage
//!
//! ```bash
//! pitchreport <input.csv> <out_dir> [request_id]
//! ```
//!
//! # Environment Variables
//!
//! - `REPORT_CONTOUR_THRESHOLD`: Density contour level in (0, 1) (default: 0.75)
//! - `REPORT_HEAT_MAP_SIZE`: Heat map canvas, `WIDTHxHEIGHT` (default: 1280x640)
//! - `REPORT_BREAK_MAP_SIZE`: Break map canvas, `WIDTHxHEIGHT` (default: 760x760)
//! - `REPORT_KDE_GRID`: Density grid resolution, `NXxNY` (default: 120x120)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use log::info;

use pitchreport::models::schema::TableSchema;
use pitchreport::{ingest, ReportConfig, ReportEngine};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let input: PathBuf = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: pitchreport <input.csv> <out_dir> [request_id]"))?
        .into();
    let out_dir: PathBuf = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: pitchreport <input.csv> <out_dir> [request_id]"))?
        .into();
    let request_id = args.next().unwrap_or_else(|| "report".to_string());

    let config = ReportConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let schema = TableSchema::default();

    let batch = ingest::load_csv(&input, &schema)?;
    let engine = ReportEngine::new(config, schema);
    let report = engine.run_batch(&batch, &out_dir, &request_id)?;

    let summary_path = out_dir.join(format!("{}_report.json", request_id));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&summary_path, json)?;

    info!(
        "request {}: {} pitcher reports, {} failures, summary at {}",
        request_id,
        report.reports.len(),
        report.failures.len(),
        summary_path.display()
    );
    Ok(())
}
