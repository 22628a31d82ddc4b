//! Report assembly and batch orchestration.
//!
//! `assemble` turns one pitcher's cohorts into the ordered summary table;
//! `ReportEngine::run_batch` walks every pitcher in a loaded batch, writes
//! the two map images, and collects per-pitcher outcomes. One pitcher's
//! failure never aborts the rest of the batch.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::api::{BatchReport, PitcherFailure, PitcherId, PitcherReport, ReportTable};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::ingest::LoadedBatch;
use crate::models::schema::TableSchema;
use crate::models::PitchRecord;
use crate::services::break_map::render_break_map;
use crate::services::cohort::{self, PitcherGroup};
use crate::services::heat_map::render_heat_map;
use crate::services::metrics;
use crate::services::palette::PitchPalette;

/// Build one pitcher's summary table, rows ordered most-thrown first.
///
/// The sort is stable, so pitch types with equal counts keep their
/// first-seen order from the input.
pub fn assemble(group: &PitcherGroup<'_>) -> Result<ReportTable> {
    let total = group.total_pitches();
    let mut rows = Vec::with_capacity(group.cohorts.len());
    for cohort in &group.cohorts {
        rows.push(metrics::aggregate_cohort(cohort, total)?);
    }
    rows.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(ReportTable {
        pitcher_id: group.pitcher_id,
        pitcher_name: group.pitcher_name.clone(),
        rows,
    })
}

/// Build the table for a single pitcher id out of a raw batch.
pub fn assemble_for(
    rows: &[PitchRecord],
    pitcher_id: PitcherId,
    schema: &TableSchema,
) -> Result<ReportTable> {
    let groups = cohort::group(rows, schema);
    let group = cohort::find(&groups, pitcher_id)
        .ok_or(ReportError::UnknownPitcher(pitcher_id))?;
    assemble(group)
}

/// Heat map file name for one pitcher within a request.
pub fn heat_map_filename(request_id: &str, pitcher_id: PitcherId) -> String {
    format!("{}_pitcher_{}_heat_map.png", request_id, pitcher_id)
}

/// Break map file name for one pitcher within a request.
pub fn break_map_filename(request_id: &str, pitcher_id: PitcherId) -> String {
    format!("{}_pitcher_{}_break_map.png", request_id, pitcher_id)
}

/// Batch report runner: owns the settings shared by every pitcher in a run.
pub struct ReportEngine {
    pub config: ReportConfig,
    pub schema: TableSchema,
    pub palette: PitchPalette,
}

impl ReportEngine {
    pub fn new(config: ReportConfig, schema: TableSchema) -> Self {
        ReportEngine {
            config,
            schema,
            palette: PitchPalette::default(),
        }
    }

    /// Run the full report over a loaded batch, writing map images under
    /// `out_dir`.
    ///
    /// A pitcher whose table cannot be assembled lands in `failures`; a
    /// pitcher whose table assembles but whose image rendering fails keeps
    /// the table, a `None` path for the failed image, and the reason in
    /// `render_errors`.
    pub fn run_batch(
        &self,
        batch: &LoadedBatch,
        out_dir: &Path,
        request_id: &str,
    ) -> Result<BatchReport> {
        std::fs::create_dir_all(out_dir)?;
        let groups = cohort::group(&batch.rows, &self.schema);
        info!(
            "request {}: {} pitchers, {} rows",
            request_id,
            groups.len(),
            batch.rows.len()
        );

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for group in &groups {
            match self.run_pitcher(group, out_dir, request_id) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!(
                        "request {}: pitcher {} failed: {}",
                        request_id, group.pitcher_id, err
                    );
                    failures.push(PitcherFailure {
                        pitcher_id: group.pitcher_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok(BatchReport {
            request_id: request_id.to_string(),
            input_checksum: Some(batch.checksum.clone()),
            reports,
            failures,
        })
    }

    fn run_pitcher(
        &self,
        group: &PitcherGroup<'_>,
        out_dir: &Path,
        request_id: &str,
    ) -> Result<PitcherReport> {
        let table = assemble(group)?;

        let mut render_errors = Vec::new();
        let heat_map_path = self.render_image(
            out_dir.join(heat_map_filename(request_id, group.pitcher_id)),
            &mut render_errors,
            |path| render_heat_map(group, path, &self.config, &self.palette, &self.schema),
        );
        let break_map_path = self.render_image(
            out_dir.join(break_map_filename(request_id, group.pitcher_id)),
            &mut render_errors,
            |path| render_break_map(group, path, &self.config, &self.palette, &self.schema),
        );

        Ok(PitcherReport {
            pitcher_id: table.pitcher_id,
            pitcher_name: table.pitcher_name,
            table: table.rows,
            heat_map_path,
            break_map_path,
            render_errors,
        })
    }

    fn render_image<F>(
        &self,
        path: PathBuf,
        render_errors: &mut Vec<String>,
        render: F,
    ) -> Option<PathBuf>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        match render(&path) {
            Ok(()) => Some(path),
            Err(err) => {
                warn!("render failed for {}: {}", path.display(), err);
                render_errors.push(err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::calculate_checksum;
    use crate::models::{BatterSide, PitchCall};

    fn record(pitcher_id: i64, pitch_type: &str) -> PitchRecord {
        PitchRecord {
            pitcher_id: PitcherId::new(pitcher_id),
            pitcher: "Doe, Jane".to_string(),
            pitch_type: pitch_type.to_string(),
            rel_speed: Some(90.0),
            induced_vert_break: Some(12.0),
            horz_break: Some(-6.0),
            spin_rate: Some(2200.0),
            vert_appr_angle: None,
            horz_appr_angle: None,
            rel_height: None,
            rel_side: None,
            extension: None,
            spin_axis: Some(187.25),
            zone_time: Some(0.5),
            plate_loc_height: Some(2.5),
            plate_loc_side: Some(0.2),
            batter_side: Some(BatterSide::Right),
            pitch_call: PitchCall::StrikeCalled,
        }
    }

    fn repeat(pitcher_id: i64, pitch_type: &str, n: usize) -> Vec<PitchRecord> {
        (0..n).map(|_| record(pitcher_id, pitch_type)).collect()
    }

    #[test]
    fn test_rows_ordered_most_thrown_first() {
        let mut rows = repeat(1, "Slider", 3);
        rows.extend(repeat(1, "Fastball", 7));
        rows.extend(repeat(1, "Changeup", 5));
        let table = assemble_for(&rows, PitcherId::new(1), &TableSchema::default()).unwrap();
        let order: Vec<&str> = table.rows.iter().map(|r| r.pitch_type.as_str()).collect();
        assert_eq!(order, vec!["Fastball", "Changeup", "Slider"]);
    }

    #[test]
    fn test_count_ties_keep_first_seen_order() {
        let mut rows = repeat(1, "Curveball", 4);
        rows.extend(repeat(1, "Splitter", 4));
        let table = assemble_for(&rows, PitcherId::new(1), &TableSchema::default()).unwrap();
        let order: Vec<&str> = table.rows.iter().map(|r| r.pitch_type.as_str()).collect();
        assert_eq!(order, vec!["Curveball", "Splitter"]);
    }

    #[test]
    fn test_percent_thrown_sums_to_hundred_without_sentinels() {
        let mut rows = repeat(1, "Fastball", 6);
        rows.extend(repeat(1, "Slider", 4));
        let table = assemble_for(&rows, PitcherId::new(1), &TableSchema::default()).unwrap();
        let total: f64 = table.rows.iter().map(|r| r.pitch_percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentinel_rows_dilute_percent_thrown() {
        let mut rows = repeat(1, "Fastball", 6);
        rows.extend(repeat(1, "Undefined", 4));
        let table = assemble_for(&rows, PitcherId::new(1), &TableSchema::default()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!((table.rows[0].pitch_percent - 60.0).abs() < 1e-9);
        let total: f64 = table.rows.iter().map(|r| r.pitch_percent).sum();
        assert!(total < 100.0);
    }

    #[test]
    fn test_counts_plus_sentinels_cover_batch() {
        let mut rows = repeat(1, "Fastball", 6);
        rows.extend(repeat(1, "n/a", 2));
        rows.extend(repeat(1, "Slider", 3));
        let schema = TableSchema::default();
        let table = assemble_for(&rows, PitcherId::new(1), &schema).unwrap();
        let counted: usize = table.rows.iter().map(|r| r.count).sum();
        assert_eq!(counted + 2, rows.len());
    }

    #[test]
    fn test_unknown_pitcher_rejected() {
        let rows = repeat(1, "Fastball", 3);
        let err = assemble_for(&rows, PitcherId::new(99), &TableSchema::default()).unwrap_err();
        assert!(matches!(err, ReportError::UnknownPitcher(id) if id == PitcherId::new(99)));
    }

    #[test]
    fn test_filename_contract() {
        let id = PitcherId::new(1000066910);
        assert_eq!(
            heat_map_filename("req-7", id),
            "req-7_pitcher_1000066910_heat_map.png"
        );
        assert_eq!(
            break_map_filename("req-7", id),
            "req-7_pitcher_1000066910_break_map.png"
        );
    }

    #[test]
    fn test_run_batch_writes_images_and_reports() {
        let mut rows = repeat(1, "Fastball", 25);
        rows.extend(repeat(2, "Slider", 3));
        let batch = LoadedBatch {
            checksum: calculate_checksum(b"fixture"),
            rows,
        };
        let dir = tempfile::tempdir().unwrap();
        let engine = ReportEngine::new(ReportConfig::default(), TableSchema::default());

        let report = engine.run_batch(&batch, dir.path(), "req-1").unwrap();

        assert_eq!(report.request_id, "req-1");
        assert_eq!(report.reports.len(), 2);
        assert!(report.failures.is_empty());
        for pitcher in &report.reports {
            assert!(pitcher.render_errors.is_empty());
            let heat = pitcher.heat_map_path.as_ref().unwrap();
            let brk = pitcher.break_map_path.as_ref().unwrap();
            assert!(heat.exists());
            assert!(brk.exists());
        }
        assert_eq!(
            report.reports[0].heat_map_path.as_deref(),
            Some(dir.path().join("req-1_pitcher_1_heat_map.png").as_path())
        );
    }

    #[test]
    fn test_batch_keeps_table_when_render_fails() {
        // An unwritable output directory fails both renders; the table and
        // the recorded reasons survive.
        let rows = repeat(1, "Fastball", 5);
        let batch = LoadedBatch {
            checksum: calculate_checksum(b"fixture"),
            rows,
        };
        let engine = ReportEngine::new(ReportConfig::default(), TableSchema::default());
        let groups = cohort::group(&batch.rows, &engine.schema);
        let out = Path::new("/nonexistent-root/out");

        let report = engine.run_pitcher(&groups[0], out, "req-1").unwrap();

        assert_eq!(report.table.len(), 1);
        assert!(report.heat_map_path.is_none());
        assert!(report.break_map_path.is_none());
        assert_eq!(report.render_errors.len(), 2);
    }

    #[test]
    fn test_batch_checksum_carried_through() {
        let batch = LoadedBatch {
            checksum: calculate_checksum(b"fixture"),
            rows: repeat(1, "Fastball", 2),
        };
        let dir = tempfile::tempdir().unwrap();
        let engine = ReportEngine::new(ReportConfig::default(), TableSchema::default());
        let report = engine.run_batch(&batch, dir.path(), "req-9").unwrap();
        assert_eq!(report.input_checksum.as_deref(), Some(batch.checksum.as_str()));
    }
}
