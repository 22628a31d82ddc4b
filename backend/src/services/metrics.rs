//! Metric aggregator: the fixed per-cohort statistic vector.
//!
//! All percentages use the cohort size as denominator except `% Thrown`,
//! which uses the pitcher's grand total (sentinel-labeled pitches included).
//! Means ignore missing measurements; a mean over an all-missing field is
//! itself missing.

use crate::api::MetricRow;
use crate::error::{ReportError, Result};
use crate::models::PitchRecord;
use crate::services::cohort::Cohort;

/// Strike zone vertical extent in feet.
pub const ZONE_HEIGHT_RANGE: (f64, f64) = (1.5, 3.5);
/// Strike zone half-width in feet.
pub const ZONE_SIDE_BOUND: f64 = 0.83;

/// Aggregate one cohort into a table row.
///
/// `pitcher_total` is the pitcher's full row count for the batch. Fails if
/// the cohort is empty; the cohort builder never produces one, but the
/// guard keeps a corrupt upstream from corrupting the table.
pub fn aggregate(
    pitch_type: &str,
    rows: &[&PitchRecord],
    pitcher_total: usize,
) -> Result<MetricRow> {
    if rows.is_empty() {
        return Err(ReportError::EmptyCohort {
            pitch_type: pitch_type.to_string(),
        });
    }

    let n = rows.len();
    let pitch_percent = 100.0 * n as f64 / pitcher_total as f64;

    let chase_count = rows.iter().filter(|r| is_chase(r)).count();
    let whiff_count = rows.iter().filter(|r| r.pitch_call.is_whiff()).count();
    let cs_count = rows
        .iter()
        .filter(|r| r.pitch_call.is_called_or_swinging_strike())
        .count();
    let sw_count = rows
        .iter()
        .filter(|r| r.pitch_call.is_swinging_strike())
        .count();

    Ok(MetricRow {
        pitch_type: pitch_type.to_string(),
        count: n,
        pitch_percent,
        avg_velocity: mean(rows.iter().map(|r| r.rel_speed)),
        avg_ivb: mean(rows.iter().map(|r| r.induced_vert_break)),
        avg_hb: mean(rows.iter().map(|r| r.horz_break)),
        avg_spin_rate: mean(rows.iter().map(|r| r.spin_rate)),
        avg_vaa: mean(rows.iter().map(|r| r.vert_appr_angle)),
        avg_haa: mean(rows.iter().map(|r| r.horz_appr_angle)),
        avg_rel_height: mean(rows.iter().map(|r| r.rel_height)),
        avg_rel_side: mean(rows.iter().map(|r| r.rel_side)),
        avg_extension: mean(rows.iter().map(|r| r.extension)),
        axis: mean(rows.iter().map(|r| r.spin_axis)).map(clock_axis),
        zone_percent: mean(rows.iter().map(|r| r.zone_time)).map(|z| 100.0 * z),
        chase_percent: 100.0 * chase_count as f64 / n as f64,
        whiff_percent: 100.0 * whiff_count as f64 / n as f64,
        cs_percent: 100.0 * cs_count as f64 / n as f64,
        sw_percent: 100.0 * sw_count as f64 / n as f64,
    })
}

/// Aggregate a cohort produced by the cohort builder.
pub fn aggregate_cohort(cohort: &Cohort<'_>, pitcher_total: usize) -> Result<MetricRow> {
    aggregate(&cohort.pitch_type, &cohort.rows, pitcher_total)
}

/// Mean over present values; `None` when every value is missing.
fn mean<I: Iterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// A swing at a pitch outside the strike zone.
///
/// A missing plate coordinate never counts as outside, matching the source
/// data's missing-value comparison semantics.
pub(crate) fn is_chase(row: &PitchRecord) -> bool {
    if !row.pitch_call.is_swing() {
        return false;
    }
    let outside_height = row
        .plate_loc_height
        .map(|h| h < ZONE_HEIGHT_RANGE.0 || h > ZONE_HEIGHT_RANGE.1)
        .unwrap_or(false);
    let outside_side = row
        .plate_loc_side
        .map(|s| s.abs() > ZONE_SIDE_BOUND)
        .unwrap_or(false);
    outside_height || outside_side
}

/// Format a mean spin axis in degrees as a clock face.
///
/// Convention: `H = floor(mean) mod 12`, minutes from the fractional part,
/// rounded and wrapped to [0, 60), zero-padded. 90.0 degrees reads "6:00".
pub(crate) fn clock_axis(degrees: f64) -> String {
    let hours = (degrees.floor() as i64).rem_euclid(12);
    let minutes = ((degrees - degrees.floor()) * 60.0).round() as i64 % 60;
    format!("{}:{:02}", hours, minutes)
}
