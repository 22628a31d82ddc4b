//! Public API surface for the report engine.
//!
//! This file consolidates the DTO types produced by the services layer.
//! All types derive Serialize/Deserialize for JSON serialization.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::schema::TableSchema;

/// Pitcher identifier (TrackMan integer key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PitcherId(pub i64);

impl PitcherId {
    pub fn new(value: i64) -> Self {
        PitcherId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PitcherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PitcherId> for i64 {
    fn from(id: PitcherId) -> Self {
        id.0
    }
}

/// One row of the per-pitcher summary table: a pitch type plus its derived
/// statistics. Means over fields that were missing in every pitch of the
/// cohort stay `None` and render as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub pitch_type: String,
    pub count: usize,
    /// Share of the pitcher's total pitches, sentinel-labeled ones included.
    pub pitch_percent: f64,
    pub avg_velocity: Option<f64>,
    pub avg_ivb: Option<f64>,
    pub avg_hb: Option<f64>,
    pub avg_spin_rate: Option<f64>,
    pub avg_vaa: Option<f64>,
    pub avg_haa: Option<f64>,
    pub avg_rel_height: Option<f64>,
    pub avg_rel_side: Option<f64>,
    pub avg_extension: Option<f64>,
    /// Mean spin axis reformatted as a clock face, e.g. "6:00".
    pub axis: Option<String>,
    pub zone_percent: Option<f64>,
    pub chase_percent: f64,
    pub whiff_percent: f64,
    /// Called-strike-or-swinging rate, as tagged in the source data.
    pub cs_percent: f64,
    pub sw_percent: f64,
}

impl MetricRow {
    /// Column labels in presentation order for the given schema version.
    pub fn column_labels(schema: &TableSchema) -> Vec<&'static str> {
        let mut labels = vec![
            "Pitch Type",
            "Count",
            "% Thrown",
            "Vel.",
            "IVB",
            "HB",
            "Spin",
            "VAA",
            "HAA",
            "vRel",
            "hRel",
            "Ext.",
            "Axis",
            "Zone %",
            "Chase %",
            "Whiff %",
        ];
        if schema.includes_swing_breakdown() {
            labels.push("CS%");
            labels.push("SW%");
        }
        labels
    }

    /// Ordered (label, formatted value) cells for this row. Floats render
    /// with two decimals; missing values render as empty strings.
    pub fn formatted_cells(&self, schema: &TableSchema) -> Vec<(&'static str, String)> {
        fn fmt(value: Option<f64>) -> String {
            match value {
                Some(v) => format!("{:.2}", v),
                None => String::new(),
            }
        }

        let mut cells = vec![
            ("Pitch Type", self.pitch_type.clone()),
            ("Count", self.count.to_string()),
            ("% Thrown", fmt(Some(self.pitch_percent))),
            ("Vel.", fmt(self.avg_velocity)),
            ("IVB", fmt(self.avg_ivb)),
            ("HB", fmt(self.avg_hb)),
            ("Spin", fmt(self.avg_spin_rate)),
            ("VAA", fmt(self.avg_vaa)),
            ("HAA", fmt(self.avg_haa)),
            ("vRel", fmt(self.avg_rel_height)),
            ("hRel", fmt(self.avg_rel_side)),
            ("Ext.", fmt(self.avg_extension)),
            ("Axis", self.axis.clone().unwrap_or_default()),
            ("Zone %", fmt(self.zone_percent)),
            ("Chase %", fmt(Some(self.chase_percent))),
            ("Whiff %", fmt(Some(self.whiff_percent))),
        ];
        if schema.includes_swing_breakdown() {
            cells.push(("CS%", fmt(Some(self.cs_percent))));
            cells.push(("SW%", fmt(Some(self.sw_percent))));
        }
        cells
    }
}

/// Assembled summary table for one pitcher, rows in presentation order
/// (most-thrown pitch first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTable {
    pub pitcher_id: PitcherId,
    pub pitcher_name: String,
    pub rows: Vec<MetricRow>,
}

/// Per-pitcher result within a batch. Image paths are `None` when that
/// render failed; the failure reason is kept in `render_errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherReport {
    pub pitcher_id: PitcherId,
    pub pitcher_name: String,
    pub table: Vec<MetricRow>,
    pub heat_map_path: Option<PathBuf>,
    pub break_map_path: Option<PathBuf>,
    pub render_errors: Vec<String>,
}

/// A pitcher whose table could not be assembled at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherFailure {
    pub pitcher_id: PitcherId,
    pub error: String,
}

/// Complete outcome of one batch request: successful pitcher reports plus
/// isolated per-pitcher failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub request_id: String,
    /// SHA-256 of the raw input file, when the batch came from disk.
    pub input_checksum: Option<String>,
    pub reports: Vec<PitcherReport>,
    pub failures: Vec<PitcherFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::TableSchema;

    fn sample_row() -> MetricRow {
        MetricRow {
            pitch_type: "Fastball".to_string(),
            count: 42,
            pitch_percent: 52.5,
            avg_velocity: Some(91.234),
            avg_ivb: Some(15.1),
            avg_hb: Some(-8.6),
            avg_spin_rate: Some(2250.0),
            avg_vaa: Some(-4.9),
            avg_haa: Some(1.2),
            avg_rel_height: Some(5.9),
            avg_rel_side: Some(-1.8),
            avg_extension: None,
            axis: Some("1:05".to_string()),
            zone_percent: Some(48.0),
            chase_percent: 21.0,
            whiff_percent: 10.5,
            cs_percent: 27.0,
            sw_percent: 8.0,
        }
    }

    #[test]
    fn test_column_labels_order_v2() {
        let labels = MetricRow::column_labels(&TableSchema::v2());
        assert_eq!(labels[0], "Pitch Type");
        assert_eq!(labels[1], "Count");
        assert_eq!(labels[2], "% Thrown");
        assert_eq!(labels[labels.len() - 2], "CS%");
        assert_eq!(labels[labels.len() - 1], "SW%");
        assert_eq!(labels.len(), 18);
    }

    #[test]
    fn test_column_labels_v1_omits_swing_breakdown() {
        let labels = MetricRow::column_labels(&TableSchema::v1());
        assert!(!labels.contains(&"CS%"));
        assert!(!labels.contains(&"SW%"));
        assert_eq!(labels.len(), 16);
    }

    #[test]
    fn test_formatted_cells_two_decimals_and_empty_missing() {
        let row = sample_row();
        let cells = row.formatted_cells(&TableSchema::v2());
        let velocity = &cells.iter().find(|(l, _)| *l == "Vel.").unwrap().1;
        assert_eq!(velocity, "91.23");
        let extension = &cells.iter().find(|(l, _)| *l == "Ext.").unwrap().1;
        assert_eq!(extension, "");
        assert_eq!(
            cells.len(),
            MetricRow::column_labels(&TableSchema::v2()).len()
        );
    }

    #[test]
    fn test_cells_follow_label_order() {
        let row = sample_row();
        let schema = TableSchema::v2();
        let labels = MetricRow::column_labels(&schema);
        let cells = row.formatted_cells(&schema);
        let cell_labels: Vec<&str> = cells.iter().map(|(l, _)| *l).collect();
        assert_eq!(cell_labels, labels);
    }

    #[test]
    fn test_pitcher_id_roundtrip() {
        let id = PitcherId::new(1000066910);
        assert_eq!(id.value(), 1000066910);
        assert_eq!(id.to_string(), "1000066910");
        let json = serde_json::to_string(&id).unwrap();
        let back: PitcherId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_batch_report_serializes() {
        let report = BatchReport {
            request_id: "req-1".to_string(),
            input_checksum: Some("abc123".to_string()),
            reports: vec![],
            failures: vec![PitcherFailure {
                pitcher_id: PitcherId::new(7),
                error: "boom".to_string(),
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("req-1"));
        assert!(json.contains("boom"));
    }
}
