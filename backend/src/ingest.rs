//! CSV ingestion for pitch-tracking exports.
//!
//! Reads a header-indexed CSV into [`PitchRecord`]s, failing fast on missing
//! required columns before any aggregation starts. Numeric cells that are
//! empty or not numeric-coercible become missing values rather than zeros.
//! The raw file bytes are checksummed so a batch can be traced back to the
//! exact upload that produced it.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::api::PitcherId;
use crate::error::{ReportError, Result};
use crate::models::schema::TableSchema;
use crate::models::{BatterSide, PitchCall, PitchRecord};

/// Row cap enforced before aggregation.
pub const MAX_ROWS: usize = 50_000;
/// Column cap enforced before aggregation.
pub const MAX_COLUMNS: usize = 200;

/// A fully ingested batch plus the checksum of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedBatch {
    pub rows: Vec<PitchRecord>,
    pub checksum: String,
}

/// Calculate the SHA-256 checksum of raw input content.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Load and parse a CSV export from disk.
pub fn load_csv(path: &Path, schema: &TableSchema) -> Result<LoadedBatch> {
    let bytes = std::fs::read(path)?;
    let checksum = calculate_checksum(&bytes);
    info!(
        "ingesting {} ({} bytes, sha256 {})",
        path.display(),
        bytes.len(),
        checksum
    );
    let rows = parse_rows(bytes.as_slice(), schema)?;
    info!("ingested {} pitch rows from {}", rows.len(), path.display());
    Ok(LoadedBatch { rows, checksum })
}

/// Parse CSV content into pitch records.
///
/// Fails with `MissingField` when a required column is absent, before any
/// row is materialized, and rejects inputs over the row/column caps.
pub fn parse_rows<R: Read>(reader: R, schema: &TableSchema) -> Result<Vec<PitchRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    // Size gate first: an over-wide file is rejected as such even when it
    // is also missing required columns.
    if headers.len() > MAX_COLUMNS {
        return Err(ReportError::InputTooLarge {
            rows: 0,
            columns: headers.len(),
            max_rows: MAX_ROWS,
            max_columns: MAX_COLUMNS,
        });
    }
    let columns = column_index(&headers, schema)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if rows.len() >= MAX_ROWS {
            return Err(ReportError::InputTooLarge {
                rows: rows.len() + 1,
                columns: headers.len(),
                max_rows: MAX_ROWS,
                max_columns: MAX_COLUMNS,
            });
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        rows.push(parse_record(&record, &columns, line)?);
    }

    if rows.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    Ok(rows)
}

/// Map each required column name to its position in the header row.
fn column_index(
    headers: &csv::StringRecord,
    schema: &TableSchema,
) -> Result<HashMap<&'static str, usize>> {
    let mut index = HashMap::new();
    for &name in schema.required_columns() {
        match headers.iter().position(|h| h == name) {
            Some(pos) => {
                index.insert(name, pos);
            }
            None => return Err(ReportError::MissingField(name.to_string())),
        }
    }
    Ok(index)
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &HashMap<&'static str, usize>,
    line: u64,
) -> Result<PitchRecord> {
    let text = |name: &'static str| -> &str { record.get(columns[name]).unwrap_or_default() };
    let numeric = |name: &'static str| -> Option<f64> {
        let cell = text(name);
        if cell.is_empty() {
            return None;
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                debug!("line {}: non-numeric {} value '{}'", line, name, cell);
                None
            }
        }
    };

    let pitcher_id: i64 =
        text("PitcherId")
            .parse()
            .map_err(|_| ReportError::InvalidValue {
                column: "PitcherId".to_string(),
                line,
            })?;

    Ok(PitchRecord {
        pitcher_id: PitcherId::new(pitcher_id),
        pitcher: text("Pitcher").to_string(),
        pitch_type: text("TaggedPitchType").to_string(),
        rel_speed: numeric("RelSpeed"),
        induced_vert_break: numeric("InducedVertBreak"),
        horz_break: numeric("HorzBreak"),
        spin_rate: numeric("SpinRate"),
        vert_appr_angle: numeric("VertApprAngle"),
        horz_appr_angle: numeric("HorzApprAngle"),
        rel_height: numeric("RelHeight"),
        rel_side: numeric("RelSide"),
        extension: numeric("Extension"),
        spin_axis: numeric("SpinAxis"),
        zone_time: numeric("ZoneTime"),
        plate_loc_height: numeric("PlateLocHeight"),
        plate_loc_side: numeric("PlateLocSide"),
        batter_side: BatterSide::from_label(text("BatterSide")),
        pitch_call: PitchCall::from_label(text("PitchCall")),
    })
}
