//! Versioned column contract for the pitch-tracking export.
//!
//! The upstream export format drifted over time: the undefined-pitch-type
//! sentinel changed spelling and the CS%/SW% table columns were added later.
//! Rather than branching on string literals at each call site, the expected
//! contract is captured here as an explicit schema descriptor.

/// Pitch-type labels that mark a pitch as untyped. Both spellings appear in
/// the wild and both are always excluded from cohort enumeration.
pub const SENTINEL_LABELS: [&str; 2] = ["Undefined", "n/a"];

/// Columns every input batch must carry, in export order.
pub const REQUIRED_COLUMNS: [&str; 18] = [
    "Pitcher",
    "PitcherId",
    "TaggedPitchType",
    "RelSpeed",
    "InducedVertBreak",
    "HorzBreak",
    "SpinRate",
    "VertApprAngle",
    "HorzApprAngle",
    "RelHeight",
    "RelSide",
    "Extension",
    "SpinAxis",
    "ZoneTime",
    "PlateLocHeight",
    "PlateLocSide",
    "BatterSide",
    "PitchCall",
];

/// Known revisions of the export/table contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Original exports: summary table without CS%/SW%.
    V1,
    /// Current exports: summary table includes CS% and SW%.
    V2,
}

/// Expected-column contract for one batch.
#[derive(Debug, Clone)]
pub struct TableSchema {
    version: SchemaVersion,
}

impl TableSchema {
    pub fn v1() -> Self {
        TableSchema {
            version: SchemaVersion::V1,
        }
    }

    pub fn v2() -> Self {
        TableSchema {
            version: SchemaVersion::V2,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Columns that must be present before aggregation begins.
    pub fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED_COLUMNS
    }

    /// Whether the given pitch-type label is an undefined/not-applicable
    /// sentinel. Sentinel rows are excluded from cohorts but still count
    /// toward the pitcher's total for percentage denominators.
    pub fn is_sentinel(&self, label: &str) -> bool {
        SENTINEL_LABELS.iter().any(|s| s.eq_ignore_ascii_case(label))
    }

    /// Whether the output table carries the CS% and SW% columns.
    pub fn includes_swing_breakdown(&self) -> bool {
        self.version == SchemaVersion::V2
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        TableSchema::v2()
    }
}
