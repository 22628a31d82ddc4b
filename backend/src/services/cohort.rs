//! Cohort builder: partition raw pitch rows by pitcher and pitch type.
//!
//! Grouping is a pure function of the input. Enumeration order is
//! first-seen order for both pitchers and pitch types; the table assembler
//! relies on that order to break count ties, so it must stay stable.

use std::collections::HashMap;

use crate::api::PitcherId;
use crate::models::schema::TableSchema;
use crate::models::PitchRecord;

/// All pitches of one type thrown by one pitcher in a batch.
#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    pub pitch_type: String,
    pub rows: Vec<&'a PitchRecord>,
}

impl Cohort<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One pitcher's slice of the batch: the non-sentinel cohorts in first-seen
/// order, plus the grand total used as the `% Thrown` denominator.
#[derive(Debug, Clone)]
pub struct PitcherGroup<'a> {
    pub pitcher_id: PitcherId,
    /// First-seen display name for this pitcher id.
    pub pitcher_name: String,
    /// Every row for this pitcher, sentinel-labeled pitches included.
    pub rows: Vec<&'a PitchRecord>,
    pub cohorts: Vec<Cohort<'a>>,
}

impl<'a> PitcherGroup<'a> {
    /// Total pitches thrown, the `% Thrown` denominator.
    pub fn total_pitches(&self) -> usize {
        self.rows.len()
    }
}

/// Group a batch of rows by pitcher, then by pitch type within a pitcher.
///
/// Sentinel pitch-type labels are dropped from cohort enumeration but still
/// count toward `total_pitches`.
pub fn group<'a>(rows: &'a [PitchRecord], schema: &TableSchema) -> Vec<PitcherGroup<'a>> {
    let mut groups: Vec<PitcherGroup<'a>> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.pitcher_id.value()) {
            Some(&slot) => slot,
            None => {
                groups.push(PitcherGroup {
                    pitcher_id: row.pitcher_id,
                    pitcher_name: row.pitcher.clone(),
                    rows: Vec::new(),
                    cohorts: Vec::new(),
                });
                index.insert(row.pitcher_id.value(), groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.rows.push(row);
        if schema.is_sentinel(&row.pitch_type) {
            continue;
        }
        match group
            .cohorts
            .iter_mut()
            .find(|c| c.pitch_type == row.pitch_type)
        {
            Some(cohort) => cohort.rows.push(row),
            None => group.cohorts.push(Cohort {
                pitch_type: row.pitch_type.clone(),
                rows: vec![row],
            }),
        }
    }

    groups
}

/// Regroup an arbitrary row subset (e.g. one heat-map facet) by pitch type,
/// first-seen order, sentinels excluded.
pub fn group_by_type<'a>(rows: &[&'a PitchRecord], schema: &TableSchema) -> Vec<Cohort<'a>> {
    let mut cohorts: Vec<Cohort<'a>> = Vec::new();
    for &row in rows {
        if schema.is_sentinel(&row.pitch_type) {
            continue;
        }
        match cohorts.iter_mut().find(|c| c.pitch_type == row.pitch_type) {
            Some(cohort) => cohort.rows.push(row),
            None => cohorts.push(Cohort {
                pitch_type: row.pitch_type.clone(),
                rows: vec![row],
            }),
        }
    }
    cohorts
}

/// Find a pitcher's group within a grouped batch.
pub fn find<'a, 'b>(
    groups: &'b [PitcherGroup<'a>],
    pitcher_id: PitcherId,
) -> Option<&'b PitcherGroup<'a>> {
    groups.iter().find(|g| g.pitcher_id == pitcher_id)
}
