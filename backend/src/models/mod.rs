//! Domain model for per-pitch tracking rows.

pub mod schema;

use serde::{Deserialize, Serialize};

use crate::api::PitcherId;

/// Handedness of the batter facing the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatterSide {
    Left,
    Right,
}

impl BatterSide {
    /// Parse the export's string value. Unrecognized values yield `None`;
    /// such rows are kept in the table metrics but fall outside both
    /// heat-map facets.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Left" => Some(BatterSide::Left),
            "Right" => Some(BatterSide::Right),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BatterSide::Left => "Left",
            BatterSide::Right => "Right",
        }
    }
}

/// Umpire/outcome call for one pitch. Calls not used by any metric are kept
/// verbatim under `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchCall {
    StrikeCalled,
    StrikeSwinging,
    FoulBallNotFieldable,
    InPlay,
    HitByPitch,
    BallCalled,
    Other(String),
}

impl PitchCall {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "StrikeCalled" => PitchCall::StrikeCalled,
            "StrikeSwinging" => PitchCall::StrikeSwinging,
            "FoulBallNotFieldable" => PitchCall::FoulBallNotFieldable,
            "InPlay" => PitchCall::InPlay,
            "HitByPitch" => PitchCall::HitByPitch,
            "BallCalled" => PitchCall::BallCalled,
            other => PitchCall::Other(other.to_string()),
        }
    }

    /// Calls that count as the batter offering at the pitch.
    pub fn is_swing(&self) -> bool {
        matches!(
            self,
            PitchCall::StrikeSwinging
                | PitchCall::FoulBallNotFieldable
                | PitchCall::InPlay
                | PitchCall::HitByPitch
        )
    }

    /// Swing-and-miss calls (whiffs).
    pub fn is_whiff(&self) -> bool {
        matches!(
            self,
            PitchCall::StrikeSwinging | PitchCall::FoulBallNotFieldable
        )
    }

    /// Called-or-swinging strike, the combined rate tagged CS% upstream.
    pub fn is_called_or_swinging_strike(&self) -> bool {
        matches!(self, PitchCall::StrikeCalled | PitchCall::StrikeSwinging)
    }

    pub fn is_swinging_strike(&self) -> bool {
        matches!(self, PitchCall::StrikeSwinging)
    }
}

/// One row of the input batch: a single tracked pitch.
///
/// Numeric measurements are `Option<f64>`: a cell that was empty or not
/// numeric-coercible is missing, and means over all-missing cohorts stay
/// missing rather than collapsing to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub pitcher_id: PitcherId,
    /// Display name; the first-seen value per pitcher id is authoritative.
    pub pitcher: String,
    pub pitch_type: String,
    pub rel_speed: Option<f64>,
    pub induced_vert_break: Option<f64>,
    pub horz_break: Option<f64>,
    pub spin_rate: Option<f64>,
    pub vert_appr_angle: Option<f64>,
    pub horz_appr_angle: Option<f64>,
    pub rel_height: Option<f64>,
    pub rel_side: Option<f64>,
    pub extension: Option<f64>,
    /// Spin axis in degrees.
    pub spin_axis: Option<f64>,
    /// Fraction of flight time spent in the strike zone.
    pub zone_time: Option<f64>,
    pub plate_loc_height: Option<f64>,
    pub plate_loc_side: Option<f64>,
    pub batter_side: Option<BatterSide>,
    pub pitch_call: PitchCall,
}

impl PitchRecord {
    /// Plate-crossing location, when both coordinates were measured.
    pub fn plate_location(&self) -> Option<(f64, f64)> {
        match (self.plate_loc_side, self.plate_loc_height) {
            (Some(side), Some(height)) => Some((side, height)),
            _ => None,
        }
    }

    /// Movement point (horizontal break, induced vertical break), when both
    /// components were measured.
    pub fn break_point(&self) -> Option<(f64, f64)> {
        match (self.horz_break, self.induced_vert_break) {
            (Some(hb), Some(ivb)) => Some((hb, ivb)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batter_side_parsing() {
        assert_eq!(BatterSide::from_label("Left"), Some(BatterSide::Left));
        assert_eq!(BatterSide::from_label("Right"), Some(BatterSide::Right));
        assert_eq!(BatterSide::from_label("Switch"), None);
        assert_eq!(BatterSide::from_label(""), None);
    }

    #[test]
    fn test_pitch_call_swing_sets() {
        assert!(PitchCall::StrikeSwinging.is_swing());
        assert!(PitchCall::FoulBallNotFieldable.is_swing());
        assert!(PitchCall::InPlay.is_swing());
        assert!(PitchCall::HitByPitch.is_swing());
        assert!(!PitchCall::StrikeCalled.is_swing());
        assert!(!PitchCall::BallCalled.is_swing());

        assert!(PitchCall::StrikeSwinging.is_whiff());
        assert!(PitchCall::FoulBallNotFieldable.is_whiff());
        assert!(!PitchCall::InPlay.is_whiff());

        assert!(PitchCall::StrikeCalled.is_called_or_swinging_strike());
        assert!(PitchCall::StrikeSwinging.is_called_or_swinging_strike());
        assert!(!PitchCall::FoulBallNotFieldable.is_called_or_swinging_strike());

        assert!(PitchCall::StrikeSwinging.is_swinging_strike());
        assert!(!PitchCall::StrikeCalled.is_swinging_strike());
    }

    #[test]
    fn test_unknown_call_preserved() {
        let call = PitchCall::from_label("BallinDirt");
        assert_eq!(call, PitchCall::Other("BallinDirt".to_string()));
        assert!(!call.is_swing());
    }

    #[test]
    fn test_paired_coordinates_require_both_components() {
        let mut record = PitchRecord {
            pitcher_id: PitcherId::new(1),
            pitcher: "Doe, Jane".to_string(),
            pitch_type: "Slider".to_string(),
            rel_speed: None,
            induced_vert_break: Some(2.0),
            horz_break: None,
            spin_rate: None,
            vert_appr_angle: None,
            horz_appr_angle: None,
            rel_height: None,
            rel_side: None,
            extension: None,
            spin_axis: None,
            zone_time: None,
            plate_loc_height: Some(2.5),
            plate_loc_side: Some(-0.3),
            batter_side: Some(BatterSide::Left),
            pitch_call: PitchCall::BallCalled,
        };
        assert_eq!(record.plate_location(), Some((-0.3, 2.5)));
        assert_eq!(record.break_point(), None);
        record.horz_break = Some(-6.0);
        assert_eq!(record.break_point(), Some((-6.0, 2.0)));
    }
}
