use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Non-fatal data quality conditions reported alongside a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// Holes past the first incomplete hole already have full scores; they are
    /// not scored until the gap is filled.
    ScoresBeyondGap { first_gap: u8, holes: Vec<u8> },
    /// A press had no explicit start hole, so it was inferred from score timestamps.
    PressStartInferred { press: u64, start_hole: u8 },
    /// The holes recorded before a press was created are not a contiguous run
    /// from the start of its region, so the inferred start may be wrong.
    PressStartAmbiguous { press: u64, recorded_holes: Vec<u8> },
    /// A wolf choice names a different role holder than the rotation gives.
    WolfChoiceMismatch {
        hole: u8,
        expected: PlayerId,
        recorded: PlayerId,
    },
    /// A blind-alone choice was recorded while blind wolf is switched off; it
    /// was scored as a plain alone choice.
    BlindWolfDisabled { hole: u8 },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoresBeyondGap { first_gap, holes } => {
                write!(f, "hole {first_gap} is incomplete; holes {holes:?} wait behind it")
            },
            Self::PressStartInferred { press, start_hole } => {
                write!(f, "press {press} start inferred as hole {start_hole}")
            },
            Self::PressStartAmbiguous {
                press,
                recorded_holes,
            } => write!(
                f,
                "press {press} start is ambiguous; holes recorded before it: {recorded_holes:?}"
            ),
            Self::WolfChoiceMismatch {
                hole,
                expected,
                recorded,
            } => write!(
                f,
                "hole {hole} choice recorded for player {recorded}, rotation gives player {expected}"
            ),
            Self::BlindWolfDisabled { hole } => {
                write!(f, "blind wolf on hole {hole} scored as alone")
            },
        }
    }
}

/// Log a warning and append it to a status's warning list.
pub fn raise(warnings: &mut Vec<DataWarning>, warning: DataWarning) {
    tracing::warn!(%warning, "data quality");
    warnings.push(warning);
}
