use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of holes played in a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HoleCount {
    Nine,
    #[default]
    Eighteen,
}

impl HoleCount {
    pub fn count(self) -> u8 {
        match self {
            Self::Nine => 9,
            Self::Eighteen => 18,
        }
    }
}

impl TryFrom<u8> for HoleCount {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            9 => Ok(Self::Nine),
            18 => Ok(Self::Eighteen),
            other => Err(EngineError::InvalidHoleCount(other)),
        }
    }
}

impl From<HoleCount> for u8 {
    fn from(value: HoleCount) -> Self {
        value.count()
    }
}

/// How handicap differences turn into strokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandicapMode {
    /// Gross scores only.
    #[default]
    None,
    /// The full difference.
    Full,
    /// 80% of the difference.
    Partial,
}

impl HandicapMode {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Full => 1.0,
            Self::Partial => 0.8,
        }
    }
}

/// Per-hole difficulty ranking for an 18-hole course, 1 = hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct StrokeIndex([u8; 18]);

impl StrokeIndex {
    /// Build from 18 ranks, rejecting anything that is not a permutation of 1..=18.
    pub fn new(ranks: [u8; 18]) -> Result<Self, EngineError> {
        let mut seen = [false; 18];
        for (i, &rank) in ranks.iter().enumerate() {
            if !(1..=18).contains(&rank) {
                return Err(EngineError::InvalidStrokeIndex(format!(
                    "hole {} has rank {rank}",
                    i + 1
                )));
            }
            let slot = usize::from(rank - 1);
            if seen[slot] {
                return Err(EngineError::InvalidStrokeIndex(format!(
                    "rank {rank} is used more than once"
                )));
            }
            seen[slot] = true;
        }
        Ok(Self(ranks))
    }

    /// Rank of a hole (1-based). Holes outside 1..=18 rank last.
    pub fn rank(&self, hole: u8) -> u8 {
        usize::from(hole)
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(u8::MAX)
    }

    /// Ranks of the first `hole_count` holes, indexed by hole - 1.
    pub fn ranking(&self, hole_count: HoleCount) -> &[u8] {
        &self.0[..usize::from(hole_count.count())]
    }
}

impl Default for StrokeIndex {
    fn default() -> Self {
        let mut ranks = [0u8; 18];
        for (i, rank) in ranks.iter_mut().enumerate() {
            *rank = i as u8 + 1;
        }
        Self(ranks)
    }
}

impl TryFrom<Vec<u8>> for StrokeIndex {
    type Error = EngineError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let len = value.len();
        let ranks: [u8; 18] = value.try_into().map_err(|_| {
            EngineError::InvalidStrokeIndex(format!("expected 18 entries, found {len}"))
        })?;
        Self::new(ranks)
    }
}

impl From<StrokeIndex> for Vec<u8> {
    fn from(value: StrokeIndex) -> Self {
        value.0.to_vec()
    }
}

/// The course-level settings every format shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSetup {
    pub holes: HoleCount,
    pub handicap_mode: HandicapMode,
    pub stroke_index: StrokeIndex,
}

impl CourseSetup {
    pub fn hole_count(&self) -> u8 {
        self.holes.count()
    }

    pub fn holes(&self) -> RangeInclusive<u8> {
        1..=self.hole_count()
    }

    pub fn contains(&self, hole: u8) -> bool {
        self.holes().contains(&hole)
    }

    pub fn is_last_hole(&self, hole: u8) -> bool {
        hole == self.hole_count()
    }
}
