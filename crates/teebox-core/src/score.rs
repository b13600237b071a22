use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::course::CourseSetup;
use crate::error::EngineError;
use crate::player::{Player, PlayerId};
use crate::warning::DataWarning;

/// One recorded score row. Unique per (player, hole); corrections are upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub game_id: Uuid,
    pub hole: u8,
    pub player_id: PlayerId,
    pub gross: u8,
    pub recorded_at: DateTime<Utc>,
}

/// The effective score for one (player, hole) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedScore {
    pub gross: u8,
    /// When the cell was first filled in. Corrections do not move it.
    pub first_recorded_at: DateTime<Utc>,
    /// When the effective gross was recorded.
    pub last_recorded_at: DateTime<Utc>,
}

/// Validated, indexed view of a round's score log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorecard {
    game_id: Option<Uuid>,
    cells: BTreeMap<(PlayerId, u8), RecordedScore>,
}

impl Scorecard {
    /// Index a score log, rejecting rows that cannot belong to this round.
    ///
    /// Duplicate rows for one cell resolve to the latest `recorded_at`; ties go
    /// to the row that appears last.
    pub fn build(
        entries: &[ScoreEntry],
        players: &[Player],
        course: &CourseSetup,
    ) -> Result<Self, EngineError> {
        let roster: BTreeSet<PlayerId> = players.iter().map(|p| p.id).collect();
        let mut card = Self::default();

        for entry in entries {
            match card.game_id {
                Some(expected) if expected != entry.game_id => {
                    return Err(EngineError::GameMismatch {
                        expected,
                        found: entry.game_id,
                    });
                },
                Some(_) => {},
                None => card.game_id = Some(entry.game_id),
            }
            if !roster.contains(&entry.player_id) {
                return Err(EngineError::UnknownPlayer(entry.player_id));
            }
            if !course.contains(entry.hole) {
                return Err(EngineError::HoleOutOfRange {
                    hole: entry.hole,
                    hole_count: course.hole_count(),
                });
            }
            if entry.gross == 0 {
                return Err(EngineError::ZeroGross {
                    player: entry.player_id,
                    hole: entry.hole,
                });
            }

            card.cells
                .entry((entry.player_id, entry.hole))
                .and_modify(|cell| {
                    if entry.recorded_at >= cell.last_recorded_at {
                        cell.gross = entry.gross;
                        cell.last_recorded_at = entry.recorded_at;
                    }
                    cell.first_recorded_at = cell.first_recorded_at.min(entry.recorded_at);
                })
                .or_insert(RecordedScore {
                    gross: entry.gross,
                    first_recorded_at: entry.recorded_at,
                    last_recorded_at: entry.recorded_at,
                });
        }
        Ok(card)
    }

    pub fn game_id(&self) -> Option<Uuid> {
        self.game_id
    }

    pub fn recorded(&self, player: PlayerId, hole: u8) -> Option<&RecordedScore> {
        self.cells.get(&(player, hole))
    }

    pub fn gross(&self, player: PlayerId, hole: u8) -> Option<u8> {
        self.recorded(player, hole).map(|cell| cell.gross)
    }

    /// Whether every listed player has a score on `hole`.
    pub fn hole_complete(&self, hole: u8, players: &[PlayerId]) -> bool {
        players.iter().all(|&p| self.cells.contains_key(&(p, hole)))
    }

    /// Whether every listed player had scored `hole` strictly before `at`.
    pub fn hole_recorded_before(&self, hole: u8, players: &[PlayerId], at: DateTime<Utc>) -> bool {
        players.iter().all(|&p| {
            self.recorded(p, hole)
                .is_some_and(|cell| cell.first_recorded_at < at)
        })
    }

    /// Walk `holes` in order, stopping at the first hole any listed player has
    /// not scored.
    pub fn walk(&self, players: &[PlayerId], holes: RangeInclusive<u8>) -> HoleWalk {
        let mut walk = HoleWalk::default();
        for hole in holes {
            let complete = self.hole_complete(hole, players);
            match (walk.first_gap, complete) {
                (None, true) => walk.scored.push(hole),
                (None, false) => walk.first_gap = Some(hole),
                (Some(_), true) => walk.beyond_gap.push(hole),
                (Some(_), false) => {},
            }
        }
        walk
    }
}

/// The sequential-play contract shared by every format.
///
/// Holes are scored strictly in order. The first hole missing any required
/// score ends the walk; complete holes after it are held back and reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoleWalk {
    /// Consecutive fully scored holes from the start of the range.
    pub scored: Vec<u8>,
    /// The first hole missing a score, if any.
    pub first_gap: Option<u8>,
    /// Fully scored holes after the first gap.
    pub beyond_gap: Vec<u8>,
}

impl HoleWalk {
    pub fn gap_warning(&self) -> Option<DataWarning> {
        match self.first_gap {
            Some(first_gap) if !self.beyond_gap.is_empty() => Some(DataWarning::ScoresBeyondGap {
                first_gap,
                holes: self.beyond_gap.clone(),
            }),
            _ => None,
        }
    }
}
