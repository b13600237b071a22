//! Handicap stroke allocation.
//!
//! Two reference policies: [`pairwise_strokes`] measures a player against one
//! opponent, [`off_the_low_strokes`] measures the whole field against its
//! lowest handicap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::course::{CourseSetup, HandicapMode};
use crate::error::EngineError;
use crate::player::{Player, PlayerId};

/// Number of strokes a player receives against a reference handicap.
///
/// Only the higher-handicap side receives strokes. The scaled difference is
/// rounded half away from zero.
pub fn strokes_received(player_hcp: f64, reference_hcp: f64, mode: HandicapMode) -> u32 {
    if mode == HandicapMode::None {
        return 0;
    }
    let difference = player_hcp - reference_hcp;
    if difference <= 0.0 || !difference.is_finite() {
        return 0;
    }
    (difference * mode.multiplier()).round() as u32
}

/// Strokes per hole for one player, indexed by hole number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleStrokes([u8; 18]);

impl HoleStrokes {
    /// Strokes on a hole (1-based). Zero for holes outside the card.
    pub fn on(&self, hole: u8) -> u8 {
        usize::from(hole)
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&s| u32::from(s)).sum()
    }
}

/// Spread `total` strokes over the holes of `ranking`, hardest first.
///
/// `ranking[i]` is the difficulty rank of hole `i + 1`. Each pass over the
/// ordered holes hands out one stroke per hole, so totals above the number of
/// holes give the hardest holes a second (or third) stroke.
pub fn allocate_to_holes(total: u32, ranking: &[u8]) -> HoleStrokes {
    let mut strokes = HoleStrokes::default();
    let holes = ranking.len().min(18);
    if total == 0 || holes == 0 {
        return strokes;
    }

    let mut order: Vec<usize> = (0..holes).collect();
    order.sort_by_key(|&i| (ranking[i], i));

    let full_passes = total / holes as u32;
    let remainder = (total % holes as u32) as usize;
    for (pass_index, &hole_index) in order.iter().enumerate() {
        let extra = u32::from(pass_index < remainder);
        strokes.0[hole_index] = (full_passes + extra).min(u32::from(u8::MAX)) as u8;
    }
    strokes
}

/// Per-player stroke allocation for one unit of play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeTable {
    strokes: BTreeMap<PlayerId, HoleStrokes>,
}

impl StrokeTable {
    pub fn insert(&mut self, player: PlayerId, strokes: HoleStrokes) {
        self.strokes.insert(player, strokes);
    }

    pub fn get(&self, player: PlayerId) -> HoleStrokes {
        self.strokes.get(&player).copied().unwrap_or_default()
    }

    /// Net score: gross minus the strokes allocated on that hole.
    pub fn net(&self, player: PlayerId, hole: u8, gross: u8) -> i32 {
        i32::from(gross) - i32::from(self.get(player).on(hole))
    }
}

/// Strokes for both sides of a one-on-one match.
pub fn pairwise_strokes(first: &Player, second: &Player, course: &CourseSetup) -> StrokeTable {
    let ranking = course.stroke_index.ranking(course.holes);
    let mode = course.handicap_mode;
    let mut table = StrokeTable::default();
    table.insert(
        first.id,
        allocate_to_holes(
            strokes_received(first.playing_handicap(), second.playing_handicap(), mode),
            ranking,
        ),
    );
    table.insert(
        second.id,
        allocate_to_holes(
            strokes_received(second.playing_handicap(), first.playing_handicap(), mode),
            ranking,
        ),
    );
    table
}

/// Strokes for every player in `field`, measured off the lowest handicap.
pub fn off_the_low_strokes<'a>(
    field: impl IntoIterator<Item = &'a Player>,
    course: &CourseSetup,
) -> Result<StrokeTable, EngineError> {
    let field: Vec<&Player> = field.into_iter().collect();
    let low = field
        .iter()
        .map(|p| p.playing_handicap())
        .reduce(f64::min)
        .ok_or(EngineError::EmptyRoster)?;

    let ranking = course.stroke_index.ranking(course.holes);
    let mut table = StrokeTable::default();
    for player in field {
        let total = strokes_received(player.playing_handicap(), low, course.handicap_mode);
        table.insert(player.id, allocate_to_holes(total, ranking));
    }
    Ok(table)
}
