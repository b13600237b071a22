use std::collections::BTreeMap;

use teebox_core::course::HoleCount;
use teebox_core::error::EngineError;
use teebox_core::player::PlayerId;

/// Number of players in a wolf game.
pub const WOLF_PLAYERS: usize = 4;

/// The tee order that decides who is wolf on each hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    order: Vec<PlayerId>,
}

impl Rotation {
    /// Use `configured` when given, otherwise the roster order.
    ///
    /// A configured order must contain every rostered player exactly once.
    pub fn new(configured: &[PlayerId], roster: &[PlayerId]) -> Result<Self, EngineError> {
        if configured.is_empty() {
            return Ok(Self {
                order: roster.to_vec(),
            });
        }
        if configured.len() != roster.len() {
            return Err(EngineError::InvalidRotation(format!(
                "rotation lists {} players, roster has {}",
                configured.len(),
                roster.len()
            )));
        }
        for (i, id) in configured.iter().enumerate() {
            if !roster.contains(id) {
                return Err(EngineError::InvalidRotation(format!(
                    "player {id} is not on the roster"
                )));
            }
            if configured[..i].contains(id) {
                return Err(EngineError::InvalidRotation(format!(
                    "player {id} appears more than once"
                )));
            }
        }
        Ok(Self {
            order: configured.to_vec(),
        })
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn position(&self, id: PlayerId) -> Option<usize> {
        self.order.iter().position(|&p| p == id)
    }

    /// Wolf for `hole` by plain rotation.
    pub fn rotating_wolf(&self, hole: u8) -> Option<PlayerId> {
        let len = self.order.len();
        if len == 0 || hole == 0 {
            return None;
        }
        self.order.get(usize::from(hole - 1) % len).copied()
    }

    /// Wolf for `hole` given the points so far.
    ///
    /// On holes 17 and 18 of a full round the player with the fewest points
    /// is wolf, ties going to the earlier rotation position.
    pub fn wolf_for(
        &self,
        hole: u8,
        holes: HoleCount,
        points: &BTreeMap<PlayerId, i32>,
    ) -> Option<PlayerId> {
        if holes == HoleCount::Eighteen && hole >= 17 {
            return self
                .order
                .iter()
                .enumerate()
                .min_by_key(|&(position, id)| (points.get(id).copied().unwrap_or(0), position))
                .map(|(_, &id)| id);
        }
        self.rotating_wolf(hole)
    }

    /// Everyone but `wolf`, in rotation order.
    pub fn others(&self, wolf: PlayerId) -> Vec<PlayerId> {
        self.order.iter().copied().filter(|&p| p != wolf).collect()
    }
}
