use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Unique identifier for a player on a round's roster.
pub type PlayerId = u64;

/// A player taking part in a round. Immutable for the duration of the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// The player's own handicap index.
    pub handicap: f64,
    /// Handicap substituted for a guest without a registered index.
    #[serde(default)]
    pub guest_handicap: Option<f64>,
    /// Pairing / ordering position on the roster.
    #[serde(default)]
    pub position: u8,
}

impl Player {
    /// The handicap used for stroke allocation.
    pub fn playing_handicap(&self) -> f64 {
        self.guest_handicap.unwrap_or(self.handicap)
    }
}

/// Check a roster is usable and return it in pairing order (position, then id).
pub fn ordered_roster(players: &[Player]) -> Result<Vec<&Player>, EngineError> {
    if players.is_empty() {
        return Err(EngineError::EmptyRoster);
    }
    let mut seen = BTreeSet::new();
    for player in players {
        if !seen.insert(player.id) {
            return Err(EngineError::DuplicatePlayer(player.id));
        }
        if !player.playing_handicap().is_finite() {
            return Err(EngineError::InvalidHandicap { player: player.id });
        }
    }
    let mut ordered: Vec<&Player> = players.iter().collect();
    ordered.sort_by_key(|p| (p.position, p.id));
    Ok(ordered)
}

/// Every unordered pair of the given ids, in the order they appear.
pub fn unordered_pairs(ids: &[PlayerId]) -> Vec<(PlayerId, PlayerId)> {
    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for (i, &first) in ids.iter().enumerate() {
        for &second in &ids[i + 1..] {
            pairs.push((first, second));
        }
    }
    pairs
}

/// Look up a display name, falling back to the numeric id.
pub fn display_name(players: &[Player], id: PlayerId) -> String {
    players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.display_name.clone())
        .unwrap_or_else(|| format!("Player {id}"))
}
