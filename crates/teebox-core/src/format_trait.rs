use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::player::Player;
use crate::score::ScoreEntry;
use crate::settlement::Settlement;

/// Contract every wagering format implements.
///
/// Engines are pure: each call recomputes everything from the snapshot it is
/// given and keeps nothing between calls. The caller is responsible for
/// handing over one consistent snapshot.
pub trait WagerFormat: Send + Sync {
    /// Economics and course setup fixed at game start.
    type Settings;
    /// Format-specific rows appended during play (presses, wolf choices).
    type Extras: ?Sized;
    /// Live standing computed from the snapshot.
    type Status;

    /// Format metadata for the game selection screen.
    fn metadata(&self) -> FormatMetadata;

    /// Current standing of every bet in the round.
    fn compute_status(
        &self,
        settings: &Self::Settings,
        players: &[Player],
        scores: &[ScoreEntry],
        extras: &Self::Extras,
    ) -> Result<Self::Status, EngineError>;

    /// Money owed between every pair of players.
    fn compute_settlements(
        &self,
        settings: &Self::Settings,
        players: &[Player],
        scores: &[ScoreEntry],
        extras: &Self::Extras,
    ) -> Result<Vec<Settlement>, EngineError>;
}

/// Format metadata for the game selection screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
}
