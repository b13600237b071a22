use thiserror::Error;
use uuid::Uuid;

use crate::player::PlayerId;

/// Inputs an engine refuses to score.
///
/// Missing scores are never an error: they yield a partial status. These
/// variants cover snapshots that cannot produce a meaningful number at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("roster is empty")]
    EmptyRoster,
    #[error("player {0} appears more than once on the roster")]
    DuplicatePlayer(PlayerId),
    #[error("player {0} is not on the roster")]
    UnknownPlayer(PlayerId),
    #[error("player {player} has a non-finite handicap")]
    InvalidHandicap { player: PlayerId },
    #[error("invalid stroke index: {0}")]
    InvalidStrokeIndex(String),
    #[error("unsupported hole count {0}, expected 9 or 18")]
    InvalidHoleCount(u8),
    #[error("hole {hole} is outside a {hole_count}-hole round")]
    HoleOutOfRange { hole: u8, hole_count: u8 },
    #[error("score for player {player} on hole {hole} has zero strokes")]
    ZeroGross { player: PlayerId, hole: u8 },
    #[error("score log mixes games {expected} and {found}")]
    GameMismatch { expected: Uuid, found: Uuid },
    #[error("format needs exactly {expected} players, found {found}")]
    WrongPlayerCount { expected: usize, found: usize },
    #[error("format needs at least {minimum} players, found {found}")]
    TooFewPlayers { minimum: usize, found: usize },
    #[error("invalid rotation: {0}")]
    InvalidRotation(String),
    #[error("invalid teams: {0}")]
    InvalidTeams(String),
    #[error("invalid press {press}: {reason}")]
    InvalidPress { press: u64, reason: String },
    #[error("invalid wolf choice on hole {hole}: {reason}")]
    InvalidWolfChoice { hole: u8, reason: String },
    #[error("invalid amount for {0}: must be finite and non-negative")]
    InvalidAmount(String),
}

impl EngineError {
    /// Reject a wager amount that cannot be settled.
    pub fn check_amount(label: &str, amount: f64) -> Result<(), Self> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidAmount(label.to_string()))
        }
    }
}
