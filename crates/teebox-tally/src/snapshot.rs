//! The on-disk envelope for one round: roster, score log, and one format's
//! settings and extra rows.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teebox_core::course::CourseSetup;
use teebox_core::player::Player;
use teebox_core::score::ScoreEntry;

#[cfg(feature = "matchplay")]
use teebox_matchplay::MatchPlaySettings;
#[cfg(feature = "nassau")]
use teebox_nassau::{press::Press, settings::NassauSettings};
#[cfg(feature = "skins")]
use teebox_skins::SkinsSettings;
#[cfg(feature = "wolf")]
use teebox_wolf::{WolfChoice, WolfSettings};

use crate::error::TallyError;

/// Everything needed to tally one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub game_id: Uuid,
    /// Course setup. Overrides the course inside `game` settings when present.
    #[serde(default)]
    pub course: Option<CourseSetup>,
    pub players: Vec<Player>,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
    pub game: GameSpec,
}

/// The format being played, with its settings and format-specific rows.
///
/// Omitted settings are taken from the defaults file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum GameSpec {
    #[cfg(feature = "nassau")]
    Nassau {
        #[serde(default)]
        settings: Option<NassauSettings>,
        #[serde(default)]
        presses: Vec<Press>,
    },
    #[cfg(feature = "skins")]
    Skins {
        #[serde(default)]
        settings: Option<SkinsSettings>,
    },
    #[cfg(feature = "wolf")]
    Wolf {
        #[serde(default)]
        settings: Option<WolfSettings>,
        #[serde(default)]
        choices: Vec<WolfChoice>,
    },
    #[cfg(feature = "matchplay")]
    MatchPlay {
        #[serde(default)]
        settings: Option<MatchPlaySettings>,
    },
}

impl GameSpec {
    pub fn format_name(&self) -> &'static str {
        match *self {
            #[cfg(feature = "nassau")]
            Self::Nassau { .. } => "nassau",
            #[cfg(feature = "skins")]
            Self::Skins { .. } => "skins",
            #[cfg(feature = "wolf")]
            Self::Wolf { .. } => "wolf",
            #[cfg(feature = "matchplay")]
            Self::MatchPlay { .. } => "match_play",
        }
    }
}

impl RoundSnapshot {
    pub fn from_json(data: &[u8]) -> Result<Self, TallyError> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn from_msgpack(data: &[u8]) -> Result<Self, TallyError> {
        Ok(rmp_serde::from_slice(data)?)
    }

    /// Encode with field names so the tagged `game` survives a round trip.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, TallyError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Load a snapshot, choosing the decoder by file extension.
    pub fn load(path: &Path) -> Result<Self, TallyError> {
        let data = std::fs::read(path).map_err(|source| TallyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Self::from_json(&data),
            "msgpack" | "mp" => Self::from_msgpack(&data),
            other => Err(TallyError::UnsupportedExtension(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKINS_JSON: &str = r#"{
        "game_id": "7ee0b0c5-0000-4000-8000-000000000001",
        "players": [
            { "id": 1, "display_name": "Ana", "handicap": 4.0 },
            { "id": 2, "display_name": "Ben", "handicap": 9.0, "position": 1 }
        ],
        "game": { "format": "skins" }
    }"#;

    #[test]
    #[cfg(feature = "skins")]
    fn minimal_snapshot_parses() {
        let snapshot = RoundSnapshot::from_json(SKINS_JSON.as_bytes()).unwrap();
        assert_eq!(snapshot.players.len(), 2);
        assert!(snapshot.scores.is_empty());
        assert!(snapshot.course.is_none());
        assert_eq!(snapshot.game, GameSpec::Skins { settings: None });
        assert_eq!(snapshot.game.format_name(), "skins");
    }

    #[test]
    #[cfg(feature = "skins")]
    fn msgpack_keeps_tagged_game() {
        let snapshot = RoundSnapshot::from_json(SKINS_JSON.as_bytes()).unwrap();
        let bytes = snapshot.to_msgpack().unwrap();
        assert_eq!(RoundSnapshot::from_msgpack(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn unknown_format_rejected() {
        let json = r#"{ "game_id": "7ee0b0c5-0000-4000-8000-000000000001",
            "players": [], "game": { "format": "bingo_bango_bongo" } }"#;
        assert!(matches!(
            RoundSnapshot::from_json(json.as_bytes()),
            Err(TallyError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RoundSnapshot::load(Path::new("/nonexistent/round.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/round.json"));
    }
}
