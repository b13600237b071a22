use serde::{Deserialize, Serialize};

use crate::course::HandicapMode;

/// Default economics used when a round does not spell out its own settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeeboxConfig {
    pub handicap_mode: HandicapMode,
    pub nassau: NassauDefaults,
    pub skins: SkinsDefaults,
    pub wolf: WolfDefaults,
    pub match_play: MatchPlayDefaults,
}

impl Default for TeeboxConfig {
    fn default() -> Self {
        Self {
            handicap_mode: HandicapMode::Full,
            nassau: NassauDefaults::default(),
            skins: SkinsDefaults::default(),
            wolf: WolfDefaults::default(),
            match_play: MatchPlayDefaults::default(),
        }
    }
}

impl TeeboxConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("TEEBOX_CONFIG").unwrap_or_else(|_| "config/teebox.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<TeeboxConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    TeeboxConfig::default()
                },
            },
            Err(_) => TeeboxConfig::default(),
        }
    }
}

/// Nassau bet sizes and press rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NassauDefaults {
    pub front_bet: f64,
    pub back_bet: f64,
    pub overall_bet: f64,
    /// Suggest presses automatically.
    pub auto_press: bool,
    /// Holes down before a press is suggested.
    pub press_trigger: u32,
    /// Maximum presses per pair and region (0 = unlimited).
    pub press_limit: u32,
}

impl Default for NassauDefaults {
    fn default() -> Self {
        Self {
            front_bet: 5.0,
            back_bet: 5.0,
            overall_bet: 10.0,
            auto_press: true,
            press_trigger: 2,
            press_limit: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinsDefaults {
    pub skin_value: f64,
    pub carryovers: bool,
    pub split_final_ties: bool,
}

impl Default for SkinsDefaults {
    fn default() -> Self {
        Self {
            skin_value: 1.0,
            carryovers: true,
            split_final_ties: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WolfDefaults {
    pub point_value: f64,
    pub blind_wolf_enabled: bool,
}

impl Default for WolfDefaults {
    fn default() -> Self {
        Self {
            point_value: 1.0,
            blind_wolf_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPlayDefaults {
    pub bet_amount: f64,
}

impl Default for MatchPlayDefaults {
    fn default() -> Self {
        Self { bet_amount: 10.0 }
    }
}
