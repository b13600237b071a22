use serde::{Deserialize, Serialize};

use teebox_core::player::PlayerId;

/// What happened to a hole's stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SkinOutcome {
    /// A unique low net took the stake.
    Won { player: PlayerId, skins: f64 },
    /// Tied; the stake rolls into the next hole.
    CarriedOver { carryover: u32 },
    /// Tied with carryovers off; nobody gets the skin.
    Void,
    /// Tied on the last hole; the pot is shared by the players tied for low.
    Split {
        players: Vec<PlayerId>,
        skins_each: f64,
    },
}

/// How ties are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotRules {
    pub carryovers: bool,
    pub split_final_ties: bool,
}

/// Skins waiting to be won.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pot {
    pub carryover: u32,
}

impl Pot {
    /// Skins at stake on the next hole.
    pub fn stake(&self) -> u32 {
        1 + self.carryover
    }

    /// Resolve one hole given the players tied for low net.
    pub fn resolve(self, low: &[PlayerId], last_hole: bool, rules: PotRules) -> (Self, SkinOutcome) {
        if let [player] = low {
            return (
                Self::default(),
                SkinOutcome::Won {
                    player: *player,
                    skins: f64::from(self.stake()),
                },
            );
        }
        if !rules.carryovers {
            return (self, SkinOutcome::Void);
        }

        let carryover = self.carryover + 1;
        if last_hole && rules.split_final_ties && !low.is_empty() {
            return (
                Self::default(),
                SkinOutcome::Split {
                    players: low.to_vec(),
                    skins_each: f64::from(carryover) / low.len() as f64,
                },
            );
        }
        (Self { carryover }, SkinOutcome::CarriedOver { carryover })
    }
}
