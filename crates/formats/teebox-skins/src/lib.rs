pub mod pot;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use teebox_core::config::SkinsDefaults;
use teebox_core::course::CourseSetup;
use teebox_core::error::EngineError;
use teebox_core::format_trait::{FormatMetadata, WagerFormat};
use teebox_core::handicap::off_the_low_strokes;
use teebox_core::player::{Player, PlayerId, ordered_roster};
use teebox_core::score::{ScoreEntry, Scorecard};
use teebox_core::settlement::{Settlement, settle_by_totals};
use teebox_core::warning::{DataWarning, raise};

use pot::{Pot, PotRules, SkinOutcome};

/// Settings for a skins game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinsSettings {
    pub course: CourseSetup,
    pub skin_value: f64,
    /// Tied holes roll their skin into the next hole.
    pub carryovers: bool,
    /// Share a pot left over after a tied last hole among the tied players.
    pub split_final_ties: bool,
}

impl Default for SkinsSettings {
    fn default() -> Self {
        Self::from_defaults(CourseSetup::default(), &SkinsDefaults::default())
    }
}

impl SkinsSettings {
    pub fn from_defaults(course: CourseSetup, defaults: &SkinsDefaults) -> Self {
        Self {
            course,
            skin_value: defaults.skin_value,
            carryovers: defaults.carryovers,
            split_final_ties: defaults.split_final_ties,
        }
    }

    fn rules(&self) -> PotRules {
        PotRules {
            carryovers: self.carryovers,
            split_final_ties: self.split_final_ties,
        }
    }
}

/// One scored hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinHole {
    pub hole: u8,
    pub nets: BTreeMap<PlayerId, i32>,
    pub low_net: i32,
    /// Skins that were at stake on this hole.
    pub stake: u32,
    pub outcome: SkinOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinsStatus {
    pub holes: Vec<SkinHole>,
    /// Skins won per player; fractional after a split.
    pub skins: BTreeMap<PlayerId, f64>,
    /// Skins riding on the next hole.
    pub carryover: u32,
    pub holes_played: u32,
    pub is_complete: bool,
    pub warnings: Vec<DataWarning>,
}

/// Per-hole skins with carryovers.
pub struct Skins;

impl WagerFormat for Skins {
    type Settings = SkinsSettings;
    type Extras = ();
    type Status = SkinsStatus;

    fn metadata(&self) -> FormatMetadata {
        FormatMetadata {
            name: "Skins".to_string(),
            description: "Lowest net on a hole wins the skin; ties carry over".to_string(),
            min_players: 2,
            max_players: 8,
        }
    }

    fn compute_status(
        &self,
        settings: &SkinsSettings,
        players: &[Player],
        scores: &[ScoreEntry],
        _extras: &(),
    ) -> Result<SkinsStatus, EngineError> {
        EngineError::check_amount("skin value", settings.skin_value)?;
        let roster = ordered_roster(players)?;
        if roster.len() < 2 {
            return Err(EngineError::TooFewPlayers {
                minimum: 2,
                found: roster.len(),
            });
        }
        let card = Scorecard::build(scores, players, &settings.course)?;
        let strokes = off_the_low_strokes(roster.iter().copied(), &settings.course)?;
        let ids: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();

        let mut warnings = Vec::new();
        let walk = card.walk(&ids, settings.course.holes());
        if let Some(warning) = walk.gap_warning() {
            raise(&mut warnings, warning);
        }

        let mut skins: BTreeMap<PlayerId, f64> = ids.iter().map(|&id| (id, 0.0)).collect();
        let mut pot = Pot::default();
        let mut holes = Vec::with_capacity(walk.scored.len());
        for &hole in &walk.scored {
            let nets: BTreeMap<PlayerId, i32> = ids
                .iter()
                .filter_map(|&id| Some((id, strokes.net(id, hole, card.gross(id, hole)?))))
                .collect();
            let Some(low_net) = nets.values().copied().min() else {
                continue;
            };
            let low: Vec<PlayerId> = nets
                .iter()
                .filter(|&(_, &net)| net == low_net)
                .map(|(&id, _)| id)
                .collect();

            let stake = pot.stake();
            let (next, outcome) =
                pot.resolve(&low, settings.course.is_last_hole(hole), settings.rules());
            pot = next;
            match &outcome {
                SkinOutcome::Won { player, skins: won } => {
                    *skins.entry(*player).or_insert(0.0) += won;
                },
                SkinOutcome::Split {
                    players,
                    skins_each,
                } => {
                    for player in players {
                        *skins.entry(*player).or_insert(0.0) += skins_each;
                    }
                },
                SkinOutcome::CarriedOver { .. } | SkinOutcome::Void => {},
            }
            tracing::debug!(hole, stake, ?outcome, "skins hole");
            holes.push(SkinHole {
                hole,
                nets,
                low_net,
                stake,
                outcome,
            });
        }

        let holes_played = holes.len() as u32;
        Ok(SkinsStatus {
            holes,
            skins,
            carryover: pot.carryover,
            holes_played,
            is_complete: holes_played == u32::from(settings.course.hole_count()),
            warnings,
        })
    }

    fn compute_settlements(
        &self,
        settings: &SkinsSettings,
        players: &[Player],
        scores: &[ScoreEntry],
        extras: &(),
    ) -> Result<Vec<Settlement>, EngineError> {
        let status = self.compute_status(settings, players, scores, extras)?;
        let ids: Vec<PlayerId> = ordered_roster(players)?.iter().map(|p| p.id).collect();
        Ok(settle_by_totals(
            &ids,
            &status.skins,
            settings.skin_value,
            |a, b| format!("Skins {a} to {b}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teebox_core::course::HoleCount;
    use teebox_core::test_helpers::{
        ScoreLog, contract_settlements, full_handicap_course, make_players,
        make_players_with_handicaps, scratch_course,
    };

    fn settings(holes: HoleCount, skin_value: f64) -> SkinsSettings {
        SkinsSettings {
            course: scratch_course(holes),
            skin_value,
            ..SkinsSettings::default()
        }
    }

    #[test]
    fn scenario_b_carryover_collected_by_outright_winner() {
        let players = make_players(3);
        let settings = settings(HoleCount::Eighteen, 5.0);
        let mut log = ScoreLog::new();
        log.holes(&[&[4, 4, 4]]);

        let status = Skins
            .compute_status(&settings, &players, log.entries(), &())
            .unwrap();
        assert_eq!(status.carryover, 1);
        assert_eq!(status.skins[&2], 0.0);

        log.hole(2, &[(1, 5), (2, 3), (3, 4)]);
        let status = Skins
            .compute_status(&settings, &players, log.entries(), &())
            .unwrap();
        assert_eq!(status.skins[&2], 2.0);
        assert_eq!(status.carryover, 0);
        assert_eq!(status.holes[1].stake, 2);

        let settlements = Skins
            .compute_settlements(&settings, &players, log.entries(), &())
            .unwrap();
        assert_eq!(settlements.len(), 2);
        for s in &settlements {
            assert_eq!(s.payee, 2);
            assert_eq!(s.amount, 10.0);
        }
    }

    #[test]
    fn tied_last_hole_splits_the_pot() {
        let players = make_players(3);
        let mut log = ScoreLog::new();
        // Players 1 and 2 tie every hole; player 3 is always worse.
        let rows: Vec<&[u8]> = vec![&[4, 4, 6][..]; 9];
        log.holes(&rows);

        let status = Skins
            .compute_status(&settings(HoleCount::Nine, 1.0), &players, log.entries(), &())
            .unwrap();
        assert!(status.is_complete);
        assert_eq!(status.carryover, 0);
        assert_eq!(status.skins[&1], 4.5);
        assert_eq!(status.skins[&2], 4.5);
        assert_eq!(status.skins[&3], 0.0);
    }

    #[test]
    fn unsplit_final_carryover_goes_unawarded() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        let rows: Vec<&[u8]> = vec![&[4, 4][..]; 9];
        log.holes(&rows);
        let settings = SkinsSettings {
            split_final_ties: false,
            ..settings(HoleCount::Nine, 1.0)
        };

        let status = Skins
            .compute_status(&settings, &players, log.entries(), &())
            .unwrap();
        assert_eq!(status.carryover, 9);
        assert!(status.skins.values().all(|&s| s == 0.0));
        let settlements = Skins
            .compute_settlements(&settings, &players, log.entries(), &())
            .unwrap();
        assert!(settlements.is_empty());
    }

    #[test]
    fn ties_are_void_without_carryovers() {
        let players = make_players(2);
        let settings = SkinsSettings {
            carryovers: false,
            ..settings(HoleCount::Nine, 1.0)
        };
        let mut log = ScoreLog::new();
        log.holes(&[&[4, 4], &[3, 4]]);
        let status = Skins
            .compute_status(&settings, &players, log.entries(), &())
            .unwrap();
        assert_eq!(status.holes[0].outcome, SkinOutcome::Void);
        assert_eq!(status.holes[1].stake, 1);
        assert_eq!(status.skins[&1], 1.0);
    }

    #[test]
    fn gap_stops_processing() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        log.holes(&[&[4, 4]]);
        log.hole(3, &[(1, 3), (2, 5)]);
        let status = Skins
            .compute_status(&settings(HoleCount::Nine, 1.0), &players, log.entries(), &())
            .unwrap();
        assert_eq!(status.holes_played, 1);
        assert_eq!(status.carryover, 1);
        assert_eq!(
            status.warnings,
            vec![DataWarning::ScoresBeyondGap {
                first_gap: 2,
                holes: vec![3]
            }]
        );
    }

    #[test]
    fn strokes_come_off_the_low_handicap() {
        // Player 3 gets a stroke on hole 1 relative to the lowest (player 1).
        let players = make_players_with_handicaps(&[4.0, 4.0, 5.0]);
        let settings = SkinsSettings {
            course: full_handicap_course(HoleCount::Eighteen),
            ..SkinsSettings::default()
        };
        let mut log = ScoreLog::new();
        log.holes(&[&[5, 6, 5]]);
        let status = Skins
            .compute_status(&settings, &players, log.entries(), &())
            .unwrap();
        assert_eq!(status.holes[0].nets[&3], 4);
        assert_eq!(
            status.holes[0].outcome,
            SkinOutcome::Won {
                player: 3,
                skins: 1.0
            }
        );
    }

    #[test]
    fn round_settles_through_contract() {
        let players = make_players_with_handicaps(&[0.0, 8.0, 14.0, 3.0]);
        let settings = SkinsSettings {
            course: full_handicap_course(HoleCount::Eighteen),
            skin_value: 2.0,
            ..SkinsSettings::default()
        };
        let mut log = ScoreLog::new();
        for hole in 1..=18u8 {
            log.hole(
                hole,
                &[
                    (1, 4 + hole % 2),
                    (2, 5 + hole % 3),
                    (3, 5 + hole % 4),
                    (4, 4 + hole % 3),
                ],
            );
        }
        contract_settlements(&Skins, &settings, &players, log.entries(), &());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn skins_awarded_plus_carryover_equals_holes_played(
                grosses in proptest::collection::vec(
                    proptest::collection::vec(3u8..7, 3),
                    0..=18,
                ),
            ) {
                let players = make_players(3);
                let mut log = ScoreLog::new();
                let rows: Vec<&[u8]> = grosses.iter().map(|r| r.as_slice()).collect();
                log.holes(&rows);
                let status = Skins
                    .compute_status(
                        &settings(HoleCount::Eighteen, 1.0),
                        &players,
                        log.entries(),
                        &(),
                    )
                    .unwrap();
                let awarded: f64 = status.skins.values().sum();
                prop_assert!(
                    (awarded + f64::from(status.carryover) - f64::from(status.holes_played)).abs()
                        < 1e-9
                );
            }

            #[test]
            fn settlements_are_zero_sum(
                grosses in proptest::collection::vec(
                    proptest::collection::vec(3u8..7, 4),
                    0..=18,
                ),
            ) {
                let players = make_players(4);
                let mut log = ScoreLog::new();
                let rows: Vec<&[u8]> = grosses.iter().map(|r| r.as_slice()).collect();
                log.holes(&rows);
                let settlements = Skins
                    .compute_settlements(
                        &settings(HoleCount::Eighteen, 3.0),
                        &players,
                        log.entries(),
                        &(),
                    )
                    .unwrap();
                let sum: f64 = teebox_core::settlement::net_positions(&settlements)
                    .values()
                    .sum();
                prop_assert!(sum.abs() < 1e-6);
            }
        }
    }
}
