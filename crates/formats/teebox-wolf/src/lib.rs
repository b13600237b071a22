pub mod rotation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use teebox_core::config::WolfDefaults;
use teebox_core::course::CourseSetup;
use teebox_core::error::EngineError;
use teebox_core::format_trait::{FormatMetadata, WagerFormat};
use teebox_core::handicap::{StrokeTable, off_the_low_strokes};
use teebox_core::player::{Player, PlayerId, ordered_roster};
use teebox_core::score::{ScoreEntry, Scorecard};
use teebox_core::settlement::{Settlement, settle_by_totals};
use teebox_core::warning::{DataWarning, raise};

use rotation::{Rotation, WOLF_PLAYERS};

/// Settings for a wolf game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WolfSettings {
    pub course: CourseSetup,
    pub point_value: f64,
    /// Tee order. Empty means roster order.
    pub rotation: Vec<PlayerId>,
    pub blind_wolf_enabled: bool,
}

impl Default for WolfSettings {
    fn default() -> Self {
        Self::from_defaults(CourseSetup::default(), &WolfDefaults::default())
    }
}

impl WolfSettings {
    pub fn from_defaults(course: CourseSetup, defaults: &WolfDefaults) -> Self {
        Self {
            course,
            point_value: defaults.point_value,
            rotation: Vec::new(),
            blind_wolf_enabled: defaults.blind_wolf_enabled,
        }
    }
}

/// What the wolf decided on a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "partner", rename_all = "snake_case")]
pub enum WolfDecision {
    Partner(PlayerId),
    Alone,
    /// Alone, declared before anyone teed off.
    BlindAlone,
}

impl WolfDecision {
    pub fn multiplier(self) -> i32 {
        match self {
            Self::Partner(_) => 1,
            Self::Alone => 2,
            Self::BlindAlone => 3,
        }
    }
}

/// A recorded wolf decision for one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WolfChoice {
    pub hole: u8,
    pub wolf: PlayerId,
    pub decision: WolfDecision,
}

/// Which side took the hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleWinner {
    Wolf,
    Field,
    Tied,
}

/// One fully scored hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WolfHole {
    pub hole: u8,
    pub wolf: PlayerId,
    /// The decision as scored.
    pub decision: WolfDecision,
    pub multiplier: i32,
    pub wolf_team: Vec<PlayerId>,
    pub field: Vec<PlayerId>,
    pub wolf_team_net: i32,
    pub field_net: i32,
    pub winner: HoleWinner,
    pub deltas: BTreeMap<PlayerId, i32>,
}

/// The decision the round is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WolfPrompt {
    pub hole: u8,
    pub wolf: PlayerId,
    pub eligible_partners: Vec<PlayerId>,
    pub blind_wolf_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WolfStatus {
    pub holes: Vec<WolfHole>,
    pub points: BTreeMap<PlayerId, i32>,
    /// The hole play is stopped at, if the round is not finished.
    pub current_hole: Option<u8>,
    pub needs_wolf_choice: bool,
    pub prompt: Option<WolfPrompt>,
    pub is_complete: bool,
    pub warnings: Vec<DataWarning>,
}

/// Rotating wolf against the field, four players.
pub struct Wolf;

impl WagerFormat for Wolf {
    type Settings = WolfSettings;
    type Extras = [WolfChoice];
    type Status = WolfStatus;

    fn metadata(&self) -> FormatMetadata {
        FormatMetadata {
            name: "Wolf".to_string(),
            description: "Rotating wolf picks a partner or goes alone against the field"
                .to_string(),
            min_players: WOLF_PLAYERS as u8,
            max_players: WOLF_PLAYERS as u8,
        }
    }

    fn compute_status(
        &self,
        settings: &WolfSettings,
        players: &[Player],
        scores: &[ScoreEntry],
        choices: &[WolfChoice],
    ) -> Result<WolfStatus, EngineError> {
        EngineError::check_amount("point value", settings.point_value)?;
        let roster = ordered_roster(players)?;
        if roster.len() != WOLF_PLAYERS {
            return Err(EngineError::WrongPlayerCount {
                expected: WOLF_PLAYERS,
                found: roster.len(),
            });
        }
        let ids: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();
        let rotation = Rotation::new(&settings.rotation, &ids)?;
        let card = Scorecard::build(scores, players, &settings.course)?;
        let strokes = off_the_low_strokes(roster.iter().copied(), &settings.course)?;
        let choices = index_choices(choices, &settings.course, &ids)?;

        let mut status = WolfStatus {
            holes: Vec::new(),
            points: ids.iter().map(|&id| (id, 0)).collect(),
            current_hole: None,
            needs_wolf_choice: false,
            prompt: None,
            is_complete: false,
            warnings: Vec::new(),
        };

        for hole in settings.course.holes() {
            let Some(wolf) = rotation.wolf_for(hole, settings.course.holes, &status.points)
            else {
                break;
            };
            status.current_hole = Some(hole);

            let choice = match choices.get(&hole) {
                Some(choice) if choice.wolf == wolf => choice,
                Some(choice) => {
                    raise(
                        &mut status.warnings,
                        DataWarning::WolfChoiceMismatch {
                            hole,
                            expected: wolf,
                            recorded: choice.wolf,
                        },
                    );
                    status.prompt = Some(prompt(hole, wolf, &rotation, settings));
                    status.needs_wolf_choice = true;
                    break;
                },
                None => {
                    status.prompt = Some(prompt(hole, wolf, &rotation, settings));
                    status.needs_wolf_choice = true;
                    break;
                },
            };
            if !card.hole_complete(hole, &ids) {
                break;
            }

            let decision = match choice.decision {
                WolfDecision::BlindAlone if !settings.blind_wolf_enabled => {
                    raise(&mut status.warnings, DataWarning::BlindWolfDisabled { hole });
                    WolfDecision::Alone
                },
                decision => decision,
            };
            let scored = score_hole(hole, wolf, decision, &ids, &card, &strokes);
            for (id, delta) in &scored.deltas {
                *status.points.entry(*id).or_insert(0) += delta;
            }
            tracing::debug!(hole, wolf, ?decision, winner = ?scored.winner, "wolf hole");
            status.holes.push(scored);
            status.current_hole = None;
        }

        status.is_complete = status.holes.len() == usize::from(settings.course.hole_count());
        if let Some(stopped) = status.current_hole {
            let beyond: Vec<u8> = (stopped + 1..=settings.course.hole_count())
                .filter(|&hole| card.hole_complete(hole, &ids))
                .collect();
            if !beyond.is_empty() {
                raise(
                    &mut status.warnings,
                    DataWarning::ScoresBeyondGap {
                        first_gap: stopped,
                        holes: beyond,
                    },
                );
            }
        }
        Ok(status)
    }

    fn compute_settlements(
        &self,
        settings: &WolfSettings,
        players: &[Player],
        scores: &[ScoreEntry],
        choices: &[WolfChoice],
    ) -> Result<Vec<Settlement>, EngineError> {
        let status = self.compute_status(settings, players, scores, choices)?;
        let ids: Vec<PlayerId> = ordered_roster(players)?.iter().map(|p| p.id).collect();
        let totals: BTreeMap<PlayerId, f64> = status
            .points
            .iter()
            .map(|(&id, &points)| (id, f64::from(points)))
            .collect();
        Ok(settle_by_totals(
            &ids,
            &totals,
            settings.point_value,
            |a, b| format!("Points {a} to {b}"),
        ))
    }
}

/// Check every recorded choice and key them by hole. A later row for the same
/// hole replaces an earlier one.
fn index_choices<'a>(
    choices: &'a [WolfChoice],
    course: &CourseSetup,
    roster: &[PlayerId],
) -> Result<BTreeMap<u8, &'a WolfChoice>, EngineError> {
    let mut by_hole = BTreeMap::new();
    for choice in choices {
        if !course.contains(choice.hole) {
            return Err(EngineError::HoleOutOfRange {
                hole: choice.hole,
                hole_count: course.hole_count(),
            });
        }
        if let WolfDecision::Partner(partner) = choice.decision {
            if partner == choice.wolf {
                return Err(EngineError::InvalidWolfChoice {
                    hole: choice.hole,
                    reason: "the wolf cannot partner themselves".to_string(),
                });
            }
            if !roster.contains(&partner) {
                return Err(EngineError::InvalidWolfChoice {
                    hole: choice.hole,
                    reason: format!("partner {partner} is not on the roster"),
                });
            }
        }
        by_hole.insert(choice.hole, choice);
    }
    Ok(by_hole)
}

fn prompt(hole: u8, wolf: PlayerId, rotation: &Rotation, settings: &WolfSettings) -> WolfPrompt {
    WolfPrompt {
        hole,
        wolf,
        eligible_partners: rotation.others(wolf),
        blind_wolf_available: settings.blind_wolf_enabled,
    }
}

/// Best ball of the wolf's side against best ball of the rest.
fn score_hole(
    hole: u8,
    wolf: PlayerId,
    decision: WolfDecision,
    ids: &[PlayerId],
    card: &Scorecard,
    strokes: &StrokeTable,
) -> WolfHole {
    let (wolf_team, field): (Vec<PlayerId>, Vec<PlayerId>) = ids.iter().partition(|&&id| {
        id == wolf || matches!(decision, WolfDecision::Partner(partner) if partner == id)
    });
    let best_ball = |side: &[PlayerId]| {
        side.iter()
            .filter_map(|&id| Some(strokes.net(id, hole, card.gross(id, hole)?)))
            .min()
            .unwrap_or(i32::MAX)
    };
    let wolf_team_net = best_ball(wolf_team.as_slice());
    let field_net = best_ball(field.as_slice());

    let multiplier = decision.multiplier();
    let team_size = wolf_team.len() as i32;
    let field_size = field.len() as i32;
    let (winner, wolf_delta, field_delta) = match wolf_team_net.cmp(&field_net) {
        std::cmp::Ordering::Less => (
            HoleWinner::Wolf,
            multiplier * field_size,
            -multiplier * team_size,
        ),
        std::cmp::Ordering::Greater => (
            HoleWinner::Field,
            -multiplier * field_size,
            multiplier * team_size,
        ),
        std::cmp::Ordering::Equal => (HoleWinner::Tied, 0, 0),
    };

    let deltas = wolf_team
        .iter()
        .map(|&id| (id, wolf_delta))
        .chain(field.iter().map(|&id| (id, field_delta)))
        .collect();
    WolfHole {
        hole,
        wolf,
        decision,
        multiplier,
        wolf_team,
        field,
        wolf_team_net,
        field_net,
        winner,
        deltas,
    }
}
