pub mod status_text;
pub mod teams;

use serde::{Deserialize, Serialize};

use teebox_core::config::MatchPlayDefaults;
use teebox_core::course::CourseSetup;
use teebox_core::error::EngineError;
use teebox_core::format_trait::{FormatMetadata, WagerFormat};
use teebox_core::handicap::{StrokeTable, off_the_low_strokes, pairwise_strokes};
use teebox_core::player::{Player, PlayerId, display_name, ordered_roster};
use teebox_core::score::{ScoreEntry, Scorecard};
use teebox_core::settlement::{PairLedger, Settlement, settle_pairs};
use teebox_core::tally::{HoleOutcome, Lead, Side, Tally};
use teebox_core::warning::{DataWarning, raise};

use status_text::status_text;
use teams::{TeamRoster, team_ledger, validate_teams};

/// Singles round robin, or two teams playing best ball.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchPlayMode {
    #[default]
    Singles,
    Teams { teams: [TeamRoster; 2] },
}

/// Settings for a match play game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPlaySettings {
    pub course: CourseSetup,
    pub bet_amount: f64,
    pub mode: MatchPlayMode,
}

impl Default for MatchPlaySettings {
    fn default() -> Self {
        Self::from_defaults(CourseSetup::default(), &MatchPlayDefaults::default())
    }
}

impl MatchPlaySettings {
    pub fn from_defaults(course: CourseSetup, defaults: &MatchPlayDefaults) -> Self {
        Self {
            course,
            bet_amount: defaults.bet_amount,
            mode: MatchPlayMode::Singles,
        }
    }
}

/// One side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Competitor {
    Player(PlayerId),
    /// Index into the configured teams.
    Team(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHole {
    pub hole: u8,
    pub first_net: i32,
    pub second_net: i32,
    pub outcome: HoleOutcome<Competitor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatus {
    pub first: Competitor,
    pub second: Competitor,
    /// Holes counted towards the match; play after it closes is ignored.
    pub holes: Vec<MatchHole>,
    pub first_holes_won: u32,
    pub second_holes_won: u32,
    pub lead: Lead<Competitor>,
    pub holes_played: u32,
    pub holes_remaining: u32,
    pub is_complete: bool,
    pub is_dormie: bool,
    pub status_text: String,
}

impl MatchStatus {
    pub fn winner(&self) -> Option<Competitor> {
        if self.is_complete {
            self.lead.leader()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPlayStatus {
    pub matches: Vec<MatchStatus>,
    pub warnings: Vec<DataWarning>,
}

impl MatchPlayStatus {
    /// The singles match between `a` and `b`, in either order.
    pub fn singles(&self, a: PlayerId, b: PlayerId) -> Option<&MatchStatus> {
        let (a, b) = (Competitor::Player(a), Competitor::Player(b));
        self.matches
            .iter()
            .find(|m| (m.first, m.second) == (a, b) || (m.first, m.second) == (b, a))
    }
}

/// Holes won match play, singles or best-ball teams.
pub struct MatchPlay;

impl WagerFormat for MatchPlay {
    type Settings = MatchPlaySettings;
    type Extras = ();
    type Status = MatchPlayStatus;

    fn metadata(&self) -> FormatMetadata {
        FormatMetadata {
            name: "Match Play".to_string(),
            description: "Holes won, closing out early; singles or best-ball teams".to_string(),
            min_players: 2,
            max_players: 8,
        }
    }

    fn compute_status(
        &self,
        settings: &MatchPlaySettings,
        players: &[Player],
        scores: &[ScoreEntry],
        _extras: &(),
    ) -> Result<MatchPlayStatus, EngineError> {
        EngineError::check_amount("match bet", settings.bet_amount)?;
        let roster = ordered_roster(players)?;
        if roster.len() < 2 {
            return Err(EngineError::TooFewPlayers {
                minimum: 2,
                found: roster.len(),
            });
        }
        let card = Scorecard::build(scores, players, &settings.course)?;
        let mut warnings = Vec::new();

        let matches = match &settings.mode {
            MatchPlayMode::Singles => {
                let mut matches = Vec::new();
                for (i, first) in roster.iter().enumerate() {
                    for second in &roster[i + 1..] {
                        let sides = Sides {
                            first: (Competitor::Player(first.id), vec![first.id]),
                            second: (Competitor::Player(second.id), vec![second.id]),
                        };
                        let strokes = pairwise_strokes(first, second, &settings.course);
                        matches.push(sides.play(&card, &strokes, settings, &mut warnings, |c| {
                            competitor_name(c, players, &settings.mode)
                        }));
                    }
                }
                matches
            },
            MatchPlayMode::Teams { teams } => {
                let ids: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();
                validate_teams(teams, &ids)?;
                let pool = roster
                    .iter()
                    .copied()
                    .filter(|p| teams.iter().any(|team| team.contains(p.id)));
                let strokes = off_the_low_strokes(pool, &settings.course)?;
                let sides = Sides {
                    first: (Competitor::Team(0), teams[0].players.clone()),
                    second: (Competitor::Team(1), teams[1].players.clone()),
                };
                vec![sides.play(&card, &strokes, settings, &mut warnings, |c| {
                    competitor_name(c, players, &settings.mode)
                })]
            },
        };

        Ok(MatchPlayStatus { matches, warnings })
    }

    fn compute_settlements(
        &self,
        settings: &MatchPlaySettings,
        players: &[Player],
        scores: &[ScoreEntry],
        extras: &(),
    ) -> Result<Vec<Settlement>, EngineError> {
        let status = self.compute_status(settings, players, scores, extras)?;
        let ids: Vec<PlayerId> = ordered_roster(players)?.iter().map(|p| p.id).collect();
        let bet = settings.bet_amount;

        let settlements = match &settings.mode {
            MatchPlayMode::Singles => settle_pairs(&ids, |a, b| {
                let mut ledger = PairLedger::new();
                if let Some(m) = status.singles(a, b)
                    && let Some(winner) = m.winner()
                {
                    let sign = if winner == Competitor::Player(a) { 1.0 } else { -1.0 };
                    ledger.push(m.status_text.clone(), bet * sign);
                }
                ledger
            }),
            MatchPlayMode::Teams { teams } => {
                let decided = status.matches.first().and_then(|m| {
                    let winners = match m.winner()? {
                        Competitor::Team(0) => (&teams[0], &teams[1]),
                        _ => (&teams[1], &teams[0]),
                    };
                    Some((winners, m.status_text.as_str()))
                });
                settle_pairs(&ids, |a, b| match decided {
                    Some(((winners, losers), label)) => {
                        team_ledger(a, b, winners, losers, bet, label)
                    },
                    None => PairLedger::new(),
                })
            },
        };
        Ok(settlements)
    }
}

fn competitor_name(competitor: Competitor, players: &[Player], mode: &MatchPlayMode) -> String {
    match (competitor, mode) {
        (Competitor::Player(id), _) => display_name(players, id),
        (Competitor::Team(index), MatchPlayMode::Teams { teams }) => teams
            .get(usize::from(index))
            .map(|team| team.label(usize::from(index)))
            .unwrap_or_else(|| format!("Team {}", index + 1)),
        (Competitor::Team(index), MatchPlayMode::Singles) => format!("Team {}", index + 1),
    }
}

/// The two sides of one match and the players whose scores count for each.
struct Sides {
    first: (Competitor, Vec<PlayerId>),
    second: (Competitor, Vec<PlayerId>),
}

impl Sides {
    fn play(
        &self,
        card: &Scorecard,
        strokes: &StrokeTable,
        settings: &MatchPlaySettings,
        warnings: &mut Vec<DataWarning>,
        name: impl Fn(Competitor) -> String,
    ) -> MatchStatus {
        let (first, first_players) = &self.first;
        let (second, second_players) = &self.second;
        let everyone: Vec<PlayerId> = first_players.iter().chain(second_players).copied().collect();

        let walk = card.walk(&everyone, settings.course.holes());
        if let Some(warning) = walk.gap_warning()
            && !warnings.contains(&warning)
        {
            raise(warnings, warning);
        }

        let best_ball = |side: &[PlayerId], hole: u8| {
            side.iter()
                .filter_map(|&id| Some(strokes.net(id, hole, card.gross(id, hole)?)))
                .min()
                .unwrap_or(i32::MAX)
        };
        let mut tally = Tally::new(u32::from(settings.course.hole_count()));
        let mut holes = Vec::new();
        for &hole in &walk.scored {
            if tally.is_complete() {
                break;
            }
            let first_net = best_ball(first_players.as_slice(), hole);
            let second_net = best_ball(second_players.as_slice(), hole);
            let outcome = HoleOutcome::from_nets(first_net, second_net);
            tally = tally.record(outcome);
            holes.push(MatchHole {
                hole,
                first_net,
                second_net,
                outcome: outcome.map(|side| side.pick(*first, *second)),
            });
        }

        let lead = tally.lead().map(|side: Side| side.pick(*first, *second));
        let text = status_text(&tally, &lead.map(&name));
        tracing::debug!(?first, ?second, status = %text, "match play");
        MatchStatus {
            first: *first,
            second: *second,
            holes,
            first_holes_won: tally.first_won,
            second_holes_won: tally.second_won,
            lead,
            holes_played: tally.holes_played,
            holes_remaining: tally.holes_remaining(),
            is_complete: tally.is_complete(),
            is_dormie: tally.is_dormie(),
            status_text: text,
        }
    }
}
