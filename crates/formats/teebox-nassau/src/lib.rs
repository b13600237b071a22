pub mod press;
pub mod settings;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use teebox_core::error::EngineError;
use teebox_core::format_trait::{FormatMetadata, WagerFormat};
use teebox_core::handicap::{StrokeTable, pairwise_strokes};
use teebox_core::player::{Player, PlayerId, display_name, ordered_roster};
use teebox_core::score::{ScoreEntry, Scorecard};
use teebox_core::settlement::{PairLedger, Settlement, settle_pairs};
use teebox_core::tally::{HoleOutcome, Lead, Side, Tally};
use teebox_core::warning::{DataWarning, raise};

use press::{PlacedPress, Press, PressId, PressParent, place_presses};
use settings::{NassauSettings, Region};

/// Result of one hole between a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleResult {
    pub hole: u8,
    pub first_net: i32,
    pub second_net: i32,
    pub outcome: HoleOutcome<PlayerId>,
}

/// Standing of one bet (a region or a press) over a run of holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStatus {
    pub start_hole: u8,
    pub end_hole: u8,
    pub amount: f64,
    pub holes: Vec<HoleResult>,
    pub lead: Lead<PlayerId>,
    pub holes_played: u32,
    pub holes_remaining: u32,
    pub is_complete: bool,
}

impl UnitStatus {
    /// The player who takes the bet, once it is decided.
    pub fn winner(&self) -> Option<PlayerId> {
        if self.is_complete {
            self.lead.leader()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStatus {
    pub region: Region,
    pub unit: UnitStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressStatus {
    pub id: PressId,
    pub parent: PressParent,
    pub region: Region,
    pub initiated_by: Option<PlayerId>,
    pub unit: UnitStatus,
}

/// Every bet between two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStatus {
    /// The pair in roster order; hole nets are reported in this order.
    pub players: (PlayerId, PlayerId),
    pub regions: Vec<RegionStatus>,
    pub presses: Vec<PressStatus>,
}

impl PairStatus {
    pub fn region(&self, region: Region) -> Option<&RegionStatus> {
        self.regions.iter().find(|r| r.region == region)
    }

    pub fn press(&self, id: PressId) -> Option<&PressStatus> {
        self.presses.iter().find(|p| p.id == id)
    }
}

/// A press the trailing player may want to make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressSuggestion {
    pub players: (PlayerId, PlayerId),
    pub region: Region,
    pub parent: PressParent,
    pub trailing: PlayerId,
    pub leader: PlayerId,
    pub margin: u32,
    pub reason: String,
}

/// Full Nassau standing for a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NassauStatus {
    pub matches: Vec<PairStatus>,
    pub press_suggestions: Vec<PressSuggestion>,
    pub warnings: Vec<DataWarning>,
}

impl NassauStatus {
    /// The bets between `a` and `b`, in either order.
    pub fn pair(&self, a: PlayerId, b: PlayerId) -> Option<&PairStatus> {
        self.matches
            .iter()
            .find(|m| m.players == (a, b) || m.players == (b, a))
    }
}

/// Front nine, back nine and overall match bets per pair, with presses.
pub struct Nassau;

impl WagerFormat for Nassau {
    type Settings = NassauSettings;
    type Extras = [Press];
    type Status = NassauStatus;

    fn metadata(&self) -> FormatMetadata {
        FormatMetadata {
            name: "Nassau".to_string(),
            description: "Front, back and overall match bets for every pair, with presses"
                .to_string(),
            min_players: 2,
            max_players: 8,
        }
    }

    fn compute_status(
        &self,
        settings: &NassauSettings,
        players: &[Player],
        scores: &[ScoreEntry],
        presses: &[Press],
    ) -> Result<NassauStatus, EngineError> {
        settings.validate()?;
        let roster = ordered_roster(players)?;
        if roster.len() < 2 {
            return Err(EngineError::TooFewPlayers {
                minimum: 2,
                found: roster.len(),
            });
        }
        let card = Scorecard::build(scores, players, &settings.course)?;
        let ids: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();

        let mut warnings = Vec::new();
        let placed = place_presses(presses, settings, &ids, &card, &mut warnings)?;

        let mut matches = Vec::new();
        let mut press_suggestions = Vec::new();
        for (i, first) in roster.iter().enumerate() {
            for second in &roster[i + 1..] {
                let pair = PairCard {
                    card: &card,
                    strokes: pairwise_strokes(first, second, &settings.course),
                    players: (first.id, second.id),
                };
                if let Some(warning) = card
                    .walk(&[first.id, second.id], settings.course.holes())
                    .gap_warning()
                    && !warnings.contains(&warning)
                {
                    raise(&mut warnings, warning);
                }

                let status = pair.status(settings, &placed);
                if settings.auto_press {
                    press_suggestions.extend(suggest_presses(settings, &status, players));
                }
                matches.push(status);
            }
        }

        Ok(NassauStatus {
            matches,
            press_suggestions,
            warnings,
        })
    }

    fn compute_settlements(
        &self,
        settings: &NassauSettings,
        players: &[Player],
        scores: &[ScoreEntry],
        presses: &[Press],
    ) -> Result<Vec<Settlement>, EngineError> {
        let status = self.compute_status(settings, players, scores, presses)?;
        let ids: Vec<PlayerId> = ordered_roster(players)?.iter().map(|p| p.id).collect();
        Ok(settle_pairs(&ids, |a, b| {
            let mut ledger = PairLedger::new();
            if let Some(pair) = status.pair(a, b) {
                for region in &pair.regions {
                    push_unit(&mut ledger, a, region.region.label(), &region.unit);
                }
                for press in &pair.presses {
                    let label = format!("Press #{} ({})", press.id, press.region.label());
                    push_unit(&mut ledger, a, &label, &press.unit);
                }
            }
            ledger
        }))
    }
}

/// Add a decided unit to the ledger, signed towards `first`.
fn push_unit(ledger: &mut PairLedger, first: PlayerId, label: &str, unit: &UnitStatus) {
    if let Some(winner) = unit.winner() {
        let sign = if winner == first { 1.0 } else { -1.0 };
        ledger.push(label, unit.amount * sign);
    }
}

/// Scoring context for one pair.
struct PairCard<'a> {
    card: &'a Scorecard,
    strokes: StrokeTable,
    players: (PlayerId, PlayerId),
}

impl PairCard<'_> {
    fn status(&self, settings: &NassauSettings, placed: &[PlacedPress<'_>]) -> PairStatus {
        let regions = settings
            .regions()
            .into_iter()
            .map(|(region, holes)| RegionStatus {
                region,
                unit: self.unit(holes.clone(), *holes.start(), settings.bet_for(region)),
            })
            .collect();
        let presses = placed
            .iter()
            .filter(|p| p.press.between(self.players.0, self.players.1))
            .map(|p| PressStatus {
                id: p.press.id,
                parent: p.press.parent,
                region: p.region,
                initiated_by: p.press.initiated_by,
                unit: self.unit(p.region_start..=p.end_hole, p.start_hole, p.press.amount),
            })
            .collect();
        PairStatus {
            players: self.players,
            regions,
            presses,
        }
    }

    /// Score a bet over `start_hole..=` the end of `region`, counting every
    /// scored hole up to the region's first gap.
    fn unit(&self, region: RangeInclusive<u8>, start_hole: u8, amount: f64) -> UnitStatus {
        let (a, b) = self.players;
        let end_hole = *region.end();
        let length = u32::from((end_hole + 1).saturating_sub(start_hole));
        let walk = self.card.walk(&[a, b], region);

        let results: Vec<(HoleOutcome<Side>, HoleResult)> = walk
            .scored
            .iter()
            .filter(|&&hole| hole >= start_hole)
            .filter_map(|&hole| {
                let first_net = self.strokes.net(a, hole, self.card.gross(a, hole)?);
                let second_net = self.strokes.net(b, hole, self.card.gross(b, hole)?);
                let outcome = HoleOutcome::from_nets(first_net, second_net);
                Some((
                    outcome,
                    HoleResult {
                        hole,
                        first_net,
                        second_net,
                        outcome: outcome.map(|side| side.pick(a, b)),
                    },
                ))
            })
            .collect();
        let tally = Tally::fold(length, results.iter().map(|(outcome, _)| *outcome));

        let unit = UnitStatus {
            start_hole,
            end_hole,
            amount,
            holes: results.into_iter().map(|(_, result)| result).collect(),
            lead: tally.lead().map(|side| side.pick(a, b)),
            holes_played: tally.holes_played,
            holes_remaining: tally.holes_remaining(),
            is_complete: tally.is_complete(),
        };
        tracing::debug!(
            first = a,
            second = b,
            start = unit.start_hole,
            end = unit.end_hole,
            margin = unit.lead.margin(),
            complete = unit.is_complete,
            "scored unit"
        );
        unit
    }
}

/// Suggest a press where the trailing player is far enough behind.
///
/// Each open region is judged first on its latest open press, so a player
/// losing a press can press it again. When that press is not far enough
/// behind, the region's own margin is judged instead.
fn suggest_presses(
    settings: &NassauSettings,
    pair: &PairStatus,
    players: &[Player],
) -> Vec<PressSuggestion> {
    let trigger = settings.press_trigger.max(1);
    let mut suggestions = Vec::new();
    for region in &pair.regions {
        if region.unit.is_complete {
            continue;
        }
        let region_presses: Vec<&PressStatus> = pair
            .presses
            .iter()
            .filter(|p| p.region == region.region)
            .collect();
        if !settings.press_allowed(region_presses.len()) {
            continue;
        }

        let latest_press = region_presses
            .iter()
            .rev()
            .find(|p| !p.unit.is_complete)
            .map(|press| {
                (
                    PressParent::Press(press.id),
                    &press.unit,
                    format!("press #{} on the {}", press.id, region.region.label()),
                )
            });
        let region_itself = (
            PressParent::Region(region.region),
            &region.unit,
            format!("the {}", region.region.label()),
        );
        let Some((parent, unit, subject)) = latest_press
            .into_iter()
            .chain(std::iter::once(region_itself))
            .find(|(_, unit, _)| unit.lead.margin() >= trigger)
        else {
            continue;
        };

        let Lead::Leading { leader, margin } = unit.lead else {
            continue;
        };
        let trailing = if leader == pair.players.0 {
            pair.players.1
        } else {
            pair.players.0
        };
        suggestions.push(PressSuggestion {
            players: pair.players,
            region: region.region,
            parent,
            trailing,
            leader,
            margin,
            reason: format!(
                "{} is {margin} down to {} on {subject}",
                display_name(players, trailing),
                display_name(players, leader),
            ),
        });
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use teebox_core::course::HoleCount;
    use teebox_core::player::unordered_pairs;
    use teebox_core::test_helpers::{
        ScoreLog, contract_settlements, full_handicap_course, make_players,
        make_players_with_handicaps, scratch_course,
    };

    fn nine_hole_front_only() -> NassauSettings {
        NassauSettings {
            course: scratch_course(HoleCount::Nine),
            front_bet: 10.0,
            back_bet: 0.0,
            overall_bet: 0.0,
            ..NassauSettings::default()
        }
    }

    fn eighteen(front: f64, back: f64, overall: f64) -> NassauSettings {
        NassauSettings {
            course: scratch_course(HoleCount::Eighteen),
            front_bet: front,
            back_bet: back,
            overall_bet: overall,
            ..NassauSettings::default()
        }
    }

    fn press_on(
        id: PressId,
        parent: PressParent,
        start_hole: Option<u8>,
        created_at: DateTime<Utc>,
    ) -> Press {
        Press {
            id,
            parent,
            players: (1, 2),
            amount: 5.0,
            created_at,
            start_hole,
            initiated_by: Some(2),
        }
    }

    /// Player 1 wins `wins_first` holes, player 2 the next `wins_second`,
    /// then halves to fill `holes`.
    fn head_to_head(log: &mut ScoreLog, wins_first: u8, wins_second: u8, holes: u8) {
        for hole in 1..=holes {
            let row = if hole <= wins_first {
                [(1, 4), (2, 5)]
            } else if hole <= wins_first + wins_second {
                [(1, 5), (2, 4)]
            } else {
                [(1, 4), (2, 4)]
            };
            log.hole(hole, &row);
        }
    }

    #[test]
    fn scenario_a_front_nine_closed_out_then_trimmed() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 5, 4, 9);
        let settings = nine_hole_front_only();

        let status = Nassau
            .compute_status(&settings, &players, log.entries(), &[])
            .unwrap();
        let front = &status.pair(1, 2).unwrap().region(Region::Front).unwrap().unit;
        assert_eq!(
            front.lead,
            Lead::Leading {
                leader: 1,
                margin: 1
            }
        );
        assert_eq!(front.holes_played, 9);
        assert!(front.is_complete);

        let settlements = Nassau
            .compute_settlements(&settings, &players, log.entries(), &[])
            .unwrap();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].payer, 2);
        assert_eq!(settlements[0].payee, 1);
        assert_eq!(settlements[0].amount, 10.0);
        assert_eq!(settlements[0].breakdown[0].label, "Front 9");
    }

    #[test]
    fn nine_hole_round_has_no_back_region() {
        let players = make_players(2);
        let status = Nassau
            .compute_status(&nine_hole_front_only(), &players, &[], &[])
            .unwrap();
        let pair = status.pair(1, 2).unwrap();
        assert!(pair.region(Region::Back).is_none());
        assert_eq!(pair.region(Region::Overall).unwrap().unit.end_hole, 9);
    }

    #[test]
    fn incomplete_region_is_partial_not_error() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 2, 0, 3);
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &[])
            .unwrap();
        let front = &status.pair(1, 2).unwrap().region(Region::Front).unwrap().unit;
        assert_eq!(front.holes_played, 3);
        assert_eq!(front.holes_remaining, 6);
        assert!(!front.is_complete);
        assert_eq!(front.winner(), None);

        let settlements = Nassau
            .compute_settlements(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &[])
            .unwrap();
        assert!(settlements.is_empty());
    }

    #[test]
    fn halved_region_pays_nothing() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 0, 0, 9);
        let settlements = Nassau
            .compute_settlements(&nine_hole_front_only(), &players, log.entries(), &[])
            .unwrap();
        assert!(settlements.is_empty());
    }

    #[test]
    fn gap_stops_scoring_and_warns() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 2, 0, 2);
        log.hole(4, &[(1, 4), (2, 5)]);
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &[])
            .unwrap();
        let front = &status.pair(1, 2).unwrap().region(Region::Front).unwrap().unit;
        assert_eq!(front.holes_played, 2);
        assert_eq!(
            status.warnings,
            vec![DataWarning::ScoresBeyondGap {
                first_gap: 3,
                holes: vec![4]
            }]
        );
    }

    #[test]
    fn pairwise_strokes_change_the_result() {
        // Player 2 gets one stroke on the hardest hole (hole 1).
        let players = make_players_with_handicaps(&[0.0, 1.0]);
        let settings = NassauSettings {
            course: full_handicap_course(HoleCount::Nine),
            front_bet: 10.0,
            overall_bet: 0.0,
            ..NassauSettings::default()
        };
        let mut log = ScoreLog::new();
        log.hole(1, &[(1, 4), (2, 5)]);
        let status = Nassau
            .compute_status(&settings, &players, log.entries(), &[])
            .unwrap();
        let front = &status.pair(1, 2).unwrap().region(Region::Front).unwrap().unit;
        assert_eq!(front.holes[0].second_net, 4);
        assert_eq!(front.holes[0].outcome, HoleOutcome::Halved);
        assert_eq!(front.lead, Lead::AllSquare);
    }

    #[test]
    fn three_players_make_three_pairs() {
        let players = make_players(3);
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, &[], &[])
            .unwrap();
        let pairs: Vec<_> = status.matches.iter().map(|m| m.players).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
        assert_eq!(unordered_pairs(&[1, 2, 3]), pairs);
    }

    #[test]
    fn single_player_rejected() {
        let err = Nassau
            .compute_status(&NassauSettings::default(), &make_players(1), &[], &[])
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::TooFewPlayers {
                minimum: 2,
                found: 1
            }
        );
    }

    #[test]
    fn trailing_player_gets_press_suggestion() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 2, 0, 2);
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &[])
            .unwrap();
        let regions: Vec<Region> = status.press_suggestions.iter().map(|s| s.region).collect();
        assert_eq!(regions, vec![Region::Front, Region::Overall]);
        let front = &status.press_suggestions[0];
        assert_eq!(front.trailing, 2);
        assert_eq!(front.leader, 1);
        assert_eq!(front.margin, 2);
        assert_eq!(front.parent, PressParent::Region(Region::Front));
        assert_eq!(front.reason, "Player2 is 2 down to Player1 on the Front 9");
    }

    #[test]
    fn no_suggestion_below_trigger_or_when_disabled() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 1, 0, 1);
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &[])
            .unwrap();
        assert!(status.press_suggestions.is_empty());

        let mut log = ScoreLog::new();
        head_to_head(&mut log, 3, 0, 3);
        let settings = NassauSettings {
            auto_press: false,
            ..eighteen(5.0, 5.0, 10.0)
        };
        let status = Nassau
            .compute_status(&settings, &players, log.entries(), &[])
            .unwrap();
        assert!(status.press_suggestions.is_empty());
    }

    #[test]
    fn press_limit_blocks_further_suggestions() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 4, 0, 4);
        let presses = vec![press_on(
            1,
            PressParent::Region(Region::Front),
            Some(3),
            log.now(),
        )];
        let settings = NassauSettings {
            press_limit: 1,
            ..eighteen(5.0, 5.0, 10.0)
        };
        let status = Nassau
            .compute_status(&settings, &players, log.entries(), &presses)
            .unwrap();
        assert!(
            status
                .press_suggestions
                .iter()
                .all(|s| s.region != Region::Front)
        );
    }

    #[test]
    fn suggestion_follows_latest_open_press() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 4, 0, 4);
        let presses = vec![press_on(
            1,
            PressParent::Region(Region::Front),
            Some(3),
            log.now(),
        )];
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &presses)
            .unwrap();
        let front = status
            .press_suggestions
            .iter()
            .find(|s| s.region == Region::Front)
            .unwrap();
        // The press covers holes 3 and 4, both won by player 1.
        assert_eq!(front.parent, PressParent::Press(1));
        assert_eq!(front.margin, 2);
        assert_eq!(front.reason, "Player2 is 2 down to Player1 on press #1 on the Front 9");
    }

    #[test]
    fn level_press_falls_back_to_region_margin() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        // Player 1 wins 1-2, then 3-4 are halved under a press from hole 3.
        head_to_head(&mut log, 2, 0, 4);
        let presses = vec![press_on(
            1,
            PressParent::Region(Region::Front),
            Some(3),
            log.now(),
        )];
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &presses)
            .unwrap();
        let front = status
            .press_suggestions
            .iter()
            .find(|s| s.region == Region::Front)
            .unwrap();
        assert_eq!(front.parent, PressParent::Region(Region::Front));
        assert_eq!(front.margin, 2);
        assert_eq!(front.reason, "Player2 is 2 down to Player1 on the Front 9");
    }

    #[test]
    fn press_waits_behind_gap_before_its_start() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        log.hole(1, &[(1, 4), (2, 5)]);
        log.hole(2, &[(1, 4), (2, 5)]);
        for hole in 4..=9 {
            log.hole(hole, &[(1, 5), (2, 4)]);
        }
        let presses = vec![press_on(
            1,
            PressParent::Region(Region::Front),
            Some(4),
            log.now(),
        )];
        let settings = nine_hole_front_only();

        let status = Nassau
            .compute_status(&settings, &players, log.entries(), &presses)
            .unwrap();
        let pair = status.pair(1, 2).unwrap();
        assert_eq!(pair.region(Region::Front).unwrap().unit.holes_played, 2);
        let press = &pair.press(1).unwrap().unit;
        assert_eq!(press.start_hole, 4);
        assert_eq!(press.holes_played, 0);
        assert_eq!(press.holes_remaining, 6);
        assert!(!press.is_complete);
        assert_eq!(press.lead, Lead::AllSquare);

        let settlements = Nassau
            .compute_settlements(&settings, &players, log.entries(), &presses)
            .unwrap();
        assert!(settlements.is_empty());
    }

    #[test]
    fn press_settles_alongside_its_region() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        // Player 1 wins 1-2, player 2 wins 3-9: front to player 2 by 5.
        head_to_head(&mut log, 2, 7, 9);
        let presses = vec![press_on(
            4,
            PressParent::Region(Region::Front),
            Some(3),
            log.now(),
        )];
        let settlements = Nassau
            .compute_settlements(&nine_hole_front_only(), &players, log.entries(), &presses)
            .unwrap();
        assert_eq!(settlements.len(), 1);
        let s = &settlements[0];
        assert_eq!((s.payer, s.payee), (1, 2));
        assert_eq!(s.amount, 15.0);
        let labels: Vec<&str> = s.breakdown.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Front 9", "Press #4 (Front 9)"]);
    }

    #[test]
    fn inferred_press_start_is_flagged() {
        let players = make_players(2);
        let mut log = ScoreLog::new();
        head_to_head(&mut log, 2, 0, 2);
        let created = log.now();
        log.hole(3, &[(1, 5), (2, 4)]);
        let presses = vec![press_on(
            9,
            PressParent::Region(Region::Front),
            None,
            created,
        )];
        let status = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, log.entries(), &presses)
            .unwrap();
        let press = status.pair(1, 2).unwrap().press(9).unwrap();
        assert_eq!(press.unit.start_hole, 3);
        assert_eq!(press.unit.holes_played, 1);
        assert_eq!(
            press.unit.lead,
            Lead::Leading {
                leader: 2,
                margin: 1
            }
        );
        assert!(status.warnings.contains(&DataWarning::PressStartInferred {
            press: 9,
            start_hole: 3
        }));
    }

    #[test]
    fn press_from_unknown_parent_rejected() {
        let players = make_players(2);
        let log = ScoreLog::new();
        let presses = vec![press_on(2, PressParent::Press(77), Some(3), log.now())];
        let err = Nassau
            .compute_status(&eighteen(5.0, 5.0, 10.0), &players, &[], &presses)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPress { press: 2, .. }));
    }

    #[test]
    fn full_round_settles_through_contract() {
        let players = make_players_with_handicaps(&[2.0, 6.0, 11.0]);
        let settings = NassauSettings {
            course: full_handicap_course(HoleCount::Eighteen),
            ..NassauSettings::default()
        };
        let mut log = ScoreLog::new();
        for hole in 1..=18u8 {
            log.hole(
                hole,
                &[(1, 4 + hole % 2), (2, 5 + hole % 3), (3, 5 + hole % 4)],
            );
        }
        let presses = vec![Press {
            id: 1,
            parent: PressParent::Region(Region::Back),
            players: (3, 1),
            amount: 5.0,
            created_at: log.now(),
            start_hole: Some(14),
            initiated_by: Some(3),
        }];
        let settlements =
            contract_settlements(&Nassau, &settings, &players, log.entries(), presses.as_slice());
        assert!(!settlements.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use teebox_core::settlement::net_positions;

        proptest! {
            #[test]
            fn settlements_are_zero_sum(
                grosses in proptest::collection::vec(
                    proptest::collection::vec(3u8..8, 3),
                    0..=18,
                ),
                handicaps in proptest::collection::vec(0.0f64..20.0, 3),
            ) {
                let players = make_players_with_handicaps(&handicaps);
                let settings = NassauSettings {
                    course: full_handicap_course(HoleCount::Eighteen),
                    ..NassauSettings::default()
                };
                let mut log = ScoreLog::new();
                let rows: Vec<&[u8]> = grosses.iter().map(|r| r.as_slice()).collect();
                log.holes(&rows);

                let settlements = Nassau
                    .compute_settlements(&settings, &players, log.entries(), &[])
                    .unwrap();
                let sum: f64 = net_positions(&settlements).values().sum();
                prop_assert!(sum.abs() < 1e-6);
            }

            #[test]
            fn leader_present_iff_margin_nonzero(
                grosses in proptest::collection::vec(
                    proptest::collection::vec(3u8..8, 2),
                    0..=9,
                ),
            ) {
                let players = make_players(2);
                let mut log = ScoreLog::new();
                let rows: Vec<&[u8]> = grosses.iter().map(|r| r.as_slice()).collect();
                log.holes(&rows);
                let status = Nassau
                    .compute_status(&nine_hole_front_only(), &players, log.entries(), &[])
                    .unwrap();
                for region in &status.matches[0].regions {
                    prop_assert_eq!(
                        region.unit.lead.leader().is_none(),
                        region.unit.lead.margin() == 0
                    );
                }
            }
        }
    }
}
