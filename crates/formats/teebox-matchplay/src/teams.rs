use serde::{Deserialize, Serialize};

use teebox_core::error::EngineError;
use teebox_core::player::PlayerId;
use teebox_core::settlement::PairLedger;

/// One side of a best-ball team match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    #[serde(default)]
    pub name: String,
    pub players: Vec<PlayerId>,
}

impl TeamRoster {
    /// Display name, falling back to "Team N" (1-based).
    pub fn label(&self, index: usize) -> String {
        if self.name.trim().is_empty() {
            format!("Team {}", index + 1)
        } else {
            self.name.clone()
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains(&id)
    }
}

/// Both teams must be non-empty, disjoint and made of rostered players.
pub(crate) fn validate_teams(teams: &[TeamRoster; 2], roster: &[PlayerId]) -> Result<(), EngineError> {
    for (index, team) in teams.iter().enumerate() {
        let label = team.label(index);
        if team.players.is_empty() {
            return Err(EngineError::InvalidTeams(format!("{label} has no players")));
        }
        for (i, id) in team.players.iter().enumerate() {
            if !roster.contains(id) {
                return Err(EngineError::InvalidTeams(format!(
                    "{label} lists player {id}, who is not on the roster"
                )));
            }
            if team.players[..i].contains(id) {
                return Err(EngineError::InvalidTeams(format!(
                    "{label} lists player {id} twice"
                )));
            }
        }
    }
    if let Some(id) = teams[0].players.iter().find(|id| teams[1].contains(**id)) {
        return Err(EngineError::InvalidTeams(format!(
            "player {id} is on both teams"
        )));
    }
    Ok(())
}

/// What `first` and `second` owe each other after a decided team match.
///
/// The bet is split evenly across the winners, and every loser pays every
/// winner that share, so the money moved is `bet * losers`.
pub(crate) fn team_ledger(
    first: PlayerId,
    second: PlayerId,
    winners: &TeamRoster,
    losers: &TeamRoster,
    bet: f64,
    label: &str,
) -> PairLedger {
    let mut ledger = PairLedger::new();
    if winners.players.is_empty() {
        return ledger;
    }
    let share = bet / winners.players.len() as f64;
    if winners.contains(first) && losers.contains(second) {
        ledger.push(label, share);
    } else if losers.contains(first) && winners.contains(second) {
        ledger.push(label, -share);
    }
    ledger
}
