//! Running state of a two-sided, hole-by-hole unit: a Nassau region, a press,
//! or a match-play match.

use serde::{Deserialize, Serialize};

/// One side of a two-sided unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Pick the value belonging to this side.
    pub fn pick<T>(self, first: T, second: T) -> T {
        match self {
            Self::First => first,
            Self::Second => second,
        }
    }
}

/// Outcome of one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HoleOutcome<S> {
    Won { winner: S },
    Halved,
}

impl HoleOutcome<Side> {
    /// Lower net wins the hole; equal nets halve it.
    pub fn from_nets(first_net: i32, second_net: i32) -> Self {
        match first_net.cmp(&second_net) {
            std::cmp::Ordering::Less => Self::Won {
                winner: Side::First,
            },
            std::cmp::Ordering::Greater => Self::Won {
                winner: Side::Second,
            },
            std::cmp::Ordering::Equal => Self::Halved,
        }
    }
}

impl<S> HoleOutcome<S> {
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> HoleOutcome<T> {
        match self {
            Self::Won { winner } => HoleOutcome::Won { winner: f(winner) },
            Self::Halved => HoleOutcome::Halved,
        }
    }
}

/// Who is ahead. A leader exists exactly when the margin is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lead<S> {
    AllSquare,
    Leading { leader: S, margin: u32 },
}

impl<S: Copy> Lead<S> {
    pub fn leader(&self) -> Option<S> {
        match self {
            Self::AllSquare => None,
            Self::Leading { leader, .. } => Some(*leader),
        }
    }

    pub fn margin(&self) -> u32 {
        match self {
            Self::AllSquare => 0,
            Self::Leading { margin, .. } => *margin,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Lead<T> {
        match self {
            Self::AllSquare => Lead::AllSquare,
            Self::Leading { leader, margin } => Lead::Leading {
                leader: f(leader),
                margin,
            },
        }
    }
}

/// Holes-won counters for a unit of fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub length: u32,
    pub holes_played: u32,
    pub first_won: u32,
    pub second_won: u32,
}

impl Tally {
    pub fn new(length: u32) -> Self {
        Self {
            length,
            holes_played: 0,
            first_won: 0,
            second_won: 0,
        }
    }

    /// Count every outcome, including holes played after a closeout. The
    /// winner of a closed-out unit cannot change, only its margin.
    pub fn fold(length: u32, outcomes: impl IntoIterator<Item = HoleOutcome<Side>>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::new(length), |tally, outcome| tally.record(outcome))
    }

    /// Count outcomes until the unit completes; later outcomes are ignored.
    pub fn fold_to_close(
        length: u32,
        outcomes: impl IntoIterator<Item = HoleOutcome<Side>>,
    ) -> Self {
        outcomes.into_iter().fold(Self::new(length), |tally, outcome| {
            if tally.is_complete() {
                tally
            } else {
                tally.record(outcome)
            }
        })
    }

    /// The tally after one more hole.
    #[must_use]
    pub fn record(self, outcome: HoleOutcome<Side>) -> Self {
        let mut next = self;
        next.holes_played += 1;
        match outcome {
            HoleOutcome::Won {
                winner: Side::First,
            } => next.first_won += 1,
            HoleOutcome::Won {
                winner: Side::Second,
            } => next.second_won += 1,
            HoleOutcome::Halved => {},
        }
        next
    }

    pub fn lead(&self) -> Lead<Side> {
        match self.first_won.cmp(&self.second_won) {
            std::cmp::Ordering::Greater => Lead::Leading {
                leader: Side::First,
                margin: self.first_won - self.second_won,
            },
            std::cmp::Ordering::Less => Lead::Leading {
                leader: Side::Second,
                margin: self.second_won - self.first_won,
            },
            std::cmp::Ordering::Equal => Lead::AllSquare,
        }
    }

    pub fn holes_remaining(&self) -> u32 {
        self.length.saturating_sub(self.holes_played)
    }

    /// The leader cannot be caught: margin exceeds the holes left.
    pub fn is_closed_out(&self) -> bool {
        self.lead().margin() > self.holes_remaining()
    }

    pub fn is_complete(&self) -> bool {
        self.holes_played >= self.length || self.is_closed_out()
    }

    /// Margin equals holes left; the trailing side can at best halve.
    pub fn is_dormie(&self) -> bool {
        let margin = self.lead().margin();
        !self.is_complete() && margin > 0 && margin == self.holes_remaining()
    }
}
