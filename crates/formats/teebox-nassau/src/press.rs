use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teebox_core::error::EngineError;
use teebox_core::player::PlayerId;
use teebox_core::score::Scorecard;
use teebox_core::warning::{DataWarning, raise};

use crate::settings::{NassauSettings, Region};

/// Identifier of a press row.
pub type PressId = u64;

/// What a press was laid against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum PressParent {
    Region(Region),
    Press(PressId),
}

/// A side bet created mid-round over the remaining holes of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Press {
    pub id: PressId,
    pub parent: PressParent,
    pub players: (PlayerId, PlayerId),
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    /// First hole the press covers, captured when it was created.
    #[serde(default)]
    pub start_hole: Option<u8>,
    #[serde(default)]
    pub initiated_by: Option<PlayerId>,
}

impl Press {
    /// Whether the press is between `a` and `b`, in either order.
    pub fn between(&self, a: PlayerId, b: PlayerId) -> bool {
        self.players == (a, b) || self.players == (b, a)
    }
}

/// A press placed on the course: its region and the holes it covers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedPress<'a> {
    pub press: &'a Press,
    pub region: Region,
    pub region_start: u8,
    pub start_hole: u8,
    pub end_hole: u8,
}

/// Validate presses and work out the holes each one covers.
///
/// The result is ordered by creation time, then id.
pub(crate) fn place_presses<'a>(
    presses: &'a [Press],
    settings: &NassauSettings,
    roster: &[PlayerId],
    card: &Scorecard,
    warnings: &mut Vec<DataWarning>,
) -> Result<Vec<PlacedPress<'a>>, EngineError> {
    let mut by_id: BTreeMap<PressId, &Press> = BTreeMap::new();
    for press in presses {
        if by_id.insert(press.id, press).is_some() {
            return Err(invalid(press, "id is used more than once"));
        }
    }

    let mut placed = Vec::with_capacity(presses.len());
    for press in presses {
        let (a, b) = press.players;
        for player in [a, b] {
            if !roster.contains(&player) {
                return Err(EngineError::UnknownPlayer(player));
            }
        }
        if a == b {
            return Err(invalid(press, "a press needs two different players"));
        }
        EngineError::check_amount(&format!("press {}", press.id), press.amount)?;

        let region = region_of(press, &by_id)?;
        let holes = region
            .holes(settings.course.holes)
            .ok_or_else(|| invalid(press, "region is not played in this round"))?;

        let start_hole = match press.start_hole {
            Some(hole) if holes.contains(&hole) => hole,
            Some(hole) => {
                return Err(invalid(
                    press,
                    &format!("start hole {hole} is outside the {}", region.label()),
                ));
            },
            None => infer_start(press, holes.clone(), card, warnings),
        };

        placed.push(PlacedPress {
            press,
            region,
            region_start: *holes.start(),
            start_hole,
            end_hole: *holes.end(),
        });
    }
    placed.sort_by_key(|p| (p.press.created_at, p.press.id));
    Ok(placed)
}

/// Follow parent links to the region at the root, checking each link
/// is between the same two players.
fn region_of(press: &Press, by_id: &BTreeMap<PressId, &Press>) -> Result<Region, EngineError> {
    let mut current = press;
    for _ in 0..=by_id.len() {
        match current.parent {
            PressParent::Region(region) => return Ok(region),
            PressParent::Press(parent_id) => {
                let parent = by_id
                    .get(&parent_id)
                    .ok_or_else(|| invalid(press, &format!("parent press {parent_id} not found")))?;
                if !parent.between(press.players.0, press.players.1) {
                    return Err(invalid(press, "parent press is between other players"));
                }
                current = parent;
            },
        }
    }
    Err(invalid(press, "parent links form a cycle"))
}

/// Start hole from score timestamps: the first hole of the region that the
/// pair had not both recorded before the press was created.
fn infer_start(
    press: &Press,
    holes: RangeInclusive<u8>,
    card: &Scorecard,
    warnings: &mut Vec<DataWarning>,
) -> u8 {
    let pair = [press.players.0, press.players.1];
    let recorded: Vec<u8> = holes
        .clone()
        .filter(|&hole| card.hole_recorded_before(hole, &pair, press.created_at))
        .collect();
    let start_hole = holes
        .clone()
        .find(|hole| !recorded.contains(hole))
        .unwrap_or(*holes.end() + 1);

    raise(
        warnings,
        DataWarning::PressStartInferred {
            press: press.id,
            start_hole,
        },
    );
    if recorded.iter().any(|&hole| hole > start_hole) {
        raise(
            warnings,
            DataWarning::PressStartAmbiguous {
                press: press.id,
                recorded_holes: recorded,
            },
        );
    }
    start_hole
}

fn invalid(press: &Press, reason: &str) -> EngineError {
    EngineError::InvalidPress {
        press: press.id,
        reason: reason.to_string(),
    }
}
