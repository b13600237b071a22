pub mod error;
pub mod snapshot;

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use teebox_core::config::TeeboxConfig;
use teebox_core::course::CourseSetup;
use teebox_core::error::EngineError;
use teebox_core::format_trait::WagerFormat;
use teebox_core::player::PlayerId;
use teebox_core::settlement::{Settlement, net_positions};

use error::TallyError;
use snapshot::{GameSpec, RoundSnapshot};

/// Output of one tally run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyReport {
    pub game_id: Uuid,
    pub format: String,
    pub status: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlements: Option<Vec<Settlement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_positions: Option<BTreeMap<PlayerId, f64>>,
}

/// Compute the status, and optionally the settlements, for a snapshot.
pub fn run(
    snapshot: &RoundSnapshot,
    config: &TeeboxConfig,
    settle: bool,
) -> Result<TallyReport, TallyError> {
    if let Some(entry) = snapshot.scores.iter().find(|s| s.game_id != snapshot.game_id) {
        return Err(EngineError::GameMismatch {
            expected: snapshot.game_id,
            found: entry.game_id,
        }
        .into());
    }
    let course = snapshot.course.unwrap_or(CourseSetup {
        handicap_mode: config.handicap_mode,
        ..CourseSetup::default()
    });
    let players = &snapshot.players;
    let scores = &snapshot.scores;

    tracing::info!(
        game = %snapshot.game_id,
        format = snapshot.game.format_name(),
        players = players.len(),
        scores = scores.len(),
        "tallying round"
    );

    let (status, settlements) = match &snapshot.game {
        #[cfg(feature = "nassau")]
        GameSpec::Nassau { settings, presses } => {
            let settings = resolve(settings, snapshot.course, |mut s, c| {
                s.course = c;
                s
            })
            .unwrap_or_else(|| {
                teebox_nassau::settings::NassauSettings::from_defaults(course, &config.nassau)
            });
            tally(
                &teebox_nassau::Nassau,
                &settings,
                players,
                scores,
                presses.as_slice(),
                settle,
            )?
        },
        #[cfg(feature = "skins")]
        GameSpec::Skins { settings } => {
            let settings = resolve(settings, snapshot.course, |mut s, c| {
                s.course = c;
                s
            })
            .unwrap_or_else(|| teebox_skins::SkinsSettings::from_defaults(course, &config.skins));
            tally(&teebox_skins::Skins, &settings, players, scores, &(), settle)?
        },
        #[cfg(feature = "wolf")]
        GameSpec::Wolf { settings, choices } => {
            let settings = resolve(settings, snapshot.course, |mut s, c| {
                s.course = c;
                s
            })
            .unwrap_or_else(|| teebox_wolf::WolfSettings::from_defaults(course, &config.wolf));
            tally(
                &teebox_wolf::Wolf,
                &settings,
                players,
                scores,
                choices.as_slice(),
                settle,
            )?
        },
        #[cfg(feature = "matchplay")]
        GameSpec::MatchPlay { settings } => {
            let settings = resolve(settings, snapshot.course, |mut s, c| {
                s.course = c;
                s
            })
            .unwrap_or_else(|| {
                teebox_matchplay::MatchPlaySettings::from_defaults(course, &config.match_play)
            });
            tally(&teebox_matchplay::MatchPlay, &settings, players, scores, &(), settle)?
        },
    };

    let net_positions = settlements.as_deref().map(net_positions);
    Ok(TallyReport {
        game_id: snapshot.game_id,
        format: snapshot.game.format_name().to_string(),
        status,
        settlements,
        net_positions,
    })
}

/// Settings given in the snapshot, with the snapshot-level course applied.
fn resolve<T: Clone>(
    settings: &Option<T>,
    course: Option<CourseSetup>,
    with_course: impl FnOnce(T, CourseSetup) -> T,
) -> Option<T> {
    let settings = settings.clone()?;
    Some(match course {
        Some(course) => with_course(settings, course),
        None => settings,
    })
}

fn tally<F>(
    format: &F,
    settings: &F::Settings,
    players: &[teebox_core::player::Player],
    scores: &[teebox_core::score::ScoreEntry],
    extras: &F::Extras,
    settle: bool,
) -> Result<(serde_json::Value, Option<Vec<Settlement>>), TallyError>
where
    F: WagerFormat,
    F::Status: Serialize,
{
    let status = format.compute_status(settings, players, scores, extras)?;
    let settlements = if settle {
        let settlements = format.compute_settlements(settings, players, scores, extras)?;
        tracing::info!(count = settlements.len(), "settled round");
        Some(settlements)
    } else {
        None
    };
    Ok((serde_json::to_value(&status)?, settlements))
}
