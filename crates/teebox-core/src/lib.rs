pub mod config;
pub mod course;
pub mod error;
pub mod format_trait;
pub mod handicap;
pub mod player;
pub mod score;
pub mod settlement;
pub mod tally;
pub mod warning;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::fmt::Debug;

    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    use crate::course::{CourseSetup, HandicapMode, HoleCount, StrokeIndex};
    use crate::format_trait::WagerFormat;
    use crate::player::{Player, PlayerId};
    use crate::score::ScoreEntry;
    use crate::settlement::{Settlement, net_positions};

    /// Game id shared by every score row the helpers produce.
    pub fn test_game_id() -> Uuid {
        Uuid::from_u128(0x7ee0_b0c5_0000_4000_8000_0000_0000_0001)
    }

    /// Create `n` scratch players with sequential IDs starting at 1.
    pub fn make_players(n: usize) -> Vec<Player> {
        make_players_with_handicaps(&vec![0.0; n])
    }

    /// Create one player per handicap, IDs starting at 1 in the given order.
    pub fn make_players_with_handicaps(handicaps: &[f64]) -> Vec<Player> {
        handicaps
            .iter()
            .enumerate()
            .map(|(i, &handicap)| Player {
                id: i as PlayerId + 1,
                display_name: format!("Player{}", i + 1),
                handicap,
                guest_handicap: None,
                position: i as u8,
            })
            .collect()
    }

    /// Course with no handicapping and a sequential stroke index.
    pub fn scratch_course(holes: HoleCount) -> CourseSetup {
        CourseSetup {
            holes,
            handicap_mode: HandicapMode::None,
            stroke_index: StrokeIndex::default(),
        }
    }

    /// Course with full handicapping and a sequential stroke index.
    pub fn full_handicap_course(holes: HoleCount) -> CourseSetup {
        CourseSetup {
            holes,
            handicap_mode: HandicapMode::Full,
            stroke_index: StrokeIndex::default(),
        }
    }

    /// Builds a score log with a clock that advances one minute per row.
    #[derive(Debug, Clone)]
    pub struct ScoreLog {
        clock: DateTime<Utc>,
        entries: Vec<ScoreEntry>,
    }

    impl Default for ScoreLog {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ScoreLog {
        pub fn new() -> Self {
            Self {
                clock: DateTime::from_timestamp(1_767_258_000, 0)
                    .expect("fixed test timestamp is valid"),
                entries: Vec::new(),
            }
        }

        /// The time the next row will be stamped with.
        pub fn now(&self) -> DateTime<Utc> {
            self.clock
        }

        /// Advance the clock without recording anything.
        pub fn wait(&mut self, minutes: i64) {
            self.clock += Duration::minutes(minutes);
        }

        pub fn record(&mut self, hole: u8, player_id: PlayerId, gross: u8) {
            self.entries.push(ScoreEntry {
                game_id: test_game_id(),
                hole,
                player_id,
                gross,
                recorded_at: self.clock,
            });
            self.clock += Duration::minutes(1);
        }

        /// Record one hole for several players.
        pub fn hole(&mut self, hole: u8, scores: &[(PlayerId, u8)]) {
            for &(player_id, gross) in scores {
                self.record(hole, player_id, gross);
            }
        }

        /// Record consecutive holes from hole 1; `rows[h]` holds each player's
        /// gross for hole `h + 1`, in player-id order starting at 1.
        pub fn holes(&mut self, rows: &[&[u8]]) {
            for (i, row) in rows.iter().enumerate() {
                let hole = i as u8 + 1;
                for (j, &gross) in row.iter().enumerate() {
                    self.record(hole, j as PlayerId + 1, gross);
                }
            }
        }

        pub fn entries(&self) -> &[ScoreEntry] {
            &self.entries
        }
    }

    // ================================================================
    // Format Contract Tests
    // ================================================================
    // Every WagerFormat implementation must pass these. Format crates call
    // them from their own #[cfg(test)] modules with a concrete snapshot.

    /// Net positions across all settlements must sum to zero.
    pub fn contract_settlements_zero_sum(settlements: &[Settlement]) {
        let sum: f64 = net_positions(settlements).values().sum();
        assert!(
            sum.abs() < 1e-6,
            "net positions must sum to zero, got {sum}"
        );
    }

    /// Each settlement must be positive, between two different players, and
    /// carry a breakdown that adds up to its amount.
    pub fn contract_settlements_well_formed(settlements: &[Settlement]) {
        for s in settlements {
            assert!(s.amount > 0.0, "settlement amount must be positive: {s:?}");
            assert_ne!(s.payer, s.payee, "payer and payee must differ: {s:?}");
            let breakdown: f64 = s.breakdown.iter().map(|item| item.amount).sum();
            assert!(
                (breakdown - s.amount).abs() < 1e-6,
                "breakdown must sum to amount: {s:?}"
            );
        }
    }

    /// Recomputing from the same snapshot must give identical results.
    pub fn contract_recompute_is_pure<F>(
        format: &F,
        settings: &F::Settings,
        players: &[Player],
        scores: &[ScoreEntry],
        extras: &F::Extras,
    ) where
        F: WagerFormat,
        F::Status: PartialEq + Debug,
    {
        let first = format.compute_status(settings, players, scores, extras);
        let second = format.compute_status(settings, players, scores, extras);
        assert_eq!(first, second, "status must not depend on call history");

        let first = format.compute_settlements(settings, players, scores, extras);
        let second = format.compute_settlements(settings, players, scores, extras);
        assert_eq!(first, second, "settlements must not depend on call history");
    }

    /// Run every settlement contract on one snapshot.
    pub fn contract_settlements<F>(
        format: &F,
        settings: &F::Settings,
        players: &[Player],
        scores: &[ScoreEntry],
        extras: &F::Extras,
    ) -> Vec<Settlement>
    where
        F: WagerFormat,
        F::Status: PartialEq + Debug,
    {
        contract_recompute_is_pure(format, settings, players, scores, extras);
        let settlements = format
            .compute_settlements(settings, players, scores, extras)
            .expect("snapshot must settle");
        contract_settlements_well_formed(&settlements);
        contract_settlements_zero_sum(&settlements);
        settlements
    }
}
