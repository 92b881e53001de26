//! Property tests for session invariants under arbitrary input.
//!
//! Invariants covered:
//! - the active footprint stays inside the board and is stamped into it
//! - locked cells only change when a piece locks
//! - no completed row survives a tick unless the active piece is part of it
//! - cleared lines only grow while playing, and the level never exceeds the
//!   number of thresholds
//! - the same seed and input replay to the same state

use proptest::prelude::*;
use tetrion::core::{GameConfig, GameSession};
use tetrion::types::{Intent, Point};

const INTENTS: [Intent; 7] = [
    Intent::RotateCw,
    Intent::RotateCcw,
    Intent::MoveLeft,
    Intent::MoveRight,
    Intent::SoftDrop,
    Intent::HardDrop,
    Intent::Hold,
];

fn intents_from_mask(mask: u8) -> Vec<Intent> {
    INTENTS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, &intent)| intent)
        .collect()
}

/// Occupied cells that are not part of the active piece
fn locked_cells(session: &GameSession) -> usize {
    let footprint = session.active_footprint().unwrap_or_default();
    session
        .board()
        .occupied()
        .filter(|p: &Point| session.active().is_none() || !footprint.contains(p))
        .count()
}

fn assert_board_consistent(session: &GameSession) {
    let board = session.board();
    let bounds = board.bounds();

    let Some(footprint) = session.active_footprint() else {
        return;
    };
    for p in footprint {
        assert!(bounds.contains(p), "active cell {:?} out of bounds", p);
        assert!(board.is_occupied(p), "active cell {:?} not stamped", p);
    }

    for y in bounds.y_min..bounds.y_max() {
        if board.is_row_full(y) {
            assert!(
                footprint.iter().any(|p| p.y == y),
                "row {} is full without the active piece",
                y
            );
        }
    }
}

fn ticks() -> impl Strategy<Value = Vec<(u8, u32)>> {
    prop::collection::vec((0u8..128, 1u32..120), 1..400)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn session_invariants_hold_under_random_input(seed in any::<u32>(), script in ticks()) {
        let config = GameConfig::default();
        let level_cap = config.levels.len() as u32;
        let mut session = GameSession::new(config, seed).unwrap();
        let mut lines = 0;

        for (mask, elapsed) in script {
            let was_playing = !session.is_game_over();
            let locked_before = locked_cells(&session);
            let locked = session.tick(elapsed, &intents_from_mask(mask));

            assert_board_consistent(&session);
            if was_playing && !locked && !session.is_game_over() {
                prop_assert_eq!(locked_cells(&session), locked_before);
            }
            prop_assert!(session.level() <= level_cap);
            if was_playing && !session.is_game_over() {
                prop_assert!(session.lines() >= lines);
            }
            lines = session.lines();

            if session.is_game_over() {
                prop_assert!(session.active().is_none());
                prop_assert_eq!(session.board().occupied_count(), 0);
            }
        }
    }

    #[test]
    fn replay_is_deterministic(seed in any::<u32>(), script in ticks()) {
        let mut a = GameSession::new(GameConfig::default(), seed).unwrap();
        let mut b = GameSession::new(GameConfig::default(), seed).unwrap();

        for (mask, elapsed) in script {
            let intents = intents_from_mask(mask);
            prop_assert_eq!(a.tick(elapsed, &intents), b.tick(elapsed, &intents));
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
        prop_assert_eq!(a.board(), b.board());
    }
}
