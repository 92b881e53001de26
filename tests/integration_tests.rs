//! Integration tests for the session loop

use tetrion::core::{
    GameConfig, GameSession, LevelThreshold, SessionEvent, SessionPhase, TetrominoDefinition,
};
use tetrion::types::{Intent, PieceKind, Rotation, SPAWN_ANCHOR, TICK_MS};

fn only(kind: PieceKind) -> GameConfig {
    GameConfig {
        tetrominoes: vec![TetrominoDefinition::standard(kind)],
        ..GameConfig::default()
    }
}

/// Four columns wide: two O pieces side by side clear two rows
fn narrow_o_config() -> GameConfig {
    GameConfig {
        board_width: 4,
        levels: vec![LevelThreshold::new(2, 500)],
        ..only(PieceKind::O)
    }
}

#[test]
fn test_spawn_on_empty_board() {
    let session = GameSession::new(GameConfig::default(), 12345).unwrap();
    let active = session.active().unwrap();

    assert_eq!(active.position(), SPAWN_ANCHOR);
    assert_eq!(active.rotation(), Rotation::North);
    assert_eq!(active.timers().step_remaining_ms, 1000);
    assert_eq!(active.timers().lock_elapsed_ms, 0);
    assert_eq!(session.phase(), SessionPhase::Playing);
    assert!(session.snapshot().playable());
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        vec![Intent::MoveLeft],
        vec![],
        vec![Intent::RotateCw],
        vec![Intent::HardDrop],
        vec![Intent::Hold],
        vec![Intent::MoveRight, Intent::SoftDrop],
        vec![Intent::HardDrop],
    ];

    let mut a = GameSession::new(GameConfig::default(), 777).unwrap();
    let mut b = GameSession::new(GameConfig::default(), 777).unwrap();
    for intents in script.iter().cycle().take(200) {
        a.tick(TICK_MS, intents);
        b.tick(TICK_MS, intents);
        assert_eq!(a.snapshot(), b.snapshot());
    }
    assert_eq!(a.board(), b.board());
}

#[test]
fn test_gravity_locks_after_reaching_floor() {
    let mut session = GameSession::new(only(PieceKind::O), 1).unwrap();

    // 18 rows down plus one blocked step, 63 ticks per step
    for _ in 0..(19 * 63 - 1) {
        assert!(!session.tick(TICK_MS, &[]));
    }
    assert_eq!(session.pieces_spawned(), 1);
    assert!(session.tick(TICK_MS, &[]));
    assert_eq!(session.pieces_spawned(), 2);
}

#[test]
fn test_zero_lock_delay_still_falls_to_the_floor() {
    let config = GameConfig {
        lock_delay_ms: 0,
        ..only(PieceKind::O)
    };
    let mut session = GameSession::new(config, 1).unwrap();

    for _ in 0..(19 * 63 - 1) {
        assert!(!session.tick(TICK_MS, &[]));
    }
    assert_eq!(session.active().unwrap().position().y, -10);
    assert!(session.tick(TICK_MS, &[]));
    assert_eq!(session.pieces_spawned(), 2);
}

#[test]
fn test_clearing_lines_through_ticks() {
    let mut session = GameSession::new(narrow_o_config(), 3).unwrap();

    session.tick(TICK_MS, &[Intent::MoveLeft]);
    assert!(session.tick(TICK_MS, &[Intent::HardDrop]));
    session.tick(TICK_MS, &[Intent::MoveRight]);
    assert!(session.tick(TICK_MS, &[Intent::HardDrop]));

    assert_eq!(session.lines(), 2);
    assert_eq!(session.level(), 1);
    assert_eq!(session.step_delay_ms(), 500);
    assert_eq!(session.active().unwrap().timers().step_delay_ms, 500);
    // only the new active piece remains
    assert_eq!(session.board().occupied_count(), 4);

    let events: Vec<SessionEvent> = session.drain_events().collect();
    assert!(events.contains(&SessionEvent::Locked {
        kind: PieceKind::O,
        lines_cleared: 2
    }));
    assert!(events.contains(&SessionEvent::LinesCleared { count: 2, total: 2 }));
}

#[test]
fn test_stacking_to_the_top_ends_the_game() {
    let mut session = GameSession::new(only(PieceKind::O), 9).unwrap();
    session.advance_lines(5);

    let mut drops = 0;
    while !session.is_game_over() {
        assert!(drops < 20, "game never ended");
        session.hard_drop();
        drops += 1;
    }

    // nine stacked O pieces fill y -10..8, the tenth locks at the spawn row
    assert_eq!(drops, 10);
    assert_eq!(session.pieces_spawned(), 10);
    assert_eq!(session.board().occupied_count(), 0);
    assert!(session.active().is_none());
    assert_eq!(session.lines(), 0);
    assert_eq!(session.level(), 0);
    assert_eq!(session.step_delay_ms(), 1000);

    let events: Vec<SessionEvent> = session.drain_events().collect();
    assert_eq!(
        events.iter().filter(|e| matches!(e, SessionEvent::GameOver { .. })).count(),
        1
    );
    assert!(events.contains(&SessionEvent::GameOver { lines: 5, level: 1 }));

    // no further ticks affect gameplay
    assert!(!session.tick(5000, &[Intent::HardDrop, Intent::Hold]));
    assert!(!session.hold());
    assert!(!session.spawn_next());
    assert_eq!(session.board().occupied_count(), 0);
    assert_eq!(session.drain_events().count(), 0);
}

#[test]
fn test_restart_after_game_over() {
    let config = GameConfig {
        board_width: 6,
        ..only(PieceKind::O)
    };
    let mut session = GameSession::new(config, 9).unwrap();
    while !session.is_game_over() {
        session.hard_drop();
    }

    session.tick(TICK_MS, &[Intent::Restart]);
    assert_eq!(session.phase(), SessionPhase::Playing);
    assert_eq!(session.board().width(), 6);
    assert_eq!(session.pieces_spawned(), 1);
    assert_eq!(session.board().occupied_count(), 4);
}

#[test]
fn test_first_hold_draws_then_swaps_without_draw() {
    let mut session = GameSession::new(GameConfig::default(), 4242).unwrap();
    let first = session.active().unwrap().kind();
    let second = session.next();

    assert!(session.hold());
    assert_eq!(session.held(), Some(first));
    assert_eq!(session.active().unwrap().kind(), second);
    assert_eq!(session.pieces_spawned(), 2);
    let queued = session.next();

    assert!(session.hold());
    assert_eq!(session.held(), Some(second));
    assert_eq!(session.active().unwrap().kind(), first);
    assert_eq!(session.next(), queued);
    assert_eq!(session.pieces_spawned(), 2);

    let active = session.active().unwrap();
    assert_eq!(active.position(), SPAWN_ANCHOR);
    assert_eq!(active.rotation(), Rotation::North);
}

#[test]
fn test_hold_resets_piece_state() {
    let mut session = GameSession::new(GameConfig::default(), 5).unwrap();
    session.hold();
    session.rotate_active(tetrion::types::RotationDirection::Clockwise);
    session.move_active(2, -3);

    session.hold();
    session.hold();
    let active = session.active().unwrap();
    assert_eq!(active.position(), SPAWN_ANCHOR);
    assert_eq!(active.rotation(), Rotation::North);
}

#[test]
fn test_update_level_idempotent_without_new_lines() {
    let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
    session.advance_lines(4);
    assert!(session.update_level());
    for _ in 0..5 {
        assert!(!session.update_level());
    }
    assert_eq!(session.level(), 1);
    assert_eq!(session.step_delay_ms(), 700);
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "board_width": 6,
        "tetrominoes": [
            {"kind": "O", "cells": [[0, 1], [1, 1], [0, 0], [1, 0]], "kicks": [[[0, 0]]]}
        ],
        "levels": [{"lines": 1, "step_delay_ms": 200}],
        "randomizer": "bag7"
    }"#;
    let config: GameConfig = serde_json::from_str(json).unwrap();
    let mut session = GameSession::new(config, 1).unwrap();

    assert_eq!(session.next(), PieceKind::O);
    assert!(session.rotate_active(tetrion::types::RotationDirection::Clockwise));
    assert_eq!(session.active().unwrap().rotation(), Rotation::East);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = GameConfig {
        step_delay_ms: 0,
        ..GameConfig::default()
    };
    let err = GameSession::new(config, 1).unwrap_err();
    assert_eq!(err.to_string(), "step delay must be non-zero");
}
