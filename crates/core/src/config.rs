//! Session configuration
//!
//! Everything the simulation needs is supplied here at construction time:
//! board size, anchors, shape definitions, timings and level thresholds.
//! [`GameConfig::validate`] rejects malformed input so a session can never
//! fail mid-tick on bad static data.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pieces::TetrominoDefinition;
use crate::rng::Randomizer;
use crate::types::{
    PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH, HOLD_ANCHOR, LATERAL_REPEAT_MS, LOCK_DELAY_MS,
    PREVIEW_ANCHOR, SOFT_DROP_REPEAT_MS, SPAWN_ANCHOR, STEP_DELAY_MS,
};

/// A line-count threshold and the difficulty it switches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelThreshold {
    /// Cumulative cleared lines needed
    pub lines: u32,
    /// Step delay from this level on
    pub step_delay_ms: u32,
    /// Soft-drop repeat delay from this level on, if it changes
    #[serde(default)]
    pub soft_drop_repeat_ms: Option<u32>,
}

impl LevelThreshold {
    pub const fn new(lines: u32, step_delay_ms: u32) -> Self {
        Self {
            lines,
            step_delay_ms,
            soft_drop_repeat_ms: None,
        }
    }
}

/// Default leveling: 4, 16 and 64 lines, 300ms faster each time
pub fn default_levels() -> Vec<LevelThreshold> {
    vec![
        LevelThreshold::new(4, 700),
        LevelThreshold::new(16, 400),
        LevelThreshold {
            lines: 64,
            step_delay_ms: 100,
            soft_drop_repeat_ms: Some(40),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: u32,
    pub board_height: u32,
    pub spawn: Point,
    pub preview: Point,
    pub hold: Point,
    pub tetrominoes: Vec<TetrominoDefinition>,
    pub step_delay_ms: u32,
    pub lock_delay_ms: u32,
    pub lateral_repeat_ms: u32,
    pub soft_drop_repeat_ms: u32,
    pub levels: Vec<LevelThreshold>,
    pub randomizer: Randomizer,
    /// Allow only one hold per spawned piece
    pub hold_once_per_piece: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            spawn: SPAWN_ANCHOR,
            preview: PREVIEW_ANCHOR,
            hold: HOLD_ANCHOR,
            tetrominoes: TetrominoDefinition::standard_set(),
            step_delay_ms: STEP_DELAY_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            lateral_repeat_ms: LATERAL_REPEAT_MS,
            soft_drop_repeat_ms: SOFT_DROP_REPEAT_MS,
            levels: default_levels(),
            randomizer: Randomizer::default(),
            hold_once_per_piece: false,
        }
    }
}

/// Reasons a configuration is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: u32, height: u32 },
    #[error("board {width}x{height} is too large")]
    BoardTooLarge { width: u32, height: u32 },
    #[error("no tetromino definitions configured")]
    NoTetrominoes,
    #[error("{kind:?} has an empty kick table")]
    EmptyKickTable { kind: PieceKind },
    #[error("{kind:?} kick row {row} has no translations")]
    EmptyKickRow { kind: PieceKind, row: usize },
    #[error("{kind:?} kick row {row} has {found} translations, expected {expected}")]
    RaggedKickTable {
        kind: PieceKind,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{kind:?} has duplicate cell offset {cell:?}")]
    DuplicateCell { kind: PieceKind, cell: Point },
    #[error("step delay must be non-zero")]
    ZeroStepDelay,
    #[error("level {index} threshold ({lines} lines) does not exceed the previous one")]
    ThresholdsNotAscending { index: usize, lines: u32 },
    #[error("level {index} step delay must be non-zero")]
    ZeroLevelStepDelay { index: usize },
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }
        // sides become signed coordinates, the area a cell count
        let max_side = i32::MAX.unsigned_abs();
        if self.board_width > max_side
            || self.board_height > max_side
            || self.board_width.checked_mul(self.board_height).is_none()
        {
            return Err(ConfigError::BoardTooLarge {
                width: self.board_width,
                height: self.board_height,
            });
        }

        if self.tetrominoes.is_empty() {
            return Err(ConfigError::NoTetrominoes);
        }
        for def in &self.tetrominoes {
            validate_definition(def)?;
        }

        if self.step_delay_ms == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }

        let mut previous: Option<u32> = None;
        for (index, level) in self.levels.iter().enumerate() {
            if previous.is_some_and(|p| level.lines <= p) {
                return Err(ConfigError::ThresholdsNotAscending {
                    index,
                    lines: level.lines,
                });
            }
            if level.step_delay_ms == 0 {
                return Err(ConfigError::ZeroLevelStepDelay { index });
            }
            previous = Some(level.lines);
        }

        Ok(())
    }
}

fn validate_definition(def: &TetrominoDefinition) -> Result<(), ConfigError> {
    let kind = def.kind;

    let mut seen = HashSet::new();
    for &cell in &def.cells {
        if !seen.insert(cell) {
            return Err(ConfigError::DuplicateCell { kind, cell });
        }
    }

    let Some(first) = def.kicks.first() else {
        return Err(ConfigError::EmptyKickTable { kind });
    };
    let expected = first.len();
    for (row, options) in def.kicks.iter().enumerate() {
        if options.is_empty() {
            return Err(ConfigError::EmptyKickRow { kind, row });
        }
        if options.len() != expected {
            return Err(ConfigError::RaggedKickTable {
                kind,
                row,
                expected,
                found: options.len(),
            });
        }
    }

    Ok(())
}
