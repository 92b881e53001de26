//! Simulation core - pure, deterministic, and testable
//!
//! This crate holds the rules of a falling-block game: a bounded grid, a
//! single active tetromino with wall-kicked rotation, line sweeping, leveling
//! and a hold slot. It has no dependencies on terminals or I/O; presentation
//! collaborators read the board and drain [`SessionEvent`]s.
//!
//! # Module Structure
//!
//! - [`board`]: grid of optional cells, placement checks and row sweeping
//! - [`pieces`]: tetromino definitions and kick tables
//! - [`rotation`]: quarter-turn cell math and kick resolution
//! - [`piece`]: the active piece with its step and lock timers
//! - [`progression`]: line counting and threshold leveling
//! - [`rng`]: seeded uniform or 7-bag piece selection
//! - [`config`]: session configuration and validation
//! - [`session`]: the tick loop tying everything together
//! - [`events`] / [`snapshot`]: what presentation layers observe
//!
//! # Coordinates
//!
//! The board is centered on the origin with y growing upward. A 10x20 board
//! spans `x` in `-5..5` and `y` in `-10..10`; pieces fall toward `y_min`.
//!
//! # Example
//!
//! ```
//! use tetrion_core::{GameConfig, GameSession};
//! use tetrion_types::Intent;
//!
//! let mut session = GameSession::new(GameConfig::default(), 12345).unwrap();
//!
//! session.tick(16, &[Intent::MoveRight]);
//! session.tick(16, &[Intent::RotateCw]);
//! let locked = session.tick(16, &[Intent::HardDrop]);
//!
//! assert!(locked);
//! assert_eq!(session.pieces_spawned(), 2);
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::tick`](session::GameSession::tick) with the elapsed
//! milliseconds (16ms at 60 Hz). Gravity starts at 1000ms per row and speeds
//! up at each level; a grounded piece locks at the first forced step after
//! 300ms without a successful move.

pub mod board;
pub mod config;
pub mod events;
pub mod piece;
pub mod pieces;
pub mod progression;
pub mod rng;
pub mod rotation;
pub mod session;
pub mod snapshot;

pub use tetrion_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{default_levels, ConfigError, GameConfig, LevelThreshold};
pub use events::{Layer, SessionEvent};
pub use piece::{ActivePiece, PiecePhase, PieceTimers, StepOutcome};
pub use pieces::{standard_cells, KickTable, PieceShape, TetrominoDefinition};
pub use progression::Progression;
pub use rng::{PieceQueue, Randomizer, SimpleRng};
pub use rotation::{resolve_kick, rotate_cells};
pub use session::{GameSession, SessionPhase};
pub use snapshot::{ActiveSnapshot, SessionSnapshot};
