//! Active piece - a live tetromino with its position, rotation and timers
//!
//! Lifecycle: *Spawning → Falling → Locking → Locked*. [`ActivePiece::spawn`]
//! covers spawning; the session validates the spawn and owns the lock.
//!
//! Two timers are kept per piece:
//! - the step timer counts down to the next forced downward move;
//! - the lock timer accumulates time since the last successful move.
//!
//! Any successful move resets the lock timer, lateral and rotational ones
//! included. The lock delay is only compared at forced steps.

use std::sync::Arc;

use crate::board::Board;
use crate::pieces::{PieceShape, TetrominoDefinition};
use crate::rotation::{resolve_kick, rotate_cells};
use crate::types::{PieceKind, Point, Rotation, RotationDirection, PIECE_CELLS};

/// Where the piece is in its fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiecePhase {
    /// Last forced step moved the piece (or none has happened yet)
    Falling,
    /// Last forced step was blocked; the piece locks once the lock delay has elapsed
    Locking,
}

/// Result of a forced downward step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    Moved,
    Blocked,
    Lock,
}

/// Per-piece timers, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceTimers {
    pub step_delay_ms: u32,
    pub step_remaining_ms: u32,
    pub lock_elapsed_ms: u32,
}

impl PieceTimers {
    fn armed(step_delay_ms: u32) -> Self {
        Self {
            step_delay_ms,
            step_remaining_ms: step_delay_ms,
            lock_elapsed_ms: 0,
        }
    }
}

/// The piece currently under player control
#[derive(Debug, Clone)]
pub struct ActivePiece {
    definition: Arc<TetrominoDefinition>,
    position: Point,
    rotation: Rotation,
    cells: PieceShape,
    timers: PieceTimers,
    phase: PiecePhase,
}

impl ActivePiece {
    /// Place a fresh instance of `definition` at `anchor`
    ///
    /// Rotation and cells are reset to the canonical spawn state, the step
    /// timer is armed and the lock timer zeroed. The result is not validated.
    pub fn spawn(definition: Arc<TetrominoDefinition>, anchor: Point, step_delay_ms: u32) -> Self {
        let cells = definition.cells;
        Self {
            definition,
            position: anchor,
            rotation: Rotation::North,
            cells,
            timers: PieceTimers::armed(step_delay_ms),
            phase: PiecePhase::Falling,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &Arc<TetrominoDefinition> {
        &self.definition
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current offsets relative to the pivot
    pub fn cells(&self) -> &PieceShape {
        &self.cells
    }

    pub fn timers(&self) -> PieceTimers {
        self.timers
    }

    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    /// Absolute board positions of the piece's cells
    pub fn footprint(&self) -> [Point; PIECE_CELLS] {
        self.footprint_at(self.position)
    }

    fn footprint_at(&self, position: Point) -> [Point; PIECE_CELLS] {
        self.cells.map(|c| c + position)
    }

    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_placement(self.footprint())
    }

    /// Move by `(dx, dy)` if the target is free
    ///
    /// On success the lock timer resets. On failure nothing changes.
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        let target = self.position.offset(dx, dy);
        if !board.is_valid_placement(self.footprint_at(target)) {
            return false;
        }

        self.position = target;
        self.timers.lock_elapsed_ms = 0;
        true
    }

    /// Rotate with wall kicks
    ///
    /// Either the turn is applied together with the first kick that fits, or
    /// rotation index and cells are restored exactly.
    pub fn rotate(&mut self, board: &Board, direction: RotationDirection) -> bool {
        let original_rotation = self.rotation;
        let original_cells = self.cells;

        self.rotation = self.rotation.turn(direction);
        self.cells = rotate_cells(&self.cells, self.definition.pivot_class(), direction);

        let definition = Arc::clone(&self.definition);
        let kicked = resolve_kick(&definition, self.rotation, direction, |t| {
            self.try_move(board, t.x, t.y)
        });

        if kicked.is_none() {
            self.rotation = original_rotation;
            self.cells = original_cells;
            log::trace!("{:?} rotation {:?} rejected", self.kind(), direction);
            return false;
        }

        true
    }

    /// Move down until blocked; returns the distance fallen
    pub fn drop_to_floor(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.try_move(board, 0, -1) {
            distance += 1;
        }
        distance
    }

    pub fn advance_lock_timer(&mut self, elapsed_ms: u32) {
        self.timers.lock_elapsed_ms = self.timers.lock_elapsed_ms.saturating_add(elapsed_ms);
    }

    /// Count the step timer down; true when a forced step is due
    pub fn advance_step_timer(&mut self, elapsed_ms: u32) -> bool {
        self.timers.step_remaining_ms = self.timers.step_remaining_ms.saturating_sub(elapsed_ms);
        self.timers.step_remaining_ms == 0
    }

    /// Forced downward step
    ///
    /// Re-arms the step timer and tries to move down. Only a blocked step
    /// compares the lock timer against `lock_delay_ms`, so a piece that can
    /// still fall never locks.
    pub fn step(&mut self, board: &Board, lock_delay_ms: u32) -> StepOutcome {
        self.timers.step_remaining_ms = self.timers.step_delay_ms;

        let moved = self.try_move(board, 0, -1);
        self.phase = if moved {
            PiecePhase::Falling
        } else {
            PiecePhase::Locking
        };

        if moved {
            StepOutcome::Moved
        } else if self.timers.lock_elapsed_ms >= lock_delay_ms {
            StepOutcome::Lock
        } else {
            StepOutcome::Blocked
        }
    }

    /// Apply a new step delay mid-fall, clamping the time left
    pub fn set_step_delay(&mut self, step_delay_ms: u32) {
        self.timers.step_delay_ms = step_delay_ms;
        self.timers.step_remaining_ms = self.timers.step_remaining_ms.min(step_delay_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, SPAWN_ANCHOR};

    fn piece(kind: PieceKind) -> ActivePiece {
        ActivePiece::spawn(Arc::new(TetrominoDefinition::standard(kind)), SPAWN_ANCHOR, 1000)
    }

    fn board() -> Board {
        Board::new(BOARD_WIDTH, BOARD_HEIGHT)
    }

    #[test]
    fn test_spawn_state() {
        let p = piece(PieceKind::T);
        assert_eq!(p.position(), SPAWN_ANCHOR);
        assert_eq!(p.rotation(), Rotation::North);
        assert_eq!(p.timers().step_remaining_ms, 1000);
        assert_eq!(p.timers().lock_elapsed_ms, 0);
        assert_eq!(p.phase(), PiecePhase::Falling);
        assert_eq!(
            p.footprint(),
            [Point::new(-1, 9), Point::new(-2, 8), Point::new(-1, 8), Point::new(0, 8)]
        );
    }

    #[test]
    fn test_try_move_resets_lock_timer() {
        let b = board();
        let mut p = piece(PieceKind::T);
        p.advance_lock_timer(250);
        assert!(p.try_move(&b, 1, 0));
        assert_eq!(p.timers().lock_elapsed_ms, 0);
        assert_eq!(p.position(), SPAWN_ANCHOR.offset(1, 0));
    }

    #[test]
    fn test_try_move_blocked_leaves_state() {
        let b = board();
        let mut p = piece(PieceKind::T);
        p.advance_lock_timer(250);
        // T spawn reaches y = 9, the top row
        assert!(!p.try_move(&b, 0, 1));
        assert_eq!(p.position(), SPAWN_ANCHOR);
        assert_eq!(p.timers().lock_elapsed_ms, 250);
    }

    #[test]
    fn test_rotation_kicks_down_from_ceiling() {
        let b = board();
        let mut p = piece(PieceKind::I);
        while p.try_move(&b, -1, 0) {}
        assert_eq!(p.position().x, -4);

        // Vertical I would poke through the top; only the last kick (2, -1) fits.
        assert!(p.rotate(&b, RotationDirection::Clockwise));
        assert_eq!(p.rotation(), Rotation::East);
        assert_eq!(p.position(), Point::new(-2, 7));
        assert!(p.is_valid(&b));
    }

    #[test]
    fn test_rotation_rolls_back_when_boxed_in() {
        let mut b = board();
        let mut p = piece(PieceKind::T);
        // surround the piece so no kick can fit
        let footprint = p.footprint();
        for x in -5..5 {
            for y in -10..10 {
                let pt = Point::new(x, y);
                if !footprint.contains(&pt) {
                    b.set(pt, Some(PieceKind::Z));
                }
            }
        }

        let cells = *p.cells();
        p.advance_lock_timer(120);
        assert!(!p.rotate(&b, RotationDirection::Clockwise));
        assert_eq!(p.rotation(), Rotation::North);
        assert_eq!(*p.cells(), cells);
        assert_eq!(p.position(), SPAWN_ANCHOR);
        assert_eq!(p.timers().lock_elapsed_ms, 120);
    }

    #[test]
    fn test_step_moves_then_blocks() {
        let b = board();
        let mut p = piece(PieceKind::O);
        assert!(p.advance_step_timer(1000));
        assert_eq!(p.step(&b, 300), StepOutcome::Moved);
        assert_eq!(p.timers().step_remaining_ms, 1000);

        p.drop_to_floor(&b);
        p.advance_lock_timer(100);
        assert_eq!(p.step(&b, 300), StepOutcome::Blocked);
        assert_eq!(p.phase(), PiecePhase::Locking);

        p.advance_lock_timer(200);
        assert_eq!(p.step(&b, 300), StepOutcome::Lock);
    }

    #[test]
    fn test_zero_lock_delay_locks_only_when_grounded() {
        let b = board();
        let mut p = piece(PieceKind::O);
        assert_eq!(p.step(&b, 0), StepOutcome::Moved);
        assert_eq!(p.position(), SPAWN_ANCHOR.offset(0, -1));

        p.drop_to_floor(&b);
        assert_eq!(p.step(&b, 0), StepOutcome::Lock);
    }

    #[test]
    fn test_drop_to_floor_distance() {
        let b = board();
        let mut p = piece(PieceKind::O);
        // O cells occupy y = pos .. pos+1; floor is -10
        assert_eq!(p.drop_to_floor(&b), 18);
        assert_eq!(p.position().y, -10);
    }

    #[test]
    fn test_set_step_delay_clamps_remaining() {
        let mut p = piece(PieceKind::S);
        p.set_step_delay(700);
        assert_eq!(p.timers().step_remaining_ms, 700);
        p.advance_step_timer(600);
        p.set_step_delay(400);
        assert_eq!(p.timers().step_remaining_ms, 100);
    }
}
