//! Game session - ties the board, pieces, randomizer and progression together
//!
//! The session is advanced by [`GameSession::tick`] with the elapsed time and
//! the intents gathered since the previous tick. Between calls the active
//! piece's footprint is stamped into the board, so a renderer reading the
//! board sees it; during a tick the footprint is lifted so collision checks
//! only see locked cells.
//!
//! Game over happens exactly once per session, when a new piece cannot be
//! placed at the spawn anchor. The board is cleared, counters reset and a
//! [`SessionEvent::GameOver`] carrying the final counters is queued. Only a
//! restart brings the session back.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::board::Board;
use crate::config::{ConfigError, GameConfig};
use crate::events::{Layer, SessionEvent};
use crate::piece::{ActivePiece, StepOutcome};
use crate::pieces::TetrominoDefinition;
use crate::progression::Progression;
use crate::rng::PieceQueue;
use crate::snapshot::{ActiveSnapshot, SessionSnapshot};
use crate::types::{Intent, PieceKind, Point, RotationDirection, PIECE_CELLS};

/// Pending events kept before the oldest are dropped
const MAX_PENDING_EVENTS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Playing,
    GameOver,
}

/// Repeat accumulator for a level-triggered intent
///
/// A fresh press fires at once; while held it fires again each time the
/// delay has elapsed.
#[derive(Debug, Clone, Copy, Default)]
struct RepeatTimer {
    held: bool,
    elapsed_ms: u32,
}

impl RepeatTimer {
    fn poll(&mut self, active: bool, elapsed_ms: u32, delay_ms: u32) -> bool {
        if !active {
            *self = Self::default();
            return false;
        }
        if !self.held {
            self.held = true;
            self.elapsed_ms = 0;
            return true;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= delay_ms {
            self.elapsed_ms = 0;
            true
        } else {
            false
        }
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    definitions: Vec<Arc<TetrominoDefinition>>,
    board: Board,
    active: Option<ActivePiece>,
    /// Whether the active footprint is currently written into the board
    active_stamped: bool,
    next: Arc<TetrominoDefinition>,
    held: Option<Arc<TetrominoDefinition>>,
    held_this_piece: bool,
    queue: PieceQueue,
    progression: Progression,
    step_delay_ms: u32,
    soft_drop_repeat_ms: u32,
    left_repeat: RepeatTimer,
    right_repeat: RepeatTimer,
    soft_drop_repeat: RepeatTimer,
    phase: SessionPhase,
    pieces_spawned: u32,
    events: VecDeque<SessionEvent>,
}

impl GameSession {
    /// Validate `config` and start a session with the first piece spawned
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::fresh(config, seed))
    }

    fn fresh(config: GameConfig, seed: u32) -> Self {
        let definitions: Vec<Arc<TetrominoDefinition>> =
            config.tetrominoes.iter().cloned().map(Arc::new).collect();
        let mut queue = PieceQueue::new(config.randomizer, definitions.len(), seed);
        let next = Arc::clone(&definitions[queue.draw()]);

        let mut session = Self {
            board: Board::new(config.board_width, config.board_height),
            active: None,
            active_stamped: false,
            next,
            held: None,
            held_this_piece: false,
            queue,
            progression: Progression::new(config.levels.len()),
            step_delay_ms: config.step_delay_ms,
            soft_drop_repeat_ms: config.soft_drop_repeat_ms,
            left_repeat: RepeatTimer::default(),
            right_repeat: RepeatTimer::default(),
            soft_drop_repeat: RepeatTimer::default(),
            phase: SessionPhase::Playing,
            pieces_spawned: 0,
            events: VecDeque::new(),
            definitions,
            config,
        };

        log::info!(
            "session started: {}x{} board, {} shapes, seed {}",
            session.config.board_width,
            session.config.board_height,
            session.definitions.len(),
            seed
        );

        let preview = session.anchored(&session.next, session.config.preview);
        session.emit(SessionEvent::Stamp {
            layer: Layer::Preview,
            kind: session.next.kind,
            cells: preview,
        });
        session.spawn_next();
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> PieceKind {
        self.next.kind
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held.as_ref().map(|d| d.kind)
    }

    pub fn lines(&self) -> u32 {
        self.progression.lines()
    }

    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    pub fn step_delay_ms(&self) -> u32 {
        self.step_delay_ms
    }

    pub fn soft_drop_repeat_ms(&self) -> u32 {
        self.soft_drop_repeat_ms
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    /// Absolute cells of the active piece
    pub fn active_footprint(&self) -> Option<[Point; PIECE_CELLS]> {
        self.active.as_ref().map(|p| p.footprint())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            active: self.active.as_ref().map(ActiveSnapshot::from),
            next: self.next.kind,
            held: self.held(),
            lines: self.lines(),
            level: self.level(),
            step_delay_ms: self.step_delay_ms,
            pieces_spawned: self.pieces_spawned,
            seed: self.queue.seed(),
        }
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Advance the simulation by one tick
    ///
    /// Returns true when a piece locked during this tick.
    pub fn tick(&mut self, elapsed_ms: u32, intents: &[Intent]) -> bool {
        if intents.contains(&Intent::Restart) {
            self.restart();
            return false;
        }
        if self.is_game_over() {
            return false;
        }

        self.lift_active();
        self.apply_level_ups();

        if let Some(active) = self.active.as_mut() {
            active.advance_lock_timer(elapsed_ms);
        }

        let locked = self.apply_intents(elapsed_ms, intents) || self.advance_fall(elapsed_ms);

        self.place_active();
        locked
    }

    /// Promote the queued piece to active and draw a new next piece
    ///
    /// Returns false (and ends the game) if the spawn position is blocked.
    pub fn spawn_next(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.lift_active();
        let spawned = self.spawn_next_inner();
        self.place_active();
        spawned
    }

    /// Set the active piece aside
    ///
    /// The first hold parks the active piece and spawns from the queue. Later
    /// holds swap the active and held pieces without touching the queue.
    pub fn hold(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.lift_active();
        let held = self.hold_inner();
        self.place_active();
        held
    }

    pub fn move_active(&mut self, dx: i32, dy: i32) -> bool {
        self.lift_active();
        let moved = match self.active.as_mut() {
            Some(active) => active.try_move(&self.board, dx, dy),
            None => false,
        };
        self.place_active();
        moved
    }

    pub fn rotate_active(&mut self, direction: RotationDirection) -> bool {
        self.lift_active();
        let rotated = self.rotate_inner(direction);
        self.place_active();
        rotated
    }

    /// Drop the active piece until blocked and lock it
    pub fn hard_drop(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.lift_active();
        let locked = self.hard_drop_inner();
        self.place_active();
        locked
    }

    pub fn advance_lines(&mut self, n: u32) {
        self.progression.advance_lines(n);
    }

    /// Apply any newly crossed level thresholds; true if the level changed
    pub fn update_level(&mut self) -> bool {
        self.apply_level_ups()
    }

    /// Discard everything and start over with the same configuration
    pub fn restart(&mut self) {
        let seed = self.queue.seed();
        let config = std::mem::take(&mut self.config);
        *self = Self::fresh(config, seed);
        self.events.push_front(SessionEvent::Restarted);
        log::info!("session restarted");
    }

    fn apply_intents(&mut self, elapsed_ms: u32, intents: &[Intent]) -> bool {
        let has = |intent: Intent| intents.contains(&intent);

        let lateral_ms = self.config.lateral_repeat_ms;
        let left = self.left_repeat.poll(has(Intent::MoveLeft), elapsed_ms, lateral_ms);
        let right = self.right_repeat.poll(has(Intent::MoveRight), elapsed_ms, lateral_ms);
        let soft_drop =
            self.soft_drop_repeat
                .poll(has(Intent::SoftDrop), elapsed_ms, self.soft_drop_repeat_ms);

        if has(Intent::RotateCcw) {
            self.rotate_inner(RotationDirection::CounterClockwise);
        }
        if has(Intent::RotateCw) {
            self.rotate_inner(RotationDirection::Clockwise);
        }
        if left {
            self.move_inner(-1, 0);
        }
        if right {
            self.move_inner(1, 0);
        }
        if soft_drop {
            self.move_inner(0, -1);
        }
        if has(Intent::Hold) {
            self.hold_inner();
        }
        if has(Intent::HardDrop) {
            return self.hard_drop_inner();
        }

        false
    }

    /// Run the step timer; a due step may lock the piece
    fn advance_fall(&mut self, elapsed_ms: u32) -> bool {
        let lock_delay_ms = self.config.lock_delay_ms;
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.advance_step_timer(elapsed_ms) {
            return false;
        }

        match active.step(&self.board, lock_delay_ms) {
            StepOutcome::Lock => {
                self.lock_inner();
                true
            }
            StepOutcome::Moved | StepOutcome::Blocked => false,
        }
    }

    fn move_inner(&mut self, dx: i32, dy: i32) -> bool {
        match self.active.as_mut() {
            Some(active) => active.try_move(&self.board, dx, dy),
            None => false,
        }
    }

    fn rotate_inner(&mut self, direction: RotationDirection) -> bool {
        match self.active.as_mut() {
            Some(active) => active.rotate(&self.board, direction),
            None => false,
        }
    }

    fn hard_drop_inner(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let distance = active.drop_to_floor(&self.board);
        log::debug!("{:?} hard dropped {} rows", active.kind(), distance);
        self.lock_inner();
        true
    }

    fn spawn_next_inner(&mut self) -> bool {
        let definition = Arc::clone(&self.next);
        let piece = ActivePiece::spawn(definition, self.config.spawn, self.step_delay_ms);

        if !piece.is_valid(&self.board) {
            log::debug!("{:?} cannot spawn at {:?}", piece.kind(), self.config.spawn);
            self.game_over();
            return false;
        }

        log::debug!("spawned {:?}", piece.kind());
        self.active = Some(piece);
        self.held_this_piece = false;
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        self.advance_queue();
        true
    }

    /// Replace the queued next piece with a fresh draw
    fn advance_queue(&mut self) {
        let drawn = Arc::clone(&self.definitions[self.queue.draw()]);
        let previous = std::mem::replace(&mut self.next, drawn);

        let anchor = self.config.preview;
        self.emit(SessionEvent::Unstamp {
            layer: Layer::Preview,
            cells: self.anchored(&previous, anchor),
        });
        self.emit(SessionEvent::Stamp {
            layer: Layer::Preview,
            kind: self.next.kind,
            cells: self.anchored(&self.next, anchor),
        });
    }

    fn hold_inner(&mut self) -> bool {
        if self.config.hold_once_per_piece && self.held_this_piece {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };

        let current = Arc::clone(active.definition());
        let anchor = self.config.hold;
        let previous = self.held.replace(Arc::clone(&current));

        if let Some(previous) = &previous {
            self.emit(SessionEvent::Unstamp {
                layer: Layer::Hold,
                cells: self.anchored(previous, anchor),
            });
        }
        self.emit(SessionEvent::Stamp {
            layer: Layer::Hold,
            kind: current.kind,
            cells: self.anchored(&current, anchor),
        });

        let ok = match previous {
            None => {
                log::debug!("holding {:?}", current.kind);
                self.spawn_next_inner()
            }
            Some(swapped) => {
                log::debug!("swapping {:?} for held {:?}", current.kind, swapped.kind);
                let piece = ActivePiece::spawn(swapped, self.config.spawn, self.step_delay_ms);
                if piece.is_valid(&self.board) {
                    self.active = Some(piece);
                    true
                } else {
                    self.game_over();
                    false
                }
            }
        };

        if ok {
            self.held_this_piece = true;
        }
        ok
    }

    /// Write the active piece into the board, sweep, and spawn the next one
    fn lock_inner(&mut self) -> u32 {
        let Some(piece) = self.active.take() else {
            return 0;
        };

        let footprint = piece.footprint();
        self.board.stamp(footprint, piece.kind());
        self.emit(SessionEvent::Stamp {
            layer: Layer::Board,
            kind: piece.kind(),
            cells: footprint,
        });

        let cleared = self.board.sweep_completed_rows();
        self.emit(SessionEvent::Locked {
            kind: piece.kind(),
            lines_cleared: cleared,
        });
        if cleared > 0 {
            self.progression.advance_lines(cleared);
            self.emit(SessionEvent::LinesCleared {
                count: cleared,
                total: self.progression.lines(),
            });
        }
        log::debug!(
            "{:?} locked at {:?}, {} rows cleared ({} total)",
            piece.kind(),
            piece.position(),
            cleared,
            self.progression.lines()
        );

        self.apply_level_ups();
        self.spawn_next_inner();
        cleared
    }

    fn apply_level_ups(&mut self) -> bool {
        let crossed = self.progression.update_level(&self.config.levels);
        if crossed.is_empty() {
            return false;
        }

        for threshold in crossed {
            self.step_delay_ms = threshold.step_delay_ms;
            if let Some(ms) = threshold.soft_drop_repeat_ms {
                self.soft_drop_repeat_ms = ms;
            }
        }
        if let Some(active) = self.active.as_mut() {
            active.set_step_delay(self.step_delay_ms);
        }

        let level = self.progression.level();
        log::info!("level {} reached, step delay {}ms", level, self.step_delay_ms);
        self.emit(SessionEvent::LevelUp {
            level,
            step_delay_ms: self.step_delay_ms,
        });
        true
    }

    fn game_over(&mut self) {
        let (lines, level) = (self.progression.lines(), self.progression.level());
        log::info!("game over: {} lines, level {}", lines, level);

        self.active = None;
        self.active_stamped = false;
        self.board.clear();
        self.progression.reset();
        self.step_delay_ms = self.config.step_delay_ms;
        self.soft_drop_repeat_ms = self.config.soft_drop_repeat_ms;
        self.phase = SessionPhase::GameOver;
        self.emit(SessionEvent::GameOver { lines, level });
    }

    /// Remove the active footprint from the board for collision checks
    fn lift_active(&mut self) {
        if !self.active_stamped {
            return;
        }
        self.active_stamped = false;
        if let Some(footprint) = self.active_footprint() {
            self.board.unstamp(footprint);
            self.emit(SessionEvent::Unstamp {
                layer: Layer::Board,
                cells: footprint,
            });
        }
    }

    fn place_active(&mut self) {
        if self.active_stamped || self.is_game_over() {
            return;
        }
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let (kind, footprint) = (active.kind(), active.footprint());
        self.board.stamp(footprint, kind);
        self.active_stamped = true;
        self.emit(SessionEvent::Stamp {
            layer: Layer::Board,
            kind,
            cells: footprint,
        });
    }

    fn anchored(&self, definition: &TetrominoDefinition, anchor: Point) -> [Point; PIECE_CELLS] {
        definition.cells.map(|c| c + anchor)
    }

    fn emit(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
