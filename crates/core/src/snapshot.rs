use crate::piece::{ActivePiece, PiecePhase, PieceTimers};
use crate::session::SessionPhase;
use crate::types::{PieceKind, Point, Rotation, PIECE_CELLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub position: Point,
    pub footprint: [Point; PIECE_CELLS],
    pub phase: PiecePhase,
    pub timers: PieceTimers,
}

impl From<&ActivePiece> for ActiveSnapshot {
    fn from(value: &ActivePiece) -> Self {
        Self {
            kind: value.kind(),
            rotation: value.rotation(),
            position: value.position(),
            footprint: value.footprint(),
            phase: value.phase(),
            timers: value.timers(),
        }
    }
}

/// Everything a presentation layer needs for one frame, besides the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub held: Option<PieceKind>,
    pub lines: u32,
    pub level: u32,
    pub step_delay_ms: u32,
    pub pieces_spawned: u32,
    pub seed: u32,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}
