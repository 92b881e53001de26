//! Notifications for presentation and lifecycle collaborators
//!
//! The session records what changed during a tick; renderers and scene
//! managers drain the queue once per frame. The board itself stays readable
//! through [`crate::Board::cells`] for full redraws after row collapses.

use crate::types::{PieceKind, Point, PIECE_CELLS};

/// Where a stamped shape is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The playfield: active footprint and locked cells
    Board,
    /// The queued next piece at the preview anchor
    Preview,
    /// The held piece at the hold anchor
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    Stamp {
        layer: Layer,
        kind: PieceKind,
        cells: [Point; PIECE_CELLS],
    },
    Unstamp {
        layer: Layer,
        cells: [Point; PIECE_CELLS],
    },
    /// A piece was written permanently into the board
    Locked { kind: PieceKind, lines_cleared: u32 },
    LinesCleared { count: u32, total: u32 },
    LevelUp { level: u32, step_delay_ms: u32 },
    /// Terminal; carries the final counters for the end screen
    GameOver { lines: u32, level: u32 },
    Restarted,
}
