//! Pieces module - tetromino definitions and wall kick tables
//!
//! A [`TetrominoDefinition`] is immutable shape data: four cell offsets around
//! a pivot plus a kick table indexed `[row][option]`. The standard set below
//! uses y-up coordinates with the pivot at `(0, 0)`.

use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, PivotClass, Point, PIECE_CELLS};

/// Shape of a piece - 4 cell offsets from the pivot
pub type PieceShape = [Point; PIECE_CELLS];

/// Kick table: one row per rotation transition, candidate translations in order
pub type KickTable = Vec<Vec<Point>>;

/// Immutable per-kind description of a tetromino
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetrominoDefinition {
    pub kind: PieceKind,
    pub cells: PieceShape,
    pub kicks: KickTable,
}

impl TetrominoDefinition {
    pub fn new(kind: PieceKind, cells: PieceShape, kicks: KickTable) -> Self {
        Self { kind, cells, kicks }
    }

    /// Standard definition for a kind
    pub fn standard(kind: PieceKind) -> Self {
        let kicks = match kind {
            PieceKind::I => table(&I_KICKS),
            _ => table(&JLOSTZ_KICKS),
        };
        Self::new(kind, standard_cells(kind), kicks)
    }

    /// All seven standard definitions in canonical order
    pub fn standard_set() -> Vec<Self> {
        PieceKind::ALL.iter().map(|&kind| Self::standard(kind)).collect()
    }

    pub fn pivot_class(&self) -> PivotClass {
        self.kind.pivot_class()
    }

    /// Number of kick rows (rotation-transition states)
    pub fn kick_rows(&self) -> usize {
        self.kicks.len()
    }
}

/// Canonical spawn offsets for a kind
pub fn standard_cells(kind: PieceKind) -> PieceShape {
    let raw: [(i32, i32); PIECE_CELLS] = match kind {
        PieceKind::I => [(-1, 1), (0, 1), (1, 1), (2, 1)],
        PieceKind::J => [(-1, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::L => [(1, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::O => [(0, 1), (1, 1), (0, 0), (1, 0)],
        PieceKind::S => [(0, 1), (1, 1), (-1, 0), (0, 0)],
        PieceKind::T => [(0, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::Z => [(-1, 1), (0, 1), (0, 0), (1, 0)],
    };
    raw.map(Point::from)
}

fn table(raw: &[[(i32, i32); 5]; 8]) -> KickTable {
    raw.iter()
        .map(|row| row.iter().map(|&p| Point::from(p)).collect())
        .collect()
}

/// I piece kick table
const I_KICKS: [[(i32, i32); 5]; 8] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Kick table shared by J, L, O, S, T and Z
const JLOSTZ_KICKS: [[(i32, i32); 5]; 8] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];
