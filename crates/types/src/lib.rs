//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond small conversions, so
//! they can be shared by the simulation core, the input mapper and any
//! presentation layer.
//!
//! # Coordinates
//!
//! Cells are addressed by integer [`Point`]s with **y growing upward**. The
//! playfield is centered on the origin: a 10x20 board spans columns `-5..5`
//! and rows `-10..10`, so row `-10` is the floor.
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep used by the terminal driver (~60 FPS) |
//! | `STEP_DELAY_MS` | 1000 | Interval between forced downward moves |
//! | `LOCK_DELAY_MS` | 300 | Grace period before a blocked piece locks |
//! | `LATERAL_REPEAT_MS` | 80 | Repeat delay for a held left/right intent |
//! | `SOFT_DROP_REPEAT_MS` | 50 | Repeat delay for a held soft drop |
//!
//! # Examples
//!
//! ```
//! use tetrion_types::{Intent, PieceKind, PivotClass, Rotation, RotationDirection};
//!
//! assert_eq!(PieceKind::T.as_str(), "t");
//! assert_eq!(PieceKind::I.pivot_class(), PivotClass::HalfCell);
//!
//! let rotated = Rotation::North.turn(RotationDirection::CounterClockwise);
//! assert_eq!(rotated, Rotation::West);
//! assert_eq!(rotated.index(), 3);
//!
//! assert!(Intent::SoftDrop.is_level_triggered());
//! assert!(!Intent::HardDrop.is_level_triggered());
//! ```

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const BOARD_WIDTH: u32 = 10;

/// Default board height in cells
pub const BOARD_HEIGHT: u32 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Default interval between forced downward moves
pub const STEP_DELAY_MS: u32 = 1000;

/// Default lock delay
pub const LOCK_DELAY_MS: u32 = 300;

/// Default repeat delay for held lateral movement
pub const LATERAL_REPEAT_MS: u32 = 80;

/// Default repeat delay for held soft drop
pub const SOFT_DROP_REPEAT_MS: u32 = 50;

/// Where new pieces appear (pivot position)
pub const SPAWN_ANCHOR: Point = Point::new(-1, 8);

/// Where the queued next piece is presented
pub const PREVIEW_ANCHOR: Point = Point::new(9, 6);

/// Where the held piece is presented
pub const HOLD_ANCHOR: Point = Point::new(-10, 6);

/// Number of cells in every tetromino
pub const PIECE_CELLS: usize = 4;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Where this kind's rotation pivot sits relative to its cell grid.
    ///
    /// The 4x4 I and 2x2 O boxes have their center on a cell corner; every
    /// other kind turns about the center of a cell.
    pub fn pivot_class(&self) -> PivotClass {
        match self {
            PieceKind::I | PieceKind::O => PivotClass::HalfCell,
            _ => PivotClass::Cell,
        }
    }
}

/// Rotation pivot classes, each with its own rounding rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotClass {
    /// Pivot on a cell center: rotate and round to nearest
    Cell,
    /// Pivot on a cell corner: shift by half a cell, rotate, round up
    HalfCell,
}

/// Turning direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }
}

/// Rotation states, index 0..=3
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation index in `0..=3`
    pub fn index(&self) -> i32 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from any integer, wrapping into `0..=3`
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(4), Rotation::North);
    /// assert_eq!(Rotation::from_index(-1), Rotation::West);
    /// ```
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Quarter turn in `direction`
    pub fn turn(&self, direction: RotationDirection) -> Self {
        Self::from_index(self.index() + direction.sign())
    }

}

/// Discrete intents produced by the input collaborator once per tick
///
/// `MoveLeft`, `MoveRight` and `SoftDrop` are level-triggered: they are
/// present in every tick's list while the control is held, and the session
/// applies its own repeat delay. Everything else is edge-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Move piece one cell left (held)
    MoveLeft,
    /// Move piece one cell right (held)
    MoveRight,
    /// Move piece one cell down (held)
    SoftDrop,
    /// Drop until blocked and lock immediately
    HardDrop,
    /// Set the active piece aside, swapping with the held one
    Hold,
    /// Discard the session and start over
    Restart,
}

impl Intent {
    /// Whether the intent is held across ticks rather than fired once
    pub fn is_level_triggered(&self) -> bool {
        matches!(self, Intent::MoveLeft | Intent::MoveRight | Intent::SoftDrop)
    }
}

/// Integer grid coordinate (y up). Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.offset(rhs.x, rhs.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (i32, i32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Half-open rectangle `[x_min, x_max) × [y_min, y_max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x_min: i32,
    pub y_min: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    /// Bounds of a `width` x `height` board centered on the origin
    ///
    /// Both sides must fit in an `i32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_types::Bounds;
    ///
    /// let b = Bounds::centered(10, 20);
    /// assert_eq!((b.x_min, b.x_max()), (-5, 5));
    /// assert_eq!((b.y_min, b.y_max()), (-10, 10));
    /// ```
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            x_min: -((width / 2) as i32),
            y_min: -((height / 2) as i32),
            width,
            height,
        }
    }

    pub fn x_max(&self) -> i32 {
        self.x_min + self.width as i32
    }

    pub fn y_max(&self) -> i32 {
        self.y_min + self.height as i32
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x < self.x_max() && p.y >= self.y_min && p.y < self.y_max()
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Filled; the kind only matters for rendering
pub type Cell = Option<PieceKind>;
