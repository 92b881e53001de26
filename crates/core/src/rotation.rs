//! Rotation system - pure geometry for turning pieces and picking wall kicks
//!
//! Offsets are turned with a fixed 90° matrix scaled by the direction sign.
//! Pieces whose pivot sits on a cell corner (I and O) are shifted by half a
//! cell first and rounded **up** afterwards; that asymmetric rounding is what
//! keeps their bounding box in place across repeated turns. Everything else
//! rounds to nearest.

use crate::pieces::{PieceShape, TetrominoDefinition};
use crate::types::{PivotClass, Point, Rotation, RotationDirection};

/// `[cos 90°, sin 90°, -sin 90°, cos 90°]`
const ROTATION_MATRIX: [f32; 4] = [0.0, 1.0, -1.0, 0.0];

/// Turn every offset by 90° in `direction`
pub fn rotate_cells(cells: &PieceShape, pivot: PivotClass, direction: RotationDirection) -> PieceShape {
    let d = direction.sign() as f32;
    cells.map(|cell| {
        let (mut x, mut y) = (cell.x as f32, cell.y as f32);
        if pivot == PivotClass::HalfCell {
            x -= 0.5;
            y -= 0.5;
        }

        let rx = x * ROTATION_MATRIX[0] * d + y * ROTATION_MATRIX[1] * d;
        let ry = x * ROTATION_MATRIX[2] * d + y * ROTATION_MATRIX[3] * d;

        match pivot {
            PivotClass::HalfCell => Point::new(rx.ceil() as i32, ry.ceil() as i32),
            PivotClass::Cell => Point::new(rx.round() as i32, ry.round() as i32),
        }
    })
}

/// Floor-style wrap of `input` into `[min, max)`
///
/// Negative inputs land at the top of the range instead of producing a
/// negative remainder.
///
/// # Examples
///
/// ```
/// use tetrion_core::rotation::wrap;
///
/// assert_eq!(wrap(-1, 0, 8), 7);
/// assert_eq!(wrap(8, 0, 8), 0);
/// assert_eq!(wrap(-8, 0, 8), 0);
/// ```
pub fn wrap(input: i32, min: i32, max: i32) -> i32 {
    min + (input - min).rem_euclid(max - min)
}

/// Kick table row for the transition that ended at `rotation_after`
///
/// `row_count` must be non-zero.
pub fn kick_row_index(rotation_after: Rotation, direction: RotationDirection, row_count: usize) -> usize {
    let mut index = 2 * rotation_after.index();
    if direction == RotationDirection::CounterClockwise {
        index -= 1;
    }
    wrap(index, 0, row_count as i32) as usize
}

/// Offer each candidate translation of the selected kick row to `try_place`
///
/// Returns the first translation `try_place` accepts. The search stops at the
/// first success; `None` means the rotation must be rolled back.
pub fn resolve_kick(
    definition: &TetrominoDefinition,
    rotation_after: Rotation,
    direction: RotationDirection,
    mut try_place: impl FnMut(Point) -> bool,
) -> Option<Point> {
    if definition.kicks.is_empty() {
        return None;
    }

    let row = kick_row_index(rotation_after, direction, definition.kick_rows());
    definition.kicks[row]
        .iter()
        .copied()
        .find(|&translation| try_place(translation))
}
