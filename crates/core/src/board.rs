//! Board module - manages the playfield grid
//!
//! The board is a `width` x `height` occupancy map centered on the origin,
//! stored as a flat row-major vector (row `y_min` first). Coordinates grow
//! to the right and **upward**, so the floor is row `y_min`.
//!
//! Nothing outside the bounds is ever written. Out-of-bounds reads return
//! `None`, which row collapse relies on to pull "empty" from above the top.

use crate::types::{Bounds, Cell, PieceKind, Point};

/// The playfield grid
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    bounds: Bounds,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board centered on the origin
    ///
    /// Sizes are not checked here; [`GameConfig::validate`](crate::GameConfig::validate)
    /// refuses boards whose sides or area do not fit.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_bounds(Bounds::centered(width, height))
    }

    pub fn with_bounds(bounds: Bounds) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.width as usize * bounds.height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let col = (p.x - self.bounds.x_min) as usize;
        let row = (p.y - self.bounds.y_min) as usize;
        Some(row * self.bounds.width as usize + col)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> u32 {
        self.bounds.width
    }

    pub fn height(&self) -> u32 {
        self.bounds.height
    }

    /// Get cell at `p`, `None` if out of bounds
    pub fn get(&self, p: Point) -> Option<Cell> {
        self.index(p).map(|idx| self.cells[idx])
    }

    /// Set cell at `p`. Returns false if out of bounds
    pub fn set(&mut self, p: Point, cell: Cell) -> bool {
        match self.index(p) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_valid(&self, p: Point) -> bool {
        matches!(self.get(p), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, p: Point) -> bool {
        matches!(self.get(p), Some(Some(_)))
    }

    /// True iff every cell is inside the bounds and not occupied
    ///
    /// Stops at the first violating cell.
    pub fn is_valid_placement<I>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = Point>,
    {
        cells.into_iter().all(|p| self.is_valid(p))
    }

    /// Fill `cells` with `kind` without checking validity
    ///
    /// Callers validate first. Out-of-bounds cells are skipped.
    pub fn stamp<I>(&mut self, cells: I, kind: PieceKind)
    where
        I: IntoIterator<Item = Point>,
    {
        for p in cells {
            let written = self.set(p, Some(kind));
            debug_assert!(written, "stamp outside bounds at {:?}", p);
        }
    }

    /// Empty `cells` without checking what was there
    pub fn unstamp<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Point>,
    {
        for p in cells {
            self.set(p, None);
        }
    }

    /// Check if a row is completely filled across `[x_min, x_max)`
    pub fn is_row_full(&self, y: i32) -> bool {
        (self.bounds.x_min..self.bounds.x_max()).all(|x| self.is_occupied(Point::new(x, y)))
    }

    /// Remove every complete row, collapsing the rows above it downward
    ///
    /// Scans from the floor up. After a clear the same row index is checked
    /// again, since the row above has just moved into it. Returns the number
    /// of rows removed by this call.
    pub fn sweep_completed_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = self.bounds.y_min;

        while row < self.bounds.y_max() {
            if self.is_row_full(row) {
                self.collapse_row(row);
                cleared += 1;
            } else {
                row += 1;
            }
        }

        cleared
    }

    /// Clear `row` and pull every row above it down by one
    fn collapse_row(&mut self, row: i32) {
        let (x_min, x_max) = (self.bounds.x_min, self.bounds.x_max());

        for x in x_min..x_max {
            self.set(Point::new(x, row), None);
        }

        for y in row..self.bounds.y_max() {
            for x in x_min..x_max {
                // The row above the top reads as empty.
                let above = self.get(Point::new(x, y + 1)).flatten();
                self.set(Point::new(x, y), above);
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Flat row-major cells, floor row first
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Occupied positions, floor row first
    pub fn occupied(&self) -> impl Iterator<Item = Point> + '_ {
        let b = self.bounds;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|_| {
                let w = b.width as usize;
                Point::new(b.x_min + (i % w) as i32, b.y_min + (i / w) as i32)
            })
        })
    }

    /// Fill a whole row (testing helper)
    #[cfg(test)]
    pub fn fill_row(&mut self, y: i32, kind: PieceKind) {
        for x in self.bounds.x_min..self.bounds.x_max() {
            self.set(Point::new(x, y), Some(kind));
        }
    }
}
