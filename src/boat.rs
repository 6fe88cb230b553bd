//! Coordinates and boats.

use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::Grid;
use crate::common::FleetError;
use crate::config::{GRID_SIZE, MAX_BOAT_LEN, MIN_BOAT_LEN};

/// A (row, column) position on the board. Carries no hit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Whether both axes are inside the grid.
    pub const fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }
}

impl From<(u8, u8)> for Coord {
    fn from((row, col): (u8, u8)) -> Self {
        Coord::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orientation of a boat on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along the column axis.
    Horizontal,
    /// Extends along the row axis.
    Vertical,
}

/// A coordinate owned by a boat, with its hit flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub coord: Coord,
    pub hit: bool,
}

/// A boat placed on the board.
#[derive(Clone, PartialEq, Eq)]
pub struct Boat {
    origin: Coord,
    orientation: Orientation,
    cells: Vec<Cell>,
    mask: Grid,
}

impl Boat {
    /// Build a boat of `length` cells starting at `origin`.
    ///
    /// Fails if the length is outside [`MIN_BOAT_LEN`]..=[`MAX_BOAT_LEN`] or if
    /// any cell would leave the grid.
    pub fn new(origin: Coord, length: u8, orientation: Orientation) -> Result<Self, FleetError> {
        if !(MIN_BOAT_LEN..=MAX_BOAT_LEN).contains(&length) {
            return Err(FleetError::InvalidBoatLength(length));
        }
        let (end_row, end_col) = match orientation {
            Orientation::Horizontal => (origin.row as usize, origin.col as usize + length as usize),
            Orientation::Vertical => (origin.row as usize + length as usize, origin.col as usize),
        };
        if !origin.in_bounds()
            || end_row > GRID_SIZE as usize
            || end_col > GRID_SIZE as usize
        {
            return Err(FleetError::BoatOutOfBounds);
        }

        let mut cells = Vec::with_capacity(length as usize);
        let mut mask = Grid::new();
        for i in 0..length {
            let coord = match orientation {
                Orientation::Horizontal => Coord::new(origin.row, origin.col + i),
                Orientation::Vertical => Coord::new(origin.row + i, origin.col),
            };
            mask.set(coord.row as usize, coord.col as usize)?;
            cells.push(Cell { coord, hit: false });
        }

        Ok(Boat {
            origin,
            orientation,
            cells,
            mask,
        })
    }

    /// Mark `coord` as hit if this boat owns it. Returns `true` on a hit,
    /// including repeat hits on the same cell.
    pub fn record_hit(&mut self, coord: Coord) -> bool {
        match self.cells.iter_mut().find(|c| c.coord == coord) {
            Some(cell) => {
                cell.hit = true;
                true
            }
            None => false,
        }
    }

    /// Every cell has been hit.
    pub fn is_sunk(&self) -> bool {
        self.cells.iter().all(|c| c.hit)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.mask
            .get(coord.row as usize, coord.col as usize)
            .unwrap_or(false)
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in order from the origin.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Coordinates in order from the origin.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().map(|c| c.coord)
    }

    /// Occupancy mask of the boat.
    pub fn mask(&self) -> Grid {
        self.mask
    }

    /// Cells of this boat that have been hit, as a mask.
    pub fn hit_mask(&self) -> Grid {
        let mut hits = Grid::new();
        for cell in self.cells.iter().filter(|c| c.hit) {
            let _ = hits.set(cell.coord.row as usize, cell.coord.col as usize);
        }
        hits
    }
}

impl fmt::Debug for Boat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Boat {{ origin: {}, len: {}, orientation: {:?}, hits: {} }}",
            self.origin,
            self.cells.len(),
            self.orientation,
            self.cells.iter().filter(|c| c.hit).count(),
        )
    }
}
