//! Presentation view of the enemy board.
//!
//! The snapshot caches shot outcomes for rendering. It is not authoritative:
//! its hit cells must always agree with the fleet's hit flags.

use crate::bitboard::Grid;
use crate::boat::Coord;
use crate::config::GRID_SIZE;
use crate::fleet::Fleet;

/// What the player knows about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Unknown,
    Miss,
    Hit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    hits: Grid,
    misses: Grid,
}

impl BoardSnapshot {
    /// The neutral grid: every cell unknown.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, coord: Coord) -> CellState {
        let (r, c) = (coord.row as usize, coord.col as usize);
        if self.hits.get(r, c).unwrap_or(false) {
            CellState::Hit
        } else if self.misses.get(r, c).unwrap_or(false) {
            CellState::Miss
        } else {
            CellState::Unknown
        }
    }

    /// Whether a shot was already resolved at `coord`.
    pub fn is_shot(&self, coord: Coord) -> bool {
        self.cell(coord) != CellState::Unknown
    }

    /// Store the outcome of a shot. Out-of-grid coordinates are ignored.
    pub fn record(&mut self, coord: Coord, hit: bool) {
        let (r, c) = (coord.row as usize, coord.col as usize);
        let _ = if hit {
            self.hits.set(r, c)
        } else {
            self.misses.set(r, c)
        };
    }

    /// Back to the neutral grid.
    pub fn clear(&mut self) {
        self.hits.clear_all();
        self.misses.clear_all();
    }

    pub fn is_neutral(&self) -> bool {
        self.hits.is_empty() && self.misses.is_empty()
    }

    /// Replace the hit cells with the fleet's hit flags. Misses are kept.
    pub fn rebuild_hits(&mut self, fleet: &Fleet) {
        self.hits = fleet.hit_mask();
    }

    /// Hit cells match the fleet's hit flags exactly and no miss lies on a
    /// boat.
    pub fn agrees_with(&self, fleet: &Fleet) -> bool {
        self.hits == fleet.hit_mask() && (self.misses & fleet.occupancy()).is_empty()
    }

    /// Every hit cell, row-major.
    pub fn hit_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.hits
            .iter_set_bits()
            .map(|(r, c)| Coord::new(r as u8, c as u8))
    }

    pub fn hits(&self) -> Grid {
        self.hits
    }

    pub fn misses(&self) -> Grid {
        self.misses
    }

    /// Rows of cell states, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = [CellState; GRID_SIZE as usize]> + '_ {
        (0..GRID_SIZE).map(move |r| {
            core::array::from_fn(|c| self.cell(Coord::new(r, c as u8)))
        })
    }
}
