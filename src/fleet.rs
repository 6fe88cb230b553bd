//! The enemy fleet: randomized placement, shot resolution and survival queries.

use alloc::vec::Vec;
use log::debug;
use rand::Rng;

use crate::bitboard::Grid;
use crate::boat::{Boat, Coord, Orientation};
use crate::common::FleetError;
use crate::config::{GRID_SIZE, MAX_BOAT_LEN, MAX_PLACEMENT_ATTEMPTS, MIN_BOAT_LEN};

/// An ordered set of non-overlapping boats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    size: usize,
    boats: Vec<Boat>,
    occupancy: Grid,
}

impl Fleet {
    /// Randomly place `size` boats.
    ///
    /// Each boat gets a random length in [`MIN_BOAT_LEN`]..=[`MAX_BOAT_LEN`];
    /// origin and orientation are redrawn until the boat fits the grid
    /// without touching an earlier boat, at most [`MAX_PLACEMENT_ATTEMPTS`]
    /// times per boat.
    pub fn place<R: Rng>(size: usize, rng: &mut R) -> Result<Self, FleetError> {
        if size == 0 {
            return Err(FleetError::InvalidFleetSize(size));
        }
        let mut fleet = Fleet {
            size,
            boats: Vec::with_capacity(size),
            occupancy: Grid::new(),
        };
        for index in 0..size {
            let length = rng.random_range(MIN_BOAT_LEN..=MAX_BOAT_LEN);
            let boat = fleet.random_boat(rng, index, length)?;
            fleet.push(boat);
        }
        debug!("placed fleet: {:?}", fleet.boats);
        Ok(fleet)
    }

    /// Build a fleet from explicit boats, rejecting overlaps.
    pub fn from_boats(boats: Vec<Boat>) -> Result<Self, FleetError> {
        if boats.is_empty() {
            return Err(FleetError::InvalidFleetSize(0));
        }
        let mut fleet = Fleet {
            size: boats.len(),
            boats: Vec::with_capacity(boats.len()),
            occupancy: Grid::new(),
        };
        for boat in boats {
            if fleet.occupancy.intersects(&boat.mask()) {
                return Err(FleetError::BoatOverlaps);
            }
            fleet.push(boat);
        }
        Ok(fleet)
    }

    fn push(&mut self, boat: Boat) {
        self.occupancy |= boat.mask();
        self.boats.push(boat);
    }

    fn random_boat<R: Rng>(
        &self,
        rng: &mut R,
        index: usize,
        length: u8,
    ) -> Result<Boat, FleetError> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let origin = Coord::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
            let orientation = if rng.random() {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            let boat = match Boat::new(origin, length, orientation) {
                Ok(boat) => boat,
                Err(FleetError::BoatOutOfBounds) => continue,
                Err(e) => return Err(e),
            };
            if !self.occupancy.intersects(&boat.mask()) {
                return Ok(boat);
            }
        }
        Err(FleetError::PlacementInfeasible {
            boat: index,
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    /// Replace every boat with a freshly placed fleet of the same size.
    /// On failure the current fleet is left untouched.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) -> Result<(), FleetError> {
        *self = Fleet::place(self.size, rng)?;
        Ok(())
    }

    /// Fire at `coord`. Returns `true` if a boat occupies it; the cell is
    /// marked hit (again, if it already was).
    pub fn record_shot(&mut self, coord: Coord) -> bool {
        self.boats.iter_mut().any(|b| b.record_hit(coord))
    }

    /// Boats with at least one cell not yet hit.
    pub fn remaining_boats(&self) -> Vec<&Boat> {
        self.boats.iter().filter(|b| !b.is_sunk()).collect()
    }

    pub fn remaining_count(&self) -> usize {
        self.boats.iter().filter(|b| !b.is_sunk()).count()
    }

    /// Returns `true` when every boat is sunk.
    pub fn all_sunk(&self) -> bool {
        self.boats.iter().all(Boat::is_sunk)
    }

    /// Number of boats the fleet was created with.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    /// Every cell occupied by a boat.
    pub fn occupancy(&self) -> Grid {
        self.occupancy
    }

    /// Every boat cell that has been hit.
    pub fn hit_mask(&self) -> Grid {
        self.boats
            .iter()
            .fold(Grid::new(), |acc, boat| acc | boat.hit_mask())
    }
}
