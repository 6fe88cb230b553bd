//! Errors shared by the fleet model.

use crate::bitboard::BitBoardError;

/// Errors returned by boat construction and fleet placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    /// Underlying bitboard error (index outside the grid).
    BitBoardError(BitBoardError),
    /// A fleet needs at least one boat.
    InvalidFleetSize(usize),
    /// Boat length outside the allowed range.
    InvalidBoatLength(u8),
    /// Some boat cell would fall outside the grid.
    BoatOutOfBounds,
    /// Boat shares a cell with a boat already in the fleet.
    BoatOverlaps,
    /// The retry budget ran out while placing boat `boat` of the fleet.
    PlacementInfeasible { boat: usize, attempts: usize },
}

impl From<BitBoardError> for FleetError {
    fn from(err: BitBoardError) -> Self {
        FleetError::BitBoardError(err)
    }
}

impl core::fmt::Display for FleetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FleetError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            FleetError::InvalidFleetSize(n) => {
                write!(f, "Invalid fleet size {} (need at least one boat)", n)
            }
            FleetError::InvalidBoatLength(len) => write!(f, "Invalid boat length {}", len),
            FleetError::BoatOutOfBounds => write!(f, "Boat placement is out of bounds"),
            FleetError::BoatOverlaps => write!(f, "Boat placement overlaps with another boat"),
            FleetError::PlacementInfeasible { boat, attempts } => write!(
                f,
                "Unable to place boat {} after {} attempts",
                boat, attempts
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FleetError {}
