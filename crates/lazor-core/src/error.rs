//! Error taxonomy for the simulation core.
//!
//! Every variant signals a contract violation by the caller. Beam
//! termination (absorbed, exited, looped) is normal beam state and never
//! surfaces here.

use crate::coord::{CellPos, LatticePoint};

/// Errors raised by board construction, lattice lookup and tracing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The board has a zero dimension or its cell count does not match
    /// `width * height`.
    #[error("invalid board: {width}x{height} with {cells} cells")]
    InvalidBoard {
        width: usize,
        height: usize,
        cells: usize,
    },

    /// A board cell lookup fell outside the board.
    #[error("cell {pos} is outside the {width}x{height} board")]
    CellOutOfRange {
        pos: CellPos,
        width: usize,
        height: usize,
    },

    /// A lattice lookup fell outside the lattice.
    #[error("lattice point {point} is outside the {width}x{height} lattice")]
    PointOutOfRange {
        point: LatticePoint,
        width: usize,
        height: usize,
    },

    /// An emitter direction is not strictly diagonal.
    #[error("malformed emitter direction ({dx}, {dy}): both components must be +1 or -1")]
    MalformedEmitter { dx: i32, dy: i32 },

    /// A block was placed onto a cell that is not open.
    #[error("cell {pos} is not open")]
    CellOccupied { pos: CellPos },
}

impl CoreError {
    /// Whether this error is one of the out-of-range lookups.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            CoreError::CellOutOfRange { .. } | CoreError::PointOutOfRange { .. }
        )
    }
}
