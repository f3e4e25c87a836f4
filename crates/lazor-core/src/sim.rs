//! One-call build, trace and check pipeline.

use crate::beam::{Beam, Emitter};
use crate::board::CellBoard;
use crate::builder::LatticeBuilder;
use crate::coord::LatticePoint;
use crate::error::CoreError;
use crate::lattice::Lattice;
use crate::target::TargetChecker;
use crate::tracer::{TraceOptions, Tracer};

/// Result of simulating one board.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Simulation {
    pub lattice: Lattice,
    /// Every terminal beam, in id order.
    pub beams: Vec<Beam>,
    /// Whether every target was hit.
    pub solved: bool,
    /// Targets no beam passed through.
    pub missing: Vec<LatticePoint>,
}

/// Build the lattice for `board`, trace `emitters` across it and check
/// `targets`.
pub fn simulate(
    board: &CellBoard,
    emitters: &[Emitter],
    targets: &[LatticePoint],
    options: TraceOptions,
) -> Result<Simulation, CoreError> {
    let lattice = LatticeBuilder::build(board)?;
    let outcome = Tracer::trace(&lattice, emitters, options)?;
    let missing = TargetChecker::missing(&outcome.beams, targets);
    Ok(Simulation {
        lattice,
        beams: outcome.beams,
        solved: missing.is_empty(),
        missing,
    })
}
