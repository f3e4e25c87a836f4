//! Lazor Core -- the beam-tracing simulation for laser block puzzles.
//!
//! A puzzle is a rectangular board of cells, some holding optical blocks
//! (mirrors, absorbers, splitters). Beams travel diagonally across a doubled
//! lattice laid over the board, interacting with block faces, and the puzzle
//! is solved when the union of all beam trajectories covers every target.
//!
//! # Pipeline
//!
//! 1. **Build** -- [`builder::LatticeBuilder::build`] expands a
//!    [`board::CellBoard`] of `W x H` cells into a `(2W+1) x (2H+1)`
//!    [`lattice::Lattice`]. Cell centers sit on odd,odd points; each optical
//!    cell paints its four face points with its kind and a face orientation.
//! 2. **Trace** -- [`tracer::Tracer::trace`] runs one beam per
//!    [`beam::Emitter`] to termination, spawning an extra beam at every
//!    splitter interaction.
//! 3. **Check** -- [`target::TargetChecker::all_hit`] tests whether every
//!    target point lies on some beam's trajectory.
//!
//! [`sim::simulate`] runs all three in one call.
//!
//! # Coordinates
//!
//! Board and lattice coordinates are distinct types ([`coord::CellPos`] and
//! [`coord::LatticePoint`]). Converting between them goes through
//! [`coord::CellPos::center`] and [`coord::LatticePoint::cell`], never
//! through ad hoc arithmetic.
//!
//! ```rust,ignore
//! let board = CellBoard::from_rows(vec![
//!     vec![Cell::Open, Cell::Open, Cell::Open],
//!     vec![Cell::Open, Cell::Fixed(OpticalKind::Mirror), Cell::Open],
//!     vec![Cell::Open, Cell::Open, Cell::Open],
//! ])?;
//! let emitter = Emitter::new(LatticePoint::new(1, 0), 1, 1)?;
//! let sim = simulate(&board, &[emitter], &[LatticePoint::new(5, 0)], TraceOptions::default())?;
//! assert!(sim.solved);
//! ```

pub mod beam;
pub mod board;
pub mod builder;
pub mod coord;
pub mod error;
pub mod lattice;
pub mod rng;
pub mod sim;
pub mod target;
pub mod tracer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use beam::{Beam, BeamId, BeamState, Emitter};
pub use board::{Cell, CellBoard, OpticalKind};
pub use builder::LatticeBuilder;
pub use coord::{CellPos, Direction, LatticePoint};
pub use error::CoreError;
pub use lattice::{FaceOrientation, Lattice, LatticeSite, LatticeValue};
pub use sim::{Simulation, simulate};
pub use target::TargetChecker;
pub use tracer::{TraceOptions, TraceOutcome, Tracer};
