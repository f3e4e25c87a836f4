//! Lazor Solver -- random placement search and solution reporting.
//!
//! [`search::PlacementSearch`] repeatedly drops a puzzle's placeable blocks
//! onto random open cells, simulates the result and stops at the first
//! board on which every target is hit. The search is best effort: it gives
//! up after a configured number of attempts.

pub mod placement;
pub mod report;
pub mod search;

pub use lazor_data::BlockInventory;
pub use placement::PlacementRules;
pub use report::{BeamReport, SolutionReport, render_board, render_paths};
pub use search::{PlacementSearch, SearchOutcome, Solution, SolverError};
