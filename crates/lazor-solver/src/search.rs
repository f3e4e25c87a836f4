//! Random placement search.
//!
//! Each attempt starts from the puzzle's board, drops every inventory block
//! on a uniformly chosen allowed open cell (splitters first, then mirrors,
//! then absorbers), simulates the result and checks the targets. The first
//! solved board wins. Attempts are independent, so there is no guarantee of
//! finding a solution within the budget even when one exists.

use std::time::{SystemTime, UNIX_EPOCH};

use lazor_core::rng::SimRng;
use lazor_core::{Beam, CellBoard, CoreError, OpticalKind, TraceOptions, simulate};
use lazor_data::{Puzzle, SolverConfig};

use crate::placement::PlacementRules;

/// Attempts between progress log lines.
const PROGRESS_INTERVAL: u64 = 10_000;

// ===========================================================================
// Errors and outcomes
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("{needed} {what} to place but only {available} cells allow them")]
    InsufficientCells {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// A board on which every target is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub board: CellBoard,
    pub beams: Vec<Beam>,
    /// 1-based number of the winning attempt.
    pub attempts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    Exhausted { attempts: u64 },
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }

    pub fn attempts(&self) -> u64 {
        match self {
            SearchOutcome::Solved(solution) => solution.attempts,
            SearchOutcome::Exhausted { attempts } => *attempts,
        }
    }
}

// ===========================================================================
// Search
// ===========================================================================

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Drives random placements for one puzzle.
pub struct PlacementSearch<'a> {
    puzzle: &'a Puzzle,
    rules: PlacementRules,
    order: Vec<OpticalKind>,
    options: TraceOptions,
    max_attempts: u64,
    seed: u64,
    rng: SimRng,
}

impl<'a> PlacementSearch<'a> {
    pub fn new(puzzle: &'a Puzzle, config: &SolverConfig) -> Self {
        let seed = config.seed.unwrap_or_else(clock_seed);
        Self {
            puzzle,
            rules: PlacementRules::new(
                &puzzle.board,
                &puzzle.targets,
                config.avoid_border_targets,
            ),
            order: puzzle.inventory.placement_order(),
            options: config.trace_options(),
            max_attempts: config.max_attempts,
            seed,
            rng: SimRng::new(seed),
        }
    }

    /// The seed in use, for replaying a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> &PlacementRules {
        &self.rules
    }

    /// Try placements until the puzzle is solved or the attempt budget runs
    /// out. A puzzle with nothing to place is simulated once.
    pub fn run(&mut self) -> Result<SearchOutcome, SolverError> {
        self.check_capacity()?;

        let name = self.puzzle.name.as_deref().unwrap_or("<unnamed>");
        let max_attempts = if self.order.is_empty() {
            self.max_attempts.min(1)
        } else {
            self.max_attempts
        };
        log::info!(
            "searching {name}: {} blocks over {} open cells, seed {}, up to {max_attempts} attempts",
            self.order.len(),
            self.puzzle.board.open_cells().len(),
            self.seed
        );

        for attempt in 1..=max_attempts {
            let Some(board) = self.arrange()? else {
                log::debug!("attempt {attempt}: no allowed cell left, skipping");
                continue;
            };
            let sim = simulate(
                &board,
                &self.puzzle.emitters,
                &self.puzzle.targets,
                self.options,
            )?;
            if sim.solved {
                log::info!("solved {name} on attempt {attempt}");
                return Ok(SearchOutcome::Solved(Solution {
                    board,
                    beams: sim.beams,
                    attempts: attempt,
                }));
            }
            if attempt % PROGRESS_INTERVAL == 0 {
                log::debug!("{name}: {attempt} attempts, last missed {} targets", sim.missing.len());
            }
        }

        log::warn!("gave up on {name} after {max_attempts} attempts");
        Ok(SearchOutcome::Exhausted {
            attempts: max_attempts,
        })
    }

    fn check_capacity(&self) -> Result<(), SolverError> {
        let open = self.puzzle.board.open_cells();
        if self.order.len() > open.len() {
            return Err(SolverError::InsufficientCells {
                what: "blocks",
                needed: self.order.len(),
                available: open.len(),
            });
        }

        let opaque = self.order.iter().filter(|kind| kind.is_opaque()).count();
        let opaque_cells = open
            .iter()
            .filter(|&&pos| self.rules.allows(pos, OpticalKind::Mirror))
            .count();
        if opaque > opaque_cells {
            return Err(SolverError::InsufficientCells {
                what: "mirrors and absorbers",
                needed: opaque,
                available: opaque_cells,
            });
        }
        Ok(())
    }

    /// One random arrangement, or `None` if some block found no allowed
    /// cell because earlier blocks took them.
    fn arrange(&mut self) -> Result<Option<CellBoard>, CoreError> {
        let mut board = self.puzzle.board.clone();
        let mut open = board.open_cells();

        for &kind in &self.order {
            let candidates: Vec<usize> = open
                .iter()
                .enumerate()
                .filter(|&(_, &pos)| self.rules.allows(pos, kind))
                .map(|(i, _)| i)
                .collect();
            if candidates.is_empty() {
                return Ok(None);
            }
            let pick = candidates[self.rng.next_below(candidates.len())];
            board.place(open.swap_remove(pick), kind)?;
        }
        Ok(Some(board))
    }
}
