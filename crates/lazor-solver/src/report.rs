//! Text and JSON output for search results.

use lazor_core::{Beam, BeamId, BeamState, Cell, CellBoard, LatticePoint, TargetChecker};
use lazor_data::Puzzle;
use lazor_data::puzzle::kind_symbol;
use serde::{Deserialize, Serialize};

use crate::search::SearchOutcome;

fn cell_symbol(cell: Cell) -> char {
    match cell {
        Cell::Open => 'o',
        Cell::Blocked => 'x',
        Cell::Fixed(kind) => kind_symbol(kind),
        Cell::Placed(kind) => kind_symbol(kind).to_ascii_lowercase(),
    }
}

fn board_rows(board: &CellBoard) -> Vec<String> {
    board
        .rows()
        .map(|row| {
            row.iter()
                .map(|&cell| cell_symbol(cell).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Render a board in the `.bff` grid alphabet, one line per row.
/// Placed blocks are lowercase (`a`, `b`, `c`).
pub fn render_board(board: &CellBoard) -> String {
    board_rows(board).join("\n")
}

/// Render the lattice with beam paths.
///
/// Cell centers show the cell symbol, `*` marks beam points, `L` emitter
/// origins, `@` hit targets and `T` missed ones.
pub fn render_paths(board: &CellBoard, beams: &[Beam], targets: &[LatticePoint]) -> String {
    let width = 2 * board.width() + 1;
    let height = 2 * board.height() + 1;
    let mut grid = vec![vec!['.'; width]; height];
    let mut put = |point: LatticePoint, symbol: char| {
        if point.x >= 0 && point.y >= 0 {
            if let Some(slot) = grid
                .get_mut(point.y as usize)
                .and_then(|row| row.get_mut(point.x as usize))
            {
                *slot = symbol;
            }
        }
    };

    for beam in beams {
        for &point in &beam.trajectory {
            put(point, '*');
        }
    }
    for (pos, cell) in board.iter() {
        if cell != Cell::Open {
            put(pos.center(), cell_symbol(cell));
        }
    }
    for beam in beams.iter().filter(|b| !b.is_spawned()) {
        put(beam.start(), 'L');
    }
    let hits = TargetChecker::hit_set(beams);
    for &target in targets {
        put(target, if hits.contains(&target) { '@' } else { 'T' });
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One beam in a [`SolutionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamReport {
    pub id: BeamId,
    pub state: BeamState,
    pub spawned: bool,
    pub trajectory: Vec<LatticePoint>,
}

impl From<&Beam> for BeamReport {
    fn from(beam: &Beam) -> Self {
        Self {
            id: beam.id,
            state: beam.state,
            spawned: beam.is_spawned(),
            trajectory: beam.trajectory.clone(),
        }
    }
}

/// Machine-readable summary of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub puzzle: Option<String>,
    pub solved: bool,
    pub attempts: u64,
    pub seed: u64,
    /// The winning board, or the starting board if unsolved.
    pub board: Vec<String>,
    pub beams: Vec<BeamReport>,
}

impl SolutionReport {
    pub fn new(puzzle: &Puzzle, outcome: &SearchOutcome, seed: u64) -> Self {
        let (board, beams) = match outcome {
            SearchOutcome::Solved(solution) => (
                board_rows(&solution.board),
                solution.beams.iter().map(BeamReport::from).collect(),
            ),
            SearchOutcome::Exhausted { .. } => (board_rows(&puzzle.board), Vec::new()),
        };
        Self {
            puzzle: puzzle.name.clone(),
            solved: outcome.is_solved(),
            attempts: outcome.attempts(),
            seed,
            board,
            beams,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
