//! `.bff` puzzle files.
//!
//! ```text
//! # comment
//! GRID START
//! o o o
//! o x A
//! GRID STOP
//! A 2
//! L 0 1 1 1
//! P 4 3
//! ```
//!
//! Grid cells are `o` (open), `x` (blocked) and `A`/`B`/`C` for fixed
//! mirror/absorber/splitter blocks. After the grid, `A n`, `B n` and `C n`
//! give the placeable block counts, `L x y dx dy` declares an emitter and
//! `P x y` a target, both in lattice coordinates.

use std::path::Path;
use std::str::FromStr;

use lazor_core::{Cell, CellBoard, CoreError, Emitter, LatticePoint, OpticalKind};
use serde::{Deserialize, Serialize};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while reading a puzzle.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("no GRID START ... GRID STOP section")]
    MissingGrid,

    #[error("line {line}: GRID START is never closed by GRID STOP")]
    UnterminatedGrid { line: usize },

    #[error("line {line}: second grid section")]
    DuplicateGrid { line: usize },

    #[error("line {line}: unknown cell '{symbol}'")]
    UnknownCell { line: usize, symbol: char },

    #[error("line {line}: row has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unknown directive '{text}'")]
    UnknownDirective { line: usize, text: String },

    #[error("line {line}: malformed '{directive}' line: {detail}")]
    Malformed {
        line: usize,
        directive: String,
        detail: String,
    },

    #[error("line {line}: count for '{symbol}' given twice")]
    DuplicateCount { line: usize, symbol: char },

    #[error("line {line}: {source}")]
    InvalidEmitter { line: usize, source: CoreError },

    #[error("{what} at {point} is outside the {width}x{height} lattice")]
    OffLattice {
        what: &'static str,
        point: LatticePoint,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    Board(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Block symbols and inventory
// ===========================================================================

/// The `.bff` letter for a block kind.
pub fn kind_symbol(kind: OpticalKind) -> char {
    match kind {
        OpticalKind::Mirror => 'A',
        OpticalKind::Absorber => 'B',
        OpticalKind::Splitter => 'C',
    }
}

fn symbol_kind(symbol: char) -> Option<OpticalKind> {
    match symbol {
        'A' => Some(OpticalKind::Mirror),
        'B' => Some(OpticalKind::Absorber),
        'C' => Some(OpticalKind::Splitter),
        _ => None,
    }
}

/// Blocks available for placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockInventory {
    pub mirrors: usize,
    pub absorbers: usize,
    pub splitters: usize,
}

impl BlockInventory {
    pub fn new(mirrors: usize, absorbers: usize, splitters: usize) -> Self {
        Self {
            mirrors,
            absorbers,
            splitters,
        }
    }

    pub fn count(&self, kind: OpticalKind) -> usize {
        match kind {
            OpticalKind::Mirror => self.mirrors,
            OpticalKind::Absorber => self.absorbers,
            OpticalKind::Splitter => self.splitters,
        }
    }

    fn count_mut(&mut self, kind: OpticalKind) -> &mut usize {
        match kind {
            OpticalKind::Mirror => &mut self.mirrors,
            OpticalKind::Absorber => &mut self.absorbers,
            OpticalKind::Splitter => &mut self.splitters,
        }
    }

    pub fn total(&self) -> usize {
        self.mirrors + self.absorbers + self.splitters
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// One entry per block, splitters first, then mirrors, then absorbers.
    pub fn placement_order(&self) -> Vec<OpticalKind> {
        [
            OpticalKind::Splitter,
            OpticalKind::Mirror,
            OpticalKind::Absorber,
        ]
        .into_iter()
        .flat_map(|kind| std::iter::repeat_n(kind, self.count(kind)))
        .collect()
    }
}

// ===========================================================================
// Puzzle
// ===========================================================================

/// A parsed puzzle: the starting board plus everything needed to solve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// File stem when loaded from disk.
    pub name: Option<String>,
    pub board: CellBoard,
    pub inventory: BlockInventory,
    pub emitters: Vec<Emitter>,
    pub targets: Vec<LatticePoint>,
}

impl Puzzle {
    /// Assemble a puzzle, checking that every emitter and target lies on
    /// the board's lattice.
    pub fn new(
        name: Option<String>,
        board: CellBoard,
        inventory: BlockInventory,
        emitters: Vec<Emitter>,
        targets: Vec<LatticePoint>,
    ) -> Result<Self, PuzzleError> {
        let puzzle = Self {
            name,
            board,
            inventory,
            emitters,
            targets,
        };
        for emitter in &puzzle.emitters {
            puzzle.check_on_lattice("emitter", emitter.origin)?;
        }
        for &target in &puzzle.targets {
            puzzle.check_on_lattice("target", target)?;
        }
        Ok(puzzle)
    }

    pub fn lattice_width(&self) -> usize {
        2 * self.board.width() + 1
    }

    pub fn lattice_height(&self) -> usize {
        2 * self.board.height() + 1
    }

    pub fn contains(&self, point: LatticePoint) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.lattice_width()
            && (point.y as usize) < self.lattice_height()
    }

    fn check_on_lattice(&self, what: &'static str, point: LatticePoint) -> Result<(), PuzzleError> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(PuzzleError::OffLattice {
                what,
                point,
                width: self.lattice_width(),
                height: self.lattice_height(),
            })
        }
    }
}

// ===========================================================================
// Parsing
// ===========================================================================

/// Read and parse a `.bff` file. The puzzle is named after the file stem.
pub fn load_puzzle(path: &Path) -> Result<Puzzle, PuzzleError> {
    let text = std::fs::read_to_string(path)?;
    let mut puzzle = parse_puzzle(&text)?;
    puzzle.name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned);
    log::debug!(
        "loaded {}: {}x{} board, {} blocks, {} emitters, {} targets",
        path.display(),
        puzzle.board.width(),
        puzzle.board.height(),
        puzzle.inventory.total(),
        puzzle.emitters.len(),
        puzzle.targets.len()
    );
    Ok(puzzle)
}

/// Rows collected between `GRID START` and `GRID STOP`.
struct OpenGrid {
    start_line: usize,
    rows: Vec<Vec<Cell>>,
}

impl OpenGrid {
    fn push_row(&mut self, line: usize, text: &str) -> Result<(), PuzzleError> {
        let row = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|symbol| match symbol {
                'o' => Ok(Cell::Open),
                'x' => Ok(Cell::Blocked),
                other => symbol_kind(other)
                    .map(Cell::Fixed)
                    .ok_or(PuzzleError::UnknownCell {
                        line,
                        symbol: other,
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = self.rows.first() {
            if first.len() != row.len() {
                return Err(PuzzleError::RaggedRow {
                    line,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        self.rows.push(row);
        Ok(())
    }
}

/// Everything outside the grid section.
#[derive(Default)]
struct Directives {
    inventory: BlockInventory,
    counted: Vec<OpticalKind>,
    emitters: Vec<Emitter>,
    targets: Vec<LatticePoint>,
}

impl Directives {
    fn apply(&mut self, line: usize, text: &str) -> Result<(), PuzzleError> {
        let mut words = text.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(());
        };
        let args: Vec<&str> = words.collect();

        let mut head_chars = head.chars();
        let symbol = match (head_chars.next(), head_chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(PuzzleError::UnknownDirective {
                    line,
                    text: text.to_owned(),
                });
            }
        };

        if let Some(kind) = symbol_kind(symbol) {
            let [count] = numbers::<usize, 1>(line, head, &args)?;
            if self.counted.contains(&kind) {
                return Err(PuzzleError::DuplicateCount { line, symbol });
            }
            self.counted.push(kind);
            *self.inventory.count_mut(kind) = count;
            return Ok(());
        }

        match symbol {
            'L' => {
                let [x, y, dx, dy] = numbers::<i32, 4>(line, head, &args)?;
                let emitter = Emitter::new(LatticePoint::new(x, y), dx, dy)
                    .map_err(|source| PuzzleError::InvalidEmitter { line, source })?;
                self.emitters.push(emitter);
            }
            'P' => {
                let [x, y] = numbers::<i32, 2>(line, head, &args)?;
                self.targets.push(LatticePoint::new(x, y));
            }
            _ => {
                return Err(PuzzleError::UnknownDirective {
                    line,
                    text: text.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Parse exactly `N` numeric arguments.
fn numbers<T: FromStr, const N: usize>(
    line: usize,
    directive: &str,
    args: &[&str],
) -> Result<[T; N], PuzzleError>
where
    T::Err: std::fmt::Display,
{
    let malformed = |detail: String| PuzzleError::Malformed {
        line,
        directive: directive.to_owned(),
        detail,
    };

    if args.len() != N {
        return Err(malformed(format!("expected {N} numbers, found {}", args.len())));
    }
    let parsed = args
        .iter()
        .map(|arg| arg.parse::<T>().map_err(|e| malformed(format!("'{arg}': {e}"))))
        .collect::<Result<Vec<T>, _>>()?;
    parsed
        .try_into()
        .map_err(|_| malformed(format!("expected {N} numbers")))
}

/// Parse `.bff` text into a puzzle.
pub fn parse_puzzle(text: &str) -> Result<Puzzle, PuzzleError> {
    let mut open: Option<OpenGrid> = None;
    let mut rows: Option<Vec<Vec<Cell>>> = None;
    let mut directives = Directives::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        match text {
            "GRID START" => {
                if open.is_some() || rows.is_some() {
                    return Err(PuzzleError::DuplicateGrid { line });
                }
                open = Some(OpenGrid {
                    start_line: line,
                    rows: Vec::new(),
                });
            }
            "GRID STOP" => {
                let Some(grid) = open.take() else {
                    return Err(PuzzleError::Malformed {
                        line,
                        directive: text.to_owned(),
                        detail: "no matching GRID START".to_owned(),
                    });
                };
                rows = Some(grid.rows);
            }
            _ => match open.as_mut() {
                Some(grid) => grid.push_row(line, text)?,
                None => directives.apply(line, text)?,
            },
        }
    }

    if let Some(grid) = open {
        return Err(PuzzleError::UnterminatedGrid {
            line: grid.start_line,
        });
    }
    let rows = rows.ok_or(PuzzleError::MissingGrid)?;
    let board = CellBoard::from_rows(rows)?;

    Puzzle::new(
        None,
        board,
        directives.inventory,
        directives.emitters,
        directives.targets,
    )
}

// ===========================================================================
// Tests
// ===========================================================================
