//! The logical board of cells.

use serde::{Deserialize, Serialize};

use crate::coord::{CellPos, LatticePoint};
use crate::error::CoreError;
use crate::lattice::LatticeValue;

// ---------------------------------------------------------------------------
// Cell kinds
// ---------------------------------------------------------------------------

/// The three ways a block can affect a beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpticalKind {
    /// Reflects the beam.
    Mirror,
    /// Stops the beam.
    Absorber,
    /// Reflects the beam and lets a copy through.
    Splitter,
}

impl OpticalKind {
    /// All three kinds.
    pub fn all() -> [OpticalKind; 3] {
        [OpticalKind::Mirror, OpticalKind::Absorber, OpticalKind::Splitter]
    }

    /// Whether this kind stops the straight-through path (mirror, absorber).
    pub fn is_opaque(self) -> bool {
        !matches!(self, OpticalKind::Splitter)
    }
}

/// One board cell.
///
/// Fixed and placed blocks behave identically during simulation; the
/// distinction only matters to the placement search and to reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Free; a block may be placed here.
    #[default]
    Open,
    /// No block may ever occupy this cell.
    Blocked,
    /// A block that is part of the puzzle definition.
    Fixed(OpticalKind),
    /// A block put here by the placement search.
    Placed(OpticalKind),
}

impl Cell {
    /// The optical kind of this cell, if it holds a block.
    pub fn optical(self) -> Option<OpticalKind> {
        match self {
            Cell::Fixed(kind) | Cell::Placed(kind) => Some(kind),
            Cell::Open | Cell::Blocked => None,
        }
    }

    /// Whether the cell holds a block of any kind.
    pub fn is_occupied(self) -> bool {
        self.optical().is_some()
    }

    /// The value this cell paints at its own center.
    pub fn lattice_value(self) -> LatticeValue {
        match self {
            Cell::Open => LatticeValue::Empty,
            Cell::Blocked => LatticeValue::Blocked,
            Cell::Fixed(kind) | Cell::Placed(kind) => kind.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CellBoard
// ---------------------------------------------------------------------------

/// A `width x height` arrangement of cells, stored row-major.
///
/// Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBoard {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellBoard {
    /// Build a board from row-major cells.
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return Err(CoreError::InvalidBoard {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A board of open cells.
    pub fn open(width: usize, height: usize) -> Result<Self, CoreError> {
        Self::new(width, height, vec![Cell::Open; width * height])
    }

    /// Build a board from rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, CoreError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(CoreError::InvalidBoard {
                width,
                height,
                cells: rows.iter().map(Vec::len).sum(),
            });
        }
        Self::new(width, height, rows.into_iter().flatten().collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Checked cell lookup.
    pub fn cell_at(&self, pos: CellPos) -> Result<Cell, CoreError> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Put a block on an open cell.
    pub fn place(&mut self, pos: CellPos, kind: OpticalKind) -> Result<(), CoreError> {
        let i = self.index(pos)?;
        if self.cells[i] != Cell::Open {
            return Err(CoreError::CellOccupied { pos });
        }
        self.cells[i] = Cell::Placed(kind);
        Ok(())
    }

    /// Iterate over every cell with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (CellPos::new(i % width, i / width), cell))
    }

    /// Positions of all open cells, row by row.
    pub fn open_cells(&self) -> Vec<CellPos> {
        self.iter()
            .filter(|(_, cell)| *cell == Cell::Open)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of cells holding a block.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Whether `point` lies on the outermost ring of this board's lattice.
    pub fn on_lattice_border(&self, point: LatticePoint) -> bool {
        let max_x = 2 * self.width as i32;
        let max_y = 2 * self.height as i32;
        (0..=max_x).contains(&point.x)
            && (0..=max_y).contains(&point.y)
            && (point.x == 0 || point.y == 0 || point.x == max_x || point.y == max_y)
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    fn index(&self, pos: CellPos) -> Result<usize, CoreError> {
        if pos.col >= self.width || pos.row >= self.height {
            return Err(CoreError::CellOutOfRange {
                pos,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.row * self.width + pos.col)
    }
}
