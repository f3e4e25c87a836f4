//! Board and lattice coordinate types.
//!
//! The board is addressed by [`CellPos`] (column, row). The lattice doubles
//! each axis and adds a border, so board cell `(c, r)` has its center at
//! lattice point `(2c+1, 2r+1)`. Points with both coordinates odd are cell
//! centers; every other point is a face or a corner.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lattice::FaceOrientation;

// ---------------------------------------------------------------------------
// Board coordinates
// ---------------------------------------------------------------------------

/// A cell position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub col: usize,
    pub row: usize,
}

impl CellPos {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// The lattice point at the center of this cell.
    pub fn center(self) -> LatticePoint {
        LatticePoint::new(2 * self.col as i32 + 1, 2 * self.row as i32 + 1)
    }

    /// The four face points around this cell's center, with the orientation
    /// each one carries. Order: up, down, left, right.
    pub fn faces(self) -> [(LatticePoint, FaceOrientation); 4] {
        let c = self.center();
        [
            (LatticePoint::new(c.x, c.y - 1), FaceOrientation::Horizontal),
            (LatticePoint::new(c.x, c.y + 1), FaceOrientation::Horizontal),
            (LatticePoint::new(c.x - 1, c.y), FaceOrientation::Vertical),
            (LatticePoint::new(c.x + 1, c.y), FaceOrientation::Vertical),
        ]
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.col, self.row)
    }
}

// ---------------------------------------------------------------------------
// Lattice coordinates
// ---------------------------------------------------------------------------

/// A point on the lattice.
///
/// Signed so that the step that leaves the lattice can be computed before
/// it is bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticePoint {
    pub x: i32,
    pub y: i32,
}

impl LatticePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The board cell centered on this point, if it is a cell center.
    pub fn cell(self) -> Option<CellPos> {
        if self.x < 0 || self.y < 0 || self.x % 2 == 0 || self.y % 2 == 0 {
            return None;
        }
        Some(CellPos::new((self.x as usize - 1) / 2, (self.y as usize - 1) / 2))
    }

    /// Whether this point is a cell center (both coordinates odd).
    pub fn is_center(self) -> bool {
        self.cell().is_some()
    }

    /// The face orientation implied by parity: odd,even points sit above or
    /// below a center, even,odd points sit left or right of one.
    pub fn face_orientation(self) -> FaceOrientation {
        match (self.x.rem_euclid(2), self.y.rem_euclid(2)) {
            (1, 0) => FaceOrientation::Horizontal,
            (0, 1) => FaceOrientation::Vertical,
            _ => FaceOrientation::None,
        }
    }

    /// Chebyshev (chessboard) distance to another point.
    pub fn chebyshev_distance(&self, other: &LatticePoint) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// Offset by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add<Direction> for LatticePoint {
    type Output = LatticePoint;

    fn add(self, dir: Direction) -> LatticePoint {
        self.offset(dir.dx(), dir.dy())
    }
}

impl fmt::Display for LatticePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A strictly diagonal beam heading: both components are `+1` or `-1`.
///
/// The invariant is enforced at construction, so a `Direction` in hand is
/// always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct Direction {
    dx: i8,
    dy: i8,
}

impl Direction {
    pub const DOWN_RIGHT: Direction = Direction { dx: 1, dy: 1 };
    pub const DOWN_LEFT: Direction = Direction { dx: -1, dy: 1 };
    pub const UP_RIGHT: Direction = Direction { dx: 1, dy: -1 };
    pub const UP_LEFT: Direction = Direction { dx: -1, dy: -1 };

    /// Build a direction, rejecting any component that is not `+1`/`-1`.
    pub fn new(dx: i32, dy: i32) -> Result<Self, CoreError> {
        match (dx, dy) {
            (-1 | 1, -1 | 1) => Ok(Self {
                dx: dx as i8,
                dy: dy as i8,
            }),
            _ => Err(CoreError::MalformedEmitter { dx, dy }),
        }
    }

    /// All four diagonal directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::DOWN_RIGHT,
            Direction::DOWN_LEFT,
            Direction::UP_RIGHT,
            Direction::UP_LEFT,
        ]
    }

    pub fn dx(self) -> i32 {
        self.dx as i32
    }

    pub fn dy(self) -> i32 {
        self.dy as i32
    }

    /// Reverse the horizontal component.
    pub fn flip_x(self) -> Self {
        Self {
            dx: -self.dx,
            dy: self.dy,
        }
    }

    /// Reverse the vertical component.
    pub fn flip_y(self) -> Self {
        Self {
            dx: self.dx,
            dy: -self.dy,
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = CoreError;

    fn try_from((dx, dy): (i32, i32)) -> Result<Self, Self::Error> {
        Direction::new(dx, dy)
    }
}

impl From<Direction> for (i32, i32) {
    fn from(dir: Direction) -> Self {
        (dir.dx(), dir.dy())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.dx, self.dy)
    }
}
