//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::beam::Emitter;
use crate::board::{Cell, CellBoard, OpticalKind};
use crate::coord::{CellPos, LatticePoint};

// ===========================================================================
// Coordinates
// ===========================================================================

pub fn pt(x: i32, y: i32) -> LatticePoint {
    LatticePoint::new(x, y)
}

pub fn cell(col: usize, row: usize) -> CellPos {
    CellPos::new(col, row)
}

pub fn emitter(x: i32, y: i32, dx: i32, dy: i32) -> Emitter {
    Emitter::new(LatticePoint::new(x, y), dx, dy).expect("test emitter must be diagonal")
}

// ===========================================================================
// Boards
// ===========================================================================

/// Parse a compact board sketch, one string per row.
///
/// `o` open, `x` blocked, `A`/`B`/`C` fixed mirror/absorber/splitter,
/// `a`/`b`/`c` placed mirror/absorber/splitter. Spaces are ignored.
pub fn board(rows: &[&str]) -> CellBoard {
    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    'o' => Cell::Open,
                    'x' => Cell::Blocked,
                    'A' => Cell::Fixed(OpticalKind::Mirror),
                    'B' => Cell::Fixed(OpticalKind::Absorber),
                    'C' => Cell::Fixed(OpticalKind::Splitter),
                    'a' => Cell::Placed(OpticalKind::Mirror),
                    'b' => Cell::Placed(OpticalKind::Absorber),
                    'c' => Cell::Placed(OpticalKind::Splitter),
                    other => panic!("unknown board sketch character {other:?}"),
                })
                .collect()
        })
        .collect();
    CellBoard::from_rows(rows).expect("test board must be rectangular")
}

/// An open `width x height` board with a single block.
pub fn board_with_block(width: usize, height: usize, at: CellPos, kind: OpticalKind) -> CellBoard {
    let mut b = CellBoard::open(width, height).expect("test board dimensions");
    b.place(at, kind).expect("test block must land on an open cell");
    b
}

/// A large open board with a sparse diagonal scatter of blocks, for
/// benchmarks and stress tests.
pub fn scattered_board(size: usize) -> CellBoard {
    let mut b = CellBoard::open(size, size).expect("test board dimensions");
    for i in 0..size {
        let kind = OpticalKind::all()[i % 3];
        let pos = CellPos::new((i * 7 + 3) % size, (i * 5 + 1) % size);
        let _ = b.place(pos, kind);
    }
    b
}
