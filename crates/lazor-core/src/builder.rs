//! Expansion of a [`CellBoard`] into a painted [`Lattice`].

use crate::board::CellBoard;
use crate::error::CoreError;
use crate::lattice::{FaceOrientation, Lattice, LatticeValue};

/// Builds lattices from boards.
///
/// Painting rules:
/// - Every cell center gets the cell's own value (`Blocked` for blocked
///   cells, the optical kind for occupied cells) and orientation `None`.
/// - Every occupied cell paints its four in-bounds face points. A face's
///   value is overwritten only by a strictly higher-priority value, so the
///   result does not depend on scan order. The orientation is always
///   written (up/down `Horizontal`, left/right `Vertical`).
/// - Blocked cells paint their center only.
pub struct LatticeBuilder;

impl LatticeBuilder {
    pub fn build(board: &CellBoard) -> Result<Lattice, CoreError> {
        let width = 2 * board.width() + 1;
        let height = 2 * board.height() + 1;
        if board.width() == 0 || board.height() == 0 {
            return Err(CoreError::InvalidBoard {
                width: board.width(),
                height: board.height(),
                cells: 0,
            });
        }

        let mut lattice = Lattice::empty(width, height);

        for (pos, cell) in board.iter() {
            let value = cell.lattice_value();
            if value == LatticeValue::Empty {
                continue;
            }

            let Some(center) = lattice.site_mut(pos.center()) else {
                continue;
            };
            center.value = value;
            center.face = FaceOrientation::None;

            if cell.optical().is_none() {
                continue;
            }

            for (point, face) in pos.faces() {
                if let Some(site) = lattice.site_mut(point) {
                    if value > site.value {
                        site.value = value;
                    }
                    site.face = face;
                }
            }
        }

        Ok(lattice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, OpticalKind};
    use crate::coord::{CellPos, LatticePoint};
    use crate::lattice::LatticeSite;

    fn board_with(width: usize, height: usize, cells: &[(usize, usize, Cell)]) -> CellBoard {
        let mut all = vec![Cell::Open; width * height];
        for &(col, row, cell) in cells {
            all[row * width + col] = cell;
        }
        CellBoard::new(width, height, all).unwrap()
    }

    #[test]
    fn dimensions_are_doubled_plus_one() {
        let lattice = LatticeBuilder::build(&CellBoard::open(3, 2).unwrap()).unwrap();
        assert_eq!(lattice.width(), 7);
        assert_eq!(lattice.height(), 5);
        assert_eq!(lattice.len(), 35);
    }

    #[test]
    fn open_board_is_empty_except_blocked_centers() {
        let board = board_with(3, 3, &[(0, 0, Cell::Blocked), (2, 2, Cell::Blocked)]);
        let lattice = LatticeBuilder::build(&board).unwrap();

        for (point, site) in lattice.iter() {
            assert_eq!(site.face, FaceOrientation::None, "face set at {point}");
            let expected = if point == LatticePoint::new(1, 1) || point == LatticePoint::new(5, 5) {
                LatticeValue::Blocked
            } else {
                LatticeValue::Empty
            };
            assert_eq!(site.value, expected, "wrong value at {point}");
        }
    }

    #[test]
    fn single_block_paints_four_faces() {
        let board = board_with(3, 3, &[(1, 1, Cell::Fixed(OpticalKind::Absorber))]);
        let lattice = LatticeBuilder::build(&board).unwrap();

        assert_eq!(
            lattice.get(LatticePoint::new(3, 3)).unwrap(),
            LatticeSite {
                value: LatticeValue::Absorber,
                face: FaceOrientation::None
            }
        );
        for (point, face) in CellPos::new(1, 1).faces() {
            let site = lattice.get(point).unwrap();
            assert_eq!(site.value, LatticeValue::Absorber);
            assert_eq!(site.face, face);
        }
        // Corners stay untouched.
        assert_eq!(lattice.get(LatticePoint::new(2, 2)).unwrap(), LatticeSite::default());
        assert_eq!(lattice.get(LatticePoint::new(4, 4)).unwrap(), LatticeSite::default());
    }

    #[test]
    fn corner_cell_paints_border_faces() {
        let board = board_with(2, 2, &[(0, 0, Cell::Placed(OpticalKind::Mirror))]);
        let lattice = LatticeBuilder::build(&board).unwrap();
        assert_eq!(lattice.value_at(LatticePoint::new(1, 0)), LatticeValue::Mirror);
        assert_eq!(lattice.value_at(LatticePoint::new(0, 1)), LatticeValue::Mirror);
        assert_eq!(
            lattice.get(LatticePoint::new(0, 1)).unwrap().face,
            FaceOrientation::Vertical
        );
    }

    #[test]
    fn shared_face_takes_higher_priority_in_either_order() {
        let shared = LatticePoint::new(2, 1);

        let a = board_with(
            2,
            1,
            &[
                (0, 0, Cell::Fixed(OpticalKind::Splitter)),
                (1, 0, Cell::Fixed(OpticalKind::Mirror)),
            ],
        );
        let b = board_with(
            2,
            1,
            &[
                (0, 0, Cell::Fixed(OpticalKind::Mirror)),
                (1, 0, Cell::Fixed(OpticalKind::Splitter)),
            ],
        );

        let la = LatticeBuilder::build(&a).unwrap();
        let lb = LatticeBuilder::build(&b).unwrap();
        assert_eq!(la.value_at(shared), LatticeValue::Mirror);
        assert_eq!(lb.value_at(shared), LatticeValue::Mirror);
        assert_eq!(la.get(shared).unwrap().face, FaceOrientation::Vertical);
        assert_eq!(lb.get(shared).unwrap().face, FaceOrientation::Vertical);
    }

    #[test]
    fn blocked_neighbor_does_not_erase_optical_face() {
        let board = board_with(
            2,
            1,
            &[(0, 0, Cell::Fixed(OpticalKind::Splitter)), (1, 0, Cell::Blocked)],
        );
        let lattice = LatticeBuilder::build(&board).unwrap();
        assert_eq!(lattice.value_at(LatticePoint::new(2, 1)), LatticeValue::Splitter);
        assert_eq!(lattice.value_at(LatticePoint::new(3, 1)), LatticeValue::Blocked);
    }
}
