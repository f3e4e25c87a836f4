//! Where placeable blocks may go.
//!
//! A target on the lattice border that is a face point can only be reached
//! from inside the board through the cell that owns that face. A mirror or
//! absorber on that cell would hide the target, so those cells are closed
//! to the opaque kinds. Splitters let the beam through and may go on any
//! open cell.

use std::collections::BTreeSet;

use lazor_core::{CellBoard, CellPos, FaceOrientation, LatticePoint, OpticalKind};

/// Cell restrictions for one puzzle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementRules {
    opaque_forbidden: BTreeSet<CellPos>,
}

impl PlacementRules {
    pub fn new(board: &CellBoard, targets: &[LatticePoint], avoid_border_targets: bool) -> Self {
        let mut opaque_forbidden = BTreeSet::new();
        if !avoid_border_targets {
            return Self { opaque_forbidden };
        }

        for &target in targets {
            if !board.on_lattice_border(target) {
                continue;
            }
            let neighbors = match target.face_orientation() {
                FaceOrientation::Horizontal => [target.offset(0, -1), target.offset(0, 1)],
                FaceOrientation::Vertical => [target.offset(-1, 0), target.offset(1, 0)],
                FaceOrientation::None => continue,
            };
            for pos in neighbors.into_iter().filter_map(LatticePoint::cell) {
                if board.cell_at(pos).is_ok() {
                    log::debug!("border target {target} closes cell {pos} to opaque blocks");
                    opaque_forbidden.insert(pos);
                }
            }
        }
        Self { opaque_forbidden }
    }

    /// Whether a block of `kind` may be placed at `pos` (ignoring occupancy).
    pub fn allows(&self, pos: CellPos, kind: OpticalKind) -> bool {
        !(kind.is_opaque() && self.opaque_forbidden.contains(&pos))
    }

    /// Cells closed to mirrors and absorbers, in board order.
    pub fn forbidden(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.opaque_forbidden.iter().copied()
    }

    /// Open cells of `board` that accept `kind`.
    pub fn allowed_cells(&self, board: &CellBoard, kind: OpticalKind) -> Vec<CellPos> {
        board
            .open_cells()
            .into_iter()
            .filter(|&pos| self.allows(pos, kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazor_core::test_utils::*;

    #[test]
    fn top_border_target_closes_cell_below() {
        let board = CellBoard::open(3, 3).unwrap();
        let rules = PlacementRules::new(&board, &[pt(3, 0)], true);
        assert_eq!(rules.forbidden().collect::<Vec<_>>(), vec![cell(1, 0)]);
        assert!(!rules.allows(cell(1, 0), OpticalKind::Mirror));
        assert!(!rules.allows(cell(1, 0), OpticalKind::Absorber));
        assert!(rules.allows(cell(1, 0), OpticalKind::Splitter));
        assert!(rules.allows(cell(0, 0), OpticalKind::Mirror));
    }

    #[test]
    fn side_and_bottom_borders() {
        let board = CellBoard::open(3, 2).unwrap();
        let rules = PlacementRules::new(&board, &[pt(6, 1), pt(1, 4), pt(0, 3)], true);
        assert_eq!(
            rules.forbidden().collect::<Vec<_>>(),
            vec![cell(0, 1), cell(2, 0)]
        );
    }

    #[test]
    fn interior_and_corner_targets_close_nothing() {
        let board = CellBoard::open(3, 3).unwrap();
        let rules = PlacementRules::new(&board, &[pt(3, 2), pt(0, 0), pt(6, 6)], true);
        assert_eq!(rules.forbidden().count(), 0);
    }

    #[test]
    fn targets_off_the_lattice_close_nothing() {
        let board = CellBoard::open(3, 3).unwrap();
        let rules = PlacementRules::new(&board, &[pt(0, 9), pt(-1, 3)], true);
        assert_eq!(rules.forbidden().count(), 0);
    }

    #[test]
    fn disabled_rules_allow_everything() {
        let board = CellBoard::open(3, 3).unwrap();
        let rules = PlacementRules::new(&board, &[pt(3, 0)], false);
        assert!(rules.allows(cell(1, 0), OpticalKind::Mirror));
        assert_eq!(rules.allowed_cells(&board, OpticalKind::Absorber).len(), 9);
    }

    #[test]
    fn allowed_cells_skip_occupied_and_forbidden() {
        let board = board(&["o x o", "A o o"]);
        let rules = PlacementRules::new(&board, &[pt(1, 0)], true);
        assert_eq!(
            rules.allowed_cells(&board, OpticalKind::Mirror),
            vec![cell(2, 0), cell(1, 1), cell(2, 1)]
        );
        assert_eq!(
            rules.allowed_cells(&board, OpticalKind::Splitter),
            vec![cell(0, 0), cell(2, 0), cell(1, 1), cell(2, 1)]
        );
    }
}
