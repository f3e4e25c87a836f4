//! The doubled lattice that beams travel across.
//!
//! Each lattice point carries a [`LatticeValue`] (what, if anything, paints
//! it) and a [`FaceOrientation`] (which side of an occupied cell it is).

use serde::{Deserialize, Serialize};

use crate::board::OpticalKind;
use crate::coord::LatticePoint;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Point tags
// ---------------------------------------------------------------------------

/// What paints a lattice point.
///
/// Variants are totally ordered by priority; when two cells paint the same
/// face point, the higher value wins regardless of painting order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum LatticeValue {
    #[default]
    Empty = 0,
    Blocked = 1,
    Splitter = 2,
    Absorber = 3,
    Mirror = 4,
}

impl LatticeValue {
    /// The optical kind this value stands for, if any.
    pub fn optical(self) -> Option<OpticalKind> {
        match self {
            LatticeValue::Splitter => Some(OpticalKind::Splitter),
            LatticeValue::Absorber => Some(OpticalKind::Absorber),
            LatticeValue::Mirror => Some(OpticalKind::Mirror),
            LatticeValue::Empty | LatticeValue::Blocked => None,
        }
    }

    /// Priority code (0 = lowest).
    pub fn priority(self) -> u8 {
        self as u8
    }
}

impl From<OpticalKind> for LatticeValue {
    fn from(kind: OpticalKind) -> Self {
        match kind {
            OpticalKind::Mirror => LatticeValue::Mirror,
            OpticalKind::Absorber => LatticeValue::Absorber,
            OpticalKind::Splitter => LatticeValue::Splitter,
        }
    }
}

/// Which side of an occupied cell a face point lies on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceOrientation {
    /// Not a painted face (unpainted points and cell centers).
    #[default]
    None,
    /// Directly above or below a cell center. Interacts with vertical motion.
    Horizontal,
    /// Directly left or right of a cell center. Interacts with horizontal motion.
    Vertical,
}

/// The pair of tags stored at one lattice point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatticeSite {
    pub value: LatticeValue,
    pub face: FaceOrientation,
}

// ---------------------------------------------------------------------------
// Lattice
// ---------------------------------------------------------------------------

/// A `(2W+1) x (2H+1)` grid of [`LatticeSite`]s, stored row-major.
///
/// Produced by [`crate::builder::LatticeBuilder`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    width: usize,
    height: usize,
    sites: Vec<LatticeSite>,
}

impl Lattice {
    /// An all-empty lattice. Dimensions are checked by the builder.
    pub(crate) fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            sites: vec![LatticeSite::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of lattice points.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Whether `point` lies on the lattice.
    pub fn contains(&self, point: LatticePoint) -> bool {
        self.index(point).is_some()
    }

    /// Bounds-tolerant lookup.
    pub fn site(&self, point: LatticePoint) -> Option<&LatticeSite> {
        self.index(point).map(|i| &self.sites[i])
    }

    /// Checked lookup.
    pub fn get(&self, point: LatticePoint) -> Result<LatticeSite, CoreError> {
        self.site(point)
            .copied()
            .ok_or(CoreError::PointOutOfRange {
                point,
                width: self.width,
                height: self.height,
            })
    }

    /// The value at `point`, or `Empty` off the lattice.
    pub fn value_at(&self, point: LatticePoint) -> LatticeValue {
        self.site(point).map_or(LatticeValue::Empty, |s| s.value)
    }

    pub(crate) fn site_mut(&mut self, point: LatticePoint) -> Option<&mut LatticeSite> {
        self.index(point).map(move |i| &mut self.sites[i])
    }

    /// Iterate over every point and its site, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (LatticePoint, &LatticeSite)> {
        let width = self.width;
        self.sites.iter().enumerate().map(move |(i, site)| {
            (
                LatticePoint::new((i % width) as i32, (i / width) as i32),
                site,
            )
        })
    }

    fn index(&self, point: LatticePoint) -> Option<usize> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}
