//! Beams and the emitters that seed them.

use serde::{Deserialize, Serialize};

use crate::coord::{Direction, LatticePoint};
use crate::error::CoreError;

/// Identifies a beam within one trace. Assigned in work-queue order:
/// emitter beams first, then spawned beams as they are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeamId(pub u32);

/// Lifecycle of a beam. Every state except `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamState {
    /// Still being stepped.
    Active,
    /// Stopped by an absorber face. The trajectory ends at that face.
    Absorbed,
    /// Stepped off the lattice. The trajectory ends at the last in-bounds point.
    Exited,
    /// Revisited an earlier (point, direction) state or ran out of step
    /// budget. The trajectory holds everything up to the repeat.
    Looped,
}

impl BeamState {
    pub fn is_terminal(self) -> bool {
        self != BeamState::Active
    }
}

/// An external beam source: a lattice origin and a diagonal heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emitter {
    pub origin: LatticePoint,
    pub direction: Direction,
}

impl Emitter {
    /// Build an emitter from raw components, rejecting non-diagonal headings.
    pub fn new(origin: LatticePoint, dx: i32, dy: i32) -> Result<Self, CoreError> {
        Ok(Self {
            origin,
            direction: Direction::new(dx, dy)?,
        })
    }

    pub fn with_direction(origin: LatticePoint, direction: Direction) -> Self {
        Self { origin, direction }
    }
}

/// Where a beam came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamOrigin {
    /// Seeded by the emitter at this index.
    Emitter(usize),
    /// Spawned by a splitter interaction on the given parent beam.
    Split { parent: BeamId },
}

/// A single ray traced across the lattice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    pub id: BeamId,
    pub origin: BeamOrigin,
    /// Direction the beam started with.
    pub initial_direction: Direction,
    /// Current (or final) direction.
    pub direction: Direction,
    /// Visited lattice points in traversal order, starting point included.
    pub trajectory: Vec<LatticePoint>,
    pub state: BeamState,
}

impl Beam {
    pub(crate) fn new(id: BeamId, origin: BeamOrigin, start: LatticePoint, direction: Direction) -> Self {
        Self {
            id,
            origin,
            initial_direction: direction,
            direction,
            trajectory: vec![start],
            state: BeamState::Active,
        }
    }

    /// The point the beam started from.
    pub fn start(&self) -> LatticePoint {
        self.trajectory[0]
    }

    /// The current (or final) position.
    pub fn position(&self) -> LatticePoint {
        self.trajectory[self.trajectory.len() - 1]
    }

    /// Whether the beam was spawned by a splitter.
    pub fn is_spawned(&self) -> bool {
        matches!(self.origin, BeamOrigin::Split { .. })
    }

    /// Number of direction changes along the trajectory.
    pub fn turns(&self) -> usize {
        self.trajectory
            .windows(3)
            .filter(|w| {
                let a = (w[1].x - w[0].x, w[1].y - w[0].y);
                let b = (w[2].x - w[1].x, w[2].y - w[1].y);
                a != b
            })
            .count()
    }
}
