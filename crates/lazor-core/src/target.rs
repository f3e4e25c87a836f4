//! Win-condition check over traced beams.

use std::collections::HashSet;

use crate::beam::Beam;
use crate::coord::LatticePoint;

/// Checks targets against the union of beam trajectories.
///
/// Every recorded trajectory point counts, including points of spawned and
/// looped beams. The result does not depend on beam order.
pub struct TargetChecker;

impl TargetChecker {
    /// Every lattice point visited by any beam.
    pub fn hit_set(beams: &[Beam]) -> HashSet<LatticePoint> {
        beams
            .iter()
            .flat_map(|beam| beam.trajectory.iter().copied())
            .collect()
    }

    /// `true` iff every target lies on some beam's trajectory. An empty
    /// target list is trivially satisfied.
    pub fn all_hit(beams: &[Beam], targets: &[LatticePoint]) -> bool {
        let hits = Self::hit_set(beams);
        targets.iter().all(|t| hits.contains(t))
    }

    /// Targets not covered by any beam, in the order given.
    pub fn missing(beams: &[Beam], targets: &[LatticePoint]) -> Vec<LatticePoint> {
        let hits = Self::hit_set(beams);
        targets
            .iter()
            .filter(|t| !hits.contains(t))
            .copied()
            .collect()
    }
}
