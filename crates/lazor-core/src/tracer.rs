//! Beam tracing across a built lattice.
//!
//! Each beam is stepped one lattice point at a time:
//!
//! 1. At the current point, check for a block interaction (skipped only at
//!    the origin of a spawned beam).
//! 2. Step diagonally. Leaving the lattice ends the beam as `Exited`; the
//!    out-of-bounds point is never recorded.
//!
//! A face point interacts when the beam is moving toward the painted cell's
//! center on the face's axis: a `Vertical` face probes `(x+dx, y)`, a
//! `Horizontal` face probes `(x, y+dy)`, and the probe must carry the same
//! value as the face. Mirrors flip the probed axis, absorbers stop the beam,
//! and splitters flip the probed axis while queueing a copy of the beam that
//! keeps the incoming heading.
//!
//! Spawned beams go through a FIFO work queue that is drained until empty.
//! Beams only read the lattice, so the `parallel` feature traces each batch
//! of queued beams on the rayon pool; ids and results match the sequential
//! order exactly.

use std::collections::{HashSet, VecDeque};

use crate::beam::{Beam, BeamId, BeamOrigin, BeamState, Emitter};
use crate::board::OpticalKind;
use crate::coord::{Direction, LatticePoint};
use crate::error::CoreError;
use crate::lattice::{FaceOrientation, Lattice};

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Tuning knobs for a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TraceOptions {
    /// Maximum steps a single beam may take before it is cut off as
    /// `Looped`. `None` uses four times the lattice point count, which is
    /// the number of distinct (point, direction) states.
    pub max_steps_per_beam: Option<usize>,
}

impl TraceOptions {
    fn step_budget(&self, lattice: &Lattice) -> usize {
        self.max_steps_per_beam.unwrap_or(4 * lattice.len())
    }
}

/// Every beam produced by one trace, in id order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TraceOutcome {
    pub beams: Vec<Beam>,
}

impl TraceOutcome {
    pub fn get(&self, id: BeamId) -> Option<&Beam> {
        self.beams.get(id.0 as usize).filter(|b| b.id == id)
    }

    /// Number of beams that ended in `state`.
    pub fn count(&self, state: BeamState) -> usize {
        self.beams.iter().filter(|b| b.state == state).count()
    }

    /// Beams spawned by splitters.
    pub fn spawned(&self) -> impl Iterator<Item = &Beam> {
        self.beams.iter().filter(|b| b.is_spawned())
    }

    pub fn len(&self) -> usize {
        self.beams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Interaction rules
// ---------------------------------------------------------------------------

/// The effect of the lattice on a beam standing at a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Keep going.
    Pass,
    /// Continue with a new heading.
    Reflect(Direction),
    /// Stop here.
    Absorb,
    /// Continue with `reflected`; a new beam leaves with `transmitted`.
    Split {
        reflected: Direction,
        transmitted: Direction,
    },
}

/// Decide how the block face at `point` (if any) acts on a beam heading
/// `direction`.
pub fn interaction(lattice: &Lattice, point: LatticePoint, direction: Direction) -> Interaction {
    let Some(site) = lattice.site(point) else {
        return Interaction::Pass;
    };
    let Some(kind) = site.value.optical() else {
        return Interaction::Pass;
    };

    let (probe, reflected) = match site.face {
        FaceOrientation::Vertical => (point.offset(direction.dx(), 0), direction.flip_x()),
        FaceOrientation::Horizontal => (point.offset(0, direction.dy()), direction.flip_y()),
        FaceOrientation::None => return Interaction::Pass,
    };
    if lattice.value_at(probe) != site.value {
        return Interaction::Pass;
    }

    match kind {
        OpticalKind::Mirror => Interaction::Reflect(reflected),
        OpticalKind::Absorber => Interaction::Absorb,
        OpticalKind::Splitter => Interaction::Split {
            reflected,
            transmitted: direction,
        },
    }
}

// ---------------------------------------------------------------------------
// Work queue
// ---------------------------------------------------------------------------

/// A beam waiting to be traced.
#[derive(Debug, Clone, Copy)]
struct Seed {
    id: BeamId,
    origin: BeamOrigin,
    /// Index of the emitter this beam descends from.
    root: usize,
    start: LatticePoint,
    direction: Direction,
    /// Spawned beams already had their origin interaction applied to the
    /// parent, so they skip it.
    check_origin: bool,
}

/// FIFO of pending beams. Allocates ids at enqueue time and drops splitter
/// spawns whose (point, heading) was already queued by the same emitter's
/// beams. Separate emitters never suppress each other's spawns.
struct WorkQueue {
    pending: VecDeque<Seed>,
    spawned: HashSet<(usize, LatticePoint, Direction)>,
    next_id: u32,
}

impl WorkQueue {
    fn seeded(emitters: &[Emitter]) -> Self {
        let mut queue = Self {
            pending: VecDeque::with_capacity(emitters.len()),
            spawned: HashSet::new(),
            next_id: 0,
        };
        for (index, emitter) in emitters.iter().enumerate() {
            let id = queue.allocate();
            queue.pending.push_back(Seed {
                id,
                origin: BeamOrigin::Emitter(index),
                root: index,
                start: emitter.origin,
                direction: emitter.direction,
                check_origin: true,
            });
        }
        queue
    }

    fn allocate(&mut self) -> BeamId {
        let id = BeamId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_spawn(&mut self, parent: BeamId, root: usize, start: LatticePoint, direction: Direction) {
        if !self.spawned.insert((root, start, direction)) {
            log::debug!("beam {} re-split at {start} heading {direction}; already queued", parent.0);
            return;
        }
        let id = self.allocate();
        log::debug!("beam {} split at {start}: beam {} heading {direction}", parent.0, id.0);
        self.pending.push_back(Seed {
            id,
            origin: BeamOrigin::Split { parent },
            root,
            start,
            direction,
            check_origin: false,
        });
    }
}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// A traced beam plus the spawns it produced, in the order they happened.
struct Run {
    beam: Beam,
    root: usize,
    spawns: Vec<(LatticePoint, Direction)>,
}

/// Runs beams to termination.
pub struct Tracer;

impl Tracer {
    /// Trace one beam per emitter, plus every beam spawned along the way.
    ///
    /// Fails with `PointOutOfRange` if an emitter origin is off the lattice.
    pub fn trace(
        lattice: &Lattice,
        emitters: &[Emitter],
        options: TraceOptions,
    ) -> Result<TraceOutcome, CoreError> {
        for emitter in emitters {
            lattice.get(emitter.origin)?;
        }

        let budget = options.step_budget(lattice);
        let queue = WorkQueue::seeded(emitters);

        #[cfg(feature = "parallel")]
        let beams = drain_in_waves(lattice, queue, budget);
        #[cfg(not(feature = "parallel"))]
        let beams = drain_in_order(lattice, queue, budget);

        Ok(TraceOutcome { beams })
    }
}

/// Trace queued beams one at a time, front to back.
#[cfg(any(test, not(feature = "parallel")))]
fn drain_in_order(lattice: &Lattice, mut queue: WorkQueue, budget: usize) -> Vec<Beam> {
    let mut beams = Vec::with_capacity(queue.pending.len());
    while let Some(seed) = queue.pending.pop_front() {
        let run = run_beam(lattice, &seed, budget);
        collect_run(&mut queue, &mut beams, run);
    }
    beams
}

/// Trace everything queued so far on the rayon pool, then collect the runs
/// in queue order so spawns get the same ids as `drain_in_order`.
#[cfg(feature = "parallel")]
fn drain_in_waves(lattice: &Lattice, mut queue: WorkQueue, budget: usize) -> Vec<Beam> {
    use rayon::prelude::*;

    let mut beams = Vec::with_capacity(queue.pending.len());
    while !queue.pending.is_empty() {
        let batch: Vec<Seed> = queue.pending.drain(..).collect();
        let runs: Vec<Run> = batch
            .par_iter()
            .map(|seed| run_beam(lattice, seed, budget))
            .collect();
        for run in runs {
            collect_run(&mut queue, &mut beams, run);
        }
    }
    beams
}

fn collect_run(queue: &mut WorkQueue, beams: &mut Vec<Beam>, run: Run) {
    let parent = run.beam.id;
    for (start, direction) in run.spawns {
        queue.push_spawn(parent, run.root, start, direction);
    }
    log::trace!(
        "beam {} {:?} after {} points",
        parent.0,
        run.beam.state,
        run.beam.trajectory.len()
    );
    beams.push(run.beam);
}

fn run_beam(lattice: &Lattice, seed: &Seed, budget: usize) -> Run {
    let mut beam = Beam::new(seed.id, seed.origin, seed.start, seed.direction);
    let mut spawns = Vec::new();
    let mut visited = HashSet::new();
    if seed.check_origin {
        visited.insert((seed.start, seed.direction));
    }

    let mut check = seed.check_origin;
    let mut steps = 0usize;

    loop {
        let position = beam.position();

        if check {
            match interaction(lattice, position, beam.direction) {
                Interaction::Pass => {}
                Interaction::Reflect(direction) => beam.direction = direction,
                Interaction::Absorb => {
                    beam.state = BeamState::Absorbed;
                    break;
                }
                Interaction::Split {
                    reflected,
                    transmitted,
                } => {
                    spawns.push((position, transmitted));
                    beam.direction = reflected;
                }
            }
        }
        check = true;

        let next = position + beam.direction;
        if !lattice.contains(next) {
            beam.state = BeamState::Exited;
            break;
        }
        if steps >= budget || !visited.insert((next, beam.direction)) {
            beam.state = BeamState::Looped;
            break;
        }
        beam.trajectory.push(next);
        steps += 1;
    }

    Run {
        beam,
        root: seed.root,
        spawns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, CellBoard};
    use crate::builder::LatticeBuilder;
    use crate::coord::CellPos;

    fn p(x: i32, y: i32) -> LatticePoint {
        LatticePoint::new(x, y)
    }

    fn lattice_with(width: usize, height: usize, blocks: &[(usize, usize, OpticalKind)]) -> Lattice {
        let mut board = CellBoard::open(width, height).unwrap();
        for &(col, row, kind) in blocks {
            board.place(CellPos::new(col, row), kind).unwrap();
        }
        LatticeBuilder::build(&board).unwrap()
    }

    fn trace(lattice: &Lattice, emitters: &[Emitter]) -> TraceOutcome {
        Tracer::trace(lattice, emitters, TraceOptions::default()).unwrap()
    }

    #[test]
    fn straight_beam_exits_at_boundary() {
        let lattice = lattice_with(3, 3, &[]);
        let out = trace(&lattice, &[Emitter::new(p(3, 0), -1, 1).unwrap()]);
        assert_eq!(out.len(), 1);
        let beam = &out.beams[0];
        assert_eq!(beam.state, BeamState::Exited);
        assert_eq!(beam.trajectory, vec![p(3, 0), p(2, 1), p(1, 2), p(0, 3)]);
    }

    #[test]
    fn mirror_top_face_flips_dy() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Mirror)]);
        assert_eq!(
            interaction(&lattice, p(3, 2), Direction::DOWN_RIGHT),
            Interaction::Reflect(Direction::UP_RIGHT)
        );
        let out = trace(&lattice, &[Emitter::new(p(1, 0), 1, 1).unwrap()]);
        let beam = &out.beams[0];
        assert_eq!(beam.trajectory, vec![p(1, 0), p(2, 1), p(3, 2), p(4, 1), p(5, 0)]);
        assert_eq!(beam.direction, Direction::UP_RIGHT);
        assert_eq!(beam.state, BeamState::Exited);
        assert_eq!(beam.turns(), 1);
    }

    #[test]
    fn mirror_side_face_flips_dx() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Mirror)]);
        assert_eq!(
            interaction(&lattice, p(2, 3), Direction::DOWN_RIGHT),
            Interaction::Reflect(Direction::DOWN_LEFT)
        );
        assert_eq!(
            interaction(&lattice, p(4, 3), Direction::UP_LEFT),
            Interaction::Reflect(Direction::UP_RIGHT)
        );
    }

    #[test]
    fn face_ignores_beams_moving_away() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Mirror)]);
        // Top face, moving up: probe (3, 1) is not the mirror.
        assert_eq!(interaction(&lattice, p(3, 2), Direction::UP_LEFT), Interaction::Pass);
        // Left face, moving left: probe (1, 3) is open.
        assert_eq!(interaction(&lattice, p(2, 3), Direction::DOWN_LEFT), Interaction::Pass);
    }

    #[test]
    fn origin_on_face_interacts_before_first_step() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Mirror)]);
        let out = trace(&lattice, &[Emitter::new(p(3, 2), 1, 1).unwrap()]);
        let beam = &out.beams[0];
        assert_eq!(beam.trajectory, vec![p(3, 2), p(4, 1), p(5, 0)]);
    }

    #[test]
    fn absorber_stops_beam_at_face() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Absorber)]);
        let out = trace(&lattice, &[Emitter::new(p(1, 0), 1, 1).unwrap()]);
        let beam = &out.beams[0];
        assert_eq!(beam.state, BeamState::Absorbed);
        assert_eq!(beam.trajectory, vec![p(1, 0), p(2, 1), p(3, 2)]);
        assert_eq!(beam.position(), p(3, 2));
    }

    #[test]
    fn splitter_spawns_transmitted_beam() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Splitter)]);
        let out = trace(&lattice, &[Emitter::new(p(1, 0), 1, 1).unwrap()]);
        assert_eq!(out.len(), 2);

        let reflected = &out.beams[0];
        assert_eq!(reflected.trajectory, vec![p(1, 0), p(2, 1), p(3, 2), p(4, 1), p(5, 0)]);
        assert_eq!(reflected.state, BeamState::Exited);

        let transmitted = &out.beams[1];
        assert_eq!(transmitted.id, BeamId(1));
        assert_eq!(transmitted.origin, BeamOrigin::Split { parent: BeamId(0) });
        assert_eq!(transmitted.initial_direction, Direction::DOWN_RIGHT);
        assert_eq!(transmitted.trajectory, vec![p(3, 2), p(4, 3), p(5, 4), p(6, 5)]);
        assert_eq!(transmitted.state, BeamState::Exited);
        assert_eq!(transmitted.turns(), 0);
    }

    #[test]
    fn separate_emitters_split_independently() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Splitter)]);
        let laser = Emitter::new(p(1, 0), 1, 1).unwrap();
        let out = trace(&lattice, &[laser, laser]);

        assert_eq!(out.len(), 4);
        let parents: Vec<_> = out
            .spawned()
            .map(|b| match b.origin {
                BeamOrigin::Split { parent } => parent,
                BeamOrigin::Emitter(_) => unreachable!(),
            })
            .collect();
        assert_eq!(parents, vec![BeamId(0), BeamId(1)]);
        assert_eq!(out.beams[2].trajectory, out.beams[3].trajectory);
    }

    #[test]
    fn closed_mirror_ring_loops() {
        // Mirrors on every cell but the center: a beam inside bounces forever.
        let lattice = lattice_with(
            3,
            3,
            &[
                (0, 0, OpticalKind::Mirror),
                (1, 0, OpticalKind::Mirror),
                (2, 0, OpticalKind::Mirror),
                (0, 1, OpticalKind::Mirror),
                (2, 1, OpticalKind::Mirror),
                (0, 2, OpticalKind::Mirror),
                (1, 2, OpticalKind::Mirror),
                (2, 2, OpticalKind::Mirror),
            ],
        );
        let out = trace(&lattice, &[Emitter::new(p(3, 2), 1, 1).unwrap()]);
        let beam = &out.beams[0];
        assert_eq!(beam.state, BeamState::Looped);
        assert_eq!(beam.trajectory, vec![p(3, 2), p(4, 3), p(3, 4), p(2, 3), p(3, 2)]);
    }

    #[test]
    fn step_budget_cuts_off_beam() {
        let lattice = lattice_with(5, 5, &[]);
        let options = TraceOptions {
            max_steps_per_beam: Some(2),
        };
        let out = Tracer::trace(&lattice, &[Emitter::new(p(0, 1), 1, 1).unwrap()], options).unwrap();
        let beam = &out.beams[0];
        assert_eq!(beam.state, BeamState::Looped);
        assert_eq!(beam.trajectory, vec![p(0, 1), p(1, 2), p(2, 3)]);
    }

    #[test]
    fn emitter_off_lattice_is_rejected() {
        let lattice = lattice_with(2, 2, &[]);
        let err = Tracer::trace(
            &lattice,
            &[Emitter::new(p(9, 0), 1, 1).unwrap()],
            TraceOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn blocked_cells_do_not_interact() {
        let board = CellBoard::from_rows(vec![
            vec![Cell::Open, Cell::Open, Cell::Open],
            vec![Cell::Open, Cell::Blocked, Cell::Open],
            vec![Cell::Open, Cell::Open, Cell::Open],
        ])
        .unwrap();
        let lattice = LatticeBuilder::build(&board).unwrap();
        let out = trace(&lattice, &[Emitter::new(p(0, 0), 1, 1).unwrap()]);
        let beam = &out.beams[0];
        assert_eq!(beam.state, BeamState::Exited);
        assert_eq!(beam.trajectory.len(), 7);
    }

    #[test]
    fn no_emitters_no_beams() {
        let lattice = lattice_with(2, 2, &[]);
        assert!(trace(&lattice, &[]).is_empty());
    }

    #[test]
    fn blocked_faces_trace_like_open_cells() {
        let open = lattice_with(3, 3, &[]);
        let board = CellBoard::from_rows(vec![
            vec![Cell::Open, Cell::Open, Cell::Open],
            vec![Cell::Open, Cell::Blocked, Cell::Open],
            vec![Cell::Open, Cell::Open, Cell::Open],
        ])
        .unwrap();
        let blocked = LatticeBuilder::build(&board).unwrap();

        // Each emitter crosses a face of the blocked cell.
        let emitters = [
            Emitter::new(p(1, 0), 1, 1).unwrap(),
            Emitter::new(p(2, 3), 1, -1).unwrap(),
            Emitter::new(p(6, 1), -1, 1).unwrap(),
        ];
        assert_eq!(trace(&blocked, &emitters), trace(&open, &emitters));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn waves_match_in_order_tracing() {
        use crate::test_utils::scattered_board;

        for size in [3, 6, 9] {
            let lattice = LatticeBuilder::build(&scattered_board(size)).unwrap();
            let edge = 2 * size as i32;
            let emitters: Vec<Emitter> = (0..size as i32)
                .flat_map(|i| {
                    [
                        Emitter::new(p(2 * i + 1, 0), 1, 1).unwrap(),
                        Emitter::new(p(0, 2 * i + 1), 1, -1).unwrap(),
                        Emitter::new(p(edge, 2 * i + 1), -1, 1).unwrap(),
                    ]
                })
                .collect();
            let budget = TraceOptions::default().step_budget(&lattice);

            let in_order = drain_in_order(&lattice, WorkQueue::seeded(&emitters), budget);
            let waves = drain_in_waves(&lattice, WorkQueue::seeded(&emitters), budget);
            assert_eq!(waves, in_order, "size {size}");
            assert_eq!(trace(&lattice, &emitters).beams, in_order);
        }
    }

    #[test]
    fn outcome_lookup_by_id() {
        let lattice = lattice_with(3, 3, &[(1, 1, OpticalKind::Splitter)]);
        let out = trace(&lattice, &[Emitter::new(p(1, 0), 1, 1).unwrap()]);
        assert_eq!(out.get(BeamId(1)).map(|b| b.id), Some(BeamId(1)));
        assert!(out.get(BeamId(7)).is_none());
        assert_eq!(out.count(BeamState::Exited), 2);
        assert_eq!(out.spawned().count(), 1);
    }
}
