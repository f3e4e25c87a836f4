#![no_main]
use arbitrary::Arbitrary;
use lazor_core::{
    BeamState, Cell, CellBoard, Direction, Emitter, LatticeBuilder, LatticePoint, OpticalKind,
    TraceOptions, Tracer,
};
use libfuzzer_sys::fuzz_target;

/// A small board plus emitters, in raw form.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    cells: Vec<u8>,
    emitters: Vec<(u8, u8, u8)>,
}

fn cell(byte: u8) -> Cell {
    match byte % 8 {
        0 => Cell::Blocked,
        1 => Cell::Fixed(OpticalKind::Mirror),
        2 => Cell::Fixed(OpticalKind::Absorber),
        3 => Cell::Fixed(OpticalKind::Splitter),
        _ => Cell::Open,
    }
}

fuzz_target!(|input: FuzzInput| {
    let width = (input.width % 12) as usize + 1;
    let height = (input.height % 12) as usize + 1;
    let cells = (0..width * height)
        .map(|i| cell(input.cells.get(i).copied().unwrap_or(u8::MAX)))
        .collect();
    let board = CellBoard::new(width, height, cells).expect("dimensions are valid");
    let lattice = LatticeBuilder::build(&board).expect("board is valid");

    let emitters: Vec<Emitter> = input
        .emitters
        .iter()
        .take(8)
        .map(|&(x, y, d)| {
            let point = LatticePoint::new(
                (x as usize % lattice.width()) as i32,
                (y as usize % lattice.height()) as i32,
            );
            Emitter::with_direction(point, Direction::all()[d as usize % 4])
        })
        .collect();

    let outcome = Tracer::trace(&lattice, &emitters, TraceOptions::default())
        .expect("emitters are on the lattice");
    for beam in &outcome.beams {
        assert_ne!(beam.state, BeamState::Active);
        assert!(beam.trajectory.iter().all(|&p| lattice.contains(p)));
    }
});
