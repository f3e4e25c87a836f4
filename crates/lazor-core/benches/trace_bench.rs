//! Criterion benchmarks for the Lazor core.
//!
//! Three benchmark groups:
//! - `build`: lattice construction for scattered boards of growing size
//! - `trace`: tracing a fan of emitters across a scattered board
//! - `simulate`: the full build, trace and check pipeline

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lazor_core::test_utils::*;
use lazor_core::*;

// ===========================================================================
// Scene builders
// ===========================================================================

/// One emitter per left-edge face point, heading down-right.
fn edge_emitters(board: &CellBoard) -> Vec<Emitter> {
    (0..board.height())
        .map(|row| emitter(0, 2 * row as i32 + 1, 1, 1))
        .collect()
}

/// Targets along the bottom edge of the lattice.
fn bottom_targets(board: &CellBoard) -> Vec<LatticePoint> {
    let y = 2 * board.height() as i32;
    (0..board.width()).map(|col| pt(2 * col as i32 + 1, y)).collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for size in [8, 32, 128] {
        let board = scattered_board(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &board, |b, board| {
            b.iter(|| LatticeBuilder::build(board).unwrap());
        });
    }
    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");
    for size in [8, 32, 128] {
        let board = scattered_board(size);
        let lattice = LatticeBuilder::build(&board).unwrap();
        let emitters = edge_emitters(&board);
        group.bench_with_input(BenchmarkId::from_parameter(size), &lattice, |b, lattice| {
            b.iter(|| Tracer::trace(lattice, &emitters, TraceOptions::default()).unwrap());
        });
    }
    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let board = scattered_board(32);
    let emitters = edge_emitters(&board);
    let targets = bottom_targets(&board);

    c.bench_function("simulate_32", |b| {
        b.iter(|| simulate(&board, &emitters, &targets, TraceOptions::default()).unwrap());
    });
}

criterion_group!(benches, bench_build, bench_trace, bench_simulate);
criterion_main!(benches);
