#![no_main]
use lazor_core::{TraceOptions, simulate};
use lazor_data::parse_puzzle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must parse or fail cleanly, and any puzzle that parses
    // must simulate without a fault.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(puzzle) = parse_puzzle(text) {
        if puzzle.board.width() * puzzle.board.height() > 4096 {
            return;
        }
        simulate(
            &puzzle.board,
            &puzzle.emitters,
            &puzzle.targets,
            TraceOptions::default(),
        )
        .expect("parsed puzzles are always simulatable");
    }
});
