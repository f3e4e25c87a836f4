//! `lazor-solve` -- solve a `.bff` puzzle by random placement search.
//!
//! Exit status is 0 when solved, 1 when the attempt budget ran out and 2 on
//! any error. Set `RUST_LOG=info` (or `debug`) for search progress.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lazor_data::{ConfigError, PuzzleError, SolverConfig, load_config, load_puzzle};
use lazor_solver::{
    PlacementSearch, SearchOutcome, SolutionReport, SolverError, render_board, render_paths,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("puzzle: {0}")]
    Puzzle(#[from] PuzzleError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Solve a Lazor puzzle by random block placement.
#[derive(Debug, Parser)]
#[command(name = "lazor-solve", version, about, long_about = None)]
struct Args {
    /// Puzzle file in `.bff` format.
    #[arg(value_name = "PUZZLE.bff")]
    puzzle: PathBuf,

    /// Solver settings (`.toml` or `.json`).
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> Result<bool, CliError> {
    let puzzle = load_puzzle(&args.puzzle)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SolverConfig::default(),
    };

    let mut search = PlacementSearch::new(&puzzle, &config);
    let outcome = search.run()?;

    if args.json {
        println!("{}", SolutionReport::new(&puzzle, &outcome, search.seed()).to_json()?);
        return Ok(outcome.is_solved());
    }

    match &outcome {
        SearchOutcome::Solved(solution) => {
            println!("solved in {} attempts (seed {})", solution.attempts, search.seed());
            println!();
            println!("{}", render_board(&solution.board));
            println!();
            println!(
                "{}",
                render_paths(&solution.board, &solution.beams, &puzzle.targets)
            );
        }
        SearchOutcome::Exhausted { attempts } => {
            println!(
                "no solution found in {attempts} attempts (seed {}); try another seed or a larger max_attempts",
                search.seed()
            );
        }
    }
    Ok(outcome.is_solved())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
