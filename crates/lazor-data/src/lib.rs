//! Lazor Data -- puzzle files and solver configuration.
//!
//! Puzzles are read from the line-oriented `.bff` format; solver settings
//! from TOML or JSON, with the format chosen by file extension.

pub mod config;
pub mod puzzle;

pub use config::{ConfigError, Format, SolverConfig, detect_format, load_config};
pub use puzzle::{BlockInventory, Puzzle, PuzzleError, load_puzzle, parse_puzzle};
