//! Puzzle generation for the ninefold Sudoku engine.
//!
//! Generation is seeded and reproducible: a [`PuzzleSeed`] determines the
//! whole run, and every attempt inside a run derives its own random stream
//! from the seed, so a single 32-byte value pins down the resulting puzzle.
//!
//! The pipeline per attempt:
//!
//! 1. Build a complete solution grid (random diagonal boxes, then exhaustive
//!    search fills the rest).
//! 2. Carve givens away in random order, keeping a removal only while the
//!    puzzle still has exactly one solution.
//! 3. For difficulties below expert, verify the carved puzzle is solvable
//!    with the technique tiers that difficulty allows; otherwise retry with
//!    the next derived stream.
//!
//! If no attempt lands in the requested band, the best uniquely-solvable
//! attempt is returned instead of failing — a session always gets a puzzle.
//!
//! Long-running generation belongs off the interactive thread; see
//! [`spawn_generation`] for the cancellable background variant.

pub use self::{
    background::{GenerationHandle, spawn_generation},
    difficulty::{Difficulty, DifficultyProfile, ParseDifficultyError},
    generator::{GenerateError, GeneratedPuzzle, PuzzleGenerator},
    seed::{ParseSeedError, PuzzleSeed},
};

mod background;
mod difficulty;
mod generator;
mod seed;
