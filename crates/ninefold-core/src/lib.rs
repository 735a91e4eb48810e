//! Core data structures for the ninefold Sudoku engine.
//!
//! This crate provides the fundamental, efficient data structures shared by
//! the solving, generation, and game-session components:
//!
//! - [`Digit`]: type-safe representation of the digits 1-9
//! - [`Position`] and [`House`]: board coordinates and row/column/box units
//! - [`DigitSet`] and [`HouseMask`]: 9-bit sets of digits and house cells
//! - [`CellSet`]: an 81-bit set of board positions
//! - [`DigitGrid`]: a plain 9×9 grid of optional digits
//! - [`CandidateGrid`]: per-digit candidate bitboards used by the solver
//!
//! # Examples
//!
//! ```
//! use ninefold_core::{CandidateGrid, Digit, Position};
//!
//! let mut grid = CandidateGrid::new();
//! grid.place(Position::new(4, 4), Digit::D5);
//!
//! // 5 is no longer a candidate elsewhere in the column.
//! assert!(!grid.candidates_at(Position::new(4, 5)).contains(Digit::D5));
//! ```

pub mod candidate_grid;
pub mod cell_set;
pub mod digit;
pub mod digit_grid;
pub mod digit_set;
pub mod house;
pub mod position;

pub use self::{
    candidate_grid::{CandidateClasses, CandidateGrid, ConsistencyError},
    cell_set::{CellSet, HouseMask},
    digit::Digit,
    digit_grid::{DigitGrid, ParseGridError},
    digit_set::DigitSet,
    house::House,
    position::Position,
};
