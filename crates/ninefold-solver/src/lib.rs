//! Solving engines for the ninefold Sudoku engine.
//!
//! Two complementary solvers live here:
//!
//! - [`TechniqueSolver`] applies human solving techniques (naked singles
//!   through swordfish) in a fixed easiest-first order. It powers hints and
//!   difficulty classification: the first technique that makes progress is,
//!   by construction, the *minimum sufficient* technique for the position.
//! - [`Backtracker`] is an exhaustive stack-based search used where logic
//!   alone is not enough: solvability checks, and the uniqueness test at
//!   the heart of puzzle generation (counting up to two solutions and
//!   aborting early).
//!
//! # Examples
//!
//! ```
//! use ninefold_core::CandidateGrid;
//! use ninefold_solver::TechniqueSolver;
//!
//! let solver = TechniqueSolver::with_all_techniques();
//! let mut grid = CandidateGrid::new();
//! let (solved, stats) = solver.solve(&mut grid)?;
//! assert!(!solved); // an unconstrained grid offers no deductions
//! assert_eq!(stats.total_steps(), 0);
//! # Ok::<(), ninefold_solver::SolverError>(())
//! ```

pub use self::{backtrack::*, error::*, technique_solver::*};

pub mod backtrack;
mod error;
pub mod technique;
mod technique_solver;

#[cfg(test)]
mod testing;
