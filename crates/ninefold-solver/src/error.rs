use derive_more::{Display, Error, From};
use ninefold_core::ConsistencyError;

/// Error produced by technique-based solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum SolverError {
    /// The grid contains a contradiction.
    #[display("grid is inconsistent: {_0}")]
    Inconsistent(ConsistencyError),
}
