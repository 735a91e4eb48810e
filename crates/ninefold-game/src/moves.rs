//! The append-only move ledger.

use ninefold_core::{Digit, Position};

use crate::CellState;

/// One entry in the session's move ledger.
///
/// Every accepted board edit appends exactly one `Move`. The record carries
/// enough of the prior cell state for [`undo`](crate::GameSession::undo) to
/// be an exact inverse, and timestamps for analytics reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// The edited cell.
    pub position: Position,
    /// What changed.
    pub change: MoveChange,
    /// Caller-supplied timestamp (milliseconds since the Unix epoch).
    pub timestamp_ms: u64,
}

/// The change recorded by a [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveChange {
    /// A digit was entered (over empty, notes, or a previous digit).
    SetDigit {
        /// Cell state before the edit.
        previous: CellState,
        /// The entered digit.
        digit: Digit,
        /// Whether the digit matches the solution.
        correct: bool,
    },
    /// A player digit or the cell's notes were cleared.
    ClearCell {
        /// Cell state before the edit.
        previous: CellState,
    },
    /// A pencil-mark note was toggled.
    ToggleNote {
        /// The toggled digit.
        digit: Digit,
        /// `true` if the note was added, `false` if removed.
        added: bool,
    },
}

/// The immediate result of applying a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the board changed (re-entering the same digit does not).
    pub changed: bool,
    /// For digit entries: whether the digit matches the solution.
    pub correct: Option<bool>,
    /// Peer cells holding the same digit (rule conflicts), row-major.
    pub conflicts: Vec<Position>,
    /// Whether this move completed the puzzle.
    pub completed: bool,
}

impl MoveOutcome {
    pub(crate) fn unchanged() -> Self {
        Self {
            changed: false,
            correct: None,
            conflicts: Vec::new(),
            completed: false,
        }
    }
}
