//! Board cell states.

use ninefold_core::{Digit, DigitSet};

/// The state of a single board cell during play.
///
/// Given cells come from the puzzle and never change; everything else is
/// player input. A cell holding pencil-mark notes reverts to [`Empty`] when
/// its last note is removed.
///
/// [`Empty`]: CellState::Empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum CellState {
    /// A fixed cell from the generated puzzle.
    Given(Digit),
    /// A digit entered by the player.
    Filled(Digit),
    /// Pencil-mark candidate notes entered by the player (never empty).
    Notes(DigitSet),
    /// No digit and no notes.
    #[default]
    Empty,
}

impl CellState {
    /// Returns the digit if the cell holds one (given or player-filled).
    #[must_use]
    pub fn as_digit(&self) -> Option<Digit> {
        match self {
            CellState::Given(digit) | CellState::Filled(digit) => Some(*digit),
            CellState::Notes(_) | CellState::Empty => None,
        }
    }

    /// Returns the notes if the cell holds any.
    #[must_use]
    pub fn notes(&self) -> Option<DigitSet> {
        match self {
            CellState::Notes(notes) => Some(*notes),
            _ => None,
        }
    }
}
