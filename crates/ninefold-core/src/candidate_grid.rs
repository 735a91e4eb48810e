//! Candidate bitboards for sudoku solving.

use derive_more::{Display, Error};

use crate::{
    cell_set::{CellSet, HouseMask},
    digit::Digit,
    digit_grid::DigitGrid,
    digit_set::DigitSet,
    house::House,
    position::Position,
};

/// Per-cell classification of a [`CandidateGrid`] by candidate count.
///
/// The four sets partition the board: every position is in exactly one of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateClasses {
    /// Positions with zero candidates (contradictions).
    pub none: CellSet,
    /// Positions with exactly one candidate (decided cells).
    pub single: CellSet,
    /// Positions with exactly two candidates (bivalue cells).
    pub pair: CellSet,
    /// Positions with three or more candidates.
    pub many: CellSet,
}

/// A contradiction detected in a [`CandidateGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ConsistencyError {
    /// Some cell has no remaining candidate.
    #[display("a cell has no remaining candidates")]
    NoCandidates,
    /// Two decided cells in one house hold the same digit.
    #[display("a digit appears twice in one house")]
    DuplicateDigit,
    /// A candidate pattern requires more placements of a digit than its
    /// houses allow.
    #[display("candidate pattern violates house constraints")]
    CandidateConstraintViolation,
}

/// Candidate bitboard for sudoku solving.
///
/// Tracks, for each digit 1-9, the set of positions where that digit can
/// still be placed. A *decided* cell is one whose candidate set has shrunk
/// to a single digit; a fresh grid has every candidate open everywhere.
///
/// # Examples
///
/// ```
/// use ninefold_core::{CandidateGrid, Digit, Position};
///
/// let mut grid = CandidateGrid::new();
/// let pos = Position::new(0, 0);
/// assert_eq!(grid.candidates_at(pos).len(), 9);
///
/// grid.place(pos, Digit::D1);
/// assert_eq!(grid.candidates_at(pos).len(), 1);
///
/// // D1 was eliminated from the rest of the row.
/// assert_eq!(grid.row_mask(0, Digit::D1).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGrid {
    /// `digits[d]` holds the positions where digit `d + 1` can be placed.
    digits: [CellSet; 9],
}

impl Default for CandidateGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&DigitGrid> for CandidateGrid {
    fn from(grid: &DigitGrid) -> Self {
        let mut candidates = Self::new();
        for pos in Position::ALL {
            if let Some(digit) = grid[pos] {
                candidates.place(pos, digit);
            }
        }
        candidates
    }
}

impl From<DigitGrid> for CandidateGrid {
    fn from(grid: DigitGrid) -> Self {
        Self::from(&grid)
    }
}

impl CandidateGrid {
    /// Creates a grid with all candidates available at every position.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            digits: [CellSet::FULL; 9],
        }
    }

    fn digit_positions_mut(&mut self, digit: Digit) -> &mut CellSet {
        &mut self.digits[usize::from(digit.value() - 1)]
    }

    /// Returns the set of positions where the digit can be placed.
    #[must_use]
    pub fn digit_positions(&self, digit: Digit) -> CellSet {
        self.digits[usize::from(digit.value() - 1)]
    }

    /// Returns the set of candidate digits at a position.
    #[must_use]
    pub fn candidates_at(&self, pos: Position) -> DigitSet {
        let mut candidates = DigitSet::new();
        for digit in Digit::ALL {
            if self.digit_positions(digit).contains(pos) {
                candidates.insert(digit);
            }
        }
        candidates
    }

    /// Returns `true` if placing the digit would change the grid.
    #[must_use]
    pub fn would_place_change(&self, pos: Position, digit: Digit) -> bool {
        if !self.digit_positions(digit).contains(pos) {
            // Placing a non-candidate digit forces the cell to empty, which
            // is a change (into a contradiction).
            return true;
        }
        self.candidates_at(pos).len() > 1 || !(self.digit_positions(digit) & pos.house_peers()).is_empty()
    }

    /// Places a digit at a position and propagates the eliminations.
    ///
    /// All other candidates at the position are removed, and the digit is
    /// removed from every peer in the same row, column, and box. Returns
    /// `true` if the grid changed.
    pub fn place(&mut self, pos: Position, digit: Digit) -> bool {
        let mut changed = false;
        for other in Digit::ALL {
            if other != digit {
                changed |= self.digit_positions_mut(other).contains(pos);
                self.digit_positions_mut(other).remove(pos);
            }
        }
        let peers = pos.house_peers();
        let positions = self.digit_positions_mut(digit);
        changed |= !(*positions & peers).is_empty();
        *positions = positions.difference(peers);
        changed
    }

    /// Removes a candidate digit at a position. Returns `true` if it was
    /// present.
    pub fn remove_candidate(&mut self, pos: Position, digit: Digit) -> bool {
        let positions = self.digit_positions_mut(digit);
        let present = positions.contains(pos);
        positions.remove(pos);
        present
    }

    /// Removes a candidate digit from every position in the mask.
    ///
    /// Returns `true` if any candidate was removed.
    pub fn remove_candidate_with_mask(&mut self, mask: CellSet, digit: Digit) -> bool {
        let positions = self.digit_positions_mut(digit);
        let changed = !(*positions & mask).is_empty();
        *positions = positions.difference(mask);
        changed
    }

    /// Returns `true` if [`remove_candidate_with_mask`] would change the
    /// grid.
    ///
    /// [`remove_candidate_with_mask`]: Self::remove_candidate_with_mask
    #[must_use]
    pub fn would_remove_candidate_with_mask_change(&self, mask: CellSet, digit: Digit) -> bool {
        !(self.digit_positions(digit) & mask).is_empty()
    }

    /// Returns the candidate mask for the digit within a row.
    ///
    /// Bit `i` corresponds to column `i`. A single-bit result is a Hidden
    /// Single.
    #[must_use]
    pub fn row_mask(&self, y: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Row { y }, digit)
    }

    /// Returns the candidate mask for the digit within a column.
    ///
    /// Bit `i` corresponds to row `i`.
    #[must_use]
    pub fn col_mask(&self, x: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Column { x }, digit)
    }

    /// Returns the candidate mask for the digit within a box.
    ///
    /// Bit `i` corresponds to the box's `i`-th cell in row-major order.
    #[must_use]
    pub fn box_mask(&self, box_index: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Box { index: box_index }, digit)
    }

    /// Returns the candidate mask for the digit within an arbitrary house.
    #[must_use]
    pub fn house_mask(&self, house: House, digit: Digit) -> HouseMask {
        self.digit_positions(digit).house_mask(house)
    }

    /// Classifies every position by its candidate count.
    ///
    /// A single pass over the nine digit bitboards maintains the running
    /// "exactly zero / one / two / more" partition with bit operations.
    #[must_use]
    pub fn classify_cells(&self) -> CandidateClasses {
        let mut none = CellSet::FULL;
        let mut single = CellSet::EMPTY;
        let mut pair = CellSet::EMPTY;
        let mut many = CellSet::EMPTY;
        for positions in &self.digits {
            let p = *positions;
            many |= pair & p;
            pair = pair.difference(p) | (single & p);
            single = single.difference(p) | (none & p);
            none = none.difference(p);
        }
        CandidateClasses {
            none,
            single,
            pair,
            many,
        }
    }

    /// Returns all positions with exactly one candidate.
    #[must_use]
    pub fn decided_cells(&self) -> CellSet {
        self.classify_cells().single
    }

    /// Returns all positions with exactly two candidates.
    #[must_use]
    pub fn bivalue_cells(&self) -> CellSet {
        self.classify_cells().pair
    }

    /// Checks that the grid contains no contradiction.
    ///
    /// A grid is consistent when every position has at least one candidate
    /// and no two decided cells in a house hold the same digit. Unlike
    /// [`is_solved`](Self::is_solved) this does not require completeness,
    /// so it can run mid-solve to catch contradictions early.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConsistencyError`] detected.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let classes = self.classify_cells();
        if !classes.none.is_empty() {
            return Err(ConsistencyError::NoCandidates);
        }
        self.check_decided_unique(classes.single)
    }

    /// Returns whether the grid is completely solved.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsistencyError`] if the grid contains a contradiction.
    pub fn is_solved(&self) -> Result<bool, ConsistencyError> {
        let classes = self.classify_cells();
        if !classes.none.is_empty() {
            return Err(ConsistencyError::NoCandidates);
        }
        self.check_decided_unique(classes.single)?;
        Ok(classes.single.len() == 81)
    }

    fn check_decided_unique(&self, decided: CellSet) -> Result<(), ConsistencyError> {
        for digit in Digit::ALL {
            let decided_digit = self.digit_positions(digit) & decided;
            for pos in decided_digit {
                if !(decided_digit & pos.house_peers()).is_empty() {
                    return Err(ConsistencyError::DuplicateDigit);
                }
            }
        }
        Ok(())
    }

    /// Returns a digit grid containing only the decided cells.
    #[must_use]
    pub fn to_digit_grid(&self) -> DigitGrid {
        let mut grid = DigitGrid::new();
        let decided = self.decided_cells();
        for digit in Digit::ALL {
            for pos in self.digit_positions(digit) & decided {
                grid.set(pos, Some(digit));
            }
        }
        grid
    }
}
