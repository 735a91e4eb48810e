//! A plain 9×9 grid of optional digits.

use std::{
    fmt::{self, Display},
    ops::Index,
    str::FromStr,
};

use derive_more::{Display as DeriveDisplay, Error};

use crate::{digit::Digit, position::Position};

/// A 9×9 grid where each cell holds an optional digit.
///
/// This is the exchange format between the generator, the solver, and the
/// game layer: puzzles, solutions, and player-filled overlays are all
/// `DigitGrid`s.
///
/// # Text format
///
/// [`FromStr`] accepts exactly 81 cell characters in row-major order, where
/// `1`-`9` are digits and `.`, `_`, or `0` mark empty cells; all whitespace
/// is ignored. [`Display`] renders the 81-character single-line form using
/// `.` for empty cells, which round-trips through [`FromStr`].
///
/// # Examples
///
/// ```
/// use ninefold_core::{Digit, DigitGrid, Position};
///
/// let grid: DigitGrid = "
///     53_ _7_ ___
///     6__ 195 ___
///     _98 ___ _6_
///     8__ _6_ __3
///     4__ 8_3 __1
///     7__ _2_ __6
///     _6_ ___ 28_
///     ___ 419 __5
///     ___ _8_ _79
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(grid[Position::new(0, 0)], Some(Digit::D5));
/// assert_eq!(grid[Position::new(2, 0)], None);
/// assert_eq!(grid.count_filled(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitGrid {
    cells: [Option<Digit>; 81],
}

impl Default for DigitGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitGrid {
    /// Creates an empty grid.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: [None; 81] }
    }

    /// Returns the digit at a position, if any.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Digit> {
        self.cells[usize::from(pos.index())]
    }

    /// Sets or clears the digit at a position.
    pub const fn set(&mut self, pos: Position, digit: Option<Digit>) {
        self.cells[pos.index() as usize] = digit;
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns `true` if no cell is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count_filled() == 0
    }
}

impl Index<Position> for DigitGrid {
    type Output = Option<Digit>;

    fn index(&self, pos: Position) -> &Option<Digit> {
        &self.cells[usize::from(pos.index())]
    }
}

/// Error parsing a [`DigitGrid`] from text.
#[derive(Debug, Clone, PartialEq, Eq, DeriveDisplay, Error)]
pub enum ParseGridError {
    /// A character that is neither a digit, an empty-cell marker, nor
    /// whitespace.
    #[display("invalid character in grid: {_0:?}")]
    InvalidChar(#[error(not(source))] char),
    /// The input did not contain exactly 81 cell characters.
    #[display("expected 81 cells, found {_0}")]
    WrongCellCount(#[error(not(source))] usize),
}

impl FromStr for DigitGrid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, ParseGridError> {
        let mut grid = Self::new();
        let mut count = 0usize;
        for c in s.chars() {
            if c.is_whitespace() {
                continue;
            }
            let digit = match c {
                '.' | '_' | '0' => None,
                '1'..='9' => Digit::try_from_value(c as u8 - b'0'),
                _ => return Err(ParseGridError::InvalidChar(c)),
            };
            if count >= 81 {
                return Err(ParseGridError::WrongCellCount(count + 1));
            }
            #[expect(clippy::cast_possible_truncation)]
            grid.set(Position::from_index(count as u8), digit);
            count += 1;
        }
        if count != 81 {
            return Err(ParseGridError::WrongCellCount(count));
        }
        Ok(grid)
    }
}

impl Display for DigitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            match cell {
                Some(digit) => write!(f, "{digit}")?,
                None => write!(f, ".")?,
            }
        }
        Ok(())
    }
}
