//! Sudoku houses: rows, columns, and 3×3 boxes.

use std::fmt::{self, Display};

use crate::{cell_set::CellSet, position::Position};

/// A Sudoku house (row, column, or 3×3 box).
///
/// Houses are the units over which the uniqueness constraint holds: each
/// digit appears exactly once per house in a solved grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum House {
    /// A row identified by its y coordinate (0-8).
    Row {
        /// Row index (0-8).
        y: u8,
    },
    /// A column identified by its x coordinate (0-8).
    Column {
        /// Column index (0-8).
        x: u8,
    },
    /// A 3×3 box identified by its index (0-8, left to right, top to bottom).
    Box {
        /// Box index (0-8).
        index: u8,
    },
}

impl House {
    /// All 27 houses in row, column, box order.
    ///
    /// This ordering is part of the solver's determinism contract: scans
    /// that iterate [`House::ALL`] always visit rows first, then columns,
    /// then boxes, each in ascending index order.
    pub const ALL: [Self; 27] = {
        let mut all = [Self::Row { y: 0 }; 27];
        let mut i = 0;
        #[expect(clippy::cast_possible_truncation)]
        while i < 9 {
            all[i] = Self::Row { y: i as u8 };
            all[i + 9] = Self::Column { x: i as u8 };
            all[i + 18] = Self::Box { index: i as u8 };
            i += 1;
        }
        all
    };

    /// Converts a cell index within the house (0-8) into an absolute
    /// [`Position`].
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub fn position_from_cell_index(self, i: u8) -> Position {
        assert!(i < 9);
        match self {
            House::Row { y } => Position::new(i, y),
            House::Column { x } => Position::new(x, i),
            House::Box { index } => Position::from_box(index, i),
        }
    }

    /// Returns all positions contained in this house.
    #[must_use]
    pub fn positions(self) -> CellSet {
        match self {
            House::Row { y } => CellSet::ROW_POSITIONS[usize::from(y)],
            House::Column { x } => CellSet::COLUMN_POSITIONS[usize::from(x)],
            House::Box { index } => CellSet::BOX_POSITIONS[usize::from(index)],
        }
    }
}

impl Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            House::Row { y } => write!(f, "row {y}"),
            House::Column { x } => write!(f, "column {x}"),
            House::Box { index } => write!(f, "box {index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_order() {
        assert_eq!(House::ALL[0], House::Row { y: 0 });
        assert_eq!(House::ALL[9], House::Column { x: 0 });
        assert_eq!(House::ALL[18], House::Box { index: 0 });
        assert_eq!(House::ALL[26], House::Box { index: 8 });
    }

    #[test]
    fn test_positions_cover_house() {
        for house in House::ALL {
            let positions = house.positions();
            assert_eq!(positions.len(), 9, "{house}");
            for i in 0..9 {
                assert!(positions.contains(house.position_from_cell_index(i)));
            }
        }
    }
}
