use std::ops::ControlFlow;

use ninefold_core::{CandidateGrid, CellSet, ConsistencyError, House, Position};
use tinyvec::ArrayVec;

use super::{BoxedTechnique, Deduction, DeductionAction, Technique, Tier};
use crate::SolverError;

const NAME: &str = "Naked Pair";

/// A technique that removes candidates using a naked pair within a house.
///
/// A "naked pair" occurs when two cells in a row, column, or box carry the
/// same two-candidate set. Those two digits can be eliminated from every
/// other cell in that house.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedPair {}

impl NakedPair {
    /// Creates a new `NakedPair` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn scan<F>(grid: &mut CandidateGrid, mut on_condition: F) -> Result<Option<Deduction>, SolverError>
    where
        F: FnMut(&CandidateGrid, [Position; 2], CellSet) -> ControlFlow<Deduction>,
    {
        let pair_cells = grid.bivalue_cells();
        if pair_cells.len() < 2 {
            return Ok(None);
        }

        for house in House::ALL {
            let pair_in_house = pair_cells & house.positions();
            if pair_in_house.len() < 2 {
                continue;
            }
            let cells: ArrayVec<[u8; 9]> = pair_in_house.into_iter().map(Position::index).collect();
            for (i, &first) in cells.iter().enumerate() {
                let pos1 = Position::from_index(first);
                let pair_digits = grid.candidates_at(pos1);
                let mut matching: ArrayVec<[u8; 9]> = ArrayVec::new();
                for &second in &cells[i + 1..] {
                    if grid.candidates_at(Position::from_index(second)) == pair_digits {
                        matching.push(second);
                    }
                }
                // Three cells restricted to the same two digits cannot all
                // be satisfied within one house.
                if matching.len() > 1 {
                    return Err(ConsistencyError::CandidateConstraintViolation.into());
                }
                let Some(&second) = matching.first() else {
                    continue;
                };
                let pos2 = Position::from_index(second);

                let mut eliminate_positions = house.positions();
                eliminate_positions.remove(pos1);
                eliminate_positions.remove(pos2);

                let mut changed = false;
                for digit in pair_digits {
                    changed |= grid.remove_candidate_with_mask(eliminate_positions, digit);
                }
                if changed && let ControlFlow::Break(deduction) = on_condition(grid, [pos1, pos2], eliminate_positions) {
                    return Ok(Some(deduction));
                }
            }
        }
        Ok(None)
    }
}

impl Technique for NakedPair {
    fn name(&self) -> &'static str {
        NAME
    }

    fn tier(&self) -> Tier {
        Tier::Intermediate
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_deduction(&self, grid: &CandidateGrid) -> Result<Option<Deduction>, SolverError> {
        let before = grid.clone();
        let mut scratch = grid.clone();
        Self::scan(&mut scratch, |after, [pos1, pos2], eliminated_in| {
            let pair_digits = before.candidates_at(pos1);
            let mut removed = CellSet::EMPTY;
            for pos in eliminated_in {
                if before.candidates_at(pos) != after.candidates_at(pos) {
                    removed.insert(pos);
                }
            }
            ControlFlow::Break(Deduction::new(
                NAME,
                Tier::Intermediate,
                CellSet::from_iter([pos1, pos2]),
                vec![DeductionAction::Elimination {
                    positions: removed,
                    digits: pair_digits,
                }],
            ))
        })
    }

    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        Self::scan(grid, |_, _, _| {
            changed = true;
            ControlFlow::Continue(())
        })?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use ninefold_core::Digit;

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_eliminates_pair_candidates_in_row() {
        let mut grid = CandidateGrid::new();
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 0);

        for digit in Digit::ALL {
            if digit != Digit::D1 && digit != Digit::D2 {
                grid.remove_candidate(pos1, digit);
                grid.remove_candidate(pos2, digit);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&NakedPair::new())
            .assert_removed_includes(Position::new(4, 0), [Digit::D1, Digit::D2]);
    }

    #[test]
    fn test_no_change_when_no_naked_pairs() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&NakedPair::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }

    #[test]
    fn test_no_change_when_pair_has_no_eliminations() {
        let mut grid = CandidateGrid::new();
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(1, 0);

        for digit in Digit::ALL {
            if digit != Digit::D1 && digit != Digit::D2 {
                grid.remove_candidate(pos1, digit);
                grid.remove_candidate(pos2, digit);
            }
        }
        for pos in Position::ROWS[0] {
            if pos != pos1 && pos != pos2 {
                grid.remove_candidate(pos, Digit::D1);
                grid.remove_candidate(pos, Digit::D2);
            }
        }
        for pos in Position::BOXES[0] {
            if pos != pos1 && pos != pos2 {
                grid.remove_candidate(pos, Digit::D1);
                grid.remove_candidate(pos, Digit::D2);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&NakedPair::new())
            .assert_no_change(Position::new(2, 0))
            .assert_no_change(Position::new(0, 1));
    }

    #[test]
    fn test_inconsistent_when_three_cells_share_pair() {
        let mut grid = CandidateGrid::new();
        for pos in [
            Position::new(0, 0),
            Position::new(3, 0),
            Position::new(6, 0),
        ] {
            for digit in Digit::ALL {
                if digit != Digit::D1 && digit != Digit::D2 {
                    grid.remove_candidate(pos, digit);
                }
            }
        }

        let result = NakedPair::new().apply(&mut grid);
        assert_eq!(
            result,
            Err(SolverError::Inconsistent(
                ConsistencyError::CandidateConstraintViolation
            ))
        );
    }
}
