use std::ops::ControlFlow;

use ninefold_core::{CandidateGrid, Digit, DigitSet, House, Position};

use super::{BoxedTechnique, Deduction, DeductionAction, Technique, Tier};
use crate::SolverError;

const NAME: &str = "Locked Candidates";

/// A technique that removes candidates using locked candidates.
///
/// - **Pointing**: within a box, all candidates of a digit lie on a single
///   row or column, so the digit can be removed from the rest of that line
///   outside the box.
/// - **Claiming**: within a row or column, all candidates of a digit lie in
///   a single box, so the digit can be removed from the rest of that box.
///
/// This covers the "pointing pair" (and triple) family.
#[derive(Debug, Default, Clone, Copy)]
pub struct LockedCandidates {}

impl LockedCandidates {
    /// Creates a new `LockedCandidates` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn scan<F>(grid: &mut CandidateGrid, mut on_condition: F) -> Option<Deduction>
    where
        F: FnMut(&CandidateGrid, Digit, House, House) -> ControlFlow<Deduction>,
    {
        for box_index in 0..9 {
            let box_ = House::Box { index: box_index };
            let origin = Position::box_origin(box_index);
            let lines = [
                House::Row { y: origin.y() },
                House::Row { y: origin.y() + 1 },
                House::Row { y: origin.y() + 2 },
                House::Column { x: origin.x() },
                House::Column { x: origin.x() + 1 },
                House::Column { x: origin.x() + 2 },
            ];
            for line in lines {
                let intersection = box_.positions() & line.positions();
                let rest_in_box = box_.positions().difference(intersection);
                let rest_in_line = line.positions().difference(intersection);
                for digit in Digit::ALL {
                    let digit_positions = grid.digit_positions(digit);
                    if (digit_positions & intersection).is_empty() {
                        continue;
                    }
                    // Skip decided intersections: propagation owns those.
                    if (intersection.difference(grid.decided_cells())).is_empty() {
                        continue;
                    }

                    if (digit_positions & rest_in_box).is_empty() {
                        // Pointing: confined to the line within the box.
                        let eliminations = digit_positions & rest_in_line;
                        if grid.remove_candidate_with_mask(eliminations, digit)
                            && let ControlFlow::Break(deduction) =
                                on_condition(grid, digit, box_, line)
                        {
                            return Some(deduction);
                        }
                    } else if (digit_positions & rest_in_line).is_empty() {
                        // Claiming: confined to the box within the line.
                        let eliminations = digit_positions & rest_in_box;
                        if grid.remove_candidate_with_mask(eliminations, digit)
                            && let ControlFlow::Break(deduction) =
                                on_condition(grid, digit, box_, line)
                        {
                            return Some(deduction);
                        }
                    }
                }
            }
        }
        None
    }
}

impl Technique for LockedCandidates {
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
        let deduction = Self::scan(&mut scratch, |after, digit, box_, line| {
            let removed = before
                .digit_positions(digit)
                .difference(after.digit_positions(digit));
            ControlFlow::Break(Deduction::new(
                NAME,
                Tier::Intermediate,
                box_.positions() | line.positions(),
                vec![DeductionAction::Elimination {
                    positions: removed,
                    digits: DigitSet::from_elem(digit),
                }],
            ))
        });
        Ok(deduction)
    }

    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        Self::scan(grid, |_, _, _, _| {
            changed = true;
            ControlFlow::Continue(())
        });
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_pointing_eliminates_from_row() {
        // Box 0: confine D5 to row 0 inside the box.
        let mut grid = CandidateGrid::new();
        for pos in Position::BOXES[0] {
            if pos.y() != 0 {
                grid.remove_candidate(pos, Digit::D5);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&LockedCandidates::new())
            .assert_removed_includes(Position::new(3, 0), [Digit::D5])
            .assert_removed_includes(Position::new(8, 0), [Digit::D5]);
    }

    #[test]
    fn test_claiming_eliminates_from_box() {
        // Row 0: confine D7 to the box-0 cells of the row.
        let mut grid = CandidateGrid::new();
        for pos in Position::ROWS[0] {
            if pos.x() > 2 {
                grid.remove_candidate(pos, Digit::D7);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&LockedCandidates::new())
            .assert_removed_includes(Position::new(0, 1), [Digit::D7])
            .assert_removed_includes(Position::new(2, 2), [Digit::D7]);
    }

    #[test]
    fn test_no_change_when_no_locked_candidates() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&LockedCandidates::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }
}
