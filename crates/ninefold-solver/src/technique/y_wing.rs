use std::ops::ControlFlow;

use ninefold_core::{CandidateGrid, CellSet, Digit, DigitSet, Position};

use super::{BoxedTechnique, Deduction, DeductionAction, Technique, Tier};
use crate::SolverError;

const NAME: &str = "Y-Wing";

/// A technique that removes candidates using a Y-Wing (XY-Wing) pattern.
///
/// A "Y-Wing" occurs when a pivot cell has two candidates (A/B) and two
/// wing cells that each see the pivot carry candidates (A/C) and (B/C).
/// Whichever way the pivot resolves, one wing becomes C, so C can be
/// eliminated from every cell that sees both wings.
#[derive(Debug, Default, Clone, Copy)]
pub struct YWing {}

impl YWing {
    /// Creates a new `YWing` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn scan<F>(grid: &mut CandidateGrid, mut on_condition: F) -> Option<Deduction>
    where
        F: FnMut(&CandidateGrid, (Position, Position, Position), (Digit, Digit, Digit)) -> ControlFlow<Deduction>,
    {
        let pair_cells = grid.bivalue_cells();
        for pivot in pair_cells {
            let pivot_peers = pivot.house_peers() & pair_cells;
            let pivot_digits = grid.candidates_at(pivot);
            let Some((d1, d2)) = pivot_digits.as_double() else {
                // Earlier eliminations in this pass may have reshaped the
                // pivot's candidates.
                continue;
            };
            for wing1 in pivot_peers & grid.digit_positions(d1) {
                let wing1_digits = grid.candidates_at(wing1);
                let Some(d3) = wing1_digits.difference(pivot_digits).as_single() else {
                    continue;
                };
                for wing2 in pivot_peers & grid.digit_positions(d2) & grid.digit_positions(d3) {
                    let eliminations =
                        wing1.house_peers() & wing2.house_peers() & grid.digit_positions(d3);
                    if grid.remove_candidate_with_mask(eliminations, d3)
                        && let ControlFlow::Break(deduction) =
                            on_condition(grid, (pivot, wing1, wing2), (d1, d2, d3))
                    {
                        return Some(deduction);
                    }
                }
            }
        }
        None
    }
}

impl Technique for YWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn tier(&self) -> Tier {
        Tier::Expert
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_deduction(&self, grid: &CandidateGrid) -> Result<Option<Deduction>, SolverError> {
        let before = grid.clone();
        let mut scratch = grid.clone();
        let deduction = Self::scan(&mut scratch, |after, (pivot, wing1, wing2), (_, _, d3)| {
            let removed = before
                .digit_positions(d3)
                .difference(after.digit_positions(d3));
            ControlFlow::Break(Deduction::new(
                NAME,
                Tier::Expert,
                CellSet::from_iter([pivot, wing1, wing2]),
                vec![DeductionAction::Elimination {
                    positions: removed,
                    digits: DigitSet::from_elem(d3),
                }],
            ))
        });
        Ok(deduction)
    }

    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        Self::scan(grid, |_, _, _| {
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

    fn restrict(grid: &mut CandidateGrid, pos: Position, keep: [Digit; 2]) {
        for digit in Digit::ALL {
            if !keep.contains(&digit) {
                grid.remove_candidate(pos, digit);
            }
        }
    }

    #[test]
    fn test_eliminates_y_wing_candidates() {
        let mut grid = CandidateGrid::new();
        let pivot = Position::new(1, 1);
        let wing1 = Position::new(1, 5);
        let wing2 = Position::new(5, 1);

        restrict(&mut grid, pivot, [Digit::D1, Digit::D2]);
        restrict(&mut grid, wing1, [Digit::D1, Digit::D3]);
        restrict(&mut grid, wing2, [Digit::D2, Digit::D3]);

        TechniqueTester::new(grid)
            .apply_once(&YWing::new())
            .assert_removed_includes(Position::new(5, 5), [Digit::D3]);
    }

    #[test]
    fn test_only_common_peers_are_eliminated() {
        let mut grid = CandidateGrid::new();
        let pivot = Position::new(1, 1);
        let wing1 = Position::new(1, 5);
        let wing2 = Position::new(5, 1);

        restrict(&mut grid, pivot, [Digit::D1, Digit::D2]);
        restrict(&mut grid, wing1, [Digit::D1, Digit::D3]);
        restrict(&mut grid, wing2, [Digit::D2, Digit::D3]);

        TechniqueTester::new(grid)
            .apply_once(&YWing::new())
            .assert_removed_includes(Position::new(5, 5), [Digit::D3])
            .assert_no_change(Position::new(7, 1));
    }

    #[test]
    fn test_no_change_when_no_y_wing() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&YWing::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }
}
