use std::ops::ControlFlow;

use ninefold_core::{CandidateGrid, CellSet, ConsistencyError, Digit, DigitSet, Position};
use tinyvec::ArrayVec;

use super::{BoxedTechnique, Deduction, DeductionAction, Technique, Tier};
use crate::SolverError;

const NAME: &str = "X-Wing";

/// A technique that removes candidates using an X-Wing pattern.
///
/// An "X-Wing" occurs when a digit appears exactly twice in each of two rows
/// (or columns) and those candidates align in the same two columns (or
/// rows). The digit can then be eliminated from the other cells of the two
/// crossing lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct XWing {}

impl XWing {
    /// Creates a new `XWing` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn scan<F>(grid: &mut CandidateGrid, mut on_condition: F) -> Result<Option<Deduction>, SolverError>
    where
        F: FnMut(&CandidateGrid, Digit, (u8, u8), (u8, u8)) -> ControlFlow<Deduction>,
    {
        for digit in Digit::ALL {
            // Row-based: two rows whose candidates share the same column pair.
            let mut rows: ArrayVec<[(u8, (u8, u8)); 9]> = ArrayVec::new();
            for y in 0..9 {
                if let Some(xs) = grid.row_mask(y, digit).as_double() {
                    rows.push((y, xs));
                }
            }
            for (i, &(y1, xs1 @ (x1, x2))) in rows.iter().enumerate() {
                for &(y2, xs2) in &rows[i + 1..] {
                    if xs1 != xs2 {
                        continue;
                    }
                    // Four corners in one box would demand two placements
                    // where the box allows one.
                    if y1 / 3 == y2 / 3 && x1 / 3 == x2 / 3 {
                        return Err(ConsistencyError::CandidateConstraintViolation.into());
                    }
                    let mut eliminations = CellSet::COLUMN_POSITIONS[usize::from(x1)]
                        | CellSet::COLUMN_POSITIONS[usize::from(x2)];
                    eliminations &= !(CellSet::ROW_POSITIONS[usize::from(y1)]
                        | CellSet::ROW_POSITIONS[usize::from(y2)]);
                    if grid.remove_candidate_with_mask(eliminations, digit)
                        && let ControlFlow::Break(deduction) =
                            on_condition(grid, digit, (x1, x2), (y1, y2))
                    {
                        return Ok(Some(deduction));
                    }
                }
            }

            // Column-based: the transposed pattern.
            let mut cols: ArrayVec<[(u8, (u8, u8)); 9]> = ArrayVec::new();
            for x in 0..9 {
                if let Some(ys) = grid.col_mask(x, digit).as_double() {
                    cols.push((x, ys));
                }
            }
            for (i, &(x1, ys1 @ (y1, y2))) in cols.iter().enumerate() {
                for &(x2, ys2) in &cols[i + 1..] {
                    if ys1 != ys2 {
                        continue;
                    }
                    if x1 / 3 == x2 / 3 && y1 / 3 == y2 / 3 {
                        return Err(ConsistencyError::CandidateConstraintViolation.into());
                    }
                    let mut eliminations = CellSet::ROW_POSITIONS[usize::from(y1)]
                        | CellSet::ROW_POSITIONS[usize::from(y2)];
                    eliminations &= !(CellSet::COLUMN_POSITIONS[usize::from(x1)]
                        | CellSet::COLUMN_POSITIONS[usize::from(x2)]);
                    if grid.remove_candidate_with_mask(eliminations, digit)
                        && let ControlFlow::Break(deduction) =
                            on_condition(grid, digit, (x1, x2), (y1, y2))
                    {
                        return Ok(Some(deduction));
                    }
                }
            }
        }

        Ok(None)
    }

    pub(crate) fn corner_deduction(
        name: &'static str,
        tier: Tier,
        before: &CandidateGrid,
        after: &CandidateGrid,
        digit: Digit,
        corners: CellSet,
    ) -> Deduction {
        let removed = before
            .digit_positions(digit)
            .difference(after.digit_positions(digit));
        Deduction::new(
            name,
            tier,
            corners,
            vec![DeductionAction::Elimination {
                positions: removed,
                digits: DigitSet::from_elem(digit),
            }],
        )
    }
}

impl Technique for XWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn tier(&self) -> Tier {
        Tier::Advanced
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_deduction(&self, grid: &CandidateGrid) -> Result<Option<Deduction>, SolverError> {
        let before = grid.clone();
        let mut scratch = grid.clone();
        Self::scan(&mut scratch, |after, digit, (x1, x2), (y1, y2)| {
            let corners = CellSet::from_iter([
                Position::new(x1, y1),
                Position::new(x2, y1),
                Position::new(x1, y2),
                Position::new(x2, y2),
            ]);
            ControlFlow::Break(Self::corner_deduction(
                NAME,
                Tier::Advanced,
                &before,
                after,
                digit,
                corners,
            ))
        })
    }

    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        Self::scan(grid, |_, _, _, _| {
            changed = true;
            ControlFlow::Continue(())
        })?;
        Ok(changed)
    }
}
