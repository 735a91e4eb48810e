use std::ops::ControlFlow;

use ninefold_core::{CandidateGrid, CellSet, ConsistencyError, Digit, HouseMask};
use tinyvec::ArrayVec;

use super::{BoxedTechnique, Deduction, Technique, Tier, x_wing::XWing};
use crate::SolverError;

const NAME: &str = "Swordfish";

/// A technique that removes candidates using a Swordfish pattern.
///
/// A "Swordfish" is the three-line generalization of the X-Wing: a digit
/// whose candidates in three rows are confined to the same three columns
/// (or vice versa) must occupy exactly one cell per line, so the digit can
/// be eliminated from those columns everywhere outside the three rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct Swordfish {}

impl Swordfish {
    /// Creates a new `Swordfish` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn line_sets(base: bool) -> [CellSet; 9] {
        if base {
            CellSet::ROW_POSITIONS
        } else {
            CellSet::COLUMN_POSITIONS
        }
    }

    fn scan<F>(grid: &mut CandidateGrid, mut on_condition: F) -> Result<Option<Deduction>, SolverError>
    where
        F: FnMut(&CandidateGrid, Digit, CellSet) -> ControlFlow<Deduction>,
    {
        for digit in Digit::ALL {
            for rows_as_base in [true, false] {
                let base_sets = Self::line_sets(rows_as_base);
                let cover_sets = Self::line_sets(!rows_as_base);

                // Candidate base lines: 2 or 3 positions for the digit.
                let mut lines: ArrayVec<[(u8, HouseMask); 9]> = ArrayVec::new();
                for i in 0..9 {
                    let mask = if rows_as_base {
                        grid.row_mask(i, digit)
                    } else {
                        grid.col_mask(i, digit)
                    };
                    if (2..=3).contains(&mask.len()) {
                        lines.push((i, mask));
                    }
                }
                if lines.len() < 3 {
                    continue;
                }

                for a in 0..lines.len() - 2 {
                    for b in a + 1..lines.len() - 1 {
                        for c in b + 1..lines.len() {
                            let (l1, m1) = lines[a];
                            let (l2, m2) = lines[b];
                            let (l3, m3) = lines[c];
                            let cover = m1 | m2 | m3;
                            // Three lines forced into fewer than three cover
                            // lines cannot all place the digit.
                            if cover.len() < 3 {
                                return Err(
                                    ConsistencyError::CandidateConstraintViolation.into()
                                );
                            }
                            if cover.len() > 3 {
                                continue;
                            }

                            let mut base_positions = CellSet::EMPTY;
                            for l in [l1, l2, l3] {
                                base_positions |= base_sets[usize::from(l)];
                            }
                            let mut cover_positions = CellSet::EMPTY;
                            for i in cover {
                                cover_positions |= cover_sets[usize::from(i)];
                            }

                            let eliminations = cover_positions.difference(base_positions);
                            if grid.remove_candidate_with_mask(eliminations, digit) {
                                let corners =
                                    grid.digit_positions(digit) & base_positions & cover_positions;
                                if let ControlFlow::Break(deduction) =
                                    on_condition(grid, digit, corners)
                                {
                                    return Ok(Some(deduction));
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(None)
    }
}

impl Technique for Swordfish {
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
        Self::scan(&mut scratch, |after, digit, corners| {
            ControlFlow::Break(XWing::corner_deduction(
                NAME,
                Tier::Expert,
                &before,
                after,
                digit,
                corners,
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
