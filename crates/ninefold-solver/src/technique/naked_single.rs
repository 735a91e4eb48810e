use ninefold_core::{CandidateGrid, CellSet, DigitSet, Position};

use super::{BoxedTechnique, Deduction, DeductionAction, Technique, Tier};
use crate::SolverError;

const NAME: &str = "Naked Single";

/// A technique that resolves cells with a single remaining candidate.
///
/// When a cell has only one possible digit, that digit is placed and then
/// removed from every cell in the same row, column, and box. This technique
/// doubles as the solver's constraint-propagation engine: other techniques
/// only place digits or trim candidates, and the follow-up eliminations
/// happen when control returns here.
///
/// Cells are scanned in row-major order, so the first deduction is always
/// the one with the smallest (row, column) target.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedSingle;

impl NakedSingle {
    /// Creates a new `NakedSingle` technique.
    #[must_use]
    pub const fn new() -> Self {
        NakedSingle
    }

    /// Builds a naked single deduction for a decided position, without
    /// requiring that any peer elimination would result.
    ///
    /// Hint systems use this to recognize a valid placement even when all
    /// peers already lack the candidate.
    #[must_use]
    pub fn deduction_at(grid: &CandidateGrid, pos: Position) -> Option<Deduction> {
        let digit = grid.candidates_at(pos).as_single()?;
        let affected = pos.house_peers() & grid.digit_positions(digit);
        let mut actions = vec![DeductionAction::Placement {
            position: pos,
            digit,
        }];
        if !affected.is_empty() {
            actions.push(DeductionAction::Elimination {
                positions: affected,
                digits: DigitSet::from_elem(digit),
            });
        }
        Some(Deduction::new(
            NAME,
            Tier::Basic,
            CellSet::from_elem(pos),
            actions,
        ))
    }
}

impl Technique for NakedSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn tier(&self) -> Tier {
        Tier::Basic
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_deduction(&self, grid: &CandidateGrid) -> Result<Option<Deduction>, SolverError> {
        for pos in grid.decided_cells() {
            let Some(digit) = grid.candidates_at(pos).as_single() else {
                continue;
            };
            let affected = pos.house_peers() & grid.digit_positions(digit);
            if !affected.is_empty() {
                return Ok(Some(Deduction::new(
                    NAME,
                    Tier::Basic,
                    CellSet::from_elem(pos),
                    vec![
                        DeductionAction::Placement {
                            position: pos,
                            digit,
                        },
                        DeductionAction::Elimination {
                            positions: affected,
                            digits: DigitSet::from_elem(digit),
                        },
                    ],
                )));
            }
        }
        Ok(None)
    }

    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        for pos in grid.decided_cells() {
            let Some(digit) = grid.candidates_at(pos).as_single() else {
                continue;
            };
            changed |= grid.remove_candidate_with_mask(pos.house_peers(), digit);
        }
        Ok(changed)
    }
}
