use ninefold_core::{CandidateGrid, Digit, DigitSet, House};

use super::{BoxedTechnique, Deduction, DeductionAction, Technique, Tier};
use crate::SolverError;

const NAME: &str = "Hidden Single";

/// A technique that finds digits with only one possible position in a house.
///
/// A "hidden single" occurs when a digit has exactly one candidate cell left
/// in a row, column, or box, even though that cell may still carry several
/// candidates of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingle {}

impl HiddenSingle {
    /// Creates a new `HiddenSingle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Technique for HiddenSingle {
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
        let decided = grid.decided_cells();
        for digit in Digit::ALL {
            let undecided_positions = grid.digit_positions(digit).difference(decided);
            for house in House::ALL {
                let Some(i) = undecided_positions.house_mask(house).as_single() else {
                    continue;
                };
                let pos = house.position_from_cell_index(i);
                let mut actions = vec![DeductionAction::Placement {
                    position: pos,
                    digit,
                }];
                let affected = pos.house_peers() & grid.digit_positions(digit);
                if !affected.is_empty() {
                    actions.push(DeductionAction::Elimination {
                        positions: affected,
                        digits: DigitSet::from_elem(digit),
                    });
                }
                return Ok(Some(Deduction::new(
                    NAME,
                    Tier::Basic,
                    house.positions(),
                    actions,
                )));
            }
        }
        Ok(None)
    }

    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        let decided = grid.decided_cells();
        for digit in Digit::ALL {
            let undecided_positions = grid.digit_positions(digit).difference(decided);
            for house in House::ALL {
                // Project against the live grid as well: a placement earlier
                // in this pass may have resolved this house already.
                let mask =
                    (undecided_positions & grid.digit_positions(digit)).house_mask(house);
                if let Some(i) = mask.as_single() {
                    let pos = house.position_from_cell_index(i);
                    changed |= grid.place(pos, digit);
                }
            }
        }
        Ok(changed)
    }
}
