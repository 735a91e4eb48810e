//! Human solving techniques.
//!
//! Each technique implements the [`Technique`] trait and operates on a
//! [`CandidateGrid`]. Techniques are registered in a fixed easiest-first
//! order; the [`TechniqueSolver`](crate::TechniqueSolver) relies on that
//! order for deterministic hints and difficulty classification.

use std::fmt::{self, Debug, Display};

use ninefold_core::{CandidateGrid, CellSet, Digit, DigitSet, Position};

pub use self::{
    hidden_single::HiddenSingle, locked_candidates::LockedCandidates, naked_pair::NakedPair,
    naked_single::NakedSingle, swordfish::Swordfish, x_wing::XWing, y_wing::YWing,
};
use crate::SolverError;

mod hidden_single;
mod locked_candidates;
mod naked_pair;
mod naked_single;
mod swordfish;
mod x_wing;
mod y_wing;

/// Difficulty tier of a solving technique.
///
/// Tiers order techniques from everyday deductions to patterns only expert
/// players reach for. Puzzle difficulties map to a maximum allowed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Naked and hidden singles.
    Basic,
    /// Pair-based eliminations and box/line interactions.
    Intermediate,
    /// Two-line fish patterns.
    Advanced,
    /// Three-line fish and pivot/pincer patterns.
    Expert,
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Basic => "basic",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
            Tier::Expert => "expert",
        };
        f.write_str(name)
    }
}

/// A concrete change produced by applying a technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductionAction {
    /// Place a digit in a single cell.
    Placement {
        /// Cell to place the digit into.
        position: Position,
        /// Digit to place.
        digit: Digit,
    },
    /// Remove candidate digits from a set of cells.
    Elimination {
        /// Positions where candidates are removed.
        positions: CellSet,
        /// Digits removed from those positions.
        digits: DigitSet,
    },
}

/// A single step derived by a technique: what justified it, and what it does.
///
/// Deductions are plain values so that hint systems can inspect, display,
/// and apply them independently of the technique that produced them.
#[derive(Debug, Clone)]
pub struct Deduction {
    technique: &'static str,
    tier: Tier,
    condition_cells: CellSet,
    actions: Vec<DeductionAction>,
}

impl Deduction {
    pub(crate) fn new(
        technique: &'static str,
        tier: Tier,
        condition_cells: CellSet,
        actions: Vec<DeductionAction>,
    ) -> Self {
        Self {
            technique,
            tier,
            condition_cells,
            actions,
        }
    }

    /// Returns the name of the technique that produced this deduction.
    #[must_use]
    pub fn technique(&self) -> &'static str {
        self.technique
    }

    /// Returns the tier of the technique that produced this deduction.
    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Returns the cells whose state justified the deduction.
    ///
    /// Hint systems highlight these before revealing the conclusion.
    #[must_use]
    pub fn condition_cells(&self) -> CellSet {
        self.condition_cells
    }

    /// Returns the concrete actions of the deduction.
    #[must_use]
    pub fn actions(&self) -> &[DeductionAction] {
        &self.actions
    }

    /// Returns the first placement action, if the deduction places a digit.
    #[must_use]
    pub fn placement(&self) -> Option<(Position, Digit)> {
        self.actions.iter().find_map(|action| match action {
            DeductionAction::Placement { position, digit } => Some((*position, *digit)),
            DeductionAction::Elimination { .. } => None,
        })
    }

    /// Returns `true` if the deduction only removes candidates.
    #[must_use]
    pub fn is_elimination_only(&self) -> bool {
        self.placement().is_none()
    }

    /// Applies all actions of this deduction to a grid.
    ///
    /// Returns `true` if the grid changed.
    pub fn apply_to(&self, grid: &mut CandidateGrid) -> bool {
        let mut changed = false;
        for action in &self.actions {
            match action {
                DeductionAction::Placement { position, digit } => {
                    changed |= grid.place(*position, *digit);
                }
                DeductionAction::Elimination { positions, digits } => {
                    for digit in *digits {
                        changed |= grid.remove_candidate_with_mask(*positions, digit);
                    }
                }
            }
        }
        changed
    }
}

/// A trait representing a Sudoku solving technique.
///
/// `find_deduction` and `apply` must agree: whenever `apply` would change
/// the grid, `find_deduction` returns a step describing (at least) the first
/// such change, and vice versa. The `TechniqueTester` used throughout the
/// technique tests asserts this duality.
pub trait Technique: Debug {
    /// Returns the name of the technique.
    fn name(&self) -> &'static str;

    /// Returns the difficulty tier of the technique.
    fn tier(&self) -> Tier;

    /// Returns a boxed clone of the technique.
    fn clone_box(&self) -> BoxedTechnique;

    /// Finds the next deduction without mutating the grid.
    ///
    /// Returns `Ok(None)` when this technique has no applicable step.
    ///
    /// # Errors
    ///
    /// Returns an error if the technique detects an invalid grid state.
    fn find_deduction(&self, grid: &CandidateGrid) -> Result<Option<Deduction>, SolverError>;

    /// Applies the technique to the grid.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - the grid was updated
    /// * `Ok(false)` - the technique found nothing to do
    ///
    /// # Errors
    ///
    /// Returns an error if the technique detects an invalid grid state.
    fn apply(&self, grid: &mut CandidateGrid) -> Result<bool, SolverError>;
}

/// A boxed technique.
pub type BoxedTechnique = Box<dyn Technique>;

impl Clone for BoxedTechnique {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Returns all available techniques, ordered easiest to hardest.
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    vec![
        Box::new(NakedSingle::new()),
        Box::new(HiddenSingle::new()),
        Box::new(NakedPair::new()),
        Box::new(LockedCandidates::new()),
        Box::new(XWing::new()),
        Box::new(Swordfish::new()),
        Box::new(YWing::new()),
    ]
}

/// Returns the techniques whose tier does not exceed `max_tier`.
///
/// The relative ordering of [`all_techniques`] is preserved. This is the
/// registry used when a difficulty level restricts which techniques a
/// puzzle may require.
///
/// # Examples
///
/// ```
/// use ninefold_solver::technique::{self, Tier};
///
/// let basic = technique::techniques_up_to(Tier::Basic);
/// assert_eq!(basic.len(), 2);
/// ```
#[must_use]
pub fn techniques_up_to(max_tier: Tier) -> Vec<BoxedTechnique> {
    all_techniques()
        .into_iter()
        .filter(|technique| technique.tier() <= max_tier)
        .collect()
}
