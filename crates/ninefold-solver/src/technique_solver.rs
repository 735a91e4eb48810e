use ninefold_core::CandidateGrid;

use crate::{
    SolverError,
    technique::{self, BoxedTechnique, Deduction, Tier},
};

/// Statistics collected during technique-based solving.
///
/// Tracks how many times each technique was applied, the total number of
/// steps, and the hardest tier that was needed — the raw material for
/// difficulty classification.
#[derive(Debug, Clone)]
pub struct SolverStats {
    applications: Vec<usize>,
    total_steps: usize,
    max_tier_used: Option<Tier>,
}

impl SolverStats {
    /// Returns technique application counts in solver order.
    ///
    /// Techniques that never applied are included with a count of `0`.
    #[must_use]
    pub fn applications(&self) -> &[usize] {
        &self.applications
    }

    /// Returns the total number of solving steps taken.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Returns `true` if any technique was applied at least once.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.total_steps > 0
    }

    /// Returns the hardest tier that contributed a step, if any.
    #[must_use]
    pub fn max_tier_used(&self) -> Option<Tier> {
        self.max_tier_used
    }
}

/// A solver that applies human solving techniques in easiest-first order.
///
/// Each [`step`](Self::step) tries the configured techniques in order and
/// applies the first one that makes progress, so a run of steps always uses
/// the minimum sufficient technique at every point. That property is what
/// makes difficulty rating and hint selection deterministic.
///
/// # Examples
///
/// ```
/// use ninefold_core::CandidateGrid;
/// use ninefold_solver::TechniqueSolver;
///
/// let solver = TechniqueSolver::with_all_techniques();
/// let mut grid = CandidateGrid::new();
///
/// let (solved, stats) = solver.solve(&mut grid)?;
/// if !solved {
///     println!("stuck after {} steps", stats.total_steps());
/// }
/// # Ok::<(), ninefold_solver::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TechniqueSolver {
    techniques: Vec<BoxedTechnique>,
}

impl TechniqueSolver {
    /// Creates a solver with the specified techniques, tried in order.
    #[must_use]
    pub fn new(techniques: Vec<BoxedTechnique>) -> Self {
        Self { techniques }
    }

    /// Creates a solver with all available techniques, easiest first.
    #[must_use]
    pub fn with_all_techniques() -> Self {
        Self {
            techniques: technique::all_techniques(),
        }
    }

    /// Creates a solver restricted to techniques at or below `max_tier`.
    #[must_use]
    pub fn with_techniques_up_to(max_tier: Tier) -> Self {
        Self {
            techniques: technique::techniques_up_to(max_tier),
        }
    }

    /// Creates a statistics object aligned with this solver's techniques.
    #[must_use]
    pub fn new_stats(&self) -> SolverStats {
        SolverStats {
            applications: vec![0; self.techniques.len()],
            total_steps: 0,
            max_tier_used: None,
        }
    }

    /// Returns the configured techniques in application order.
    #[must_use]
    pub fn techniques(&self) -> &[BoxedTechnique] {
        &self.techniques
    }

    /// Applies one step by trying each technique in order.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - a technique was applied and made progress
    /// * `Ok(false)` - no technique can make progress (the solver is stuck)
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid is, or becomes,
    /// inconsistent.
    pub fn step(
        &self,
        grid: &mut CandidateGrid,
        stats: &mut SolverStats,
    ) -> Result<bool, SolverError> {
        debug_assert_eq!(self.techniques.len(), stats.applications.len());
        grid.check_consistency()?;

        for (i, technique) in self.techniques.iter().enumerate() {
            if technique.apply(grid)? {
                stats.applications[i] += 1;
                stats.total_steps += 1;
                stats.max_tier_used = stats.max_tier_used.max(Some(technique.tier()));
                grid.check_consistency()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Finds the next deduction without mutating the grid.
    ///
    /// Returns the first deduction of the first technique that has one, so
    /// the result names the minimum sufficient technique for this position.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid is inconsistent.
    pub fn find_deduction(&self, grid: &CandidateGrid) -> Result<Option<Deduction>, SolverError> {
        grid.check_consistency()?;
        for technique in &self.techniques {
            if let Some(deduction) = technique.find_deduction(grid)? {
                return Ok(Some(deduction));
            }
        }
        Ok(None)
    }

    /// Applies techniques until the grid is solved or no progress is made.
    ///
    /// # Returns
    ///
    /// `(solved, stats)` where `solved` is `true` iff the grid is complete.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid becomes
    /// inconsistent during solving.
    pub fn solve(&self, grid: &mut CandidateGrid) -> Result<(bool, SolverStats), SolverError> {
        let mut stats = self.new_stats();
        let solved = self.solve_with_stats(grid, &mut stats)?;
        Ok((solved, stats))
    }

    /// Like [`solve`](Self::solve), but accumulates into existing stats.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid becomes
    /// inconsistent during solving.
    pub fn solve_with_stats(
        &self,
        grid: &mut CandidateGrid,
        stats: &mut SolverStats,
    ) -> Result<bool, SolverError> {
        while self.step(grid, stats)? {
            if grid.is_solved()? {
                return Ok(true);
            }
        }
        Ok(grid.is_solved()?)
    }
}

#[cfg(test)]
mod tests {
    use ninefold_core::{Digit, Position};

    use super::*;
    use crate::technique::{HiddenSingle, NakedSingle, Technique as _};

    fn create_test_solver() -> TechniqueSolver {
        TechniqueSolver::new(vec![
            Box::new(NakedSingle::new()),
            Box::new(HiddenSingle::new()),
        ])
    }

    fn make_naked_single(grid: &mut CandidateGrid, pos: Position, digit: Digit) {
        for other in Digit::ALL {
            if other != digit {
                grid.remove_candidate(pos, other);
            }
        }
    }

    #[test]
    fn test_step_returns_false_when_no_progress() {
        let solver = create_test_solver();
        let mut grid = CandidateGrid::new();
        let mut stats = solver.new_stats();

        assert_eq!(solver.step(&mut grid, &mut stats), Ok(false));
        assert_eq!(stats.total_steps(), 0);
        assert_eq!(stats.max_tier_used(), None);
    }

    #[test]
    fn test_step_applies_first_matching_technique() {
        let solver = create_test_solver();
        let mut grid = CandidateGrid::new();
        let mut stats = solver.new_stats();

        make_naked_single(&mut grid, Position::new(4, 4), Digit::D5);

        assert_eq!(solver.step(&mut grid, &mut stats), Ok(true));
        assert_eq!(stats.total_steps(), 1);
        assert_eq!(stats.max_tier_used(), Some(Tier::Basic));

        let i = solver
            .techniques()
            .iter()
            .position(|t| t.name() == NakedSingle::new().name())
            .unwrap();
        assert_eq!(stats.applications()[i], 1);
    }

    #[test]
    fn test_solve_empty_grid_is_stuck() {
        let solver = create_test_solver();
        let mut grid = CandidateGrid::new();

        let (solved, stats) = solver.solve(&mut grid).unwrap();
        assert!(!solved);
        assert_eq!(stats.total_steps(), 0);
    }

    #[test]
    fn test_solve_singles_puzzle_to_completion() {
        // This classic puzzle yields to singles alone.
        let grid: ninefold_core::DigitGrid = "
            53_ _7_ ___
            6__ 195 ___
            _98 ___ _6_
            8__ _6_ __3
            4__ 8_3 __1
            7__ _2_ __6
            _6_ ___ 28_
            ___ 419 __5
            ___ _8_ _79
        "
        .parse()
        .unwrap();

        let solver = TechniqueSolver::with_all_techniques();
        let mut candidates = CandidateGrid::from(grid);
        let (solved, stats) = solver.solve(&mut candidates).unwrap();

        assert!(solved);
        assert!(stats.has_progress());
        assert!(stats.max_tier_used().is_some());

        let solution = candidates.to_digit_grid();
        assert_eq!(
            solution.to_string(),
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179"
        );
    }

    #[test]
    fn test_find_deduction_reports_minimum_technique() {
        let solver = TechniqueSolver::with_all_techniques();
        let mut grid = CandidateGrid::new();
        make_naked_single(&mut grid, Position::new(2, 3), Digit::D7);

        let deduction = solver.find_deduction(&grid).unwrap().unwrap();
        assert_eq!(deduction.technique(), "Naked Single");
        assert_eq!(
            deduction.placement(),
            Some((Position::new(2, 3), Digit::D7))
        );
    }

    #[test]
    fn test_find_deduction_is_deterministic() {
        let solver = TechniqueSolver::with_all_techniques();
        let mut grid = CandidateGrid::new();
        make_naked_single(&mut grid, Position::new(6, 6), Digit::D2);
        make_naked_single(&mut grid, Position::new(1, 1), Digit::D8);

        let first = solver.find_deduction(&grid).unwrap().unwrap();
        let second = solver.find_deduction(&grid).unwrap().unwrap();
        // Same target every time, and row-major order picks (1, 1) first.
        assert_eq!(first.placement(), second.placement());
        assert_eq!(
            first.placement(),
            Some((Position::new(1, 1), Digit::D8))
        );
    }

    #[test]
    fn test_solver_rejects_inconsistent_grid() {
        let solver = create_test_solver();
        let mut grid = CandidateGrid::new();
        for digit in Digit::ALL {
            grid.remove_candidate(Position::new(0, 0), digit);
        }
        let mut stats = solver.new_stats();
        assert!(solver.step(&mut grid, &mut stats).is_err());
    }
}
