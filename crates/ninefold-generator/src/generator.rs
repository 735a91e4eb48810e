//! Seeded puzzle generation.

use derive_more::{Display, Error};
use log::{debug, warn};
use ninefold_core::{CandidateGrid, Digit, DigitGrid, Position};
use ninefold_solver::{Backtracker, CancelToken, SearchBudget, SearchError, TechniqueSolver};
use rand::seq::SliceRandom as _;
use rand_pcg::Pcg64;

use crate::{Difficulty, DifficultyProfile, PuzzleSeed};

/// Node budget for each uniqueness check during carving.
///
/// A check that blows through this is treated as "uniqueness unproven" and
/// the removal is rolled back, which keeps the output guarantee intact
/// without letting one pathological position stall the whole run.
const UNIQUENESS_BUDGET: SearchBudget = SearchBudget::with_max_nodes(200_000);

/// A generated puzzle together with its unique solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// The puzzle as presented to the player (givens only).
    pub problem: DigitGrid,
    /// The unique solution of `problem`.
    pub solution: DigitGrid,
    /// The difficulty the puzzle was generated for.
    pub difficulty: Difficulty,
    /// The seed that reproduces this puzzle.
    pub seed: PuzzleSeed,
}

/// Error terminating generation without a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GenerateError {
    /// Generation was cancelled via its [`CancelToken`].
    #[display("generation was cancelled")]
    Cancelled,
}

/// Generates puzzles with a unique solution for a requested difficulty.
///
/// # Examples
///
/// ```no_run
/// use ninefold_generator::{Difficulty, PuzzleGenerator};
///
/// let generator = PuzzleGenerator::new();
/// let puzzle = generator.generate(Difficulty::Medium)?;
/// assert_eq!(puzzle.solution.count_filled(), 81);
/// # Ok::<(), ninefold_generator::GenerateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PuzzleGenerator {
    cancel: Option<CancelToken>,
}

impl PuzzleGenerator {
    /// Creates a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a cancellation token.
    ///
    /// The token is observed between attempts and at every node of the
    /// embedded searches, so cancellation lands promptly.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Generates a puzzle from a fresh entropy seed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Cancelled`] if the generator's cancel token
    /// fires mid-run.
    pub fn generate(&self, difficulty: Difficulty) -> Result<GeneratedPuzzle, GenerateError> {
        self.generate_with_seed(difficulty, PuzzleSeed::from_entropy())
    }

    /// Generates a puzzle deterministically from a seed.
    ///
    /// The same `(difficulty, seed)` pair always yields the same puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Cancelled`] if the generator's cancel token
    /// fires mid-run.
    pub fn generate_with_seed(
        &self,
        difficulty: Difficulty,
        seed: PuzzleSeed,
    ) -> Result<GeneratedPuzzle, GenerateError> {
        let profile = difficulty.profile();
        let verifier = profile
            .max_tier
            .map(TechniqueSolver::with_techniques_up_to);

        // Best fallback so far: a uniquely-solvable problem that missed the
        // target band, keyed by how far from the target it landed.
        let mut best: Option<(usize, DigitGrid, DigitGrid)> = None;

        for attempt in 0..profile.max_attempts {
            self.check_cancelled()?;
            let mut rng = seed.rng_for_attempt(attempt);

            let solution = self.full_grid(&mut rng)?;
            let problem = self.carve(&solution, &mut rng, &profile)?;
            let givens = problem.count_filled();

            if let Some(verifier) = &verifier
                && !Self::tier_solvable(verifier, &problem)
            {
                debug!(
                    "attempt {attempt}: {givens} givens but not solvable within {:?}",
                    profile.max_tier
                );
                continue;
            }

            if givens <= profile.target_givens {
                debug!("attempt {attempt}: accepted with {givens} givens");
                return Ok(GeneratedPuzzle {
                    problem,
                    solution,
                    difficulty,
                    seed,
                });
            }

            let distance = givens - profile.target_givens;
            if best.as_ref().is_none_or(|(d, _, _)| distance < *d) {
                best = Some((distance, problem, solution));
            }
        }

        // Nothing hit the target band; degrade to the closest attempt that
        // passed uniqueness (and tier verification, when required).
        if let Some((distance, problem, solution)) = best {
            warn!(
                "no attempt reached {} givens for {difficulty}; returning best at {} givens",
                profile.target_givens,
                profile.target_givens + distance
            );
            return Ok(GeneratedPuzzle {
                problem,
                solution,
                difficulty,
                seed,
            });
        }

        // Every attempt failed tier verification. Regenerate the easiest
        // acceptable thing: a fresh uniquely-solvable carve, unverified.
        warn!("no attempt passed tier verification for {difficulty}; returning unverified puzzle");
        let mut rng = seed.rng_for_attempt(profile.max_attempts);
        let solution = self.full_grid(&mut rng)?;
        let problem = self.carve(&solution, &mut rng, &profile)?;
        Ok(GeneratedPuzzle {
            problem,
            solution,
            difficulty,
            seed,
        })
    }

    fn check_cancelled(&self) -> Result<(), GenerateError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(GenerateError::Cancelled),
            _ => Ok(()),
        }
    }

    fn backtracker(&self, budget: SearchBudget) -> Backtracker {
        let mut backtracker = Backtracker::new().with_budget(budget);
        if let Some(token) = &self.cancel {
            backtracker = backtracker.with_cancel_token(token.clone());
        }
        backtracker
    }

    /// Builds a complete random solution grid.
    ///
    /// The three diagonal boxes are mutually independent, so they can be
    /// filled with random permutations outright; exhaustive search then
    /// completes the rest.
    fn full_grid(&self, rng: &mut Pcg64) -> Result<DigitGrid, GenerateError> {
        loop {
            self.check_cancelled()?;

            let mut grid = DigitGrid::new();
            for box_index in [0u8, 4, 8] {
                let mut digits = Digit::ALL;
                digits.shuffle(rng);
                for (i, digit) in (0u8..).zip(digits) {
                    grid.set(Position::from_box(box_index, i), Some(digit));
                }
            }

            match self.backtracker(SearchBudget::unlimited()).solve(&grid) {
                Ok(Some(solution)) => return Ok(solution),
                // Independent diagonal boxes are always completable; retry
                // on the unreachable None arm anyway rather than panic.
                Ok(None) => {}
                Err(SearchError::Cancelled) => return Err(GenerateError::Cancelled),
                Err(SearchError::BudgetExhausted) => {
                    unreachable!("full-grid search runs without a budget")
                }
            }
        }
    }

    /// Removes givens in random order while the solution stays unique.
    fn carve(
        &self,
        solution: &DigitGrid,
        rng: &mut Pcg64,
        profile: &DifficultyProfile,
    ) -> Result<DigitGrid, GenerateError> {
        let mut problem = solution.clone();
        let mut order = Position::ALL;
        order.shuffle(rng);

        let backtracker = self.backtracker(UNIQUENESS_BUDGET);
        let mut givens = problem.count_filled();

        for pos in order {
            if givens <= profile.target_givens || givens <= profile.min_givens {
                break;
            }
            let Some(digit) = problem[pos] else {
                continue;
            };

            problem.set(pos, None);
            match backtracker.count_solutions(&problem, 2) {
                Ok(1) => givens -= 1,
                // A second solution appeared, or uniqueness could not be
                // proven within budget: the removal does not stand.
                Ok(_) | Err(SearchError::BudgetExhausted) => {
                    problem.set(pos, Some(digit));
                }
                Err(SearchError::Cancelled) => return Err(GenerateError::Cancelled),
            }
        }

        Ok(problem)
    }

    fn tier_solvable(verifier: &TechniqueSolver, problem: &DigitGrid) -> bool {
        let mut grid = CandidateGrid::from(problem);
        matches!(verifier.solve(&mut grid), Ok((true, _)))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use ninefold_solver::technique::Tier;

    use super::*;

    const TEST_SEED: &str = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";

    fn test_seed() -> PuzzleSeed {
        PuzzleSeed::from_str(TEST_SEED).unwrap()
    }

    #[test]
    fn test_generated_puzzle_is_unique_and_matches_solution() {
        let generator = PuzzleGenerator::new();
        let puzzle = generator
            .generate_with_seed(Difficulty::Easy, test_seed())
            .unwrap();

        assert_eq!(puzzle.solution.count_filled(), 81);
        assert!(puzzle.problem.count_filled() < 81);

        // Givens agree with the solution.
        for pos in Position::ALL {
            if let Some(digit) = puzzle.problem[pos] {
                assert_eq!(puzzle.solution[pos], Some(digit));
            }
        }

        // Exactly one solution, and it is the stored one.
        let backtracker = Backtracker::new();
        assert_eq!(backtracker.count_solutions(&puzzle.problem, 2), Ok(1));
        assert_eq!(
            backtracker.solve(&puzzle.problem),
            Ok(Some(puzzle.solution.clone()))
        );
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = PuzzleGenerator::new();
        let first = generator
            .generate_with_seed(Difficulty::Medium, test_seed())
            .unwrap();
        let second = generator
            .generate_with_seed(Difficulty::Medium, test_seed())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_below_expert_respects_tier_allowance() {
        let generator = PuzzleGenerator::new();
        let puzzle = generator
            .generate_with_seed(Difficulty::Beginner, test_seed())
            .unwrap();

        let solver = TechniqueSolver::with_techniques_up_to(Tier::Basic);
        let mut grid = CandidateGrid::from(&puzzle.problem);
        let (solved, _) = solver.solve(&mut grid).unwrap();
        assert!(solved, "beginner puzzles must yield to singles alone");
    }

    #[test]
    fn test_cancellation_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let generator = PuzzleGenerator::new().with_cancel_token(token);
        assert_eq!(
            generator.generate_with_seed(Difficulty::Easy, test_seed()),
            Err(GenerateError::Cancelled)
        );
    }

    #[test]
    fn test_solution_is_valid_sudoku() {
        let generator = PuzzleGenerator::new();
        let puzzle = generator
            .generate_with_seed(Difficulty::Hard, test_seed())
            .unwrap();

        let grid = CandidateGrid::from(&puzzle.solution);
        assert_eq!(grid.is_solved(), Ok(true));
    }
}
