//! Exhaustive stack-based backtracking search.
//!
//! Where technique-based solving runs out of logic, [`Backtracker`]
//! finishes the job: it finds solutions, proves unsolvability, and — the
//! generator's workhorse — counts solutions up to a limit so uniqueness
//! checks can abort as soon as a second solution turns up.
//!
//! The search is an explicit stack, not recursion: each expanded node is a
//! cheap place to honor a [`CancelToken`] or a node budget, and there is no
//! deep call stack to unwind on abort.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use derive_more::{Display, Error};
use ninefold_core::{CandidateGrid, CellSet, DigitGrid, DigitSet, Position};

/// A shared flag for cancelling an in-flight search.
///
/// Cloning the token shares the flag; any clone can cancel. The search
/// checks the flag once per expanded node, so cancellation takes effect
/// promptly even deep inside a hard search.
///
/// # Examples
///
/// ```
/// use ninefold_solver::CancelToken;
///
/// let token = CancelToken::new();
/// let watcher = token.clone();
/// token.cancel();
/// assert!(watcher.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of any search holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A bound on the number of search nodes a [`Backtracker`] may expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    max_nodes: Option<u64>,
}

impl SearchBudget {
    /// No bound: the search runs to completion.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self { max_nodes: None }
    }

    /// Bounds the search to at most `max_nodes` expanded nodes.
    #[must_use]
    pub const fn with_max_nodes(max_nodes: u64) -> Self {
        Self {
            max_nodes: Some(max_nodes),
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Error terminating a backtracking search early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SearchError {
    /// The search was cancelled via its [`CancelToken`].
    #[display("search was cancelled")]
    Cancelled,
    /// The search exceeded its [`SearchBudget`].
    #[display("search exceeded its node budget")]
    BudgetExhausted,
}

/// An exhaustive solver over 9×9 grids.
///
/// # Examples
///
/// ```
/// use ninefold_core::DigitGrid;
/// use ninefold_solver::Backtracker;
///
/// let grid: DigitGrid = "
///     53_ _7_ ___
///     6__ 195 ___
///     _98 ___ _6_
///     8__ _6_ __3
///     4__ 8_3 __1
///     7__ _2_ __6
///     _6_ ___ 28_
///     ___ 419 __5
///     ___ _8_ _79
/// "
/// .parse()
/// .unwrap();
///
/// let backtracker = Backtracker::new();
/// let solution = backtracker.solve(&grid)?.expect("puzzle is solvable");
/// assert_eq!(solution.count_filled(), 81);
///
/// // Uniqueness: stop as soon as a second solution is found.
/// assert_eq!(backtracker.count_solutions(&grid, 2)?, 1);
/// # Ok::<(), ninefold_solver::SearchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Backtracker {
    budget: SearchBudget,
    cancel: Option<CancelToken>,
}

struct Frame {
    snapshot: CandidateGrid,
    pos: Position,
    remaining: DigitSet,
}

impl Backtracker {
    /// Creates a backtracker with no budget and no cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node budget for subsequent searches.
    #[must_use]
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Attaches a cancellation token observed once per expanded node.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Finds the first solution of the grid, or `None` if unsolvable.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] if the search is cancelled or exceeds its
    /// node budget before the question is settled.
    pub fn solve(&self, grid: &DigitGrid) -> Result<Option<DigitGrid>, SearchError> {
        let mut solution = None;
        self.search(grid, 1, |solved| {
            solution = Some(solved.to_digit_grid());
        })?;
        Ok(solution)
    }

    /// Counts solutions, stopping as soon as `limit` have been found.
    ///
    /// Uniqueness checks pass `limit = 2`: the answer `2` already proves
    /// non-uniqueness, so the search never enumerates further.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] if the search is cancelled or exceeds its
    /// node budget before the question is settled.
    pub fn count_solutions(&self, grid: &DigitGrid, limit: usize) -> Result<usize, SearchError> {
        self.search(grid, limit, |_| {})
    }

    /// Core search loop, invoking `on_solution` for each solution found.
    fn search<F>(
        &self,
        grid: &DigitGrid,
        limit: usize,
        mut on_solution: F,
    ) -> Result<usize, SearchError>
    where
        F: FnMut(&CandidateGrid),
    {
        if limit == 0 {
            return Ok(0);
        }

        let mut current = CandidateGrid::from(grid);
        let mut stack: Vec<Frame> = Vec::new();
        let mut solutions = 0usize;
        let mut nodes = 0u64;

        loop {
            if let Some(cancel) = &self.cancel
                && cancel.is_cancelled()
            {
                return Err(SearchError::Cancelled);
            }
            if let Some(max_nodes) = self.budget.max_nodes
                && nodes > max_nodes
            {
                return Err(SearchError::BudgetExhausted);
            }

            // Propagate forced placements: a cell reduced to one candidate
            // eliminates that digit from its peers, which may force more
            // cells in turn. Without this, a "complete" assignment could
            // hide two same-digit cells in one house.
            loop {
                let mut changed = false;
                for pos in current.decided_cells() {
                    if let Some(digit) = current.candidates_at(pos).as_single() {
                        changed |= current.remove_candidate_with_mask(pos.house_peers(), digit);
                    }
                }
                if !changed {
                    break;
                }
            }

            let classes = current.classify_cells();
            let descend = if !classes.none.is_empty() {
                // Contradiction: backtrack.
                false
            } else if classes.single.len() == 81 {
                solutions += 1;
                on_solution(&current);
                if solutions >= limit {
                    return Ok(solutions);
                }
                false
            } else {
                true
            };

            if descend {
                let pos = Self::most_constrained(&current, classes.pair);
                let mut remaining = current.candidates_at(pos);
                let digit = remaining
                    .into_iter()
                    .next()
                    .expect("undecided cell has candidates");
                remaining.remove(digit);
                stack.push(Frame {
                    snapshot: current.clone(),
                    pos,
                    remaining,
                });
                current.place(pos, digit);
                nodes += 1;
                continue;
            }

            // Backtrack to the deepest frame with an untried candidate.
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(solutions);
                };
                if let Some(digit) = frame.remaining.into_iter().next() {
                    frame.remaining.remove(digit);
                    current = frame.snapshot.clone();
                    current.place(frame.pos, digit);
                    nodes += 1;
                    break;
                }
                stack.pop();
            }
        }
    }

    /// Picks the undecided cell with the fewest candidates, preferring
    /// bivalue cells, with row-major order as the tie-break.
    fn most_constrained(grid: &CandidateGrid, bivalue: CellSet) -> Position {
        if let Some(pos) = bivalue.into_iter().next() {
            return pos;
        }
        let decided = grid.decided_cells();
        let mut best: Option<(usize, Position)> = None;
        for pos in !decided {
            let count = grid.candidates_at(pos).len();
            match best {
                Some((best_count, _)) if best_count <= count => {}
                _ => best = Some((count, pos)),
            }
        }
        best.expect("grid has undecided cells").1
    }
}
