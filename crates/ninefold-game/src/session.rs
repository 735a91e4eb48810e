//! The game session: board, ledger, budgets, and timing.

use log::debug;
use ninefold_core::{CandidateGrid, CellSet, Digit, DigitGrid, DigitSet, Position};
use ninefold_generator::{Difficulty, GeneratedPuzzle, PuzzleSeed};
use ninefold_solver::Backtracker;

use crate::{CellState, GameError, Move, MoveChange, MoveOutcome};

/// A Sudoku game session.
///
/// Owns the board, the hidden solution, the append-only move ledger, the
/// hint and mistake budgets, and pause-aware timing. All mutation goes
/// through the validated operations here; given cells are immutable for the
/// lifetime of the session.
///
/// Timestamps (`now_ms`, milliseconds since the Unix epoch) are supplied by
/// the caller on every call that needs one — the engine never reads a
/// clock.
///
/// # Examples
///
/// ```no_run
/// use ninefold_game::GameSession;
/// use ninefold_generator::{Difficulty, PuzzleGenerator};
///
/// let puzzle = PuzzleGenerator::new().generate(Difficulty::Easy)?;
/// let session = GameSession::new(puzzle, 0);
/// assert!(!session.is_completed());
/// # Ok::<(), ninefold_generator::GenerateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub(crate) cells: [CellState; 81],
    pub(crate) solution: DigitGrid,
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: PuzzleSeed,
    pub(crate) moves: Vec<Move>,
    pub(crate) undo_count: u32,
    pub(crate) hints_used: u32,
    pub(crate) max_hints: u32,
    pub(crate) mistakes: u32,
    pub(crate) max_mistakes: u32,
    pub(crate) started_at_ms: u64,
    pub(crate) pause_started_at_ms: Option<u64>,
    pub(crate) total_paused_ms: u64,
    pub(crate) completed: bool,
}

impl GameSession {
    /// Creates a session from a generated puzzle, started at `now_ms`.
    #[must_use]
    pub fn new(puzzle: GeneratedPuzzle, now_ms: u64) -> Self {
        let GeneratedPuzzle {
            problem,
            solution,
            difficulty,
            seed,
        } = puzzle;
        let mut cells = [CellState::Empty; 81];
        for pos in Position::ALL {
            if let Some(digit) = problem[pos] {
                cells[usize::from(pos.index())] = CellState::Given(digit);
            }
        }
        Self {
            cells,
            solution,
            difficulty,
            seed,
            moves: Vec::new(),
            undo_count: 0,
            hints_used: 0,
            max_hints: difficulty.max_hints(),
            mistakes: 0,
            max_mistakes: difficulty.max_mistakes(),
            started_at_ms: now_ms,
            pause_started_at_ms: None,
            total_paused_ms: 0,
            completed: false,
        }
    }

    /// Returns the state of a cell.
    #[must_use]
    pub fn cell(&self, pos: Position) -> &CellState {
        &self.cells[usize::from(pos.index())]
    }

    fn cell_mut(&mut self, pos: Position) -> &mut CellState {
        &mut self.cells[usize::from(pos.index())]
    }

    /// Returns the session's difficulty level.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the seed of the underlying puzzle.
    #[must_use]
    pub fn seed(&self) -> PuzzleSeed {
        self.seed
    }

    pub(crate) fn solution(&self) -> &DigitGrid {
        &self.solution
    }

    /// Returns the move ledger, oldest first.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Returns how many hints have been consumed.
    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Returns the hint budget.
    #[must_use]
    pub fn max_hints(&self) -> u32 {
        self.max_hints
    }

    /// Returns the mistake count (monotonic; undo never lowers it).
    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Returns the mistake budget.
    #[must_use]
    pub fn max_mistakes(&self) -> u32 {
        self.max_mistakes
    }

    /// Returns `true` once the board is complete and conflict-free.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns `true` while the session is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause_started_at_ms.is_some()
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.completed {
            return Err(GameError::SessionCompleted);
        }
        if self.is_paused() {
            return Err(GameError::SessionPaused);
        }
        Ok(())
    }

    /// Evaluates a prospective digit entry without mutating anything.
    ///
    /// A pure function of the current board state: the same inputs always
    /// produce the same answer, and calling it any number of times changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::FixedCell`] if the target is a given cell.
    pub fn validate_digit(&self, pos: Position, digit: Digit) -> Result<MoveOutcome, GameError> {
        if self.cell(pos).is_given() {
            return Err(GameError::FixedCell);
        }
        Ok(MoveOutcome {
            changed: false,
            correct: Some(self.solution[pos] == Some(digit)),
            conflicts: self.conflicting_peers(pos, digit),
            completed: false,
        })
    }

    /// Places a digit at a position.
    ///
    /// Correctness is judged against the stored solution; an incorrect
    /// entry still lands on the board (the UI marks it), but bumps the
    /// monotonic mistake counter. Re-entering the digit a cell already
    /// holds is reported as unchanged and not recorded.
    ///
    /// # Errors
    ///
    /// [`GameError::FixedCell`] for given cells, [`GameError::SessionPaused`]
    /// / [`GameError::SessionCompleted`] when the session cannot accept
    /// moves. None of these mutate state.
    pub fn place_digit(
        &mut self,
        pos: Position,
        digit: Digit,
        now_ms: u64,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_running()?;
        let previous = *self.cell(pos);
        match previous {
            CellState::Given(_) => return Err(GameError::FixedCell),
            CellState::Filled(existing) if existing == digit => {
                return Ok(MoveOutcome::unchanged());
            }
            _ => {}
        }

        let correct = self.solution[pos] == Some(digit);
        let conflicts = self.conflicting_peers(pos, digit);

        *self.cell_mut(pos) = CellState::Filled(digit);
        self.moves.push(Move {
            position: pos,
            change: MoveChange::SetDigit {
                previous,
                digit,
                correct,
            },
            timestamp_ms: now_ms,
        });
        if !correct {
            self.mistakes += 1;
            debug!("mistake at {pos}: entered {digit}, {}/{} used", self.mistakes, self.max_mistakes);
        }

        self.completed = self.board_is_complete();
        Ok(MoveOutcome {
            changed: true,
            correct: Some(correct),
            conflicts,
            completed: self.completed,
        })
    }

    /// Clears the player digit or notes at a position.
    ///
    /// Clearing an already-empty cell is reported as unchanged and not
    /// recorded.
    ///
    /// # Errors
    ///
    /// [`GameError::FixedCell`] for given cells, plus the usual
    /// running-state checks.
    pub fn clear_cell(&mut self, pos: Position, now_ms: u64) -> Result<MoveOutcome, GameError> {
        self.ensure_running()?;
        let previous = *self.cell(pos);
        match previous {
            CellState::Given(_) => return Err(GameError::FixedCell),
            CellState::Empty => return Ok(MoveOutcome::unchanged()),
            CellState::Filled(_) | CellState::Notes(_) => {}
        }

        *self.cell_mut(pos) = CellState::Empty;
        self.moves.push(Move {
            position: pos,
            change: MoveChange::ClearCell { previous },
            timestamp_ms: now_ms,
        });
        Ok(MoveOutcome {
            changed: true,
            correct: None,
            conflicts: Vec::new(),
            completed: false,
        })
    }

    /// Toggles a pencil-mark note at a position.
    ///
    /// # Errors
    ///
    /// [`GameError::FixedCell`] for given cells, [`GameError::FilledCell`]
    /// for cells holding a player digit, plus the usual running-state
    /// checks.
    pub fn toggle_note(
        &mut self,
        pos: Position,
        digit: Digit,
        now_ms: u64,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_running()?;
        let added = match self.cell(pos) {
            CellState::Given(_) => return Err(GameError::FixedCell),
            CellState::Filled(_) => return Err(GameError::FilledCell),
            CellState::Empty => {
                *self.cell_mut(pos) = CellState::Notes(DigitSet::from_elem(digit));
                true
            }
            CellState::Notes(notes) => {
                let mut notes = *notes;
                let added = !notes.contains(digit);
                if added {
                    notes.insert(digit);
                } else {
                    notes.remove(digit);
                }
                *self.cell_mut(pos) = if notes.is_empty() {
                    CellState::Empty
                } else {
                    CellState::Notes(notes)
                };
                added
            }
        };

        self.moves.push(Move {
            position: pos,
            change: MoveChange::ToggleNote { digit, added },
            timestamp_ms: now_ms,
        });
        Ok(MoveOutcome {
            changed: true,
            correct: None,
            conflicts: Vec::new(),
            completed: false,
        })
    }

    /// Undoes the most recent move.
    ///
    /// The board cell reverts exactly to its prior state (value and notes);
    /// the mistake counter is deliberately left alone — mistakes are a
    /// historical record, not current state. Returns `false` (a reported
    /// no-op) when the ledger is empty or the session is completed.
    pub fn undo(&mut self) -> bool {
        if self.completed {
            return false;
        }
        let Some(last) = self.moves.pop() else {
            return false;
        };
        match last.change {
            MoveChange::SetDigit { previous, .. } | MoveChange::ClearCell { previous } => {
                *self.cell_mut(last.position) = previous;
            }
            MoveChange::ToggleNote { digit, added } => {
                let notes = self.cell(last.position).notes().unwrap_or(DigitSet::EMPTY);
                let mut notes = notes;
                if added {
                    notes.remove(digit);
                } else {
                    notes.insert(digit);
                }
                *self.cell_mut(last.position) = if notes.is_empty() {
                    CellState::Empty
                } else {
                    CellState::Notes(notes)
                };
            }
        }
        self.undo_count += 1;
        true
    }

    /// Pauses the session. Returns `false` if it was already paused.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.completed || self.is_paused() {
            return false;
        }
        self.pause_started_at_ms = Some(now_ms);
        true
    }

    /// Resumes a paused session. Returns `false` if it was not paused.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        let Some(pause_started) = self.pause_started_at_ms.take() else {
            return false;
        };
        self.total_paused_ms += now_ms.saturating_sub(pause_started);
        true
    }

    /// Returns active play time in milliseconds, excluding paused spans.
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let reference = self.pause_started_at_ms.unwrap_or(now_ms);
        reference
            .saturating_sub(self.started_at_ms)
            .saturating_sub(self.total_paused_ms)
    }

    /// Returns the elapsed time frozen at the moment of pause, or `0` when
    /// the session is running.
    #[must_use]
    pub fn paused_elapsed_ms(&self) -> u64 {
        match self.pause_started_at_ms {
            Some(pause_started) => self.elapsed_ms(pause_started),
            None => 0,
        }
    }

    /// Returns the positions of player digits that contradict the solution.
    #[must_use]
    pub fn incorrect_cells(&self) -> CellSet {
        let mut incorrect = CellSet::EMPTY;
        for pos in Position::ALL {
            if let CellState::Filled(digit) = self.cell(pos)
                && self.solution[pos] != Some(*digit)
            {
                incorrect.insert(pos);
            }
        }
        incorrect
    }

    /// Returns peers of `pos` currently holding `digit`, in row-major order.
    #[must_use]
    pub fn conflicting_peers(&self, pos: Position, digit: Digit) -> Vec<Position> {
        pos.house_peers()
            .into_iter()
            .filter(|peer| self.cell(*peer).as_digit() == Some(digit))
            .collect()
    }

    /// Returns the board as a plain grid of decided digits (givens and
    /// player entries).
    #[must_use]
    pub fn board_grid(&self) -> DigitGrid {
        let mut grid = DigitGrid::new();
        for pos in Position::ALL {
            grid.set(pos, self.cell(pos).as_digit());
        }
        grid
    }

    /// Returns a candidate grid derived from the board's decided digits.
    ///
    /// Empty and notes cells carry whatever candidates their peers allow;
    /// player notes are not consulted.
    #[must_use]
    pub fn to_candidate_grid(&self) -> CandidateGrid {
        CandidateGrid::from(self.board_grid())
    }

    /// Returns `true` if the board, as played, still has a solution.
    ///
    /// A `false` here is a state signal (the player has painted themselves
    /// into a corner), not an error: the game continues and hint requests
    /// fall back to error detection.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        Backtracker::new()
            .count_solutions(&self.board_grid(), 1)
            .map(|count| count > 0)
            .unwrap_or(false)
    }

    fn board_is_complete(&self) -> bool {
        for pos in Position::ALL {
            let Some(digit) = self.cell(pos).as_digit() else {
                return false;
            };
            if !self.conflicting_peers(pos, digit).is_empty() {
                return false;
            }
        }
        true
    }

    /// Aggregates the ledger and counters into an analytics summary.
    #[must_use]
    pub fn summary(&self, now_ms: u64) -> SessionSummary {
        let mut digits_placed = 0;
        let mut correct_moves = 0;
        let mut notes_toggled = 0;
        let mut cells_cleared = 0;
        for entry in &self.moves {
            match entry.change {
                MoveChange::SetDigit { correct, .. } => {
                    digits_placed += 1;
                    if correct {
                        correct_moves += 1;
                    }
                }
                MoveChange::ToggleNote { .. } => notes_toggled += 1,
                MoveChange::ClearCell { .. } => cells_cleared += 1,
            }
        }
        SessionSummary {
            difficulty: self.difficulty,
            total_moves: self.moves.len(),
            digits_placed,
            correct_moves,
            notes_toggled,
            cells_cleared,
            undo_count: self.undo_count,
            mistakes: self.mistakes,
            hints_used: self.hints_used,
            elapsed_ms: self.elapsed_ms(now_ms),
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use ninefold_generator::GeneratedPuzzle;

    use super::*;

    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn session_with_empty(positions: &[Position]) -> GameSession {
        let mut problem: DigitGrid = SOLVED.parse().unwrap();
        for pos in positions {
            problem.set(*pos, None);
        }
        let puzzle = GeneratedPuzzle {
            problem,
            solution: SOLVED.parse().unwrap(),
            difficulty: Difficulty::Medium,
            seed: PuzzleSeed::from_bytes([0; 32]),
        };
        GameSession::new(puzzle, 0)
    }

    #[test]
    fn test_place_digit_validates_fixed_cells() {
        let mut session = session_with_empty(&[Position::new(0, 0)]);
        // (1, 0) is a given; nothing about the session may change.
        let before = session.clone();
        assert_eq!(
            session.place_digit(Position::new(1, 0), Digit::D1, 1),
            Err(GameError::FixedCell)
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_correct_and_incorrect_entries() {
        let mut session = session_with_empty(&[Position::new(0, 0), Position::new(4, 4)]);

        // Solution holds 5 at (0, 0).
        let outcome = session.place_digit(Position::new(0, 0), Digit::D5, 1).unwrap();
        assert_eq!(outcome.correct, Some(true));
        assert_eq!(session.mistakes(), 0);

        // Solution holds 5 at (4, 4); enter 1 (conflicts with row peers).
        let outcome = session.place_digit(Position::new(4, 4), Digit::D1, 2).unwrap();
        assert_eq!(outcome.correct, Some(false));
        assert_eq!(session.mistakes(), 1);
        assert!(!outcome.conflicts.is_empty());
        assert!(session.incorrect_cells().contains(Position::new(4, 4)));
    }

    #[test]
    fn test_validate_digit_is_pure() {
        let mut session = session_with_empty(&[Position::new(0, 0), Position::new(4, 4)]);
        session.place_digit(Position::new(0, 0), Digit::D5, 1).unwrap();

        // A given cell is never a valid target.
        assert_eq!(
            session.validate_digit(Position::new(1, 0), Digit::D1),
            Err(GameError::FixedCell)
        );

        let before = session.clone();
        let first = session.validate_digit(Position::new(4, 4), Digit::D5).unwrap();
        let second = session.validate_digit(Position::new(4, 4), Digit::D5).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.correct, Some(true));
        assert_eq!(session, before);
    }

    #[test]
    fn test_reentering_same_digit_is_unchanged() {
        let mut session = session_with_empty(&[Position::new(0, 0)]);
        session.place_digit(Position::new(0, 0), Digit::D5, 1).unwrap();
        let ledger_len = session.moves().len();

        let outcome = session.place_digit(Position::new(0, 0), Digit::D5, 2).unwrap();
        assert!(!outcome.changed);
        assert_eq!(session.moves().len(), ledger_len);
    }

    #[test]
    fn test_undo_is_exact_inverse_of_last_move() {
        let positions = [Position::new(0, 0), Position::new(4, 4), Position::new(8, 8)];
        let mut session = session_with_empty(&positions);

        // Ledger [A, B, C].
        session.place_digit(positions[0], Digit::D5, 1).unwrap();
        session.place_digit(positions[1], Digit::D8, 2).unwrap();
        session.toggle_note(positions[2], Digit::D9, 3).unwrap();
        assert_eq!(session.moves().len(), 3);

        // One undo: board reflects A, B only.
        assert!(session.undo());
        assert_eq!(session.moves().len(), 2);
        assert!(session.cell(positions[2]).is_empty());
        assert_eq!(session.cell(positions[1]).as_digit(), Some(Digit::D8));

        assert!(session.undo());
        assert!(session.cell(positions[1]).is_empty());

        assert!(session.undo());
        assert!(session.cell(positions[0]).is_empty());

        // Empty ledger: reported no-op, not fatal.
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_restores_notes_under_digit() {
        let pos = Position::new(0, 0);
        let mut session = session_with_empty(&[pos]);
        session.toggle_note(pos, Digit::D2, 1).unwrap();
        session.toggle_note(pos, Digit::D5, 2).unwrap();
        session.place_digit(pos, Digit::D5, 3).unwrap();

        assert!(session.undo());
        assert_eq!(
            session.cell(pos).notes(),
            Some(DigitSet::from_iter([Digit::D2, Digit::D5]))
        );
    }

    #[test]
    fn test_mistakes_are_monotonic_across_undo() {
        let pos = Position::new(4, 4);
        let mut session = session_with_empty(&[pos]);

        session.place_digit(pos, Digit::D1, 1).unwrap(); // wrong: solution holds 5
        assert_eq!(session.mistakes(), 1);

        assert!(session.undo());
        assert!(session.cell(pos).is_empty());
        // Undo reverts the board, never the mistake history.
        assert_eq!(session.mistakes(), 1);
    }

    #[test]
    fn test_toggle_note_rules() {
        let pos = Position::new(0, 0);
        let mut session = session_with_empty(&[pos, Position::new(4, 4)]);

        session.toggle_note(pos, Digit::D1, 1).unwrap();
        assert_eq!(session.cell(pos).notes(), Some(DigitSet::from_elem(Digit::D1)));

        // Toggling the same note off empties the cell.
        session.toggle_note(pos, Digit::D1, 2).unwrap();
        assert!(session.cell(pos).is_empty());

        // Notes on a filled cell are rejected.
        session.place_digit(pos, Digit::D5, 3).unwrap();
        assert_eq!(
            session.toggle_note(pos, Digit::D1, 4),
            Err(GameError::FilledCell)
        );
        // And on a given cell.
        assert_eq!(
            session.toggle_note(Position::new(1, 0), Digit::D1, 5),
            Err(GameError::FixedCell)
        );
    }

    #[test]
    fn test_completion_on_last_correct_digit() {
        let pos = Position::new(8, 8);
        let mut session = session_with_empty(&[pos]);
        assert!(!session.is_completed());

        let outcome = session.place_digit(pos, Digit::D9, 1).unwrap();
        assert!(outcome.completed);
        assert!(session.is_completed());

        // A completed session accepts no further moves.
        assert_eq!(
            session.place_digit(pos, Digit::D1, 2),
            Err(GameError::SessionCompleted)
        );
    }

    #[test]
    fn test_pause_accounting() {
        let mut session = session_with_empty(&[Position::new(0, 0)]);

        assert_eq!(session.elapsed_ms(10_000), 10_000);

        assert!(session.pause(10_000));
        assert!(session.is_paused());
        assert_eq!(session.paused_elapsed_ms(), 10_000);
        // The clock is frozen while paused.
        assert_eq!(session.elapsed_ms(25_000), 10_000);

        // Moves are rejected while paused.
        assert_eq!(
            session.place_digit(Position::new(0, 0), Digit::D5, 20_000),
            Err(GameError::SessionPaused)
        );

        assert!(session.resume(30_000));
        assert_eq!(session.paused_elapsed_ms(), 0);
        // 20s of pause is excluded from elapsed time.
        assert_eq!(session.elapsed_ms(35_000), 15_000);

        // Double pause/resume are reported no-ops.
        assert!(!session.resume(36_000));
        assert!(session.pause(36_000));
        assert!(!session.pause(37_000));
    }

    #[test]
    fn test_is_solvable_reflects_player_errors() {
        let open = [
            Position::new(0, 0), // solution 5
            Position::new(4, 4), // solution 5
        ];
        let mut session = session_with_empty(&open);
        assert!(session.is_solvable());

        // A wrong digit that blocks the only completion makes the board
        // unsolvable; play continues regardless.
        session.place_digit(open[0], Digit::D9, 1).unwrap();
        assert!(!session.is_solvable());
        assert!(session.place_digit(open[1], Digit::D5, 2).is_ok());
    }

    #[test]
    fn test_summary_aggregates_ledger() {
        let open = [Position::new(0, 0), Position::new(4, 4)];
        let mut session = session_with_empty(&open);

        session.place_digit(open[0], Digit::D5, 1_000).unwrap();
        session.place_digit(open[1], Digit::D1, 2_000).unwrap(); // wrong
        session.undo();
        session.toggle_note(open[1], Digit::D5, 3_000).unwrap();

        let summary = session.summary(10_000);
        assert_eq!(summary.total_moves, 2);
        assert_eq!(summary.digits_placed, 1);
        assert_eq!(summary.correct_moves, 1);
        assert_eq!(summary.notes_toggled, 1);
        assert_eq!(summary.undo_count, 1);
        assert_eq!(summary.mistakes, 1);
        assert_eq!(summary.elapsed_ms, 10_000);
        assert!(!summary.completed);
    }
}

/// Aggregated per-session statistics derived from the move ledger.
///
/// The counts survive undo: the ledger shrinks, but mistakes and the undo
/// counter are monotonic, so analytics keep the full history of what the
/// player actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// The session's difficulty level.
    pub difficulty: Difficulty,
    /// Ledger length at summary time.
    pub total_moves: usize,
    /// Digit entries among the moves.
    pub digits_placed: usize,
    /// Digit entries that matched the solution.
    pub correct_moves: usize,
    /// Note toggles among the moves.
    pub notes_toggled: usize,
    /// Cell clears among the moves.
    pub cells_cleared: usize,
    /// How many single-step undos were performed.
    pub undo_count: u32,
    /// Monotonic mistake count.
    pub mistakes: u32,
    /// Hints consumed.
    pub hints_used: u32,
    /// Active play time, excluding pauses.
    pub elapsed_ms: u64,
    /// Whether the puzzle was completed.
    pub completed: bool,
}
