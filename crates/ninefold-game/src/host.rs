//! Session ownership and generation coordination.

use log::debug;
use ninefold_core::{Digit, Position};
use ninefold_generator::{
    Difficulty, GenerateError, GenerationHandle, PuzzleSeed, spawn_generation,
};

use crate::{GameError, GameSession, MoveOutcome};

/// The single owner of a game session and its puzzle generation.
///
/// The host enforces the session boundary discipline: at most one
/// generation is in flight at a time (requesting a new puzzle cancels the
/// previous request), and while one is running, moves are rejected with
/// [`GameError::GenerationInFlight`] rather than queued.
///
/// # Examples
///
/// ```no_run
/// use ninefold_game::SessionHost;
/// use ninefold_generator::Difficulty;
///
/// let mut host = SessionHost::new();
/// host.request_new_game(Difficulty::Medium, None);
/// // ...poll from the UI loop until the session appears:
/// while host.poll(0).is_none() {
///     std::thread::yield_now();
/// }
/// assert!(host.session().is_some());
/// ```
#[derive(Debug, Default)]
pub struct SessionHost {
    session: Option<GameSession>,
    generation: Option<GenerationHandle>,
}

impl SessionHost {
    /// Creates a host with no session and no generation in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a new puzzle in the background.
    ///
    /// Any generation already in flight is cancelled first; its result is
    /// discarded. The current session (if any) stays playable until the
    /// new puzzle arrives via [`poll`](Self::poll).
    pub fn request_new_game(&mut self, difficulty: Difficulty, seed: Option<PuzzleSeed>) {
        if let Some(previous) = self.generation.take() {
            debug!("superseding in-flight generation");
            previous.cancel();
        }
        self.generation = Some(spawn_generation(difficulty, seed));
    }

    /// Returns `true` while a generation is in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generation.is_some()
    }

    /// Polls the in-flight generation, installing the session when ready.
    ///
    /// Returns the newly-installed session on the call that completes the
    /// hand-off, `None` otherwise. A cancelled or failed generation is
    /// dropped silently — the previous session (if any) remains intact, so
    /// the UI never observes a half-generated board.
    pub fn poll(&mut self, now_ms: u64) -> Option<&GameSession> {
        let handle = self.generation.as_ref()?;
        match handle.try_result() {
            None => None,
            Some(Ok(puzzle)) => {
                self.generation = None;
                debug!("installing generated {} puzzle", puzzle.difficulty);
                self.session = Some(GameSession::new(puzzle, now_ms));
                self.session.as_ref()
            }
            Some(Err(GenerateError::Cancelled)) => {
                self.generation = None;
                None
            }
        }
    }

    /// Returns the active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Returns the active session mutably, if any.
    #[must_use]
    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    /// Replaces the active session (e.g. one restored from persistence).
    pub fn install_session(&mut self, session: GameSession) {
        self.session = Some(session);
    }

    fn active_session(&mut self) -> Result<&mut GameSession, GameError> {
        if self.generation.is_some() {
            return Err(GameError::GenerationInFlight);
        }
        self.session.as_mut().ok_or(GameError::NoActiveSession)
    }

    /// Places a digit, rejecting the move while generation is in flight.
    ///
    /// # Errors
    ///
    /// [`GameError::GenerationInFlight`] / [`GameError::NoActiveSession`],
    /// or whatever the session itself rejects.
    pub fn place_digit(
        &mut self,
        pos: Position,
        digit: Digit,
        now_ms: u64,
    ) -> Result<MoveOutcome, GameError> {
        self.active_session()?.place_digit(pos, digit, now_ms)
    }

    /// Clears a cell, rejecting the move while generation is in flight.
    ///
    /// # Errors
    ///
    /// Same as [`place_digit`](Self::place_digit).
    pub fn clear_cell(&mut self, pos: Position, now_ms: u64) -> Result<MoveOutcome, GameError> {
        self.active_session()?.clear_cell(pos, now_ms)
    }

    /// Toggles a note, rejecting the move while generation is in flight.
    ///
    /// # Errors
    ///
    /// Same as [`place_digit`](Self::place_digit).
    pub fn toggle_note(
        &mut self,
        pos: Position,
        digit: Digit,
        now_ms: u64,
    ) -> Result<MoveOutcome, GameError> {
        self.active_session()?.toggle_note(pos, digit, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn test_seed() -> PuzzleSeed {
        PuzzleSeed::from_str("1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")
            .unwrap()
    }

    #[test]
    fn test_moves_rejected_with_no_session() {
        let mut host = SessionHost::new();
        assert_eq!(
            host.place_digit(Position::new(0, 0), Digit::D1, 0),
            Err(GameError::NoActiveSession)
        );
    }

    #[test]
    fn test_moves_rejected_while_generating() {
        let mut host = SessionHost::new();
        host.request_new_game(Difficulty::Easy, Some(test_seed()));
        // Whether or not the worker already finished, the move is rejected
        // until poll() installs the session.
        assert_eq!(
            host.place_digit(Position::new(0, 0), Digit::D1, 0),
            Err(GameError::GenerationInFlight)
        );
    }

    #[test]
    fn test_poll_installs_session() {
        let mut host = SessionHost::new();
        host.request_new_game(Difficulty::Easy, Some(test_seed()));

        while host.poll(42).is_none() {
            assert!(host.is_generating());
            std::thread::yield_now();
        }
        assert!(!host.is_generating());

        let session = host.session().expect("session installed");
        assert_eq!(session.difficulty(), Difficulty::Easy);
        assert_eq!(session.seed(), test_seed());
    }

    #[test]
    fn test_new_request_supersedes_old() {
        let mut host = SessionHost::new();
        host.request_new_game(Difficulty::Expert, Some(test_seed()));
        host.request_new_game(Difficulty::Easy, Some(test_seed()));

        while host.poll(0).is_none() {
            std::thread::yield_now();
        }
        assert_eq!(
            host.session().unwrap().difficulty(),
            Difficulty::Easy
        );
    }
}
