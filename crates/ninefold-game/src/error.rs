use derive_more::{Display, Error};

/// Error rejecting a session operation.
///
/// All rejections are synchronous and leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// The target cell is a given and cannot be modified.
    #[display("cannot modify a given cell")]
    FixedCell,
    /// Notes cannot be added to a cell holding a digit.
    #[display("cannot add a note to a filled cell")]
    FilledCell,
    /// The session has already been completed.
    #[display("session is already completed")]
    SessionCompleted,
    /// The session is paused; resume before making moves.
    #[display("session is paused")]
    SessionPaused,
    /// A new puzzle is being generated; moves are rejected, not queued.
    #[display("puzzle generation is in flight")]
    GenerationInFlight,
    /// No session is active.
    #[display("no active session")]
    NoActiveSession,
}

/// Error rejecting a hint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum HintError {
    /// The hint budget is spent.
    ///
    /// This is a distinct condition, never conflated with "no technique
    /// found" (which yields an advisory hint instead).
    #[display("hint budget exhausted")]
    QuotaExceeded,
}

/// Error reconstructing a session from its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DtoError {
    /// A digit value outside 0-9 appeared.
    #[display("invalid digit value: {_0}")]
    InvalidDigit(#[error(not(source))] u8),
    /// A coordinate outside 0-8 appeared.
    #[display("invalid coordinate: {_0}")]
    InvalidCoordinate(#[error(not(source))] u8),
    /// The difficulty identifier was not recognized.
    #[display("unknown difficulty: {_0:?}")]
    InvalidDifficulty(#[error(not(source))] String),
    /// A grid string failed to parse.
    #[display("invalid grid: {_0}")]
    InvalidGrid(#[error(not(source))] String),
    /// A notes key was not of the form `"row,col"`.
    #[display("invalid notes key: {_0:?}")]
    InvalidNotesKey(#[error(not(source))] String),
    /// Player state contradicts the puzzle (a value on a given cell).
    #[display("player value collides with a given cell")]
    GivenConflict,
}
