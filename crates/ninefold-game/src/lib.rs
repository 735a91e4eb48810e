//! Game session management for the ninefold Sudoku engine.
//!
//! A [`GameSession`] owns one puzzle in play: the board of
//! [`CellState`]s, the hidden solution, the append-only move ledger with
//! single-step undo, mistake and hint budgets, and pause-aware timing. The
//! engine never reads a clock — every mutating call takes a caller-supplied
//! `now_ms` timestamp, which keeps sessions deterministic under test and
//! replay.
//!
//! [`SessionHost`] wraps a session together with at most one in-flight
//! background generation, rejecting moves while a new puzzle is being
//! prepared.
//!
//! The [`dto`] module is the serialization boundary: plain serde structs in
//! the shapes the surrounding application persists and renders.

pub use self::{
    cell::CellState,
    error::{DtoError, GameError, HintError},
    hint::{Hint, HintKind},
    host::SessionHost,
    moves::{Move, MoveChange, MoveOutcome},
    session::{GameSession, SessionSummary},
};

mod cell;
pub mod dto;
mod error;
mod hint;
mod host;
mod moves;
mod session;
