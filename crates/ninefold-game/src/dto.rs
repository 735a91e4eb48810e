//! Serialization boundary for sessions and hints.
//!
//! The engine does not own persistence: a storage manager on the
//! application side serializes sessions to durable storage and restores
//! them later. These DTOs are the contract — plain serde structs in the
//! field shapes the application layer consumes (camelCase keys, a 9×9
//! value matrix with `0` for empty, and a notes map keyed `"row,col"`).

use std::collections::BTreeMap;

use ninefold_core::{Digit, DigitGrid, DigitSet, Position};
use ninefold_generator::{Difficulty, PuzzleSeed};
use serde::{Deserialize, Serialize};

use crate::{CellState, DtoError, GameSession, Hint, Move, MoveChange};

/// Board state: a value matrix plus pencil-mark notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDto {
    /// `values[row][col]` is the digit at that cell, `0` when empty.
    pub values: [[u8; 9]; 9],
    /// Notes keyed `"row,col"`, each an ascending list of digits.
    #[serde(default)]
    pub notes: BTreeMap<String, Vec<u8>>,
}

/// A note toggle inside a [`MoveDto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteChangeDto {
    /// The toggled digit.
    pub digit: u8,
    /// `true` if the note was added.
    pub added: bool,
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDto {
    /// Row of the edited cell (0-8).
    pub row: u8,
    /// Column of the edited cell (0-8).
    pub col: u8,
    /// Digit held before the edit, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_value: Option<u8>,
    /// Notes held before the edit, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_notes: Option<Vec<u8>>,
    /// Digit entered by the edit, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub new_value: Option<u8>,
    /// Present for note toggles.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note_change: Option<NoteChangeDto>,
    /// For digit entries: whether the digit matched the solution.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correct: Option<bool>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// A complete serialized session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    /// Difficulty identifier (`"beginner"`, …).
    pub difficulty: String,
    /// Generation seed, 64 hex characters.
    pub seed: String,
    /// The puzzle givens, 81 characters with `.` for empty.
    pub problem: String,
    /// The solution, 81 characters.
    pub solution: String,
    /// Current board state (givens, player digits, notes).
    pub board: BoardDto,
    /// The move ledger, oldest first.
    pub moves: Vec<MoveDto>,
    /// How many undos were performed over the session's lifetime.
    #[serde(default)]
    pub undo_count: u32,
    /// Session start, milliseconds since the Unix epoch.
    pub start_time: u64,
    /// Whether the session is paused.
    pub is_paused: bool,
    /// Whether the puzzle was completed.
    pub is_completed: bool,
    /// When the current pause began, if paused.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pause_start_time: Option<u64>,
    /// Total milliseconds spent paused before the current pause.
    pub total_paused_time: u64,
    /// Elapsed play time frozen at the moment of pause (`0` if running).
    pub paused_elapsed_time: u64,
    /// Hints consumed.
    pub hints_used: u32,
    /// Hint budget.
    pub max_hints: u32,
    /// Mistakes made (monotonic).
    pub mistakes: u32,
    /// Mistake budget.
    pub max_mistakes: u32,
}

/// A hint in the shape the display layer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintDto {
    /// Hint kind identifier (`"cell"`, `"technique"`, `"note"`,
    /// `"error_detection"`, `"advisory"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Technique name, when one applies.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub technique: Option<String>,
    /// Cells to highlight as `[row, col]` pairs.
    pub target_cells: Vec<[u8; 2]>,
    /// Digit to place, for placement hints.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggested_value: Option<u8>,
    /// Human-readable explanation.
    pub message: String,
    /// Whether the hint may be applied without confirmation.
    pub auto_fill: bool,
}

impl From<&Hint> for HintDto {
    fn from(hint: &Hint) -> Self {
        Self {
            kind: hint.kind.id().to_owned(),
            technique: hint.technique.map(str::to_owned),
            target_cells: hint
                .target_cells
                .iter()
                .map(|pos| [pos.y(), pos.x()])
                .collect(),
            suggested_value: hint.suggested_value.map(Digit::value),
            message: hint.message.clone(),
            auto_fill: hint.auto_fill,
        }
    }
}

fn digit_set_to_vec(notes: DigitSet) -> Vec<u8> {
    notes.into_iter().map(Digit::value).collect()
}

fn digit_set_from_vec(values: &[u8]) -> Result<DigitSet, DtoError> {
    let mut notes = DigitSet::new();
    for &value in values {
        notes.insert(Digit::try_from_value(value).ok_or(DtoError::InvalidDigit(value))?);
    }
    Ok(notes)
}

fn parse_position(row: u8, col: u8) -> Result<Position, DtoError> {
    if row > 8 {
        return Err(DtoError::InvalidCoordinate(row));
    }
    if col > 8 {
        return Err(DtoError::InvalidCoordinate(col));
    }
    Ok(Position::new(col, row))
}

impl From<&Move> for MoveDto {
    fn from(entry: &Move) -> Self {
        let (row, col) = (entry.position.y(), entry.position.x());
        let base = Self {
            row,
            col,
            previous_value: None,
            previous_notes: None,
            new_value: None,
            note_change: None,
            correct: None,
            timestamp: entry.timestamp_ms,
        };
        match entry.change {
            MoveChange::SetDigit {
                previous,
                digit,
                correct,
            } => Self {
                previous_value: previous.as_digit().map(Digit::value),
                previous_notes: previous.notes().map(digit_set_to_vec),
                new_value: Some(digit.value()),
                correct: Some(correct),
                ..base
            },
            MoveChange::ClearCell { previous } => Self {
                previous_value: previous.as_digit().map(Digit::value),
                previous_notes: previous.notes().map(digit_set_to_vec),
                ..base
            },
            MoveChange::ToggleNote { digit, added } => Self {
                note_change: Some(NoteChangeDto {
                    digit: digit.value(),
                    added,
                }),
                ..base
            },
        }
    }
}

fn previous_cell_state(dto: &MoveDto) -> Result<CellState, DtoError> {
    if let Some(notes) = &dto.previous_notes {
        let notes = digit_set_from_vec(notes)?;
        if !notes.is_empty() {
            return Ok(CellState::Notes(notes));
        }
    }
    match dto.previous_value {
        Some(value) => Ok(CellState::Filled(
            Digit::try_from_value(value).ok_or(DtoError::InvalidDigit(value))?,
        )),
        None => Ok(CellState::Empty),
    }
}

fn move_from_dto(dto: &MoveDto, solution: &DigitGrid) -> Result<Move, DtoError> {
    let position = parse_position(dto.row, dto.col)?;
    let change = if let Some(note_change) = &dto.note_change {
        MoveChange::ToggleNote {
            digit: Digit::try_from_value(note_change.digit)
                .ok_or(DtoError::InvalidDigit(note_change.digit))?,
            added: note_change.added,
        }
    } else if let Some(value) = dto.new_value {
        let digit = Digit::try_from_value(value).ok_or(DtoError::InvalidDigit(value))?;
        MoveChange::SetDigit {
            previous: previous_cell_state(dto)?,
            digit,
            // Correctness is re-derived from the solution rather than
            // trusted from storage.
            correct: solution[position] == Some(digit),
        }
    } else {
        MoveChange::ClearCell {
            previous: previous_cell_state(dto)?,
        }
    };
    Ok(Move {
        position,
        change,
        timestamp_ms: dto.timestamp,
    })
}

impl GameSession {
    /// Serializes the session into its DTO form.
    #[must_use]
    pub fn to_dto(&self) -> SessionDto {
        let mut values = [[0u8; 9]; 9];
        let mut notes = BTreeMap::new();
        for pos in Position::ALL {
            let cell = self.cell(pos);
            if let Some(digit) = cell.as_digit() {
                values[usize::from(pos.y())][usize::from(pos.x())] = digit.value();
            }
            if let Some(cell_notes) = cell.notes() {
                notes.insert(
                    format!("{},{}", pos.y(), pos.x()),
                    digit_set_to_vec(cell_notes),
                );
            }
        }

        let mut problem = DigitGrid::new();
        for pos in Position::ALL {
            if let CellState::Given(digit) = self.cell(pos) {
                problem.set(pos, Some(*digit));
            }
        }

        SessionDto {
            difficulty: self.difficulty.id().to_owned(),
            seed: self.seed.to_string(),
            problem: problem.to_string(),
            solution: self.solution.to_string(),
            board: BoardDto { values, notes },
            moves: self.moves.iter().map(MoveDto::from).collect(),
            undo_count: self.undo_count,
            start_time: self.started_at_ms,
            is_paused: self.is_paused(),
            is_completed: self.completed,
            pause_start_time: self.pause_started_at_ms,
            total_paused_time: self.total_paused_ms,
            paused_elapsed_time: self.paused_elapsed_ms(),
            hints_used: self.hints_used,
            max_hints: self.max_hints,
            mistakes: self.mistakes,
            max_mistakes: self.max_mistakes,
        }
    }

    /// Reconstructs a session from its DTO form.
    ///
    /// Move correctness flags are re-derived from the solution; notes
    /// attached to cells that hold digits are dropped as stale.
    ///
    /// # Errors
    ///
    /// Returns a [`DtoError`] when the stored data is malformed or the
    /// player state contradicts the puzzle givens.
    pub fn from_dto(dto: &SessionDto) -> Result<Self, DtoError> {
        let difficulty: Difficulty = dto
            .difficulty
            .parse()
            .map_err(|_| DtoError::InvalidDifficulty(dto.difficulty.clone()))?;
        let seed: PuzzleSeed = dto
            .seed
            .parse()
            .map_err(|_| DtoError::InvalidGrid(dto.seed.clone()))?;
        let problem: DigitGrid = dto
            .problem
            .parse()
            .map_err(|_| DtoError::InvalidGrid(dto.problem.clone()))?;
        let solution: DigitGrid = dto
            .solution
            .parse()
            .map_err(|_| DtoError::InvalidGrid(dto.solution.clone()))?;

        let mut cells = [CellState::Empty; 81];
        for pos in Position::ALL {
            let value = dto.board.values[usize::from(pos.y())][usize::from(pos.x())];
            let digit = match value {
                0 => None,
                _ => Some(Digit::try_from_value(value).ok_or(DtoError::InvalidDigit(value))?),
            };
            cells[usize::from(pos.index())] = match (problem[pos], digit) {
                (Some(given), Some(entered)) if given == entered => CellState::Given(given),
                (Some(_), Some(_) | None) => return Err(DtoError::GivenConflict),
                (None, Some(entered)) => CellState::Filled(entered),
                (None, None) => CellState::Empty,
            };
        }

        for (key, note_values) in &dto.board.notes {
            let (row, col) = key
                .split_once(',')
                .ok_or_else(|| DtoError::InvalidNotesKey(key.clone()))?;
            let row: u8 = row
                .trim()
                .parse()
                .map_err(|_| DtoError::InvalidNotesKey(key.clone()))?;
            let col: u8 = col
                .trim()
                .parse()
                .map_err(|_| DtoError::InvalidNotesKey(key.clone()))?;
            let pos = parse_position(row, col)?;
            let notes = digit_set_from_vec(note_values)?;
            if cells[usize::from(pos.index())].is_empty() && !notes.is_empty() {
                cells[usize::from(pos.index())] = CellState::Notes(notes);
            }
        }

        let moves = dto
            .moves
            .iter()
            .map(|entry| move_from_dto(entry, &solution))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            cells,
            solution,
            difficulty,
            seed,
            moves,
            undo_count: dto.undo_count,
            hints_used: dto.hints_used,
            max_hints: dto.max_hints,
            mistakes: dto.mistakes,
            max_mistakes: dto.max_mistakes,
            started_at_ms: dto.start_time,
            pause_started_at_ms: dto.pause_start_time,
            total_paused_ms: dto.total_paused_time,
            completed: dto.is_completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use ninefold_generator::GeneratedPuzzle;

    use super::*;
    use crate::HintKind;

    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn test_session() -> GameSession {
        let mut problem: DigitGrid = SOLVED.parse().unwrap();
        problem.set(Position::new(0, 0), None);
        problem.set(Position::new(1, 0), None);
        problem.set(Position::new(4, 4), None);
        let puzzle = GeneratedPuzzle {
            problem,
            solution: SOLVED.parse().unwrap(),
            difficulty: Difficulty::Medium,
            seed: PuzzleSeed::from_bytes([3; 32]),
        };
        GameSession::new(puzzle, 1_000)
    }

    #[test]
    fn test_session_round_trip() {
        let mut session = test_session();
        session.place_digit(Position::new(0, 0), Digit::D5, 2_000).unwrap();
        session.place_digit(Position::new(1, 0), Digit::D9, 3_000).unwrap(); // wrong
        session.toggle_note(Position::new(4, 4), Digit::D5, 4_000).unwrap();
        session.pause(5_000);

        let dto = session.to_dto();
        let restored = GameSession::from_dto(&dto).unwrap();
        assert_eq!(session, restored);
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let mut session = test_session();
        session.place_digit(Position::new(0, 0), Digit::D5, 2_000).unwrap();

        let json = serde_json::to_string(&session.to_dto()).unwrap();
        let dto: SessionDto = serde_json::from_str(&json).unwrap();
        assert_eq!(GameSession::from_dto(&dto).unwrap(), session);
    }

    #[test]
    fn test_dto_field_names_are_camel_case() {
        let session = test_session();
        let value = serde_json::to_value(session.to_dto()).unwrap();
        for key in [
            "startTime",
            "isPaused",
            "isCompleted",
            "totalPausedTime",
            "pausedElapsedTime",
            "hintsUsed",
            "maxHints",
            "mistakes",
            "maxMistakes",
            "moves",
            "board",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_board_dto_shape() {
        let mut session = test_session();
        session.toggle_note(Position::new(0, 0), Digit::D1, 2_000).unwrap();
        session.toggle_note(Position::new(0, 0), Digit::D5, 2_500).unwrap();

        let dto = session.to_dto();
        // (0, 0) is empty of value, row 4 col 4 was carved out too.
        assert_eq!(dto.board.values[0][0], 0);
        assert_eq!(dto.board.values[0][2], 4);
        assert_eq!(dto.board.notes.get("0,0"), Some(&vec![1, 5]));
    }

    #[test]
    fn test_hint_dto_shape() {
        let hint = Hint {
            kind: HintKind::Cell,
            technique: Some("Naked Single"),
            target_cells: vec![Position::new(6, 0)],
            suggested_value: Some(Digit::D9),
            message: "Only 9 can go at row 1, column 7.".to_owned(),
            auto_fill: true,
        };
        let value = serde_json::to_value(HintDto::from(&hint)).unwrap();
        assert_eq!(value["type"], "cell");
        assert_eq!(value["technique"], "Naked Single");
        assert_eq!(value["targetCells"], serde_json::json!([[0, 6]]));
        assert_eq!(value["suggestedValue"], 9);
        assert_eq!(value["autoFill"], true);
    }

    #[test]
    fn test_from_dto_rejects_given_conflict() {
        let session = test_session();
        let mut dto = session.to_dto();
        // Overwrite a given cell with a different digit.
        dto.board.values[8][8] = 1;
        assert_eq!(
            GameSession::from_dto(&dto),
            Err(DtoError::GivenConflict)
        );
    }

    #[test]
    fn test_from_dto_rejects_bad_values() {
        let session = test_session();
        let mut dto = session.to_dto();
        dto.board.values[0][0] = 12;
        assert_eq!(
            GameSession::from_dto(&dto),
            Err(DtoError::InvalidDigit(12))
        );

        let mut dto = session.to_dto();
        dto.difficulty = "legendary".to_owned();
        assert_eq!(
            GameSession::from_dto(&dto),
            Err(DtoError::InvalidDifficulty("legendary".to_owned()))
        );
    }
}
