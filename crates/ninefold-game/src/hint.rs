//! Hint composition.

use log::debug;
use ninefold_core::{Digit, Position};
use ninefold_solver::{
    TechniqueSolver,
    technique::{Deduction, NakedSingle},
};

use crate::{CellState, GameSession, HintError};

/// The kind of assistance a [`Hint`] offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// A cell whose value is forced; safe to fill automatically.
    Cell,
    /// A technique placing a digit the player should apply themselves.
    Technique,
    /// A technique that trims pencil-mark candidates.
    Note,
    /// A player-entered digit contradicts the solution.
    ErrorDetection,
    /// No actionable deduction; general advice only.
    Advisory,
}

impl HintKind {
    /// Returns the stable string identifier used at the DTO boundary.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            HintKind::Cell => "cell",
            HintKind::Technique => "technique",
            HintKind::Note => "note",
            HintKind::ErrorDetection => "error_detection",
            HintKind::Advisory => "advisory",
        }
    }
}

/// A user-facing hint.
///
/// Transient: produced on demand, rendered, and discarded — hints are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// What kind of assistance this is.
    pub kind: HintKind,
    /// The solving technique behind the hint, when one applies.
    pub technique: Option<&'static str>,
    /// Cells to highlight, in row-major order.
    pub target_cells: Vec<Position>,
    /// The digit to place, for placement hints.
    pub suggested_value: Option<Digit>,
    /// Human-readable explanation.
    pub message: String,
    /// Whether the UI may apply the hint without player confirmation.
    ///
    /// Only set for naked singles — the one case where the placement is
    /// unambiguous from the cell alone.
    pub auto_fill: bool,
}

fn cell_name(pos: Position) -> String {
    format!("row {}, column {}", pos.y() + 1, pos.x() + 1)
}

impl GameSession {
    /// Composes the next hint for the current board.
    ///
    /// Policy, in priority order:
    ///
    /// 1. **Error detection** — if any player digit contradicts the
    ///    solution, the hint points at the first such cell (row-major).
    /// 2. **Technique** — otherwise the technique engine supplies the
    ///    minimum sufficient deduction; a naked single becomes an
    ///    auto-fillable [`HintKind::Cell`], other placements become
    ///    [`HintKind::Technique`], and pure eliminations become
    ///    [`HintKind::Note`].
    /// 3. **Advisory** — no error and no deduction (the player may have
    ///    reached a contradiction through their notes, or the position
    ///    simply needs digits elsewhere first): a generic nudge that does
    ///    **not** consume hint budget, since it offers no concrete
    ///    progress.
    ///
    /// Cases 1 and 2 consume one unit of hint budget each.
    ///
    /// Given an identical board and budget state, the composed hint is
    /// identical — there is no hidden randomness.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::QuotaExceeded`] when the budget is spent. The
    /// check happens before composition, so a quota error never masquerades
    /// as "no hint available".
    pub fn hint(&mut self) -> Result<Hint, HintError> {
        if self.hints_used >= self.max_hints {
            return Err(HintError::QuotaExceeded);
        }

        if let Some(pos) = self.incorrect_cells().into_iter().next() {
            self.hints_used += 1;
            debug!("hint: error detection at {pos}");
            return Ok(Hint {
                kind: HintKind::ErrorDetection,
                technique: None,
                target_cells: vec![pos],
                suggested_value: None,
                message: format!("The digit at {} doesn't belong there.", cell_name(pos)),
                auto_fill: false,
            });
        }

        if let Some(hint) = self.technique_hint() {
            self.hints_used += 1;
            debug!("hint: {} ({:?})", hint.technique.unwrap_or("?"), hint.kind);
            return Ok(hint);
        }

        debug!("hint: advisory (no deduction available)");
        Ok(Hint {
            kind: HintKind::Advisory,
            technique: None,
            target_cells: Vec::new(),
            suggested_value: None,
            message: "No direct deduction is available — try a different cell, or double-check \
                      your pencil marks."
                .to_owned(),
            auto_fill: false,
        })
    }

    fn technique_hint(&self) -> Option<Hint> {
        let grid = self.to_candidate_grid();

        // Naked singles are scanned directly, cell by cell: the solver's
        // own scan skips placements with no peer eliminations, but a hint
        // wants those too.
        for pos in Position::ALL {
            match self.cell(pos) {
                CellState::Empty | CellState::Notes(_) => {}
                CellState::Given(_) | CellState::Filled(_) => continue,
            }
            let Some(deduction) = NakedSingle::deduction_at(&grid, pos) else {
                continue;
            };
            if !self.verify_deduction(&deduction) {
                return None;
            }
            let (position, digit) = deduction.placement()?;
            return Some(Hint {
                kind: HintKind::Cell,
                technique: Some(deduction.technique()),
                target_cells: vec![position],
                suggested_value: Some(digit),
                message: format!("Only {digit} can go at {}.", cell_name(position)),
                auto_fill: true,
            });
        }

        let solver = TechniqueSolver::with_all_techniques();
        let deduction = solver.find_deduction(&grid).ok()??;
        if !self.verify_deduction(&deduction) {
            return None;
        }

        if let Some((position, digit)) = deduction.placement() {
            Some(Hint {
                kind: HintKind::Technique,
                technique: Some(deduction.technique()),
                target_cells: vec![position],
                suggested_value: Some(digit),
                message: format!(
                    "A {} places {digit} at {}.",
                    deduction.technique(),
                    cell_name(position)
                ),
                auto_fill: false,
            })
        } else {
            Some(Hint {
                kind: HintKind::Note,
                technique: Some(deduction.technique()),
                target_cells: deduction.condition_cells().into_iter().collect(),
                suggested_value: None,
                message: format!(
                    "A {} here lets you trim pencil marks.",
                    deduction.technique()
                ),
                auto_fill: false,
            })
        }
    }

    /// Checks every placement of a deduction against the stored solution.
    fn verify_deduction(&self, deduction: &Deduction) -> bool {
        deduction
            .placement()
            .is_none_or(|(pos, digit)| self.solution()[pos] == Some(digit))
    }
}
