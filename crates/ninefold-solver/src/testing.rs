//! Test harness for technique implementations.

use std::str::FromStr as _;

use ninefold_core::{CandidateGrid, Digit, DigitGrid, DigitSet, Position};

use crate::technique::{Deduction, DeductionAction, Technique};

/// A test harness for verifying technique implementations.
///
/// The tester keeps the initial and current grid states so assertions can
/// compare before and after. Every `apply_*` call also cross-checks
/// `find_deduction` against `apply`: a technique must report a deduction
/// exactly when it would change the grid, and the reported actions must
/// actually hold in the post-application grid.
#[derive(Debug)]
pub(crate) struct TechniqueTester {
    initial: CandidateGrid,
    current: CandidateGrid,
}

impl TechniqueTester {
    pub(crate) fn new<T>(initial: T) -> Self
    where
        T: Into<CandidateGrid>,
    {
        let initial = initial.into();
        let current = initial.clone();
        Self { initial, current }
    }

    /// Creates a tester from a grid string (see `DigitGrid::from_str`).
    #[track_caller]
    pub(crate) fn from_str(s: &str) -> Self {
        let grid = DigitGrid::from_str(s).unwrap();
        Self::new(CandidateGrid::from(grid))
    }

    /// Applies the technique once.
    #[track_caller]
    pub(crate) fn apply_once<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        let before = self.current.clone();
        let changed = technique.apply(&mut self.current).unwrap();
        Self::assert_find_apply_consistent(technique, &before, &self.current, changed);
        self
    }

    /// Applies the technique repeatedly until it makes no more progress.
    #[track_caller]
    pub(crate) fn apply_until_stuck<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        loop {
            let before = self.current.clone();
            let changed = technique.apply(&mut self.current).unwrap();
            Self::assert_find_apply_consistent(technique, &before, &self.current, changed);
            if !changed {
                break;
            }
        }
        self
    }

    #[track_caller]
    fn assert_find_apply_consistent<T>(
        technique: &T,
        before: &CandidateGrid,
        after: &CandidateGrid,
        changed: bool,
    ) where
        T: Technique,
    {
        let name = technique.name();
        match technique.find_deduction(before).unwrap() {
            None => {
                assert!(
                    !changed,
                    "Expected {name} to report no change when find_deduction returned None"
                );
                assert_eq!(before, after, "Expected candidates to remain unchanged");
            }
            Some(deduction) => {
                assert!(
                    changed,
                    "Expected {name} to report a change when find_deduction returned a step"
                );
                Self::assert_deduction_holds(before, &deduction, after);
            }
        }
    }

    #[track_caller]
    fn assert_deduction_holds(before: &CandidateGrid, deduction: &Deduction, after: &CandidateGrid) {
        let name = deduction.technique();
        for action in deduction.actions() {
            match *action {
                DeductionAction::Placement { position, digit } => {
                    let candidates = after.candidates_at(position);
                    assert_eq!(
                        candidates.as_single(),
                        Some(digit),
                        "Expected {position} to be decided as {digit} after {name}, got {candidates:?}"
                    );
                }
                DeductionAction::Elimination { positions, digits } => {
                    for pos in positions {
                        for digit in digits {
                            if before.candidates_at(pos).contains(digit) {
                                assert!(
                                    !after.candidates_at(pos).contains(digit),
                                    "Expected {digit} removed from {pos} after {name}"
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    /// Asserts that a previously undecided cell is now decided as `digit`.
    #[track_caller]
    pub(crate) fn assert_placed(self, pos: Position, digit: Digit) -> Self {
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert!(
            initial.len() > 1,
            "Expected {pos} to start undecided, but candidates were {initial:?}"
        );
        assert_eq!(
            current.as_single(),
            Some(digit),
            "Expected {pos} to be decided as {digit}, but candidates are {current:?}"
        );
        self
    }

    /// Asserts that all of `digits` were removed from the cell's candidates.
    #[track_caller]
    pub(crate) fn assert_removed_includes<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert!(
            initial.is_superset(digits),
            "Expected initial candidates at {pos} to include {digits:?}, got {initial:?}"
        );
        assert!(
            (current & digits).is_empty(),
            "Expected all of {digits:?} removed from {pos}, but candidates are {current:?}"
        );
        self
    }

    /// Asserts that exactly `digits` were removed from the cell's candidates.
    #[track_caller]
    pub(crate) fn assert_removed_exact<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        let removed = initial.difference(current);
        assert_eq!(
            removed, digits,
            "Expected exactly {digits:?} removed from {pos}, but removed {removed:?}"
        );
        self
    }

    /// Asserts that the cell's candidates have not changed.
    #[track_caller]
    pub(crate) fn assert_no_change(self, pos: Position) -> Self {
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert_eq!(
            initial, current,
            "Expected no change at {pos}, but candidates changed from {initial:?} to {current:?}"
        );
        self
    }
}
