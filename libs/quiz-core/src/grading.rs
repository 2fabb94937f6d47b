//! Grading rule shared by the rendered page script and the Rust side.

use crate::types::LetterSet;
use serde::{Deserialize, Serialize};

/// Correctness tag of one rendered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTag {
    /// Position of the question block on the page (1-indexed).
    pub question: u32,
    pub letter: char,
    pub correct: bool,
}

/// Result of checking a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeOutcome {
    Correct,
    Incorrect,
    NoSelection,
}

impl GradeOutcome {
    /// Name used by the page script for feedback classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::NoSelection => "no_selection",
        }
    }
}

/// Grade a selection against one question's controls.
///
/// Correct only when every control's checked state equals its tag; there is
/// no partial credit.
pub fn grade(controls: &[ControlTag], selected: &LetterSet) -> GradeOutcome {
    if !controls.iter().any(|c| selected.contains(&c.letter)) {
        return GradeOutcome::NoSelection;
    }

    let all_match = controls
        .iter()
        .all(|c| selected.contains(&c.letter) == c.correct);

    if all_match {
        GradeOutcome::Correct
    } else {
        GradeOutcome::Incorrect
    }
}

/// Letters whose controls are tagged correct.
pub fn correct_letters(controls: &[ControlTag]) -> LetterSet {
    controls
        .iter()
        .filter(|c| c.correct)
        .map(|c| c.letter)
        .collect()
}
