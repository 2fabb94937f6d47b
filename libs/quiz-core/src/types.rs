//! Core types for quiz documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sorted, deduplicated set of option letters.
pub type LetterSet = BTreeSet<char>;

/// Kind of question, taken from the header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    TrueFalse,
    MultipleChoice,
    MultiSelect,
    Unknown,
}

impl Default for QuestionType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl QuestionType {
    /// Parse a header label such as "True/False" or "multi select".
    ///
    /// Case, spaces, slashes and hyphens are ignored.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "truefalse" | "tf" => Self::TrueFalse,
            "multiplechoice" | "singlechoice" | "mcq" => Self::MultipleChoice,
            "multiselect" | "multipleselect" | "selectall" | "selectallthatapply"
            | "multipleanswer" | "multipleanswers" | "multipleresponse" => Self::MultiSelect,
            _ => Self::Unknown,
        }
    }

    /// Canonical header label, `None` for unknown types.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::TrueFalse => Some("True/False"),
            Self::MultipleChoice => Some("Multiple Choice"),
            Self::MultiSelect => Some("Multi-Select"),
            Self::Unknown => None,
        }
    }

    /// Name used in markup and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrueFalse => "true_false",
            Self::MultipleChoice => "multiple_choice",
            Self::MultiSelect => "multi_select",
            Self::Unknown => "unknown",
        }
    }

    /// Whether exactly one option may be correct.
    pub fn is_single_answer(self) -> bool {
        matches!(self, Self::TrueFalse | Self::MultipleChoice)
    }
}

/// A lettered answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub letter: char,
    pub text: String,
}

impl QuizOption {
    pub fn new(letter: char, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
        }
    }
}

/// Where a question's resolved answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// A "Correct Answers:" declaration in the explanation.
    Explicit,
    /// A check glyph next to the option text.
    Checkmark,
    /// A correctness phrase near a reference to the option.
    Phrase,
    /// Type-based guess, no textual evidence.
    Default,
}

impl AnswerSource {
    /// Whether the letters were derived from the text rather than guessed.
    pub fn is_derived(self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Resolved answer tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResolution {
    pub source: AnswerSource,
    pub letters: LetterSet,
}

/// Non-fatal defect found while parsing or normalizing a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No option lines could be parsed.
    Incomplete,
    /// No answer block was found.
    MissingAnswer,
    /// Number of correct letters does not fit the question type.
    InvalidArity { expected: String, found: usize },
    /// Explicit declaration disagrees with the prose heuristics.
    CorrectAnswerMismatch {
        explicit: LetterSet,
        heuristic: LetterSet,
    },
    /// Answer is a type-based guess.
    LowConfidence,
    /// An explicit option letter was used twice and got relabeled.
    DuplicateLetter { letter: char, relabeled: char },
    /// Question number is out of sequence.
    Numbering { expected: u32, found: u32 },
    /// A code fence opened in this question was never closed.
    UnclosedFence,
}

impl Diagnostic {
    /// Stable category name, used as a report key.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::MissingAnswer => "missing_answer",
            Self::InvalidArity { .. } => "invalid_arity",
            Self::CorrectAnswerMismatch { .. } => "correct_answer_mismatch",
            Self::LowConfidence => "low_confidence",
            Self::DuplicateLetter { .. } => "duplicate_letter",
            Self::Numbering { .. } => "numbering",
            Self::UnclosedFence => "unclosed_fence",
        }
    }
}

/// A single parsed quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub question_type: QuestionType,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub correct_letters: LetterSet,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<AnswerResolution>,
    pub diagnostics: Vec<Diagnostic>,
    /// Line of the question header (1-indexed).
    pub line: usize,
}

impl Question {
    pub fn new(number: u32, question_type: QuestionType) -> Self {
        Self {
            number,
            question_type,
            prompt: String::new(),
            options: Vec::new(),
            correct_letters: LetterSet::new(),
            explanation: String::new(),
            resolution: None,
            diagnostics: Vec::new(),
            line: 0,
        }
    }

    /// Letters of all options, in option order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.options.iter().map(|o| o.letter)
    }

    pub fn has_letter(&self, letter: char) -> bool {
        self.options.iter().any(|o| o.letter == letter)
    }

    pub fn is_correct(&self, letter: char) -> bool {
        self.correct_letters.contains(&letter)
    }

    pub fn has_diagnostic(&self, kind: &str) -> bool {
        self.diagnostics.iter().any(|d| d.kind() == kind)
    }

    /// Append a diagnostic unless an equal one is already attached.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Whether no text backs the answer, so it needs manual review.
    pub fn is_low_confidence(&self) -> bool {
        self.diagnostics.contains(&Diagnostic::LowConfidence)
    }
}

/// A parsed quiz file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDocument {
    pub title: String,
    /// Prose between the title and the first question.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preamble: String,
    pub questions: Vec<Question>,
}

impl QuizDocument {
    /// All diagnostics in question order, paired with the question number.
    pub fn diagnostics(&self) -> impl Iterator<Item = (u32, &Diagnostic)> + '_ {
        self.questions
            .iter()
            .flat_map(|q| q.diagnostics.iter().map(move |d| (q.number, d)))
    }
}

/// Toggles for the normalizer's optional repairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSettings {
    /// Infer a type for questions whose header has no recognizable label.
    pub infer_unknown_types: bool,
    /// Fall back to a type-based guess when no evidence exists.
    pub apply_type_default: bool,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            infer_unknown_types: true,
            apply_type_default: true,
        }
    }
}
