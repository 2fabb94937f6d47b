//! Core quiz library used by the site builder.
//!
//! Provides:
//! - Markdown parser for quiz files
//! - Answer normalizer (explicit declarations, checkmark and phrase heuristics)
//! - HTML renderer with client-side grading
//! - Canonical markdown writer
//! - Shared types (Question, QuizDocument, Diagnostic, etc.)

pub mod error;
pub mod grading;
pub mod normalizer;
pub mod parser;
pub mod renderer;
pub mod types;
pub mod writer;

pub use error::{ParseError, Result};
pub use grading::{grade, ControlTag, GradeOutcome};
pub use normalizer::{normalize_document, normalize_question, AnswerHeuristic};
pub use parser::parse;
pub use renderer::{
    extract_correctness_tags, render_document, render_question, PageTemplate, StandalonePage,
};
pub use types::{
    AnswerResolution, AnswerSource, Diagnostic, LetterSet, NormalizeSettings, Question,
    QuestionType, QuizDocument, QuizOption,
};
pub use writer::to_markdown;
