//! Error types for quiz-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Document-level parse failures.
///
/// Problems with a single question never surface here; they are attached to
/// the question as [`crate::Diagnostic`]s.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed document: no question sections found in {lines} lines")]
    MalformedDocument { lines: usize },

    #[error("empty file")]
    EmptyFile,
}

impl ParseError {
    /// Short category name for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedDocument { .. } => "malformed_document",
            Self::EmptyFile => "empty_file",
        }
    }
}
