//! Per-document pipeline and the aggregate batch report.

use crate::discovery::{title_from_source_name, SourceDocument};
use chrono::{DateTime, Utc};
use quiz_core::{
    extract_correctness_tags, grading, normalize_document, parse, render_document, Diagnostic,
    NormalizeSettings, QuizDocument, StandalonePage,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What happened to one source file.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub name: String,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone)]
pub enum DocumentStatus {
    Rendered { document: QuizDocument, html: String },
    Failed { kind: String, message: String },
}

/// Parse, normalize and render one source document.
///
/// Failures are part of the outcome; this never returns an error.
pub fn process_document(source: &SourceDocument, settings: &NormalizeSettings) -> DocumentOutcome {
    let status = match &source.content {
        Err(message) => DocumentStatus::Failed {
            kind: "unreadable".to_string(),
            message: message.clone(),
        },
        Ok(content) => match parse(content, &title_from_source_name(&source.name)) {
            Err(e) => DocumentStatus::Failed {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
            Ok(mut document) => {
                normalize_document(&mut document, settings);
                let html = render_document(&document, &StandalonePage);
                DocumentStatus::Rendered { document, html }
            }
        },
    };

    DocumentOutcome {
        name: source.name.clone(),
        status,
    }
}

/// Check that the tags embedded in `html` give back every question's answer.
///
/// Returns the numbers of questions whose tags disagree.
pub fn verify_tags(document: &QuizDocument, html: &str) -> Vec<u32> {
    let tags = extract_correctness_tags(html);

    document
        .questions
        .iter()
        .enumerate()
        .filter(|(idx, question)| {
            let slot = *idx as u32 + 1;
            let block: Vec<_> = tags.iter().copied().filter(|t| t.question == slot).collect();
            grading::correct_letters(&block) != question.correct_letters
        })
        .map(|(_, question)| question.number)
        .collect()
}

/// One diagnostic, located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionIssue {
    pub question: u32,
    pub line: usize,
    pub diagnostic: Diagnostic,
}

/// Per-file section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub issues: Vec<QuestionIssue>,
}

/// Aggregate of a whole batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub files_processed: usize,
    pub files_failed: usize,
    pub questions: usize,
    pub low_confidence: usize,
    /// Diagnostic count per kind, failures included as `failed:<kind>`.
    pub diagnostics: BTreeMap<String, usize>,
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Fold outcomes into a report.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a DocumentOutcome>) -> Self {
        outcomes.into_iter().fold(Self::default(), Self::absorb)
    }

    fn absorb(mut self, outcome: &DocumentOutcome) -> Self {
        self.files_processed += 1;

        let entry = match &outcome.status {
            DocumentStatus::Failed { kind, message } => {
                self.files_failed += 1;
                *self.diagnostics.entry(format!("failed:{}", kind)).or_default() += 1;
                DocumentReport {
                    name: outcome.name.clone(),
                    title: None,
                    questions: 0,
                    error: Some(message.clone()),
                    issues: Vec::new(),
                }
            }
            DocumentStatus::Rendered { document, .. } => {
                self.questions += document.questions.len();
                self.low_confidence += document
                    .questions
                    .iter()
                    .filter(|q| q.is_low_confidence())
                    .count();

                let mut issues = Vec::new();
                for question in &document.questions {
                    for diagnostic in &question.diagnostics {
                        *self.diagnostics.entry(diagnostic.kind().to_string()).or_default() += 1;
                        issues.push(QuestionIssue {
                            question: question.number,
                            line: question.line,
                            diagnostic: diagnostic.clone(),
                        });
                    }
                }

                DocumentReport {
                    name: outcome.name.clone(),
                    title: Some(document.title.clone()),
                    questions: document.questions.len(),
                    error: None,
                    issues,
                }
            }
        };

        self.documents.push(entry);
        self
    }

    pub fn issue_count(&self) -> usize {
        self.documents.iter().map(|d| d.issues.len()).sum()
    }
}
