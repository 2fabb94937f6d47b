//! Answer inference and repair for parsed questions.
//!
//! Sources are consulted in priority order:
//! 1. explicit "Correct Answers:" declarations
//! 2. check glyphs next to option text ([`checkmark`])
//! 3. correctness phrases near option references ([`phrase`])
//! 4. a type-based default, flagged low-confidence
//!
//! Only an explicit declaration is written back as the canonical
//! `**Correct Answers:**` line. Heuristic answers are re-derived on every
//! pass, so a later run can still tell them apart from a declared answer.

pub mod checkmark;
pub mod declaration;
pub mod phrase;

use crate::types::{
    AnswerResolution, AnswerSource, Diagnostic, LetterSet, NormalizeSettings, Question,
    QuestionType, QuizDocument,
};

/// Trait for prose heuristics that infer correct options.
pub trait AnswerHeuristic: Send + Sync {
    /// Source tag attached to letters found by this heuristic.
    fn source(&self) -> AnswerSource;

    /// Letters this heuristic considers correct, given the explanation with
    /// declarations already removed.
    fn detect(&self, question: &Question, prose: &str) -> LetterSet;
}

/// Heuristics in priority order.
pub fn heuristics() -> [Box<dyn AnswerHeuristic>; 2] {
    [Box::new(checkmark::Checkmark), Box::new(phrase::Phrase)]
}

/// Everything the sources found for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    pub explicit: LetterSet,
    pub checkmark: LetterSet,
    pub phrase: LetterSet,
}

impl Evidence {
    /// Gather evidence from the explanation of `question`.
    pub fn collect(question: &Question) -> Self {
        let prose = declaration::strip_declarations(&question.explanation);
        let mut evidence = Self {
            explicit: declaration::declared_letters(&question.explanation),
            ..Self::default()
        };
        evidence.explicit.retain(|l| question.has_letter(*l));

        for heuristic in heuristics() {
            let found = heuristic.detect(question, &prose);
            match heuristic.source() {
                AnswerSource::Checkmark => evidence.checkmark = found,
                AnswerSource::Phrase => evidence.phrase = found,
                AnswerSource::Explicit | AnswerSource::Default => {}
            }
        }

        evidence
    }

    /// Union of the prose heuristics.
    pub fn heuristic(&self) -> LetterSet {
        self.checkmark.union(&self.phrase).copied().collect()
    }
}

/// Outcome of reconciling the evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub resolution: Option<AnswerResolution>,
    pub mismatch: Option<Diagnostic>,
}

/// Pick the answer from gathered evidence, falling back to `default`.
pub fn reconcile(evidence: &Evidence, default: Option<char>) -> Reconciled {
    let heuristic = evidence.heuristic();

    if !evidence.explicit.is_empty() {
        let mismatch = (!heuristic.is_empty() && heuristic != evidence.explicit).then(|| {
            Diagnostic::CorrectAnswerMismatch {
                explicit: evidence.explicit.clone(),
                heuristic: heuristic.clone(),
            }
        });
        return Reconciled {
            resolution: Some(AnswerResolution {
                source: AnswerSource::Explicit,
                letters: evidence.explicit.clone(),
            }),
            mismatch,
        };
    }

    let resolution = if !heuristic.is_empty() {
        let source = if evidence.checkmark.is_empty() {
            AnswerSource::Phrase
        } else {
            AnswerSource::Checkmark
        };
        Some(AnswerResolution {
            source,
            letters: heuristic,
        })
    } else {
        default.map(|letter| AnswerResolution {
            source: AnswerSource::Default,
            letters: LetterSet::from([letter]),
        })
    };

    Reconciled {
        resolution,
        mismatch: None,
    }
}

/// Normalize every question of a document.
pub fn normalize_document(document: &mut QuizDocument, settings: &NormalizeSettings) {
    for question in &mut document.questions {
        normalize_question(question, settings);
    }
}

/// Resolve `correct_letters` and repair formatting of a single question.
///
/// Running this twice on the same question gives the same result.
pub fn normalize_question(question: &mut Question, settings: &NormalizeSettings) {
    repair_formatting(question);
    question.diagnostics.retain(|d| !is_normalizer_diagnostic(d));

    if settings.infer_unknown_types
        && question.question_type == QuestionType::Unknown
        && is_true_false(question)
    {
        question.question_type = QuestionType::TrueFalse;
    }

    let evidence = Evidence::collect(question);

    if settings.infer_unknown_types
        && question.question_type == QuestionType::Unknown
        && !question.options.is_empty()
    {
        let found = if evidence.explicit.is_empty() {
            evidence.heuristic().len()
        } else {
            evidence.explicit.len()
        };
        question.question_type = if found > 1 {
            QuestionType::MultiSelect
        } else {
            QuestionType::MultipleChoice
        };
    }

    let default = if settings.apply_type_default {
        default_letter(question)
    } else {
        None
    };
    let reconciled = reconcile(&evidence, default);

    if let Some(mismatch) = reconciled.mismatch {
        question.push_diagnostic(mismatch);
    }

    match reconciled.resolution {
        Some(resolution) => {
            match resolution.source {
                AnswerSource::Explicit => rewrite_explanation(question, &resolution.letters),
                AnswerSource::Default => question.push_diagnostic(Diagnostic::LowConfidence),
                AnswerSource::Checkmark | AnswerSource::Phrase => {}
            }
            question.correct_letters = resolution.letters.clone();
            question.resolution = Some(resolution);
        }
        None => {
            // Nothing in the text and no default to fall back on.
            question.push_diagnostic(Diagnostic::LowConfidence);
            question.correct_letters.clear();
            question.resolution = None;
        }
    }

    check_arity(question);
}

fn is_normalizer_diagnostic(diagnostic: &Diagnostic) -> bool {
    matches!(
        diagnostic,
        Diagnostic::InvalidArity { .. }
            | Diagnostic::CorrectAnswerMismatch { .. }
            | Diagnostic::LowConfidence
    )
}

fn is_true_false(question: &Question) -> bool {
    let mut texts: Vec<String> = question
        .options
        .iter()
        .map(|o| o.text.trim().to_lowercase())
        .collect();
    texts.sort();
    texts == ["false", "true"]
}

/// Guess used when nothing in the text points at an answer.
fn default_letter(question: &Question) -> Option<char> {
    let first = question.options.first().map(|o| o.letter);
    match question.question_type {
        QuestionType::TrueFalse => question
            .options
            .iter()
            .find(|o| o.text.trim().eq_ignore_ascii_case("false"))
            .map(|o| o.letter)
            .or(first),
        QuestionType::MultipleChoice | QuestionType::MultiSelect => first,
        QuestionType::Unknown => None,
    }
}

/// Put a single canonical declaration first, dropping all others.
fn rewrite_explanation(question: &mut Question, letters: &LetterSet) {
    let prose = declaration::strip_declarations(&question.explanation);
    let line = declaration::canonical_line(letters);
    question.explanation = if prose.is_empty() {
        line
    } else {
        format!("{}\n{}", line, prose)
    };
}

fn check_arity(question: &mut Question) {
    let found = question.correct_letters.len();
    let expected = match question.question_type {
        QuestionType::TrueFalse | QuestionType::MultipleChoice if found != 1 => "exactly one",
        QuestionType::MultiSelect if found == 0 => "at least one",
        _ => return,
    };
    question.push_diagnostic(Diagnostic::InvalidArity {
        expected: expected.to_string(),
        found,
    });
}

/// Collapse whitespace in option text; prompts only get trimmed since they
/// may hold indented code.
fn repair_formatting(question: &mut Question) {
    for option in &mut question.options {
        option.text = option.text.split_whitespace().collect::<Vec<_>>().join(" ");
    }
    question.prompt = question.prompt.trim().to_string();
}
