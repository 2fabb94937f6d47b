//! Correctness-phrase correlation.
//!
//! Works clause by clause: an option is confirmed when a clause that
//! references it also says something like "is correct", and vetoed when any
//! clause that references it says something like "is wrong". A veto always
//! beats a confirmation.

use super::AnswerHeuristic;
use crate::types::{AnswerSource, LetterSet, Question};
use regex::Regex;
use std::sync::LazyLock;

static CLAUSE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\n;!?]|\.\s+|,\s+|\s(?:but|whereas|while|however)\s").expect("valid regex")
});

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:is|are)\s+(?:the\s+)?(?:correct|right|true|best)\b|\bbest\s+(?:choice|answer|option)\b|\b(?:correct|right)\s+(?:answer|choice|option)s?\s+(?:is|are)\b",
    )
    .expect("valid regex")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bincorrect\b|\bwrong\b|\b(?:is|are)\s+(?:false|not)\b|\bnot\s+(?:the\s+|a\s+)?(?:correct|right|true|best)\b|\b(?:isn|aren)['’]?t\b",
    )
    .expect("valid regex")
});

static OPTION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:option|answer|choice|letter)\s*\(?([a-z])\b").expect("valid regex")
});

/// `False is correct`: a capitalized boolean as the subject of a verdict.
static BOOLEAN_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(True|False)\s+(?:is|are)\b").expect("valid regex"));

static CAPITAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]\b").expect("valid regex"));

/// Words that may follow a bare `A` or `I` used as an option letter.
const LETTER_FOLLOWERS: [&str; 8] = ["is", "are", "and", "or", "was", "were", "only", "also"];

/// Option texts shorter than this are too ambiguous to match in prose.
const MIN_LITERAL_LEN: usize = 4;

pub struct Phrase;

impl AnswerHeuristic for Phrase {
    fn source(&self) -> AnswerSource {
        AnswerSource::Phrase
    }

    fn detect(&self, question: &Question, prose: &str) -> LetterSet {
        let mut confirmed = LetterSet::new();
        let mut vetoed = LetterSet::new();

        for clause in CLAUSE_BREAK.split(prose) {
            let positive = POSITIVE.is_match(clause);
            let negative = NEGATIVE.is_match(clause);
            if !positive && !negative {
                continue;
            }

            for letter in referenced_letters(question, clause) {
                if negative {
                    vetoed.insert(letter);
                } else {
                    confirmed.insert(letter);
                }
            }
        }

        confirmed.difference(&vetoed).copied().collect()
    }
}

/// Option letters a clause talks about, by letter or by literal text.
fn referenced_letters(question: &Question, clause: &str) -> LetterSet {
    let mut letters = LetterSet::new();

    for caps in OPTION_WORD.captures_iter(clause) {
        if let Some(c) = caps[1].chars().next() {
            letters.insert(c.to_ascii_uppercase());
        }
    }

    for m in CAPITAL.find_iter(clause) {
        let Some(letter) = m.as_str().chars().next() else {
            continue;
        };
        if is_letter_reference(clause, m.start(), m.end(), letter) {
            letters.insert(letter);
        }
    }

    let lowered = clause.to_lowercase();
    for option in &question.options {
        let text = option.text.trim().to_lowercase();
        if text.chars().count() < MIN_LITERAL_LEN || text == "true" || text == "false" {
            continue;
        }
        if contains_word(&lowered, &text) {
            letters.insert(option.letter);
        }
    }

    for caps in BOOLEAN_SUBJECT.captures_iter(clause) {
        let word = caps[1].to_lowercase();
        if let Some(option) = question
            .options
            .iter()
            .find(|o| o.text.trim().eq_ignore_ascii_case(&word))
        {
            letters.insert(option.letter);
        }
    }

    letters.retain(|l| question.has_letter(*l));
    letters
}

fn is_letter_reference(clause: &str, start: usize, end: usize, letter: char) -> bool {
    let before = clause[..start].chars().next_back();
    let after = clause[end..].chars().next();
    // Contractions and possessives: I'm, A's
    if matches!(before, Some('\'' | '’')) || matches!(after, Some('\'' | '’')) {
        return false;
    }
    if letter != 'A' && letter != 'I' {
        return true;
    }

    // "A" and "I" are also English words; only count them when what follows
    // cannot be read as the rest of a sentence.
    let rest = clause[end..].trim_start();
    let next_word: String = rest.chars().take_while(|c| c.is_alphabetic()).collect();
    if next_word.is_empty() {
        return true;
    }
    let lowercase_word = next_word.chars().next().is_some_and(char::is_lowercase);
    !lowercase_word || LETTER_FOLLOWERS.contains(&next_word.as_str())
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
