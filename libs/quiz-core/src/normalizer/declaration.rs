//! "Correct Answers:" declarations inside explanations.

use crate::types::LetterSet;
use regex::Regex;
use std::sync::LazyLock;

/// `**Correct Answers:** A, C`, `Correct answer: B`, `**Correct Answer**: B and D`.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\*\*|__)?(?i:\bcorrect\s+answers?)(?:\*\*|__)?\s*[:：]\s*(?:\*\*|__)?\s*([A-Z](?:[ \t]*(?:,|&|/|\band\b)?[ \t]*[A-Z])*)\b(?:\*\*|__)?",
    )
    .expect("valid regex")
});

/// Letters named by every declaration in `text`, merged.
pub fn declared_letters(text: &str) -> LetterSet {
    DECLARATION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| m.as_str().chars().filter(char::is_ascii_uppercase))
        .collect()
}

/// Remove declarations, dropping lines that held nothing else.
pub fn strip_declarations(text: &str) -> String {
    let mut kept: Vec<String> = Vec::new();

    for line in text.lines() {
        if !DECLARATION.is_match(line) {
            kept.push(line.to_string());
            continue;
        }

        let remainder = DECLARATION.replace_all(line, "");
        let leftover = remainder.trim_matches(|c: char| c.is_whitespace() || "*_.-".contains(c));
        if !leftover.is_empty() {
            kept.push(remainder.trim().to_string());
        }
    }

    // A removed line can leave stacked blank lines behind.
    let mut out: Vec<String> = Vec::with_capacity(kept.len());
    for line in kept {
        let blank = line.trim().is_empty();
        if blank && out.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        out.push(line);
    }

    out.join("\n").trim().to_string()
}

/// The single declaration written back after normalization.
pub fn canonical_line(letters: &LetterSet) -> String {
    let list: Vec<String> = letters.iter().map(char::to_string).collect();
    format!("**Correct Answers:** {}", list.join(", "))
}
