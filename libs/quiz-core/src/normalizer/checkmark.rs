//! Check-glyph correlation.

use super::AnswerHeuristic;
use crate::types::{AnswerSource, LetterSet, Question};

const CHECK_GLYPHS: [&str; 4] = ["✅", "✔", "✓", "☑"];
const CROSS_GLYPHS: [&str; 3] = ["❌", "✗", "✘"];

/// Marks an option correct when a check glyph sits right next to its text,
/// or right before a letter reference like `✅ B.`.
///
/// A cross glyph next to the same option cancels it.
pub struct Checkmark;

#[derive(Default, Clone, Copy)]
struct Marks {
    checked: bool,
    crossed: bool,
}

impl AnswerHeuristic for Checkmark {
    fn source(&self) -> AnswerSource {
        AnswerSource::Checkmark
    }

    fn detect(&self, question: &Question, prose: &str) -> LetterSet {
        let mut marks = vec![Marks::default(); question.options.len()];

        for line in prose.lines() {
            let line = line.to_lowercase();

            for (idx, option) in question.options.iter().enumerate() {
                let text = option.text.trim().to_lowercase();
                if !text.is_empty() {
                    for (start, _) in line.match_indices(text.as_str()) {
                        let end = start + text.len();
                        if !is_word_boundary(&line, start, end) {
                            continue;
                        }
                        record(&mut marks[idx], glyph_before(&line[..start]));
                        record(&mut marks[idx], glyph_after(&line[end..]));
                    }
                }

                let letter = option.letter.to_ascii_lowercase();
                for glyph in CHECK_GLYPHS.iter().chain(CROSS_GLYPHS.iter()) {
                    for (pos, _) in line.match_indices(glyph) {
                        if refers_to_letter(&line[pos + glyph.len()..], letter) {
                            record(&mut marks[idx], Some(*glyph));
                        }
                    }
                }
            }
        }

        question
            .options
            .iter()
            .zip(marks)
            .filter(|(_, m)| m.checked && !m.crossed)
            .map(|(o, _)| o.letter)
            .collect()
    }
}

fn record(marks: &mut Marks, glyph: Option<&str>) {
    match glyph {
        Some(g) if CHECK_GLYPHS.iter().any(|c| *c == g) => marks.checked = true,
        Some(g) if CROSS_GLYPHS.iter().any(|c| *c == g) => marks.crossed = true,
        _ => {}
    }
}

fn is_filler(c: char) -> bool {
    c.is_whitespace() || "*_`\"'“”‘’:-–\u{fe0f}".contains(c)
}

fn is_word_boundary(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    let after = line[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Glyph ending `before`, skipping emphasis and an `x.`/`x)` letter prefix.
fn glyph_before(before: &str) -> Option<&'static str> {
    let mut rest = before.trim_end_matches(is_filler);

    let mut chars = rest.chars().rev();
    if let (Some(punct), Some(letter)) = (chars.next(), chars.next()) {
        let standalone = !chars.next().is_some_and(char::is_alphanumeric);
        if (punct == '.' || punct == ')') && letter.is_ascii_alphabetic() && standalone {
            rest = rest[..rest.len() - 2].trim_end_matches(|c: char| is_filler(c) || c == '(');
        }
    }

    CHECK_GLYPHS
        .iter()
        .chain(CROSS_GLYPHS.iter())
        .copied()
        .find(|g| rest.ends_with(g))
}

fn glyph_after(after: &str) -> Option<&'static str> {
    let rest = after.trim_start_matches(|c: char| is_filler(c) || ".,;!".contains(c));
    CHECK_GLYPHS
        .iter()
        .chain(CROSS_GLYPHS.iter())
        .copied()
        .find(|g| rest.starts_with(g))
}

/// `b.`, `b)`, `(b)`, `option b:` or a lone `b` at end of line.
fn refers_to_letter(after_glyph: &str, letter: char) -> bool {
    let mut rest = after_glyph.trim_start_matches(is_filler);
    if let Some(stripped) = rest.strip_prefix("option") {
        rest = stripped.trim_start();
    }
    let rest = rest.strip_prefix('(').unwrap_or(rest);

    let mut chars = rest.chars();
    if chars.next() != Some(letter) {
        return false;
    }
    match chars.next() {
        None => true,
        Some(c) if ".):*".contains(c) => true,
        Some(c) => c.is_whitespace() && chars.as_str().trim().is_empty(),
    }
}
