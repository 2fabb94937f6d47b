//! Markdown parser for quiz files.
//!
//! # Format
//! ```markdown
//! # Quiz: Networking Basics
//!
//! ### Question 1 (Multiple Choice)
//! Which layer routes packets?
//!
//! - [ ] A. Transport
//! - [ ] B. Network
//!
//! <details>
//! <summary>Show Answer</summary>
//!
//! **Correct Answers:** B
//! The network layer handles routing.
//! </details>
//!
//! ---
//! ```
//!
//! Each question section is tokenized on its own, so a defect in one section
//! only ever shows up as a diagnostic on that question.

use crate::error::{ParseError, Result};
use crate::types::{Diagnostic, QuestionType, Question, QuizDocument, QuizOption};
use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{0,3}#{1,6}\s*(?i:question)\s+(\d{1,6})\b\s*(?:\(([^)]*)\))?(.*)$")
        .expect("valid regex")
});

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}#\s+(.+?)\s*#*\s*$").expect("valid regex"));

static OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*+]\s*\[[ xX]?\]\s*(?:([A-Za-z])[.)](?:\s+|$))?(.*)$").expect("valid regex")
});

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}(?:-{3,}|\*{3,}|_{3,})\s*$").expect("valid regex"));

/// Parse markdown content into a quiz document.
///
/// `fallback_title` is used when the preamble has no `# ` heading.
pub fn parse(content: &str, fallback_title: &str) -> Result<QuizDocument> {
    if content.trim().is_empty() {
        return Err(ParseError::EmptyFile);
    }

    let mut parser = Parser::new();
    let mut line_count = 0;

    for (idx, line) in content.lines().enumerate() {
        line_count = idx + 1;
        parser.process_line(line, line_count);
    }

    let (title, preamble, mut questions) = parser.finalize();
    if questions.is_empty() {
        return Err(ParseError::MalformedDocument { lines: line_count });
    }

    check_numbering(&mut questions);

    Ok(QuizDocument {
        title: title.unwrap_or_else(|| fallback_title.to_string()),
        preamble: join_trimmed(&preamble),
        questions,
    })
}

/// Flag numbers that don't continue the sequence started at 1.
fn check_numbering(questions: &mut [Question]) {
    let mut expected = 1;
    for question in questions.iter_mut() {
        if question.number != expected {
            question.push_diagnostic(Diagnostic::Numbering {
                expected,
                found: question.number,
            });
        }
        expected = question.number + 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Prompt,
    Options,
    Answer,
    AfterAnswer,
}

struct QuestionBuilder {
    question: Question,
    section: Section,
    prompt: Vec<String>,
    answer: Option<Vec<String>>,
}

impl QuestionBuilder {
    fn new(number: u32, label: Option<&str>, line: usize) -> Self {
        let question_type = label.map_or(QuestionType::Unknown, QuestionType::from_label);
        let mut question = Question::new(number, question_type);
        question.line = line;

        Self {
            question,
            section: Section::Prompt,
            prompt: Vec::new(),
            answer: None,
        }
    }

    fn next_free_letter(&self) -> Option<char> {
        ('A'..='Z').find(|l| !self.question.has_letter(*l))
    }

    fn push_option(&mut self, letter: Option<char>, text: &str) {
        let letter = match letter.map(|l| l.to_ascii_uppercase()) {
            Some(l) if !self.question.has_letter(l) => Some(l),
            Some(l) => {
                let relabeled = self.next_free_letter();
                if let Some(relabeled) = relabeled {
                    self.question
                        .push_diagnostic(Diagnostic::DuplicateLetter { letter: l, relabeled });
                }
                relabeled
            }
            None => self.next_free_letter(),
        };

        // Past 'Z' there is nothing left to label the option with.
        if let Some(letter) = letter {
            self.question.options.push(QuizOption::new(letter, text.trim()));
        }
        self.section = Section::Options;
    }

    fn push_text(&mut self, line: &str) {
        match self.section {
            Section::Prompt => self.prompt.push(line.to_string()),
            Section::Options => {
                let indented = line.starts_with(' ') || line.starts_with('\t');
                match self.question.options.last_mut() {
                    Some(option) if indented && !line.trim().is_empty() => {
                        if !option.text.is_empty() {
                            option.text.push(' ');
                        }
                        option.text.push_str(line.trim());
                    }
                    _ => self.prompt.push(line.to_string()),
                }
            }
            Section::Answer | Section::AfterAnswer => {
                if let Some(answer) = self.answer.as_mut() {
                    answer.push(line.to_string());
                }
            }
        }
    }

    fn open_answer(&mut self) {
        if self.answer.is_none() {
            self.answer = Some(Vec::new());
        }
        self.section = Section::Answer;
    }

    fn close_answer(&mut self) {
        if self.section == Section::Answer {
            self.section = Section::AfterAnswer;
        }
    }

    fn build(self) -> Question {
        let mut question = self.question;
        question.prompt = join_trimmed(&self.prompt);

        if question.options.is_empty() {
            question.push_diagnostic(Diagnostic::Incomplete);
        }

        match self.answer {
            Some(lines) => question.explanation = join_trimmed(&lines),
            None => question.push_diagnostic(Diagnostic::MissingAnswer),
        }

        question
    }
}

/// Join lines and drop leading and trailing blank lines.
fn join_trimmed(lines: &[String]) -> String {
    lines.join("\n").trim().to_string()
}

struct Parser {
    title: Option<String>,
    preamble: Vec<String>,
    current: Option<QuestionBuilder>,
    questions: Vec<Question>,
    in_fence: bool,
}

impl Parser {
    fn new() -> Self {
        Self {
            title: None,
            preamble: Vec::new(),
            current: None,
            questions: Vec::new(),
            in_fence: false,
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) {
        match self.classify(line) {
            LineType::Header { number, label, rest } => {
                self.flush();
                let mut builder = QuestionBuilder::new(number, label, line_num);
                if !rest.is_empty() {
                    builder.push_text(rest);
                }
                self.current = Some(builder);
            }
            LineType::Title(text) => {
                if self.current.is_none() && self.title.is_none() {
                    self.title = Some(strip_quiz_label(text).to_string());
                } else {
                    self.push_text(line);
                }
            }
            LineType::Option { letter, text } => match self.current.as_mut() {
                Some(builder) => builder.push_option(letter, text),
                None => self.preamble.push(line.to_string()),
            },
            LineType::DetailsOpen => match self.current.as_mut() {
                Some(builder) => builder.open_answer(),
                None => self.preamble.push(line.to_string()),
            },
            LineType::DetailsClose => match self.current.as_mut() {
                Some(builder) => builder.close_answer(),
                None => self.preamble.push(line.to_string()),
            },
            LineType::Summary => {
                if self.current.is_none() {
                    self.preamble.push(line.to_string());
                }
            }
            // Rules separate questions, except inside an answer where they
            // belong to the explanation.
            LineType::Rule => {
                if let Some(builder) = self.current.as_mut() {
                    if builder.section == Section::Answer {
                        builder.push_text(line);
                    }
                }
            }
            LineType::Text(text) => self.push_text(text),
        }
    }

    fn classify<'a>(&mut self, line: &'a str) -> LineType<'a> {
        let trimmed = line.trim();
        let lower = trimmed.to_ascii_lowercase();

        // An unclosed fence ends with its question.
        if self.in_fence && (HEADER.is_match(line) || lower.starts_with("</details")) {
            self.close_dangling_fence();
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            self.in_fence = !self.in_fence;
            return LineType::Text(line);
        }
        if self.in_fence {
            return LineType::Text(line);
        }

        if let Some(caps) = HEADER.captures(line) {
            if let Ok(number) = caps[1].parse::<u32>() {
                let rest = caps.get(3).map_or("", |m| m.as_str());
                return LineType::Header {
                    number,
                    label: caps.get(2).map(|m| m.as_str().trim()),
                    rest: rest.trim().trim_start_matches([':', '-', '–']).trim(),
                };
            }
        }

        if lower.starts_with("<details") {
            return LineType::DetailsOpen;
        }
        if lower.starts_with("</details") {
            return LineType::DetailsClose;
        }
        if lower.starts_with("<summary") {
            return LineType::Summary;
        }
        if RULE.is_match(line) {
            return LineType::Rule;
        }

        let in_answer = self
            .current
            .as_ref()
            .is_some_and(|b| matches!(b.section, Section::Answer | Section::AfterAnswer));

        if !in_answer {
            if let Some(caps) = OPTION.captures(line) {
                return LineType::Option {
                    letter: caps
                        .get(1)
                        .and_then(|m| m.as_str().chars().next()),
                    text: caps.get(2).map_or("", |m| m.as_str()),
                };
            }
        }

        if let Some(caps) = TITLE.captures(line) {
            if let Some(m) = caps.get(1) {
                return LineType::Title(m.as_str());
            }
        }

        LineType::Text(line)
    }

    fn push_text(&mut self, line: &str) {
        match self.current.as_mut() {
            Some(builder) => builder.push_text(line),
            None => self.preamble.push(line.to_string()),
        }
    }

    fn close_dangling_fence(&mut self) {
        self.in_fence = false;
        if let Some(builder) = self.current.as_mut() {
            builder.question.push_diagnostic(Diagnostic::UnclosedFence);
        }
    }

    fn flush(&mut self) {
        if let Some(builder) = self.current.take() {
            self.questions.push(builder.build());
        }
    }

    fn finalize(mut self) -> (Option<String>, Vec<String>, Vec<Question>) {
        if self.in_fence {
            self.close_dangling_fence();
        }
        self.flush();
        (self.title, self.preamble, self.questions)
    }
}

fn strip_quiz_label(title: &str) -> &str {
    let trimmed = title.trim();
    match trimmed.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("quiz:") => trimmed[5..].trim(),
        _ => trimmed,
    }
}

enum LineType<'a> {
    Header {
        number: u32,
        label: Option<&'a str>,
        rest: &'a str,
    },
    Title(&'a str),
    Option {
        letter: Option<char>,
        text: &'a str,
    },
    DetailsOpen,
    DetailsClose,
    Summary,
    Rule,
    Text(&'a str),
}
