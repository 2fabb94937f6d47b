//! HTML rendering for normalized quiz documents.
//!
//! Every control carries its correctness tag as `data-correct`; grading
//! happens entirely in the page script, which compares checked state with
//! those tags.

use crate::grading::ControlTag;
use crate::normalizer::declaration;
use crate::types::{Question, QuestionType, QuizDocument};
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

static CONTROL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]*\bdata-question="(\d+)"[^>]*\bdata-letter="([A-Z])"[^>]*\bdata-correct="(true|false)""#)
        .expect("valid regex")
});

/// Client-side grader. Mirrors [`crate::grading::grade`].
pub const GRADER_SCRIPT: &str = r#"(function () {
  var messages = {
    correct: 'Correct!',
    incorrect: 'Incorrect. Review the explanation below.',
    no_selection: 'Select an answer first.'
  };

  function grade(section) {
    var anyChecked = false;
    var allMatch = true;
    section.querySelectorAll('input[data-correct]').forEach(function (input) {
      if (input.checked) anyChecked = true;
      if (input.checked !== (input.dataset.correct === 'true')) allMatch = false;
    });
    if (!anyChecked) return 'no_selection';
    return allMatch ? 'correct' : 'incorrect';
  }

  document.querySelectorAll('section.question').forEach(function (section) {
    var button = section.querySelector('button.check-answer');
    var feedback = section.querySelector('.feedback');
    var explanation = section.querySelector('.explanation');
    button.addEventListener('click', function () {
      if (!explanation.hidden) {
        explanation.hidden = true;
        feedback.textContent = '';
        feedback.className = 'feedback';
        button.textContent = 'Check Answer';
        return;
      }
      var outcome = grade(section);
      feedback.textContent = messages[outcome];
      feedback.className = 'feedback ' + outcome;
      if (outcome !== 'no_selection') {
        explanation.hidden = false;
        button.textContent = 'Hide Answer';
      }
    });
  });
})();"#;

/// Supplies the chrome around rendered question blocks.
pub trait PageTemplate {
    fn wrap(&self, title: &str, body: &str) -> String;
}

/// Bare HTML5 page with a small inline stylesheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandalonePage;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
section.question{border-bottom:1px solid #ddd;padding:1rem 0}\
ul.options{list-style:none;padding-left:0}\
.feedback.correct{color:#1a7f37}.feedback.incorrect{color:#cf222e}.feedback.no_selection{color:#9a6700}\
blockquote{border-left:3px solid #ccc;margin-left:0;padding-left:1rem;color:#555}";

impl PageTemplate for StandalonePage {
    fn wrap(&self, title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <main class=\"quiz\">\n{body}</main>\n</body>\n</html>\n",
            title = escape_html(title),
        )
    }
}

/// Render a whole quiz as one interactive page.
pub fn render_document(document: &QuizDocument, template: &dyn PageTemplate) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(&document.title));
    if !document.preamble.is_empty() {
        body.push_str("<div class=\"preamble\">\n");
        body.push_str(&markdown_to_html(&document.preamble));
        body.push_str("</div>\n");
    }
    for (idx, question) in document.questions.iter().enumerate() {
        body.push_str(&render_block(question, idx as u32 + 1));
    }
    body.push_str("<script>\n");
    body.push_str(GRADER_SCRIPT);
    body.push_str("\n</script>\n");

    template.wrap(&document.title, &body)
}

/// Render a single question block, keyed by its own number.
pub fn render_question(question: &Question) -> String {
    render_block(question, question.number)
}

fn render_block(question: &Question, slot: u32) -> String {
    let input_type = match question.question_type {
        QuestionType::TrueFalse | QuestionType::MultipleChoice => "radio",
        QuestionType::MultiSelect | QuestionType::Unknown => "checkbox",
    };

    let mut out = format!(
        "<section class=\"question\" id=\"question-{slot}\" data-type=\"{}\">\n",
        question.question_type.as_str()
    );

    out.push_str(&format!("<h3>Question {}", question.number));
    if let Some(label) = question.question_type.label() {
        out.push_str(&format!(" <span class=\"question-type\">({})</span>", label));
    }
    out.push_str("</h3>\n");

    if !question.prompt.is_empty() {
        out.push_str("<div class=\"prompt\">\n");
        out.push_str(&markdown_to_html(&question.prompt));
        out.push_str("</div>\n");
    }

    out.push_str("<ul class=\"options\">\n");
    for option in &question.options {
        out.push_str(&format!(
            "<li><label><input type=\"{input_type}\" name=\"question-{slot}\" value=\"{letter}\" \
             data-question=\"{slot}\" data-letter=\"{letter}\" data-correct=\"{correct}\"> \
             <span class=\"option-letter\">{letter}.</span> {text}</label></li>\n",
            letter = option.letter,
            correct = question.is_correct(option.letter),
            text = inline_markdown_to_html(&option.text),
        ));
    }
    out.push_str("</ul>\n");

    out.push_str("<button type=\"button\" class=\"check-answer\">Check Answer</button>\n");
    out.push_str("<p class=\"feedback\" aria-live=\"polite\"></p>\n");

    out.push_str("<div class=\"explanation\" hidden>\n");
    let prose = declaration::strip_declarations(&question.explanation);
    if !prose.is_empty() {
        out.push_str(&markdown_to_html(&prose));
    }
    out.push_str("</div>\n</section>\n");

    out
}

/// Markdown to HTML, with raw HTML in the source escaped as text.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Single-line markdown without the surrounding paragraph.
pub fn inline_markdown_to_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH).filter_map(|event| {
        match event {
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph) => None,
            Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
            other => Some(other),
        }
    });

    let mut out = String::with_capacity(markdown.len() + 16);
    html::push_html(&mut out, events);
    out.trim_end().to_string()
}

/// Read the correctness tags back out of rendered markup.
pub fn extract_correctness_tags(html: &str) -> Vec<ControlTag> {
    CONTROL_TAG
        .captures_iter(html)
        .filter_map(|caps| {
            Some(ControlTag {
                question: caps[1].parse().ok()?,
                letter: caps[2].chars().next()?,
                correct: &caps[3] == "true",
            })
        })
        .collect()
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{self, GradeOutcome};
    use crate::normalizer::normalize_document;
    use crate::parser::parse;
    use crate::types::{LetterSet, NormalizeSettings, QuizOption};
    use pretty_assertions::assert_eq;

    fn question(ty: QuestionType, correct: &str) -> Question {
        let mut q = Question::new(1, ty);
        q.prompt = "Pick *wisely*".to_string();
        q.options = vec![
            QuizOption::new('A', "alpha"),
            QuizOption::new('B', "beta <b>"),
            QuizOption::new('C', "gamma"),
        ];
        q.correct_letters = correct.chars().collect();
        q.explanation = format!("**Correct Answers:** {}\n> quoted *source*", correct);
        q
    }

    #[test]
    fn single_answer_types_use_radio_buttons() {
        let html = render_question(&question(QuestionType::MultipleChoice, "B"));
        assert_eq!(html.matches("type=\"radio\"").count(), 3);
        assert!(!html.contains("type=\"checkbox\""));
    }

    #[test]
    fn multi_select_uses_checkboxes() {
        let html = render_question(&question(QuestionType::MultiSelect, "AC"));
        assert_eq!(html.matches("type=\"checkbox\"").count(), 3);
    }

    #[test]
    fn tags_follow_correct_letters() {
        let html = render_question(&question(QuestionType::MultiSelect, "AC"));
        let tags = extract_correctness_tags(&html);
        assert_eq!(tags.len(), 3);
        assert_eq!(grading::correct_letters(&tags), "AC".chars().collect::<LetterSet>());
    }

    #[test]
    fn explanation_drops_declaration_and_renders_markup() {
        let html = render_question(&question(QuestionType::MultiSelect, "AC"));
        assert!(!html.contains("Correct Answers"));
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("<em>source</em>"));
        assert!(html.contains("<em>wisely</em>"));
    }

    #[test]
    fn option_text_is_escaped() {
        let html = render_question(&question(QuestionType::MultiSelect, "AC"));
        assert!(html.contains("beta &lt;b&gt;"));
    }

    #[test]
    fn option_text_renders_inline_markdown() {
        let mut q = question(QuestionType::MultipleChoice, "A");
        q.options[0].text = "`Vec::new()` is **cheap**".to_string();
        let html = render_question(&q);
        assert!(html.contains("<code>Vec::new()</code> is <strong>cheap</strong></label>"));
        assert!(!html.contains("<p><code>"));
    }

    #[test]
    fn raw_html_in_markdown_is_escaped() {
        let html = markdown_to_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn unresolved_question_renders_all_false() {
        let html = render_question(&question(QuestionType::MultipleChoice, ""));
        let tags = extract_correctness_tags(&html);
        assert_eq!(tags.len(), 3);
        assert!(tags.iter().all(|t| !t.correct));
    }

    #[test]
    fn page_wraps_blocks_and_script() {
        let doc = QuizDocument {
            title: "Cloud & Co".to_string(),
            preamble: "Read *chapter 4* first.".to_string(),
            questions: vec![question(QuestionType::TrueFalse, "A")],
        };
        let page = render_document(&doc, &StandalonePage);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Cloud &amp; Co</title>"));
        assert!(page.contains("id=\"question-1\""));
        assert!(page.contains("function grade(section)"));
        assert!(page.contains("<div class=\"preamble\">\n<p>Read <em>chapter 4</em> first.</p>"));
    }

    #[test]
    fn rendered_tags_round_trip_to_correct_letters() {
        let input = "\
# Quiz: Round Trip

### Question 1 (Multi-Select)
Pick two.
- [ ] A. one
- [ ] B. two
- [ ] C. three
<details>
**Correct Answers:** A, C
</details>

### Question 2 (True/False)
Rust has a garbage collector.
- [ ] A. True
- [ ] B. False
<details>
✅ False
</details>
";
        let mut doc = parse(input, "t").unwrap();
        normalize_document(&mut doc, &NormalizeSettings::default());
        let page = render_document(&doc, &StandalonePage);
        let tags = extract_correctness_tags(&page);

        for (idx, question) in doc.questions.iter().enumerate() {
            let slot = idx as u32 + 1;
            let block: Vec<ControlTag> =
                tags.iter().copied().filter(|t| t.question == slot).collect();
            assert_eq!(grading::correct_letters(&block), question.correct_letters);
        }
    }

    #[test]
    fn grading_multi_select_scenario() {
        let html = render_question(&question(QuestionType::MultiSelect, "AC"));
        let tags = extract_correctness_tags(&html);
        let picked = |s: &str| s.chars().collect::<LetterSet>();
        assert_eq!(grading::grade(&tags, &picked("AB")), GradeOutcome::Incorrect);
        assert_eq!(grading::grade(&tags, &picked("AC")), GradeOutcome::Correct);
        assert_eq!(grading::grade(&tags, &picked("")), GradeOutcome::NoSelection);
    }
}
