//! Canonical markdown output for quiz documents.

use crate::types::{Diagnostic, QuizDocument};

/// Serialize a document back to the authoritative quiz format.
///
/// Parsing the output gives back the same questions. Questions that had no
/// answer block keep having none.
pub fn to_markdown(document: &QuizDocument) -> String {
    let mut out = format!("# Quiz: {}\n\n", document.title.trim());
    if !document.preamble.is_empty() {
        out.push_str(&document.preamble);
        out.push_str("\n\n");
    }

    for question in &document.questions {
        match question.question_type.label() {
            Some(label) => out.push_str(&format!("### Question {} ({})\n", question.number, label)),
            None => out.push_str(&format!("### Question {}\n", question.number)),
        }

        if !question.prompt.is_empty() {
            out.push_str(&question.prompt);
            out.push('\n');
        }
        out.push('\n');

        for option in &question.options {
            out.push_str(&format!("- [ ] {}. {}\n", option.letter, option.text));
        }

        let missing_answer = question.diagnostics.contains(&Diagnostic::MissingAnswer);
        if !(missing_answer && question.explanation.is_empty()) {
            out.push_str("\n<details>\n<summary>Show Answer</summary>\n\n");
            if !question.explanation.is_empty() {
                out.push_str(&question.explanation);
                out.push('\n');
            }
            out.push_str("</details>\n");
        }

        out.push_str("\n---\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_document;
    use crate::parser::parse;
    use crate::types::NormalizeSettings;
    use pretty_assertions::assert_eq;

    const MESSY: &str = "\
# Quiz: Storage

### Question 1 (multi select)
Which are block storage?

- [x] A.   Amazon EBS
- [ ] Amazon S3
- [ ] Instance   store

<details>
<summary>Show Answer</summary>

Amazon EBS is correct.
**Correct Answers:** A, C
> EBS volumes and instance store provide block storage.
**Correct Answers:** C
</details>

---

### Question 2 (True/False)
S3 is a file system.
- [ ] True
- [ ] False
";

    fn normalized(content: &str) -> QuizDocument {
        let mut doc = parse(content, "t").unwrap();
        normalize_document(&mut doc, &NormalizeSettings::default());
        doc
    }

    #[test]
    fn writes_canonical_form() {
        let doc = normalized(MESSY);
        let expected = "\
# Quiz: Storage

### Question 1 (Multi-Select)
Which are block storage?

- [ ] A. Amazon EBS
- [ ] B. Amazon S3
- [ ] C. Instance store

<details>
<summary>Show Answer</summary>

**Correct Answers:** A, C
Amazon EBS is correct.
> EBS volumes and instance store provide block storage.
</details>

---

### Question 2 (True/False)
S3 is a file system.

- [ ] A. True
- [ ] B. False

---

";
        assert_eq!(to_markdown(&doc), expected);
    }

    #[test]
    fn preamble_survives_rewrite() {
        let input = "\
# Quiz: Chapter 4

Read chapter 4 before attempting.

### Question 1 (Multiple Choice)
Pick one.
- [ ] A. yes
- [ ] B. no
<details>
**Correct Answers:** A
</details>
";
        let doc = normalized(input);
        let out = to_markdown(&doc);
        assert!(out.starts_with("# Quiz: Chapter 4\n\nRead chapter 4 before attempting.\n\n### Question 1"));
        let again = normalized(&out);
        assert_eq!(again.preamble, doc.preamble);
        assert_eq!(to_markdown(&again), out);
    }

    #[test]
    fn thematic_break_in_explanation_survives_rewrite() {
        let input = "\
### Question 1 (Multiple Choice)
Pick one.
- [ ] A. yes
- [ ] B. no
<details>
**Correct Answers:** A
Part one

***

Part two
</details>
";
        let doc = normalized(input);
        assert_eq!(doc.questions[0].explanation, "**Correct Answers:** A\nPart one\n\n***\n\nPart two");
        let again = normalized(&to_markdown(&doc));
        assert_eq!(again.questions[0].explanation, doc.questions[0].explanation);
    }

    #[test]
    fn reparsing_output_gives_same_questions() {
        let doc = normalized(MESSY);
        let again = normalized(&to_markdown(&doc));

        assert_eq!(again.title, doc.title);
        assert_eq!(again.questions.len(), doc.questions.len());
        for (a, b) in again.questions.iter().zip(&doc.questions) {
            assert_eq!(a.question_type, b.question_type);
            assert_eq!(a.prompt, b.prompt);
            assert_eq!(a.options, b.options);
            assert_eq!(a.correct_letters, b.correct_letters);
            assert_eq!(a.explanation, b.explanation);
            assert_eq!(a.diagnostics, b.diagnostics);
        }
    }
}
