//! End-to-end runs of the site builder over a scratch directory.

mod common;

use pretty_assertions::assert_eq;
use quiz_core::{extract_correctness_tags, grading, parse, LetterSet};
use quiz_site_builder::build_site;

use common::fixtures;
use common::TestContext;

fn letters(s: &str) -> LetterSet {
    s.chars().collect()
}

fn slot_answer(html: &str, slot: u32) -> LetterSet {
    let tags: Vec<_> = extract_correctness_tags(html)
        .into_iter()
        .filter(|t| t.question == slot)
        .collect();
    grading::correct_letters(&tags)
}

#[test]
fn test_renders_one_page_per_quiz() {
    let ctx = TestContext::new();
    ctx.add_source("networking.md", fixtures::NETWORKING);
    ctx.add_source("rust-basics.md", fixtures::SLOPPY);

    let report = build_site(&ctx.config).unwrap();
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.questions, 5);

    let page = ctx.read_page("networking");
    assert!(page.contains("<title>Networking Basics</title>"));
    assert_eq!(slot_answer(&page, 1), letters("B"));
    assert_eq!(slot_answer(&page, 2), letters("AC"));
    assert_eq!(slot_answer(&page, 3), letters("B"));
    assert!(!page.contains("Correct Answers"));

    let page = ctx.read_page("rust-basics");
    assert!(page.contains("<h1>Rust Basics</h1>"));
}

#[test]
fn test_report_lists_diagnostics() {
    let ctx = TestContext::new();
    ctx.add_source("rust-basics.md", fixtures::SLOPPY);

    let report = build_site(&ctx.config).unwrap();
    assert_eq!(report.low_confidence, 1);
    assert_eq!(report.diagnostics.get("numbering"), Some(&1));
    assert_eq!(report.diagnostics.get("missing_answer"), Some(&1));

    let json = ctx.read_report();
    assert_eq!(json["files_processed"], 1);
    let issues = json["documents"][0]["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["diagnostic"]["kind"] == "low_confidence"));
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_malformed_file_is_recorded_and_skipped() {
    let ctx = TestContext::new();
    ctx.add_source("networking.md", fixtures::NETWORKING);
    ctx.add_source("notes.md", fixtures::NOT_A_QUIZ);

    let report = build_site(&ctx.config).unwrap();
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_failed, 1);
    assert_eq!(report.diagnostics.get("failed:malformed_document"), Some(&1));
    assert!(!ctx.config.output_dir.join("notes.html").exists());
    assert!(ctx.config.output_dir.join("networking.html").exists());

    let notes = report.documents.iter().find(|d| d.name == "notes.md").unwrap();
    assert!(notes.error.is_some());
}

#[test]
fn test_sources_left_alone_by_default() {
    let ctx = TestContext::new();
    let path = ctx.add_source("rust-basics.md", fixtures::SLOPPY);

    build_site(&ctx.config).unwrap();
    assert_eq!(common::read(&path), fixtures::SLOPPY);
}

#[test]
fn test_rewrite_sources_writes_canonical_markdown() {
    let mut ctx = TestContext::new();
    ctx.config.rewrite_sources = true;
    let path = ctx.add_source("networking.md", fixtures::NETWORKING);

    build_site(&ctx.config).unwrap();
    let rewritten = common::read(&path);
    assert!(rewritten.starts_with("# Quiz: Networking Basics\n\nAnswers are at the end of each question.\n"));
    assert!(rewritten.contains("**Correct Answers:** B\nIP is a network layer protocol."));
    // Checkmark answers are re-derived, never promoted to a declaration.
    assert!(rewritten.contains("<summary>Show Answer</summary>\n\n✅ A. HTTP\n✅ C. SSH\n</details>"));
    assert!(!rewritten.contains("**Correct Answers:** A, C"));

    let doc = parse(&rewritten, "unused").unwrap();
    assert_eq!(doc.questions.len(), 3);

    build_site(&ctx.config).unwrap();
    assert_eq!(common::read(&path), rewritten);
}

#[test]
fn test_unclosed_fence_does_not_hide_later_questions() {
    let ctx = TestContext::new();
    ctx.add_source("fences.md", fixtures::UNCLOSED_FENCE);

    let report = build_site(&ctx.config).unwrap();
    assert_eq!(report.questions, 2);
    assert_eq!(report.diagnostics.get("unclosed_fence"), Some(&1));

    let page = ctx.read_page("fences");
    assert_eq!(slot_answer(&page, 2), letters("B"));
}

#[test]
fn test_missing_source_dir_fails() {
    let ctx = TestContext::new();
    let mut config = ctx.config.clone();
    config.source_dir = config.source_dir.join("missing");
    assert!(build_site(&config).is_err());
}
