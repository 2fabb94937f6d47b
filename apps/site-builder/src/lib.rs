pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;

use std::fs;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::batch::{process_document, verify_tags, BatchReport, DocumentStatus};
use crate::config::Config;
use crate::error::{BuildError, Result};

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        "Building quizzes from {} into {}",
        config.source_dir.display(),
        config.output_dir.display()
    );

    let report = build_site(&config)?;

    tracing::info!(
        files = report.files_processed,
        failed = report.files_failed,
        questions = report.questions,
        low_confidence = report.low_confidence,
        "Build finished, report at {}",
        config.report_path().display()
    );

    Ok(())
}

/// Process every quiz in the source directory.
///
/// A bad file is recorded in the report and skipped; only problems with the
/// directories themselves or the report abort the run.
pub fn build_site(config: &Config) -> Result<BatchReport> {
    let sources = discovery::discover(&config.source_dir)?;
    tracing::info!("Found {} quiz files", sources.len());

    fs::create_dir_all(&config.output_dir).map_err(|e| BuildError::io(&config.output_dir, e))?;

    let mut outcomes = Vec::with_capacity(sources.len());
    for source in &sources {
        let outcome = process_document(source, &config.normalize);

        match &outcome.status {
            DocumentStatus::Rendered { document, html } => {
                let page = config.output_dir.join(format!("{}.html", source.stem()));
                fs::write(&page, html).map_err(|e| BuildError::io(&page, e))?;

                for question in &document.questions {
                    for diagnostic in &question.diagnostics {
                        tracing::warn!(
                            file = %source.name,
                            question = question.number,
                            line = question.line,
                            kind = diagnostic.kind(),
                            "{:?}",
                            diagnostic
                        );
                    }
                }

                for number in verify_tags(document, html) {
                    tracing::error!(
                        file = %source.name,
                        question = number,
                        "Rendered tags do not match the resolved answer"
                    );
                }

                if config.rewrite_sources {
                    let canonical = quiz_core::to_markdown(document);
                    if source.content.as_deref().ok() != Some(canonical.as_str()) {
                        fs::write(&source.path, &canonical)
                            .map_err(|e| BuildError::io(&source.path, e))?;
                        tracing::info!(file = %source.name, "Rewrote source in canonical form");
                    }
                }

                tracing::debug!(
                    file = %source.name,
                    questions = document.questions.len(),
                    "Rendered {}",
                    page.display()
                );
            }
            DocumentStatus::Failed { kind, message } => {
                tracing::error!(file = %source.name, kind = %kind, "Skipping file: {}", message);
            }
        }

        outcomes.push(outcome);
    }

    let mut report = BatchReport::from_outcomes(&outcomes);
    report.generated_at = Some(Utc::now());

    let report_path = config.report_path();
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&report_path, json).map_err(|e| BuildError::io(&report_path, e))?;

    Ok(report)
}
