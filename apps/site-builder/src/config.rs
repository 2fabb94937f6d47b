//! Environment configuration for the site builder.

use crate::error::{BuildError, Result};
use quiz_core::NormalizeSettings;
use std::path::PathBuf;

/// Builder configuration, read from `QUIZ_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the quiz markdown files.
    pub source_dir: PathBuf,
    /// Directory receiving one HTML page per quiz.
    pub output_dir: PathBuf,
    /// Where the JSON report goes; defaults to `<output_dir>/report.json`.
    pub report_path: Option<PathBuf>,
    /// Write canonical markdown back over sources that changed.
    pub rewrite_sources: bool,
    pub normalize: NormalizeSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("quizzes"),
            output_dir: PathBuf::from("site"),
            report_path: None,
            rewrite_sources: false,
            normalize: NormalizeSettings::default(),
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| -> Result<bool> {
            match lookup(key) {
                Some(value) => parse_flag(key, &value),
                None => Ok(default),
            }
        };

        Ok(Self {
            source_dir: lookup("QUIZ_SOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_dir),
            output_dir: lookup("QUIZ_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            report_path: lookup("QUIZ_REPORT_PATH").map(PathBuf::from),
            rewrite_sources: flag("QUIZ_REWRITE_SOURCES", defaults.rewrite_sources)?,
            normalize: NormalizeSettings {
                infer_unknown_types: flag(
                    "QUIZ_INFER_TYPES",
                    defaults.normalize.infer_unknown_types,
                )?,
                apply_type_default: flag(
                    "QUIZ_TYPE_DEFAULT",
                    defaults.normalize.apply_type_default,
                )?,
            },
        })
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join("report.json"))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(BuildError::Config(format!(
            "{}: expected a boolean, got '{}'",
            key, other
        ))),
    }
}
