//! Shared setup for site builder integration tests.

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};

use quiz_site_builder::config::Config;
use tempfile::TempDir;

/// Scratch source and output directories with a matching config.
pub struct TestContext {
    _root: TempDir,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let source_dir = root.path().join("quizzes");
        fs::create_dir(&source_dir).expect("create source dir");

        let config = Config {
            source_dir,
            output_dir: root.path().join("site"),
            ..Config::default()
        };

        Self {
            _root: root,
            config,
        }
    }

    /// Write a quiz source file and return its path.
    pub fn add_source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.config.source_dir.join(name);
        fs::write(&path, content).expect("write source");
        path
    }

    pub fn read_page(&self, stem: &str) -> String {
        read(&self.config.output_dir.join(format!("{stem}.html")))
    }

    pub fn read_report(&self) -> serde_json::Value {
        serde_json::from_str(&read(&self.config.report_path())).expect("report is json")
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
