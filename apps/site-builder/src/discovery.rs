//! Source file discovery.

use crate::error::{BuildError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A quiz file found in the source directory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name, e.g. `networking.md`.
    pub name: String,
    pub path: PathBuf,
    /// File contents, or the read error message.
    pub content: std::result::Result<String, String>,
}

impl SourceDocument {
    /// File name without the `.md` extension.
    pub fn stem(&self) -> &str {
        self.name.strip_suffix(".md").unwrap_or(&self.name)
    }
}

/// Read every `.md` file directly inside `dir`, sorted by name.
///
/// A file that cannot be read is still returned, carrying its error, so the
/// batch can report it and move on.
pub fn discover(dir: &Path) -> Result<Vec<SourceDocument>> {
    let entries = fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() || !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled.md")
            .to_string();
        let content = fs::read_to_string(&path).map_err(|e| e.to_string());

        documents.push(SourceDocument {
            name,
            path,
            content,
        });
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(documents)
}

/// Title for a quiz without a `# ` heading: `aws-iam_basics.md` -> `Aws Iam Basics`.
pub fn title_from_source_name(name: &str) -> String {
    let stem = name.strip_suffix(".md").unwrap_or(name);
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
