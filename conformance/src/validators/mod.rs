//! Validators over an emitted schema directory.

pub mod documents;
pub mod drift;
pub mod patterns;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Schema files directly inside `dir` whose names end with `suffix`, sorted
/// by file name.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked.
pub fn schema_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    for entry in walker.sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let is_schema = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if entry.file_type().is_file() && is_schema {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Reads and parses one emitted document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// File name of a path, lossily.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
