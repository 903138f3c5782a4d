//! Deterministic staging and atomic emission of schema documents.
//!
//! The whole output set is serialized into memory first. Each file is then
//! written to a temporary sibling and renamed over its destination, so a
//! reader never sees a half-written document. The first failure aborts.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::assemble::Assembly;
use crate::config::CompilerConfig;
use crate::error::EmitError;

/// Staged output: file name → file content, in file-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    files: BTreeMap<String, String>,
}

impl OutputSet {
    /// Iterates `(file name, content)` in file-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the content staged under a file name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// File names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of staged files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`EmitError::Serialize`] if the value cannot be serialized.
pub fn render<T: Serialize>(name: &str, value: &T) -> Result<String, EmitError> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| EmitError::Serialize {
        name: name.to_owned(),
        source,
    })?;
    text.push('\n');
    Ok(text)
}

/// Serializes every document and the catalog into an [`OutputSet`].
///
/// # Errors
///
/// Returns [`EmitError::CatalogName`] if the catalog file would not sort
/// first or would replace an entity document, and [`EmitError::Serialize`]
/// on the first document that fails to serialize.
pub fn stage(assembly: &Assembly, config: &CompilerConfig) -> Result<OutputSet, EmitError> {
    let catalog_name = config.catalog_name();
    let names: Vec<String> = assembly
        .documents
        .keys()
        .map(|id| config.document_name(id))
        .collect();
    if let Some(document) = names.iter().find(|name| **name <= catalog_name) {
        return Err(EmitError::CatalogName {
            catalog: catalog_name,
            document: document.clone(),
        });
    }

    let mut files = BTreeMap::new();
    let catalog = render(&catalog_name, &assembly.catalog)?;
    files.insert(catalog_name, catalog);
    for (name, document) in names.into_iter().zip(assembly.documents.values()) {
        let text = render(&name, document)?;
        files.insert(name, text);
    }
    Ok(OutputSet { files })
}

/// Writes one file through a temporary sibling and a rename.
///
/// # Errors
///
/// Returns [`EmitError::Write`] if the temporary file cannot be created or
/// written, and [`EmitError::Rename`] if it cannot be moved into place.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), EmitError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let write_err = |source: std::io::Error| EmitError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| EmitError::Rename {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Writes the staged output set into `out_dir`, creating it if needed.
/// Returns the written paths in file-name order.
///
/// # Errors
///
/// Returns [`EmitError::CreateDir`] if the directory cannot be created, or
/// the first write/rename failure.
pub fn write_documents(output: &OutputSet, out_dir: &Path) -> Result<Vec<PathBuf>, EmitError> {
    std::fs::create_dir_all(out_dir).map_err(|source| EmitError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(output.len());
    for (name, content) in output.iter() {
        let path = out_dir.join(name);
        write_atomic(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "wrote document");
        written.push(path);
    }
    info!(files = written.len(), dir = %out_dir.display(), "schema documents written");
    Ok(written)
}
