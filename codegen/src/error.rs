//! Compiler error types.

use std::path::PathBuf;

use ui_ontology::LoadError;

/// Failures while turning staged documents into files.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A document could not be serialized.
    #[error("failed to serialize {name}: {source}")]
    Serialize {
        /// Output file name.
        name: String,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// The catalog file name does not sort strictly before an entity
    /// document name (which includes colliding with it).
    #[error("enum catalog {catalog} must sort before entity document {document}")]
    CatalogName {
        /// Catalog file name.
        catalog: String,
        /// First entity document name it fails to precede.
        document: String,
    },
    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A temporary file could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A finished temporary file could not be moved into place.
    #[error("failed to move temporary file onto {}: {source}", path.display())]
    Rename {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Any failure of a compiler run.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The ontology could not be loaded or linked.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Output could not be produced.
    #[error(transparent)]
    Emit(#[from] EmitError),
}
