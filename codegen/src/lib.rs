//! UI schema compiler.
//!
//! Reads an [`Ontology`] and produces one declarative schema document per
//! entity (field semantics, form and detail layout, list columns and filters,
//! validation rules, lifecycle actions, and API bindings) plus a shared enum
//! catalog. The pipeline is:
//!
//! 1. link named definitions ([`Ontology::link`])
//! 2. classify every field with empty lookups ([`loader::load_model`])
//! 3. resolve `_id` / `_ids` references ([`resolve::resolve`])
//! 4. assemble documents ([`assemble::assemble`])
//! 5. stage deterministic JSON ([`emit::stage`]) and write it atomically
//!    ([`emit::write_documents`])
//!
//! ```no_run
//! use std::path::Path;
//! use ui_ontology::Ontology;
//! use ui_schema_codegen::{generate, CompilerConfig};
//!
//! let report = generate(&Ontology::sample(), Path::new("schemas"), &CompilerConfig::default())?;
//! println!("{} documents", report.files.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod assemble;
pub mod classify;
pub mod config;
pub mod document;
pub mod emit;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod resolve;
pub mod tables;
pub mod templates;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use ui_ontology::Ontology;

pub use config::{CompilerConfig, ConfigError};
pub use document::{EnumCatalog, FieldDescriptor, FieldType, SchemaDocument};
pub use emit::OutputSet;
pub use error::{CompileError, EmitError};

use classify::Classifier;

/// Everything a compiler run produces, before anything touches disk.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Entity id → document.
    pub documents: BTreeMap<String, SchemaDocument>,
    /// The shared enum catalog.
    pub catalog: EnumCatalog,
    /// Fields upgraded to entity references by the second pass.
    pub upgraded_references: usize,
    /// Serialized files, ready to write.
    pub output: OutputSet,
}

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of entity documents.
    pub entity_count: usize,
    /// Number of field descriptors across all documents.
    pub field_count: usize,
    /// Number of enums in the catalog.
    pub enum_count: usize,
    /// Fields upgraded to entity references by the second pass.
    pub upgraded_references: usize,
    /// File names written, in order.
    pub files: Vec<String>,
}

/// Compiles an ontology into its staged output set.
///
/// # Errors
///
/// Returns [`CompileError::Load`] if the ontology fails to link and
/// [`CompileError::Emit`] if a document cannot be serialized.
pub fn compile(ontology: &Ontology, config: &CompilerConfig) -> Result<Compilation, CompileError> {
    let ontology = ontology.clone().link()?;
    let classifier = Classifier::new(config);

    let mut model = loader::load_model(&ontology, &classifier);
    let upgraded_references = resolve::resolve(&mut model, &classifier);
    let assembly = assemble::assemble(&model, config);
    let output = emit::stage(&assembly, config)?;

    Ok(Compilation {
        documents: assembly.documents,
        catalog: assembly.catalog,
        upgraded_references,
        output,
    })
}

/// Compiles an ontology and writes every document into `out_dir`.
///
/// # Errors
///
/// Returns an error if compilation fails or any file cannot be written.
pub fn generate(
    ontology: &Ontology,
    out_dir: &Path,
    config: &CompilerConfig,
) -> Result<GenerationReport> {
    let compilation = compile(ontology, config).context("failed to compile ontology")?;
    let dir = out_dir.display();
    emit::write_documents(&compilation.output, out_dir)
        .with_context(|| format!("failed to write schemas to {dir}"))?;

    let report = GenerationReport {
        entity_count: compilation.documents.len(),
        field_count: compilation.documents.values().map(|d| d.fields.len()).sum(),
        enum_count: compilation.catalog.enums.len(),
        upgraded_references: compilation.upgraded_references,
        files: compilation.output.names().map(str::to_owned).collect(),
    };
    info!(
        entities = report.entity_count,
        enums = report.enum_count,
        upgraded = report.upgraded_references,
        "generation complete"
    );
    Ok(report)
}
