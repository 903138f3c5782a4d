//! UI schema conformance suite.
//!
//! Checks an emitted schema directory the way downstream tooling consumes
//! it: as files on disk.
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `documents` | catalog first, documents parse, enum refs, column cap, transition states |
//! | `patterns` | every pattern rule compiles |
//! | `drift` | files equal a fresh compilation, no stray schema files |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::PathBuf;
//! use ui_schema_conformance::{run_all, OutputPaths};
//!
//! let paths = OutputPaths {
//!     schemas: PathBuf::from("schemas"),
//!     bundle: None,
//!     config: None,
//! };
//! let report = run_all(&paths).expect("conformance run should complete");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ui_ontology::Ontology;
use ui_schema_codegen::CompilerConfig;

pub use report::{ConformanceReport, Severity, TestResult};

/// Inputs of a conformance run.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Directory holding the emitted schema documents.
    pub schemas: PathBuf,
    /// Ontology bundle the documents were compiled from. `None` means the
    /// built-in reference ontology.
    pub bundle: Option<PathBuf>,
    /// Compiler configuration TOML used for the run. `None` means defaults.
    pub config: Option<PathBuf>,
}

fn load_config(paths: &OutputPaths) -> Result<CompilerConfig> {
    let Some(path) = &paths.config else {
        return Ok(CompilerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    CompilerConfig::from_toml_str(&text)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

fn load_ontology(paths: &OutputPaths) -> Result<Ontology> {
    match &paths.bundle {
        Some(path) => Ok(Ontology::load(path)?),
        None => Ok(Ontology::sample()),
    }
}

/// Runs every validator and returns the aggregated report.
///
/// Validators run in this order:
/// 1. documents
/// 2. patterns
/// 3. drift
///
/// # Errors
///
/// Returns an error if the configuration or ontology cannot be loaded, the
/// ontology fails to compile, or the schema directory cannot be listed.
pub fn run_all(paths: &OutputPaths) -> Result<ConformanceReport> {
    let config = load_config(paths)?;
    let ontology = load_ontology(paths)?;
    let mut report = ConformanceReport::new();

    report.extend(validators::documents::validate(&paths.schemas, &config)?);
    report.extend(validators::patterns::validate(&paths.schemas, &config)?);
    let drift = validators::drift::validate(&paths.schemas, &ontology, &config)?;
    report.extend(drift);

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ui_schema_codegen::generate;

    fn generated() -> (tempfile::TempDir, OutputPaths) {
        let dir = tempfile::tempdir().unwrap();
        generate(&Ontology::sample(), dir.path(), &CompilerConfig::default()).unwrap();
        let paths = OutputPaths {
            schemas: dir.path().to_path_buf(),
            bundle: None,
            config: None,
        };
        (dir, paths)
    }

    #[test]
    fn fresh_output_conforms() {
        let (_dir, paths) = generated();
        let report = run_all(&paths).unwrap();
        let failures: Vec<String> = report.failures().map(ToString::to_string).collect();
        assert!(report.all_passed(), "{failures:#?}");
    }

    #[test]
    fn edited_document_is_drift() {
        let (dir, paths) = generated();
        let lease = dir.path().join("lease.schema.json");
        let text = std::fs::read_to_string(&lease).unwrap();
        std::fs::write(&lease, text.replace("Lease Agreement", "Rental")).unwrap();
        let report = run_all(&paths).unwrap();
        let drift = report.failures().find(|r| r.validator == "drift/content");
        let drift = drift.unwrap();
        assert!(drift.details.iter().any(|d| d.starts_with("lease")));
    }

    #[test]
    fn stray_schema_is_reported() {
        let (dir, paths) = generated();
        let stray = dir.path().join("tenant.schema.json");
        std::fs::write(stray, "{\"entity\": \"tenant\"}\n").unwrap();
        let report = run_all(&paths).unwrap();
        assert!(report.failures().any(|r| r.validator == "drift/stray"));
    }

    #[test]
    fn bundle_and_config_files_are_honored() {
        let dir = tempfile::tempdir().unwrap();
        let config = CompilerConfig {
            max_list_columns: 4,
            ..CompilerConfig::default()
        };
        let schemas = dir.path().join("schemas");
        generate(&Ontology::sample(), &schemas, &config).unwrap();

        let bundle = dir.path().join("ontology.json");
        std::fs::write(&bundle, serde_json::to_string(&Ontology::sample()).unwrap()).unwrap();
        let config_path = dir.path().join("compiler.toml");
        std::fs::write(&config_path, "max_list_columns = 4\n").unwrap();

        let paths = OutputPaths {
            schemas,
            bundle: Some(bundle),
            config: Some(config_path),
        };
        assert!(run_all(&paths).unwrap().all_passed());
    }
}
