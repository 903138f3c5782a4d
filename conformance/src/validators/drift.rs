//! Drift detection: the directory must equal a fresh compilation.
//!
//! Recompiles the ontology in memory and compares every staged file with the
//! one on disk byte for byte. Schema files on disk that the compiler would
//! not produce are reported as stray.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use ui_ontology::Ontology;
use ui_schema_codegen::{compile, CompilerConfig};

use super::{file_label, schema_files};
use crate::report::{ConformanceReport, TestResult};

/// Compares `dir` against a fresh compilation of `ontology`.
///
/// # Errors
///
/// Returns an error if the ontology fails to compile or the directory cannot
/// be listed.
pub fn validate(
    dir: &Path,
    ontology: &Ontology,
    config: &CompilerConfig,
) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let compilation = compile(ontology, config).context("failed to recompile ontology")?;

    let mut changed = Vec::new();
    for (name, expected) in compilation.output.iter() {
        match std::fs::read_to_string(dir.join(name)) {
            Ok(actual) if actual == expected => {}
            Ok(_) => changed.push(format!("{name}: differs from a fresh compilation")),
            Err(e) => changed.push(format!("{name}: {e}")),
        }
    }
    let count = compilation.output.len();
    debug!(
        files = count,
        drifted = changed.len(),
        "drift comparison done"
    );
    report.push(TestResult::from_problems(
        "drift/content",
        format!("{count} files match a fresh compilation"),
        "files differ from a fresh compilation",
        changed,
    ));

    let stray: Vec<String> = schema_files(dir, &config.document_suffix)?
        .iter()
        .map(|p| file_label(p))
        .filter(|name| compilation.output.get(name).is_none())
        .collect();
    if stray.is_empty() {
        report.push(TestResult::pass("drift/stray", "no stray schema files"));
    } else {
        report.push(TestResult::fail_with_details(
            "drift/stray",
            "schema files the compiler no longer produces",
            stray,
        ));
    }
    Ok(report)
}
