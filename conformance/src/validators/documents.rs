//! Structural checks on emitted documents.
//!
//! Verifies that the enum catalog exists and sorts first, that every entity
//! document parses and names itself after its file, that every `enum_ref`
//! resolves in the document's own enum dictionary, that list views respect
//! the column cap, and that every transition connects declared states.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use ui_schema_codegen::CompilerConfig;

use super::{file_label, read_json, schema_files};
use crate::report::{ConformanceReport, TestResult};

fn array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

fn enum_ref_problems(name: &str, doc: &Value) -> Vec<String> {
    let enums = doc.get("enums").and_then(Value::as_object);
    let mut problems = Vec::new();
    let fields = array(doc, "fields");
    let filters = doc.get("list").map_or(&[][..], |l| array(l, "filters"));
    for item in fields.iter().chain(filters) {
        if let Some(id) = item.get("enum_ref").and_then(Value::as_str) {
            if !enums.is_some_and(|e| e.contains_key(id)) {
                problems.push(format!(
                    "{name}: enum_ref {id} is not in the enum dictionary"
                ));
            }
        }
    }
    problems
}

fn transition_problems(name: &str, doc: &Value) -> Vec<String> {
    let Some(machine) = doc.get("state_machine") else {
        return Vec::new();
    };
    let states: Vec<&str> = array(machine, "states")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let mut problems = Vec::new();
    for t in array(machine, "transitions") {
        for end in ["from", "to"] {
            let state = t.get(end).and_then(Value::as_str).unwrap_or_default();
            if !states.contains(&state) {
                problems.push(format!(
                    "{name}: transition {end} state '{state}' is not declared"
                ));
            }
        }
    }
    problems
}

/// Validates every document in `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn validate(dir: &Path, config: &CompilerConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let files = schema_files(dir, &config.document_suffix)?;
    let catalog = config.catalog_name();

    match files.first().map(|p| file_label(p)) {
        Some(first) if first == catalog => {
            let detail = format!("{catalog} present and first");
            report.push(TestResult::pass("documents/catalog", detail));
        }
        Some(first) => {
            report.push(TestResult::fail(
                "documents/catalog",
                format!("expected {catalog} to sort first, found {first}"),
            ));
        }
        None => {
            report.push(TestResult::fail(
                "documents/catalog",
                format!("no schema documents in {}", dir.display()),
            ));
            return Ok(report);
        }
    }

    let mut parse = Vec::new();
    let mut identity = Vec::new();
    let mut refs = Vec::new();
    let mut columns = Vec::new();
    let mut transitions = Vec::new();

    for path in &files {
        let name = file_label(path);
        let doc = match read_json(path) {
            Ok(doc) => doc,
            Err(e) => {
                parse.push(format!("{e:#}"));
                continue;
            }
        };
        if name == catalog {
            continue;
        }
        let stem = name.strip_suffix(config.document_suffix.as_str()).unwrap_or(&name);
        if doc.get("entity").and_then(Value::as_str) != Some(stem) {
            identity.push(format!("{name}: entity id does not match file name"));
        }
        refs.extend(enum_ref_problems(&name, &doc));

        let count = doc.get("list").map_or(0, |l| array(l, "columns").len());
        let max = config.max_list_columns;
        if count > max {
            columns.push(format!("{name}: {count} columns exceeds {max}"));
        }
        transitions.extend(transition_problems(&name, &doc));
    }

    report.push(TestResult::from_problems(
        "documents/parse",
        format!("{} documents parse", files.len()),
        "documents failed to parse",
        parse,
    ));
    report.push(TestResult::from_problems(
        "documents/identity",
        "every document is named after its entity",
        "documents misnamed",
        identity,
    ));
    report.push(TestResult::from_problems(
        "documents/enum_refs",
        "every enum_ref resolves",
        "dangling enum references",
        refs,
    ));
    report.push(TestResult::from_problems(
        "documents/list_columns",
        "list views respect the column cap",
        "list views exceed the column cap",
        columns,
    ));
    report.push(TestResult::from_problems(
        "documents/transitions",
        "transitions connect declared states",
        "transitions reference undeclared states",
        transitions,
    ));
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dangling_enum_ref_is_reported() {
        let doc = json!({
            "fields": [{"name": "status", "enum_ref": "LeaseStatus"}],
            "enums": {}
        });
        assert_eq!(enum_ref_problems("lease.schema.json", &doc).len(), 1);
    }

    #[test]
    fn undeclared_transition_state_is_reported() {
        let doc = json!({
            "state_machine": {
                "states": ["draft"],
                "transitions": [{"from": "draft", "to": "active"}]
            }
        });
        let problems = transition_problems("lease.schema.json", &doc);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("active"));
    }

    #[test]
    fn empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate(dir.path(), &CompilerConfig::default()).unwrap();
        assert!(!report.all_passed());
    }
}
