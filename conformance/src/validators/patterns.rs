//! Pattern rule checks: every `pattern` validation rule must compile.

use std::path::Path;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use ui_schema_codegen::CompilerConfig;

use super::{file_label, read_json, schema_files};
use crate::report::{ConformanceReport, TestResult};

fn field_rules(fv: &Value) -> Option<(&str, &Vec<Value>)> {
    Some((fv.get("field")?.as_str()?, fv.get("rules")?.as_array()?))
}

fn pattern_problems(name: &str, doc: &Value) -> Vec<String> {
    let rules = doc
        .pointer("/validation/fields")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(field_rules);

    let mut problems = Vec::new();
    for (field, rules) in rules {
        for rule in rules {
            if rule.get("rule").and_then(Value::as_str) != Some("pattern") {
                continue;
            }
            let pattern = rule
                .get("pattern")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if let Err(e) = Regex::new(pattern) {
                problems.push(format!("{name}: {field}: {e}"));
            }
        }
    }
    problems
}

/// Validates pattern rules across every entity document in `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn validate(dir: &Path, config: &CompilerConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let catalog = config.catalog_name();
    let mut problems = Vec::new();
    for path in schema_files(dir, &config.document_suffix)? {
        let name = file_label(&path);
        if name == catalog {
            continue;
        }
        // Unparseable documents are reported by the documents validator.
        if let Ok(doc) = read_json(&path) {
            problems.extend(pattern_problems(&name, &doc));
        }
    }
    report.push(TestResult::from_problems(
        "patterns/compile",
        "every pattern rule compiles",
        "pattern rules that do not compile",
        problems,
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_pattern_is_reported() {
        let doc = json!({
            "validation": {
                "fields": [
                    {
                        "field": "tax_id",
                        "rules": [{"rule": "pattern", "pattern": "^[0-9]{2}-[0-9]{7}$"}]
                    },
                    {
                        "field": "code",
                        "rules": [{"rule": "required"}, {"rule": "pattern", "pattern": "([a-z"}]
                    }
                ]
            }
        });
        let problems = pattern_problems("organization.schema.json", &doc);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("code"));
    }
}
