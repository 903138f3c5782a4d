//! Form layout.

use std::collections::BTreeSet;

use crate::document::{FieldDescriptor, Form, FormSection};
use crate::mapping::reference_prefix;
use crate::templates::{form_template, SectionTemplate};

use super::is_ui_eligible;

fn templated(templates: &[SectionTemplate], eligible: &[&FieldDescriptor]) -> Vec<FormSection> {
    templates
        .iter()
        .filter_map(|t| {
            let fields: Vec<String> = t
                .fields
                .iter()
                .filter(|name| eligible.iter().any(|f| f.name == **name))
                .map(|name| (*name).to_owned())
                .collect();
            (!fields.is_empty()).then(|| FormSection {
                id: t.id.to_owned(),
                title: t.title.to_owned(),
                collapsible: t.collapsible,
                collapsed: t.collapsed,
                fields,
                visible_when: t.visible_when.map(|w| w.condition()),
                required_when: t.required_when.map(|w| w.condition()),
            })
        })
        .collect()
}

fn is_identity(f: &FieldDescriptor) -> bool {
    f.display
        || matches!(f.name.as_str(), "name" | "title" | "type")
        || f.name.ends_with("_type")
        || reference_prefix(&f.name).is_some()
        || f.field_type.is_reference()
}

fn plain(id: &str, title: &str, fields: Vec<String>) -> FormSection {
    FormSection {
        id: id.to_owned(),
        title: title.to_owned(),
        collapsible: false,
        collapsed: false,
        fields,
        visible_when: None,
        required_when: None,
    }
}

fn generic(eligible: &[&FieldDescriptor]) -> Vec<FormSection> {
    let mut identity = Vec::new();
    let mut main = Vec::new();
    let mut details = Vec::new();
    for f in eligible {
        if f.field_type.is_structured() {
            details.push(f.name.clone());
        } else if is_identity(f) {
            identity.push(f.name.clone());
        } else {
            main.push(f.name.clone());
        }
    }
    [
        plain("identity", "Identity", identity),
        plain("main", "Main", main),
        plain("details", "Details", details),
    ]
    .into_iter()
    .filter(|s| !s.fields.is_empty())
    .collect()
}

/// Builds the form of an entity from its template, or the generic fallback,
/// then appends any UI-eligible field left unplaced to `Additional`.
#[must_use]
pub fn build_form(entity: &str, fields: &[FieldDescriptor]) -> Form {
    let eligible: Vec<&FieldDescriptor> = fields.iter().filter(|f| is_ui_eligible(f)).collect();
    let mut sections = match form_template(entity) {
        Some(templates) => templated(templates, &eligible),
        None => generic(&eligible),
    };

    let placed: BTreeSet<&str> = sections
        .iter()
        .flat_map(|s| s.fields.iter().map(String::as_str))
        .collect();
    let leftover: Vec<String> = eligible
        .iter()
        .filter(|f| !placed.contains(f.name.as_str()))
        .map(|f| f.name.clone())
        .collect();
    if !leftover.is_empty() {
        let mut additional = plain("additional", "Additional", leftover);
        additional.collapsible = true;
        sections.push(additional);
    }

    Form { sections }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{ConditionTest, FieldType};

    fn field(name: &str, t: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, name.to_owned(), t, true)
    }

    #[test]
    fn generic_buckets() {
        let mut computed = field("display_name", FieldType::String);
        computed.computed = true;
        let fields = vec![
            field("id", FieldType::String),
            field("name", FieldType::String),
            field("unit_type", FieldType::Enum),
            field("bedrooms", FieldType::Integer),
            field("address", FieldType::EmbeddedObject),
            computed,
        ];
        let form = build_form("Unit", &fields);
        let ids: Vec<&str> = form.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["identity", "main", "details"]);
        assert_eq!(form.sections[0].fields, vec!["name", "unit_type"]);
        let hidden = |f: &String| f == "id" || f == "display_name";
        assert!(form.sections.iter().all(|s| !s.fields.iter().any(hidden)));
    }

    #[test]
    fn unplaced_fields_land_in_additional() {
        let fields = vec![
            field("lease_number", FieldType::String),
            field("status", FieldType::Enum),
            field("termination_reason", FieldType::Text),
            field("pet_policy", FieldType::Text),
        ];
        let form = build_form("Lease", &fields);
        let last = form.sections.last().unwrap();
        assert_eq!(last.id, "additional");
        assert_eq!(last.fields, vec!["pet_policy"]);

        let termination = form.sections.iter().find(|s| s.id == "termination");
        let termination = termination.unwrap();
        let when = termination.visible_when.as_ref().unwrap();
        assert_eq!(when.field, "status");
        assert_eq!(when.test, ConditionTest::Equals("terminated".to_owned()));
        assert!(termination.required_when.is_some());
    }
}
