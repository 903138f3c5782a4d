//! Detail view layout.

use ui_ontology::{Cardinality, Relationship};

use crate::document::{
    Condition, Detail, DetailSection, DetailSectionKind, FieldDescriptor, RelatedLayout,
    RelatedRecords,
};
use crate::mapping::{humanize, to_snake_case};

use super::is_ui_eligible;

/// Builds the detail view: an overview of the first `overview_count` scalar
/// fields, one section per structured field, and one section per outgoing
/// relationship.
#[must_use]
pub fn build_detail(
    entity: &str,
    fields: &[FieldDescriptor],
    relationships: &[Relationship],
    overview_count: usize,
) -> Detail {
    let mut sections = Vec::new();

    let overview: Vec<String> = fields
        .iter()
        .filter(|f| is_ui_eligible(f) && !f.field_type.is_structured())
        .take(overview_count)
        .map(|f| f.name.clone())
        .collect();
    if !overview.is_empty() {
        sections.push(DetailSection {
            id: "overview".to_owned(),
            title: "Overview".to_owned(),
            kind: DetailSectionKind::Fields,
            fields: overview,
            visible_when: None,
            related: None,
        });
    }

    let structured = fields
        .iter()
        .filter(|f| is_ui_eligible(f) && f.field_type.is_structured());
    for f in structured {
        sections.push(DetailSection {
            id: f.name.clone(),
            title: f.label.clone(),
            kind: DetailSectionKind::Object,
            fields: vec![f.name.clone()],
            visible_when: Some(Condition::truthy(&f.name)),
            related: None,
        });
    }

    for rel in relationships.iter().filter(|r| r.from == entity) {
        let layout = if rel.cardinality == Cardinality::OneToMany {
            RelatedLayout::Table
        } else {
            RelatedLayout::List
        };
        sections.push(DetailSection {
            id: format!("related_{}", rel.edge),
            title: humanize(&rel.edge),
            kind: DetailSectionKind::Related,
            fields: Vec::new(),
            visible_when: None,
            related: Some(RelatedRecords {
                relationship: rel.edge.clone(),
                entity: to_snake_case(&rel.to),
                inverse: rel.inverse.clone(),
                layout,
            }),
        });
    }

    Detail { sections }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::FieldType;

    #[test]
    fn overview_objects_and_related() {
        let fields = vec![
            FieldDescriptor::new("id", "ID".to_owned(), FieldType::String, true),
            FieldDescriptor::new("name", "Name".to_owned(), FieldType::String, true),
            FieldDescriptor::new(
                "year_built",
                "Year Built".to_owned(),
                FieldType::Integer,
                false,
            ),
            FieldDescriptor::new(
                "address",
                "Address".to_owned(),
                FieldType::EmbeddedObject,
                true,
            ),
        ];
        let rels = vec![Relationship {
            from: "Property".to_owned(),
            to: "Unit".to_owned(),
            edge: "units".to_owned(),
            inverse: "property".to_owned(),
            cardinality: Cardinality::OneToMany,
            required: false,
        }];
        let detail = build_detail("Property", &fields, &rels, 1);
        assert_eq!(detail.sections.len(), 3);
        assert_eq!(detail.sections[0].fields, vec!["name"]);
        assert_eq!(detail.sections[1].kind, DetailSectionKind::Object);
        assert!(detail.sections[1].visible_when.is_some());
        let related = detail.sections[2].related.as_ref().unwrap();
        assert_eq!(related.entity, "unit");
        assert_eq!(related.layout, RelatedLayout::Table);
    }
}
