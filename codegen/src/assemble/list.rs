//! List view columns and filters.

use crate::document::{
    FieldDescriptor, FieldType, FilterKind, ListColumn, ListFilter, ListView, SortDirection,
    SortOrder,
};
use crate::tables::SYSTEM_FIELDS;

const LAST_UPDATED: &str = "updated_at";

fn is_type_like(f: &FieldDescriptor) -> bool {
    f.field_type == FieldType::Enum
        && (f.name == "type"
            || f.name.ends_with("_type")
            || matches!(f.name.as_str(), "category" | "role" | "kind"))
}

fn listable(f: &FieldDescriptor) -> bool {
    f.deprecated.is_none() && !SYSTEM_FIELDS.contains(&f.name.as_str())
}

fn take<'a>(f: &'a FieldDescriptor, picked: &mut Vec<&'a FieldDescriptor>) {
    if !picked.iter().any(|p| p.name == f.name) {
        picked.push(f);
    }
}

/// Picks columns in strict priority order.
fn priority(fields: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    let candidates: Vec<&FieldDescriptor> = fields.iter().filter(|f| listable(f)).collect();
    let mut picked: Vec<&FieldDescriptor> = Vec::new();

    let display = candidates.iter().copied().find(|f| f.display);
    let status = candidates.iter().copied().find(|f| f.name == "status");
    let type_like = candidates.iter().copied().find(|f| is_type_like(f));
    for f in display.into_iter().chain(status).chain(type_like) {
        take(f, &mut picked);
    }
    for t in [FieldType::EntityRef, FieldType::Money] {
        for f in candidates.iter().copied().filter(|f| f.field_type == t) {
            take(f, &mut picked);
        }
    }
    for f in candidates.iter().copied() {
        if f.field_type.is_temporal() {
            take(f, &mut picked);
        }
    }
    picked
}

fn filter_for(f: &FieldDescriptor) -> Option<ListFilter> {
    let kind = match f.field_type {
        FieldType::Enum => FilterKind::MultiSelect,
        FieldType::Money => FilterKind::Range,
        FieldType::EntityRef => FilterKind::EntitySearch,
        FieldType::Date | FieldType::DateTime => FilterKind::DateRange,
        _ => return None,
    };
    Some(ListFilter {
        field: f.name.clone(),
        label: f.label.clone(),
        kind,
        enum_ref: f.enum_ref.clone(),
        target: f.target.clone(),
    })
}

fn column(f: &FieldDescriptor) -> ListColumn {
    ListColumn {
        field: f.name.clone(),
        label: f.label.clone(),
        field_type: f.field_type,
        sortable: f.field_type != FieldType::EntityRef,
    }
}

/// Builds the list view. At most `max_columns` columns; whenever there is
/// room the last one is `updated_at`.
#[must_use]
pub fn build_list(fields: &[FieldDescriptor], max_columns: usize) -> ListView {
    let picked: Vec<&FieldDescriptor> = priority(fields)
        .into_iter()
        .take(max_columns.saturating_sub(1))
        .collect();

    let mut columns: Vec<ListColumn> = picked.iter().map(|f| column(f)).collect();
    let mut filters: Vec<ListFilter> = picked.iter().filter_map(|f| filter_for(f)).collect();

    if max_columns > 0 {
        let updated = fields
            .iter()
            .find(|f| f.name == LAST_UPDATED)
            .cloned()
            .unwrap_or_else(|| {
                FieldDescriptor::new(LAST_UPDATED, String::new(), FieldType::DateTime, false)
            });
        let mut last = column(&updated);
        last.label = "Last Updated".to_owned();
        columns.push(last);
        if let Some(mut f) = filter_for(&updated) {
            f.label = "Last Updated".to_owned();
            filters.push(f);
        }
    }

    ListView {
        columns,
        filters,
        default_sort: SortOrder {
            field: LAST_UPDATED.to_owned(),
            direction: SortDirection::Desc,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, t: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, name.to_owned(), t, true)
    }

    fn fields() -> Vec<FieldDescriptor> {
        let mut title = field("title", FieldType::String);
        title.display = true;
        let mut unit = field("unit_id", FieldType::EntityRef);
        unit.target = Some("unit".to_owned());
        vec![
            field("id", FieldType::String),
            title,
            field("notes", FieldType::Text),
            field("category", FieldType::Enum),
            unit,
            field("estimated_cost", FieldType::Money),
            field("status", FieldType::Enum),
            field("scheduled_date", FieldType::Date),
            field("updated_at", FieldType::DateTime),
        ]
    }

    #[test]
    fn priority_order_and_trailing_column() {
        let list = build_list(&fields(), 6);
        let names: Vec<&str> = list.columns.iter().map(|c| c.field.as_str()).collect();
        let expected = [
            "title",
            "status",
            "category",
            "unit_id",
            "estimated_cost",
            "updated_at",
        ];
        assert_eq!(names, expected);
        let last = list.columns.last().map(|c| c.label.as_str());
        assert_eq!(last, Some("Last Updated"));
        let kinds: Vec<FilterKind> = list.filters.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FilterKind::MultiSelect,
                FilterKind::MultiSelect,
                FilterKind::EntitySearch,
                FilterKind::Range,
                FilterKind::DateRange,
            ]
        );
        assert_eq!(list.default_sort.direction, SortDirection::Desc);
    }

    #[test]
    fn column_cap_is_respected() {
        for max in 0..10 {
            let list = build_list(&fields(), max);
            assert!(list.columns.len() <= max);
            if max > 0 {
                let last = list.columns.last().map(|c| c.field.as_str());
                assert_eq!(last, Some("updated_at"));
            }
        }
    }
}
