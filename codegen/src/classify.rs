//! Field-type classification.
//!
//! Maps one field's value tree to exactly one of the sixteen semantic field
//! types. The procedure is ordered and the first rule that matches wins:
//!
//! 1. temporal reference → `date` or `datetime` (by name tokens)
//! 2. catalogued value-type reference → `money`, `contact_method`,
//!    `embedded_object`, or `embedded_array`
//! 3. list shape → `embedded_array`, `entity_ref_list`, or `string_list`
//! 4. enum shape → `enum`
//! 5. primitive kind dispatch
//!
//! Classification is a pure function of the field definition and the two
//! lookup tables in [`Lookups`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;
use ui_ontology::introspect::{self, Reference};
use ui_ontology::{FieldDefinition, Kind, ValueTree};

use crate::config::CompilerConfig;
use crate::document::{FieldDescriptor, FieldType};
use crate::mapping::{self, humanize, local_name, pluralize, ValueTypeClass};

/// Entity-name and edge-name tables used to resolve `_id` / `_ids` fields.
///
/// Empty during the first pass; populated by the cross-reference resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookups {
    /// Known entity ids (snake_case).
    pub entities: BTreeSet<String>,
    /// Edge name → target entity id.
    pub edges: BTreeMap<String, String>,
}

impl Lookups {
    /// Resolves an `_id` prefix: entity names first, then edge names.
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if let Some(entity) = self.entities.get(prefix) {
            return Some(entity);
        }
        self.edges.get(prefix).map(String::as_str)
    }
}

/// Classifies fields against the value-type catalog.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: HashMap<String, ValueTypeClass>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&CompilerConfig::default())
    }
}

impl Classifier {
    /// Builds a classifier from the built-in catalog plus any configured
    /// structured types.
    #[must_use]
    pub fn new(config: &CompilerConfig) -> Self {
        let mut catalog: HashMap<String, ValueTypeClass> = mapping::value_type_mappings()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        for name in &config.structured_types {
            catalog
                .entry(local_name(name).to_owned())
                .or_insert(ValueTypeClass::Structured);
        }
        Self { catalog }
    }

    fn catalogued<'a>(&self, v: &'a ValueTree) -> Option<(&'a str, ValueTypeClass)> {
        match introspect::find_reference(v)? {
            Reference::Named(path) => {
                let name = local_name(path);
                self.catalog.get(name).map(|class| (name, *class))
            }
            Reference::Temporal => None,
        }
    }

    /// Classifies one field. Returns `None` for fields that have no UI
    /// representation (a bottom value).
    #[must_use]
    pub fn classify(&self, field: &FieldDefinition, lookups: &Lookups) -> Option<FieldDescriptor> {
        let name = field.name.as_str();
        let v = &field.value;
        let required = !field.optional;
        let list = introspect::is_list(v);

        let mut d = if introspect::is_time(v) {
            let t = if is_date_name(name) {
                FieldType::Date
            } else {
                FieldType::DateTime
            };
            descriptor(name, t, required)
        } else if let Some((type_name, class)) = self.catalogued(v) {
            let mut d = match (class, list) {
                (ValueTypeClass::Money(variant), false) => {
                    let mut d = descriptor(name, FieldType::Money, required);
                    d.money_variant = Some(variant);
                    d
                }
                (ValueTypeClass::ContactMethod, false) => {
                    descriptor(name, FieldType::ContactMethod, required)
                }
                (_, true) => descriptor(name, FieldType::EmbeddedArray, required),
                (ValueTypeClass::Structured, false) => {
                    descriptor(name, FieldType::EmbeddedObject, required)
                }
            };
            if d.field_type.is_structured() {
                d.object_ref = Some(type_name.to_owned());
            }
            d
        } else if list {
            self.classify_list(name, v, required, lookups)
        } else if introspect::is_enum(v) {
            let mut d = descriptor(name, FieldType::Enum, required);
            d.enum_values = introspect::enum_values(v);
            d.default = introspect::default_literal(v).cloned();
            d
        } else {
            match classify_primitive(name, v, required, lookups) {
                Some(d) => d,
                None => {
                    debug!(field = name, "dropping field with no UI representation");
                    return None;
                }
            }
        };

        let notes = &v.annotations;
        d.display = notes.display;
        d.computed = notes.computed;
        d.readonly = notes.immutable || notes.computed;
        d.sensitive = notes.sensitive;
        d.pii = notes.pii;
        d.deprecated = notes.deprecated.clone();
        Some(d)
    }

    fn classify_list(
        &self,
        name: &str,
        v: &ValueTree,
        required: bool,
        lookups: &Lookups,
    ) -> FieldDescriptor {
        let element = introspect::list_element(v);
        let mut d = match element.and_then(|e| self.catalogued(e)) {
            Some((type_name, _)) => {
                let mut d = descriptor(name, FieldType::EmbeddedArray, required);
                d.object_ref = Some(type_name.to_owned());
                d
            }
            None => match mapping::reference_prefix(name)
                .filter(|(_, many)| *many)
                .and_then(|(prefix, _)| lookups.resolve(prefix).map(|t| (prefix, t)))
            {
                Some((prefix, target)) => {
                    let mut d = FieldDescriptor::new(
                        name,
                        pluralize(&humanize(prefix)),
                        FieldType::EntityRefList,
                        required,
                    );
                    d.target = Some(target.to_owned());
                    d
                }
                None => descriptor(name, FieldType::StringList, required),
            },
        };
        let lower = introspect::numeric_bounds(v).lower;
        d.min_items = lower.map(|b| {
            let n = b.value.max(0.0).ceil() as u64;
            if b.inclusive { n } else { n + 1 }
        });
        d
    }
}

fn descriptor(name: &str, t: FieldType, required: bool) -> FieldDescriptor {
    FieldDescriptor::new(name, humanize(name), t, required)
}

fn classify_primitive(
    name: &str,
    v: &ValueTree,
    required: bool,
    lookups: &Lookups,
) -> Option<FieldDescriptor> {
    let d = match v.kind {
        Kind::String => {
            let reference = mapping::reference_prefix(name);
            let target = reference.and_then(|(prefix, _)| lookups.resolve(prefix));
            if let (Some((prefix, many)), Some(target)) = (reference, target) {
                let (label, t) = if many {
                    (pluralize(&humanize(prefix)), FieldType::EntityRefList)
                } else {
                    (humanize(prefix), FieldType::EntityRef)
                };
                let mut d = FieldDescriptor::new(name, label, t, required);
                d.target = Some(target.to_owned());
                return Some(d);
            }
            let t = if v.annotations.text {
                FieldType::Text
            } else if is_email_name(name) {
                FieldType::Email
            } else {
                FieldType::String
            };
            let mut d = descriptor(name, t, required);
            d.pattern = introspect::pattern(v).map(str::to_owned);
            d.default = introspect::default_literal(v).cloned();
            d
        }
        Kind::Int | Kind::Float => {
            let t = if v.kind == Kind::Int {
                FieldType::Integer
            } else {
                FieldType::Number
            };
            let mut d = descriptor(name, t, required);
            let bounds = introspect::numeric_bounds(v);
            if let Some(lower) = bounds.lower {
                d.min = Some(lower.value);
                d.exclusive_min = !lower.inclusive;
            }
            if let Some(upper) = bounds.upper {
                d.max = Some(upper.value);
                d.exclusive_max = !upper.inclusive;
            }
            d.default = introspect::default_literal(v).cloned();
            d
        }
        Kind::Bool => {
            let mut d = descriptor(name, FieldType::Boolean, required);
            d.default = introspect::default_literal(v).cloned();
            d
        }
        Kind::Struct => {
            let mut d = descriptor(name, FieldType::EmbeddedObject, required);
            d.object_ref = Some("unknown".to_owned());
            d
        }
        Kind::Top => {
            let mut d = descriptor(name, FieldType::EmbeddedObject, required);
            d.object_ref = Some("any".to_owned());
            d
        }
        // Handled by the list and temporal rules before dispatch.
        Kind::List => descriptor(name, FieldType::StringList, required),
        Kind::Time => descriptor(name, FieldType::DateTime, required),
        Kind::Bottom => return None,
    };
    Some(d)
}

/// Calendar-date names: a `date`, `birthday`, or `dob` token, or an `_on`
/// suffix. Everything else temporal is a timestamp.
#[must_use]
pub fn is_date_name(name: &str) -> bool {
    name.split('_').any(|t| matches!(t, "date" | "birthday" | "dob")) || name.ends_with("_on")
}

fn is_email_name(name: &str) -> bool {
    name == "email" || name.ends_with("_email")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mapping::MoneyVariant;
    use ui_ontology::sample::common::{conditional_list, linked};

    fn classify(field: FieldDefinition) -> FieldDescriptor {
        let none = Lookups::default();
        Classifier::default().classify(&field, &none).unwrap()
    }

    fn required(name: &str, v: ValueTree) -> FieldDescriptor {
        classify(FieldDefinition::required(name, v))
    }

    fn optional(name: &str, v: ValueTree) -> FieldDescriptor {
        classify(FieldDefinition::optional(name, v))
    }

    fn lookups() -> Lookups {
        let mut l = Lookups::default();
        l.entities.insert("person".to_owned());
        l.entities.insert("unit".to_owned());
        l.edges.insert("owner".to_owned(), "organization".to_owned());
        l
    }

    #[test]
    fn temporal_names() {
        let d = required("start_date", ValueTree::time());
        assert_eq!(d.field_type, FieldType::Date);
        let d = required("available_on", ValueTree::time());
        assert_eq!(d.field_type, FieldType::Date);
        let d = required("signed_at", ValueTree::time());
        assert_eq!(d.field_type, FieldType::DateTime);
    }

    #[test]
    fn money_variants() {
        let d = required("rent_amount", linked("#PositiveMoney"));
        assert_eq!(d.field_type, FieldType::Money);
        assert_eq!(d.money_variant, Some(MoneyVariant::Positive));
        let d = optional("deposit", linked("#NonNegativeMoney"));
        assert_eq!(d.money_variant, Some(MoneyVariant::NonNegative));
        assert!(!d.required);
    }

    #[test]
    fn contact_method_single_and_list() {
        let d = required("primary_contact", linked("#ContactMethod"));
        assert_eq!(d.field_type, FieldType::ContactMethod);
        let methods = ValueTree::list_of(linked("#ContactMethod"));
        let d = required("contact_methods", methods);
        assert_eq!(d.field_type, FieldType::EmbeddedArray);
        assert_eq!(d.object_ref.as_deref(), Some("ContactMethod"));
    }

    #[test]
    fn list_in_conjunction_of_documents() {
        let d = optional("documents", conditional_list(linked("#Document")));
        assert_eq!(d.field_type, FieldType::EmbeddedArray);
        assert_eq!(d.object_ref.as_deref(), Some("Document"));
    }

    #[test]
    fn unresolved_list_falls_back_to_string_list() {
        let d = optional("checklist", conditional_list(ValueTree::top()));
        assert_eq!(d.field_type, FieldType::StringList);
    }

    #[test]
    fn enum_records_values_and_default() {
        let v = ValueTree::one_of(&["monthly", "weekly"]).with_default("monthly");
        let d = required("payment_frequency", v);
        assert_eq!(d.field_type, FieldType::Enum);
        assert_eq!(d.enum_values, vec!["monthly", "weekly"]);
        assert_eq!(d.default.as_ref().and_then(|l| l.as_str()), Some("monthly"));
    }

    #[test]
    fn primitive_dispatch() {
        let cases = [
            ("notes", ValueTree::string().text(), FieldType::Text),
            ("billing_email", ValueTree::string(), FieldType::Email),
            ("bedrooms", ValueTree::int(), FieldType::Integer),
            ("bathrooms", ValueTree::float(), FieldType::Number),
            ("auto_renew", ValueTree::boolean(), FieldType::Boolean),
        ];
        for (name, v, expected) in cases {
            assert_eq!(required(name, v).field_type, expected, "{name}");
        }
    }

    #[test]
    fn unresolved_struct_is_generic_object() {
        let d = optional("preferences", ValueTree::of(Kind::Struct));
        assert_eq!(d.field_type, FieldType::EmbeddedObject);
        assert_eq!(d.object_ref.as_deref(), Some("unknown"));
        let d = optional("metadata", ValueTree::top());
        assert_eq!(d.object_ref.as_deref(), Some("any"));
    }

    #[test]
    fn bottom_is_dropped() {
        let field = FieldDefinition::required("never", ValueTree::bottom());
        let none = Lookups::default();
        assert!(Classifier::default().classify(&field, &none).is_none());
    }

    #[test]
    fn numeric_bounds_are_captured() {
        let v = ValueTree::all_of(vec![
            ValueTree::int().at_least(1800.0),
            ValueTree::int().at_most(2100.0),
        ]);
        let d = optional("year_built", v);
        assert_eq!(d.min, Some(1800.0));
        assert_eq!(d.max, Some(2100.0));
        let d = required("square_feet", ValueTree::int().greater_than(0.0));
        assert!(d.exclusive_min);
    }

    #[test]
    fn reference_fields_need_lookups() {
        let classifier = Classifier::default();
        let field = FieldDefinition::required("owner_id", ValueTree::string());
        let pass1 = classifier.classify(&field, &Lookups::default()).unwrap();
        assert_eq!(pass1.field_type, FieldType::String);

        let pass2 = classifier.classify(&field, &lookups()).unwrap();
        assert_eq!(pass2.field_type, FieldType::EntityRef);
        assert_eq!(pass2.target.as_deref(), Some("organization"));
        assert_eq!(pass2.label, "Owner");
    }

    #[test]
    fn id_lists_become_reference_lists() {
        let ids = ValueTree::list_of(ValueTree::string()).at_least(1.0);
        let field = FieldDefinition::required("tenant_ids", ids);
        let mut l = lookups();
        l.edges.insert("tenant".to_owned(), "person".to_owned());
        let d = Classifier::default().classify(&field, &l).unwrap();
        assert_eq!(d.field_type, FieldType::EntityRefList);
        assert_eq!(d.target.as_deref(), Some("person"));
        assert_eq!(d.min_items, Some(1));
    }

    #[test]
    fn configured_structured_types() {
        let config = CompilerConfig {
            structured_types: vec!["#InsurancePolicy".to_owned()],
            ..CompilerConfig::default()
        };
        let policy = ValueTree::named("#InsurancePolicy", Kind::Struct);
        let field = FieldDefinition::optional("policy", policy);
        let none = Lookups::default();
        let d = Classifier::new(&config).classify(&field, &none).unwrap();
        assert_eq!(d.field_type, FieldType::EmbeddedObject);
        assert_eq!(d.object_ref.as_deref(), Some("InsurancePolicy"));
    }

    #[test]
    fn annotations_flow_through() {
        let v = ValueTree::string().display().immutable();
        let d = required("lease_number", v);
        assert!(d.display);
        assert!(d.readonly);
        assert!(!d.computed);
    }
}
