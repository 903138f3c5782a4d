//! Schema document types: the compiler's output interface.
//!
//! Every struct serializes its fields in declaration order and every map is a
//! `BTreeMap`, so a document's JSON text is a pure function of its content.

use std::collections::BTreeMap;

use serde::Serialize;
use ui_ontology::{Deprecation, Literal};

use crate::mapping::MoneyVariant;

fn is_false(b: &bool) -> bool {
    !*b
}

/// The sixteen semantic field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line text.
    String,
    /// Multi-line text.
    Text,
    /// Email address.
    Email,
    /// Whole number.
    Integer,
    /// Decimal number.
    Number,
    /// Checkbox.
    Boolean,
    /// Calendar date.
    Date,
    /// Timestamp.
    #[serde(rename = "datetime")]
    DateTime,
    /// One of a closed set of values.
    Enum,
    /// Currency amount.
    Money,
    /// Reference to one record of another entity.
    EntityRef,
    /// References to many records of another entity.
    EntityRefList,
    /// A nested structured value.
    EmbeddedObject,
    /// A list of nested structured values.
    EmbeddedArray,
    /// A list of strings.
    StringList,
    /// A single contact method (phone, email, ...).
    ContactMethod,
}

impl FieldType {
    /// Structured types render as their own section rather than a single input.
    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            FieldType::EmbeddedObject | FieldType::EmbeddedArray | FieldType::ContactMethod
        )
    }

    /// Calendar or timestamp types.
    #[must_use]
    pub fn is_temporal(self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }

    /// Single or multiple entity references.
    #[must_use]
    pub fn is_reference(self) -> bool {
        matches!(self, FieldType::EntityRef | FieldType::EntityRefList)
    }
}

/// The fully classified description of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Enum identifier, for `enum` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_ref: Option<String>,
    /// Enum values in declaration order; published through the enum dictionary.
    #[serde(skip)]
    pub enum_values: Vec<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    /// Lower numeric limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// The lower limit is exclusive.
    #[serde(skip_serializing_if = "is_false")]
    pub exclusive_min: bool,
    /// Upper numeric limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// The upper limit is exclusive.
    #[serde(skip_serializing_if = "is_false")]
    pub exclusive_max: bool,
    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Sign constraint of a money field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money_variant: Option<MoneyVariant>,
    /// Target entity id of a reference field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Structured type name of an embedded field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_ref: Option<String>,
    /// Minimum number of list items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Primary display field of the entity.
    #[serde(skip_serializing_if = "is_false")]
    pub display: bool,
    /// Not editable after creation.
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    /// Derived by the system.
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    /// Masked on display.
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    /// Personally identifying.
    #[serde(skip_serializing_if = "is_false")]
    pub pii: bool,
    /// Deprecation notice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
}

impl FieldDescriptor {
    /// A descriptor of the given type with every optional facet unset.
    #[must_use]
    pub fn new(name: &str, label: String, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.to_owned(),
            label,
            field_type,
            required,
            enum_ref: None,
            enum_values: Vec::new(),
            default: None,
            min: None,
            exclusive_min: false,
            max: None,
            exclusive_max: false,
            pattern: None,
            money_variant: None,
            target: None,
            object_ref: None,
            min_items: None,
            display: false,
            readonly: false,
            computed: false,
            sensitive: false,
            pii: false,
            deprecated: None,
        }
    }
}

/// One value of an enum, with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// Wire value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// A named group of enum values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValueGroup {
    /// Group id.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Member values.
    pub values: Vec<String>,
}

/// A merged enum: ontology values plus curated labels and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    /// Enum identifier.
    pub id: String,
    /// Values in order.
    pub values: Vec<EnumValue>,
    /// Named groups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<EnumValueGroup>,
}

/// How a condition tests the other field's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTest {
    /// The value equals the given string.
    Equals(String),
    /// The value is one of the given strings.
    In(Vec<String>),
    /// The value is present and not false/empty.
    Truthy(bool),
}

/// A predicate over another field's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    /// The field whose value is tested.
    pub field: String,
    /// The test applied.
    #[serde(flatten)]
    pub test: ConditionTest,
}

impl Condition {
    /// `field == value`.
    #[must_use]
    pub fn equals(field: &str, value: &str) -> Self {
        Self {
            field: field.to_owned(),
            test: ConditionTest::Equals(value.to_owned()),
        }
    }

    /// `field in values`.
    #[must_use]
    pub fn in_set(field: &str, values: &[&str]) -> Self {
        Self {
            field: field.to_owned(),
            test: ConditionTest::In(values.iter().map(|v| (*v).to_owned()).collect()),
        }
    }

    /// `field` is truthy.
    #[must_use]
    pub fn truthy(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            test: ConditionTest::Truthy(true),
        }
    }

    /// Returns true if a state value satisfies the test.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match &self.test {
            ConditionTest::Equals(v) => v == value,
            ConditionTest::In(vs) => vs.iter().any(|v| v == value),
            ConditionTest::Truthy(_) => !value.is_empty(),
        }
    }

    /// Human-readable rendering used in generated messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let field = crate::mapping::humanize(&self.field).to_lowercase();
        match &self.test {
            ConditionTest::Equals(v) => format!("{field} is {}", v.replace('_', " ")),
            ConditionTest::In(vs) => {
                let list: Vec<String> = vs.iter().map(|v| v.replace('_', " ")).collect();
                format!("{field} is one of {}", list.join(", "))
            }
            ConditionTest::Truthy(_) => format!("{field} is set"),
        }
    }
}

/// A titled group of form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSection {
    /// Section id.
    pub id: String,
    /// Section title.
    pub title: String,
    /// The section can be collapsed.
    #[serde(skip_serializing_if = "is_false")]
    pub collapsible: bool,
    /// The section starts collapsed.
    #[serde(skip_serializing_if = "is_false")]
    pub collapsed: bool,
    /// Field names in order.
    pub fields: Vec<String>,
    /// Show the section only when this holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
    /// Require the section's fields only when this holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_when: Option<Condition>,
}

/// Create/edit form layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    /// Sections in order.
    pub sections: Vec<FormSection>,
}

/// What a detail section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailSectionKind {
    /// A grid of scalar fields.
    Fields,
    /// One structured field.
    Object,
    /// Records of a related entity.
    Related,
}

/// How related records are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedLayout {
    /// Tabular, for one-to-many edges.
    Table,
    /// Compact list, for everything else.
    List,
}

/// Related records shown in a detail section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedRecords {
    /// Edge name.
    pub relationship: String,
    /// Target entity id.
    pub entity: String,
    /// Edge name read from the target side.
    pub inverse: String,
    /// Layout.
    pub layout: RelatedLayout,
}

/// One section of the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection {
    /// Section id.
    pub id: String,
    /// Section title.
    pub title: String,
    /// What the section shows.
    pub kind: DetailSectionKind,
    /// Field names, for field and object sections.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Show the section only when this holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
    /// Related records, for related sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<RelatedRecords>,
}

/// Read-only record view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    /// Sections in order.
    pub sections: Vec<DetailSection>,
}

/// A list view column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListColumn {
    /// Field name.
    pub field: String,
    /// Column header.
    pub label: String,
    /// Semantic type of the field.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// The list can be sorted by this column.
    pub sortable: bool,
}

/// The input a list filter renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Pick any number of enum values.
    MultiSelect,
    /// Numeric from/to.
    Range,
    /// Search for a record of the target entity.
    EntitySearch,
    /// Date from/to.
    DateRange,
}

/// A list view filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFilter {
    /// Field name.
    pub field: String,
    /// Filter label.
    pub label: String,
    /// Input kind.
    pub kind: FilterKind,
    /// Enum identifier, for multi-select filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_ref: Option<String>,
    /// Target entity id, for entity search filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Default list ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    /// Field name.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Record list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    /// Columns in order.
    pub columns: Vec<ListColumn>,
    /// Filters in column order.
    pub filters: Vec<ListFilter>,
    /// Default ordering.
    pub default_sort: SortOrder,
}

/// Badge color class of a lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    /// Healthy / in force.
    Green,
    /// Ended badly.
    Red,
    /// Needs attention.
    Yellow,
    /// Neutral: initial or terminal.
    Gray,
    /// Everything else.
    Blue,
}

/// Status badge rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBlock {
    /// The status field.
    pub field: String,
    /// Enum identifier of the status field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_ref: Option<String>,
    /// State → color.
    pub colors: BTreeMap<String, StatusColor>,
    /// States no transition leads to.
    pub initial: Vec<String>,
    /// States with no way out.
    pub terminal: Vec<String>,
}

/// Emphasis of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionVariant {
    /// Destructive.
    Danger,
    /// The main forward path.
    Primary,
    /// Everything else.
    Secondary,
}

/// HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
}

/// A bound API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Operation name (`create`, `list`, ..., or the transition's path segment).
    pub operation: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// Target state, for transitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_state: Option<String>,
}

/// One lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionDescriptor {
    /// Source state.
    pub from: String,
    /// Target state.
    pub to: String,
    /// Button label.
    pub label: String,
    /// Button emphasis.
    pub variant: ActionVariant,
    /// Ask before performing.
    pub confirm: bool,
    /// Confirmation prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_message: Option<String>,
    /// Endpoint performing the transition.
    pub endpoint: Endpoint,
    /// Fields the request must carry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,
}

/// Lifecycle actions of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMachineBlock {
    /// The status field.
    pub field: String,
    /// All states, in lifecycle order.
    pub states: Vec<String>,
    /// Every allowed transition.
    pub transitions: Vec<TransitionDescriptor>,
}

/// Direction of a relationship relative to the document's entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Declared on this entity.
    Outgoing,
    /// Declared on the other entity.
    Incoming,
}

/// A relationship as seen from the document's entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipDescriptor {
    /// Edge name read from this entity.
    pub name: String,
    /// Other entity id.
    pub target: String,
    /// Edge name read from the other entity.
    pub inverse: String,
    /// Cardinality read from this entity.
    pub cardinality: String,
    /// Whether this entity must have the edge.
    pub required: bool,
    /// Which side declared the edge.
    pub direction: Direction,
}

/// A single-field validation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    /// A value must be supplied.
    Required {
        /// Error message.
        message: String,
    },
    /// Numeric lower limit.
    Min {
        /// Limit.
        value: f64,
        /// The limit itself is rejected.
        #[serde(skip_serializing_if = "is_false")]
        exclusive: bool,
        /// Error message.
        message: String,
    },
    /// Numeric upper limit.
    Max {
        /// Limit.
        value: f64,
        /// The limit itself is rejected.
        #[serde(skip_serializing_if = "is_false")]
        exclusive: bool,
        /// Error message.
        message: String,
    },
    /// Regular expression match.
    Pattern {
        /// Expression.
        pattern: String,
        /// Error message.
        message: String,
    },
    /// Minimum list length.
    MinItems {
        /// Minimum count.
        value: u64,
        /// Error message.
        message: String,
    },
}

/// Rules for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidation {
    /// Field name.
    pub field: String,
    /// Rules in evaluation order.
    pub rules: Vec<FieldRule>,
}

/// A rule linking two fields: when `when` holds, `require` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossFieldRule {
    /// Triggering condition.
    pub when: Condition,
    /// Field that becomes required.
    pub require: String,
    /// Error message.
    pub message: String,
}

/// All validation rules of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    /// Single-field rules, in field order.
    pub fields: Vec<FieldValidation>,
    /// Cross-field rules.
    pub cross_field: Vec<CrossFieldRule>,
}

/// Generated API surface of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiBindings {
    /// Resource base path.
    pub base_path: String,
    /// Endpoints: CRUD first, then transitions.
    pub endpoints: Vec<Endpoint>,
}

/// Display metadata of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMeta {
    /// Singular name.
    pub name: String,
    /// Plural name.
    pub plural: String,
    /// Template rendering a record's title.
    pub primary_display: String,
}

/// The complete schema description of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    /// Entity id (snake_case).
    pub entity: String,
    /// Entity name as declared.
    pub name: String,
    /// Display metadata.
    pub display: DisplayMeta,
    /// Field descriptors in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Enums used by this entity's fields.
    pub enums: BTreeMap<String, EnumDefinition>,
    /// Form layout.
    pub form: Form,
    /// Detail layout.
    pub detail: Detail,
    /// List layout.
    pub list: ListView,
    /// Status badge rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusBlock>,
    /// Lifecycle actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_machine: Option<StateMachineBlock>,
    /// Relationships touching this entity.
    pub relationships: Vec<RelationshipDescriptor>,
    /// Validation rules.
    pub validation: Validation,
    /// API bindings.
    pub api: ApiBindings,
}

impl SchemaDocument {
    /// Looks up a field descriptor by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The shared catalog of every enum across all entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumCatalog {
    /// Ontology version the catalog was built from.
    pub version: String,
    /// Enum identifier → merged definition.
    pub enums: BTreeMap<String, EnumDefinition>,
}
