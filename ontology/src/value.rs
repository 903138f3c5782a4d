//! The Value Tree: per-field type-and-constraint representation.
//!
//! A [`ValueTree`] is the atomic unit of type information in the ontology.
//! Every field carries one. Trees are built by the bundle loader (or by the
//! constructors below), linked to their named definitions once, and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

/// The reference path of the recognized temporal type.
pub const TEMPORAL_REFERENCE: &str = "time.Time";

/// The evaluated kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A string value.
    String,
    /// An integer value.
    Int,
    /// A floating point value.
    Float,
    /// A boolean value.
    Bool,
    /// A timestamp.
    Time,
    /// A structured value with named members.
    Struct,
    /// An ordered list.
    List,
    /// Any value at all (mixed / untyped).
    Top,
    /// No value: the tree failed to resolve.
    Bottom,
}

/// The shape of a value's defining expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "lowercase")]
pub enum Expression {
    /// A leaf: a concrete value, a kind, or a single constraint.
    #[default]
    Literal,
    /// Intersection of constraints (`a & b`).
    Conjunction(Vec<ValueTree>),
    /// Union of alternatives (`a | b`).
    Disjunction(Vec<ValueTree>),
}

/// A concrete scalar literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// `true` / `false`.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A floating point literal.
    Float(f64),
    /// A string literal.
    String(String),
}

impl Literal {
    /// Returns the string payload, if this is a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_owned())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

/// One side of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// The limit value.
    pub value: f64,
    /// Whether the limit itself is allowed (`>=` rather than `>`).
    #[serde(default = "inclusive_default")]
    pub inclusive: bool,
}

impl Bound {
    /// A limit that admits its own value.
    #[must_use]
    pub const fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    /// A limit that excludes its own value.
    #[must_use]
    pub const fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

fn inclusive_default() -> bool {
    true
}

/// A numeric range. On a list-kind node, `lower` is the minimum item count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower limit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Bound>,
    /// Upper limit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Bound>,
}

impl Bounds {
    /// Returns true if neither side is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Intersects two ranges: the tighter limit wins on each side, and on a
    /// tie the exclusive limit wins.
    #[must_use]
    pub fn tighten(self, other: Bounds) -> Bounds {
        Bounds {
            lower: pick(self.lower, other.lower, |a, b| a > b),
            upper: pick(self.upper, other.upper, |a, b| a < b),
        }
    }
}

fn pick(a: Option<Bound>, b: Option<Bound>, tighter: fn(f64, f64) -> bool) -> Option<Bound> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => {
            if tighter(a.value, b.value) {
                Some(a)
            } else if tighter(b.value, a.value) {
                Some(b)
            } else {
                Some(Bound {
                    value: a.value,
                    inclusive: a.inclusive && b.inclusive,
                })
            }
        }
    }
}

/// Deprecation notice attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    /// Why the field is deprecated.
    #[serde(default)]
    pub reason: String,
    /// Version or date since which the field is deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

/// Named flags and parameters attached to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    /// The field is the entity's primary display field.
    #[serde(skip_serializing_if = "is_false")]
    pub display: bool,
    /// The string is long-form text.
    #[serde(skip_serializing_if = "is_false")]
    pub text: bool,
    /// The field cannot change after creation.
    #[serde(skip_serializing_if = "is_false")]
    pub immutable: bool,
    /// The field is derived by the system, never entered.
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    /// The value must be masked when shown.
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    /// The value is personally identifying.
    #[serde(skip_serializing_if = "is_false")]
    pub pii: bool,
    /// Deprecation notice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A structurally typed value: kind, expression shape, and constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTree {
    /// Evaluated kind.
    pub kind: Kind,
    /// Defining expression.
    #[serde(default)]
    pub expression: Expression,
    /// The concrete literal carried by a literal node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
    /// Symbolic path of the named definition this value refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    /// Numeric range constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// String match constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Element type of a list value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<ValueTree>>,
    /// Attached annotations.
    #[serde(default)]
    pub annotations: Annotations,
    /// The named definition `reference` points at, linked by the loader.
    #[serde(skip)]
    pub definition: Option<Box<ValueTree>>,
}

impl ValueTree {
    /// A bare value of the given kind.
    #[must_use]
    pub fn of(kind: Kind) -> Self {
        Self {
            kind,
            expression: Expression::Literal,
            value: None,
            reference: None,
            default: None,
            bounds: None,
            pattern: None,
            element: None,
            annotations: Annotations::default(),
            definition: None,
        }
    }

    /// `string`.
    #[must_use]
    pub fn string() -> Self {
        Self::of(Kind::String)
    }

    /// `int`.
    #[must_use]
    pub fn int() -> Self {
        Self::of(Kind::Int)
    }

    /// `float`.
    #[must_use]
    pub fn float() -> Self {
        Self::of(Kind::Float)
    }

    /// `bool`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(Kind::Bool)
    }

    /// `time.Time`.
    #[must_use]
    pub fn time() -> Self {
        Self::of(Kind::Time).referring_to(TEMPORAL_REFERENCE)
    }

    /// `_` (any value).
    #[must_use]
    pub fn top() -> Self {
        Self::of(Kind::Top)
    }

    /// `_|_` (unresolved).
    #[must_use]
    pub fn bottom() -> Self {
        Self::of(Kind::Bottom)
    }

    /// A reference to a named definition of the given kind.
    #[must_use]
    pub fn named(path: &str, kind: Kind) -> Self {
        Self::of(kind).referring_to(path)
    }

    /// A single string literal.
    #[must_use]
    pub fn literal(s: &str) -> Self {
        let mut v = Self::string();
        v.value = Some(Literal::from(s));
        v
    }

    /// A disjunction of string literals in the given order.
    #[must_use]
    pub fn one_of(values: &[&str]) -> Self {
        Self::any_of(values.iter().map(|s| Self::literal(s)).collect())
    }

    /// A disjunction of arbitrary arms. The kind is the arms' common kind,
    /// or `top` when they disagree.
    #[must_use]
    pub fn any_of(arms: Vec<ValueTree>) -> Self {
        let kind = common_kind(&arms);
        let mut v = Self::of(kind);
        v.expression = Expression::Disjunction(arms);
        v
    }

    /// A conjunction of constraints. The kind is that of the first arm that
    /// is not `top`.
    #[must_use]
    pub fn all_of(arms: Vec<ValueTree>) -> Self {
        let kind = arms
            .iter()
            .map(|a| a.kind)
            .find(|k| *k != Kind::Top)
            .unwrap_or(Kind::Top);
        let mut v = Self::of(kind);
        v.expression = Expression::Conjunction(arms);
        v
    }

    /// `[...element]`.
    #[must_use]
    pub fn list_of(element: ValueTree) -> Self {
        let mut v = Self::of(Kind::List);
        v.element = Some(Box::new(element));
        v
    }

    /// A lone comparison constraint (`>=n`, `<n`, ...) of the given kind.
    #[must_use]
    pub fn constraint(kind: Kind, bounds: Bounds) -> Self {
        let mut v = Self::of(kind);
        v.bounds = Some(bounds);
        v
    }

    /// Sets the reference path.
    #[must_use]
    pub fn referring_to(mut self, path: &str) -> Self {
        self.reference = Some(path.to_owned());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Literal>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Adds an inclusive lower bound (`>=n`). On lists: minimum item count.
    #[must_use]
    pub fn at_least(self, n: f64) -> Self {
        self.bounded(Bounds {
            lower: Some(Bound::inclusive(n)),
            upper: None,
        })
    }

    /// Adds an exclusive lower bound (`>n`).
    #[must_use]
    pub fn greater_than(self, n: f64) -> Self {
        self.bounded(Bounds {
            lower: Some(Bound::exclusive(n)),
            upper: None,
        })
    }

    /// Adds an inclusive upper bound (`<=n`).
    #[must_use]
    pub fn at_most(self, n: f64) -> Self {
        self.bounded(Bounds {
            lower: None,
            upper: Some(Bound::inclusive(n)),
        })
    }

    fn bounded(mut self, extra: Bounds) -> Self {
        self.bounds = Some(self.bounds.unwrap_or_default().tighten(extra));
        self
    }

    /// Adds a string match constraint (`=~pattern`).
    #[must_use]
    pub fn matching(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_owned());
        self
    }

    /// Replaces the annotations.
    #[must_use]
    pub fn annotated(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Marks the value as the entity's display field.
    #[must_use]
    pub fn display(mut self) -> Self {
        self.annotations.display = true;
        self
    }

    /// Marks the value as long-form text.
    #[must_use]
    pub fn text(mut self) -> Self {
        self.annotations.text = true;
        self
    }

    /// Marks the value as system-computed.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.annotations.computed = true;
        self
    }

    /// Marks the value as immutable after creation.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.annotations.immutable = true;
        self
    }

    /// Marks the value as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.annotations.sensitive = true;
        self
    }

    /// Marks the value as personally identifying.
    #[must_use]
    pub fn pii(mut self) -> Self {
        self.annotations.pii = true;
        self
    }

    /// Marks the value as deprecated.
    #[must_use]
    pub fn deprecated(mut self, reason: &str, since: Option<&str>) -> Self {
        self.annotations.deprecated = Some(Deprecation {
            reason: reason.to_owned(),
            since: since.map(str::to_owned),
        });
        self
    }
}

fn common_kind(arms: &[ValueTree]) -> Kind {
    let mut kinds = arms.iter().map(|a| a.kind);
    match kinds.next() {
        None => Kind::Bottom,
        Some(first) => {
            if kinds.all(|k| k == first) {
                first
            } else {
                Kind::Top
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn tighten_keeps_the_narrower_range() {
        let a = ValueTree::int().at_least(0.0).at_most(100.0);
        let b = a.greater_than(0.0);
        let bounds = b.bounds.unwrap();
        assert_eq!(bounds.lower, Some(Bound::exclusive(0.0)));
        assert_eq!(bounds.upper, Some(Bound::inclusive(100.0)));
    }

    #[test]
    fn mixed_disjunction_is_top() {
        let v = ValueTree::any_of(vec![ValueTree::string(), ValueTree::int()]);
        assert_eq!(v.kind, Kind::Top);
        let v = ValueTree::one_of(&["a", "b"]);
        assert_eq!(v.kind, Kind::String);
    }

    #[test]
    fn bundle_json_shape() {
        let json = r#"{
            "kind": "string",
            "expression": {"op": "disjunction", "args": [
                {"kind": "string", "value": "monthly"},
                {"kind": "string", "value": "weekly"}
            ]},
            "default": "monthly",
            "annotations": {"immutable": true}
        }"#;
        let v: ValueTree = serde_json::from_str(json).unwrap();
        assert_eq!(v.kind, Kind::String);
        assert_eq!(v.default, Some(Literal::from("monthly")));
        assert!(v.annotations.immutable);
        match v.expression {
            Expression::Disjunction(arms) => assert_eq!(arms.len(), 2),
            other => panic!("expected disjunction, got {other:?}"),
        }
    }
}
