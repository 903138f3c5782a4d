//! Value introspection primitives.
//!
//! Every function here is pure and total: on input that does not match the
//! question being asked it returns `false`, `None`, or an empty result, never
//! an error.

use crate::value::{Bounds, Expression, Kind, Literal, ValueTree, TEMPORAL_REFERENCE};

/// What [`find_reference`] reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// The recognized temporal type.
    Temporal,
    /// A named definition, by symbolic path.
    Named(&'a str),
}

/// Follows one named-definition link, if the loader recorded one.
#[must_use]
pub fn dereference(v: &ValueTree) -> &ValueTree {
    v.definition.as_deref().unwrap_or(v)
}

/// Returns true if the value is a timestamp.
#[must_use]
pub fn is_time(v: &ValueTree) -> bool {
    v.kind == Kind::Time || matches!(find_reference(v), Some(Reference::Temporal))
}

/// Returns true if the value is list-shaped, either directly or through a
/// list constraint buried in a conjunction.
#[must_use]
pub fn is_list(v: &ValueTree) -> bool {
    if v.kind == Kind::List {
        return true;
    }
    match &v.expression {
        Expression::Conjunction(args) => args.iter().any(is_list),
        _ => v.definition.as_deref().is_some_and(is_list),
    }
}

/// Locates the disjunction that makes a value an enum: the value itself after
/// one dereference, or a disjunction one conjunction layer down.
fn enum_arms(v: &ValueTree) -> Option<&[ValueTree]> {
    let v = dereference(v);
    match &v.expression {
        Expression::Conjunction(args) => args.iter().map(dereference).find_map(disjunction),
        _ => disjunction(v),
    }
}

fn disjunction(v: &ValueTree) -> Option<&[ValueTree]> {
    match &v.expression {
        Expression::Disjunction(arms) => Some(arms.as_slice()),
        _ => None,
    }
}

fn string_arm(arm: &ValueTree) -> Option<&str> {
    if arm.kind != Kind::String {
        return None;
    }
    arm.value
        .as_ref()
        .or(arm.default.as_ref())
        .and_then(Literal::as_str)
}

/// Returns true if the value is a disjunction of at least two string literal
/// (or string-defaulted) arms.
#[must_use]
pub fn is_enum(v: &ValueTree) -> bool {
    let Some(arms) = enum_arms(v) else {
        return false;
    };
    arms.len() >= 2 && arms.iter().all(|a| string_arm(a).is_some())
}

/// Returns the enum's values in declaration order, without duplicates.
/// Empty when the value is not an enum.
#[must_use]
pub fn enum_values(v: &ValueTree) -> Vec<String> {
    if !is_enum(v) {
        return Vec::new();
    }
    let mut values: Vec<String> = Vec::new();
    for arm in enum_arms(v).unwrap_or_default() {
        if let Some(s) = string_arm(arm) {
            if !values.iter().any(|existing| existing == s) {
                values.push(s.to_owned());
            }
        }
    }
    values
}

/// Folds every comparison constraint on the value and its conjunction into a
/// single range.
#[must_use]
pub fn numeric_bounds(v: &ValueTree) -> Bounds {
    let mut bounds = v.bounds.unwrap_or_default();
    if let Expression::Conjunction(args) = &v.expression {
        for arg in args {
            bounds = bounds.tighten(numeric_bounds(arg));
        }
    }
    if let Some(def) = v.definition.as_deref() {
        bounds = bounds.tighten(numeric_bounds(def));
    }
    bounds
}

/// Returns the first string match constraint found on the value or by
/// walking its conjunction.
#[must_use]
pub fn pattern(v: &ValueTree) -> Option<&str> {
    if let Some(p) = v.pattern.as_deref() {
        return Some(p);
    }
    if let Expression::Conjunction(args) = &v.expression {
        if let Some(p) = args.iter().find_map(pattern) {
            return Some(p);
        }
    }
    v.definition.as_deref().and_then(pattern)
}

/// Returns the nearest named-definition target, walking conjunction and
/// disjunction arguments depth-first in declaration order.
#[must_use]
pub fn find_reference(v: &ValueTree) -> Option<Reference<'_>> {
    if let Some(path) = v.reference.as_deref() {
        if path == TEMPORAL_REFERENCE {
            return Some(Reference::Temporal);
        }
        return Some(Reference::Named(path));
    }
    match &v.expression {
        Expression::Conjunction(args) | Expression::Disjunction(args) => {
            args.iter().find_map(find_reference)
        }
        Expression::Literal => None,
    }
}

/// Returns the element value of a list: direct lookup first, then element
/// constraints hidden inside the conjunction (e.g. conditional blocks).
#[must_use]
pub fn list_element(v: &ValueTree) -> Option<&ValueTree> {
    if let Some(element) = v.element.as_deref() {
        return Some(element);
    }
    if let Expression::Conjunction(args) = &v.expression {
        if let Some(element) = args.iter().find_map(list_element) {
            return Some(element);
        }
    }
    v.definition.as_deref().and_then(list_element)
}

/// Returns the value's default: its own, or the first defaulted arm.
#[must_use]
pub fn default_literal(v: &ValueTree) -> Option<&Literal> {
    if let Some(d) = v.default.as_ref() {
        return Some(d);
    }
    match &v.expression {
        Expression::Conjunction(args) | Expression::Disjunction(args) => {
            args.iter().find_map(|a| a.default.as_ref())
        }
        Expression::Literal => v.definition.as_deref().and_then(default_literal),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::value::Bound;

    #[test]
    fn list_constraint_inside_conjunction() {
        let v = ValueTree::all_of(vec![
            ValueTree::top(),
            ValueTree::list_of(ValueTree::string()),
        ]);
        assert!(is_list(&v));
        assert_eq!(list_element(&v).map(|e| e.kind), Some(Kind::String));
        assert!(!is_list(&ValueTree::string()));
    }

    #[test]
    fn enum_values_keep_declaration_order() {
        let v = ValueTree::one_of(&["monthly", "weekly", "annual", "weekly"]);
        assert!(is_enum(&v));
        assert_eq!(enum_values(&v), vec!["monthly", "weekly", "annual"]);
    }

    #[test]
    fn single_arm_is_not_an_enum() {
        let v = ValueTree::any_of(vec![ValueTree::literal("only")]);
        assert!(!is_enum(&v));
        assert!(enum_values(&v).is_empty());
    }

    #[test]
    fn enum_through_conjunction_and_dereference() {
        let mut named = ValueTree::named("#LeaseType", Kind::String);
        named.definition = Some(Box::new(ValueTree::one_of(&["fixed", "month_to_month"])));
        assert!(is_enum(&named));
        assert_eq!(enum_values(&named), vec!["fixed", "month_to_month"]);

        let wrapped = ValueTree::all_of(vec![ValueTree::string(), ValueTree::one_of(&["a", "b"])]);
        assert!(is_enum(&wrapped));
    }

    #[test]
    fn mixed_disjunction_is_not_an_enum() {
        let v = ValueTree::any_of(vec![ValueTree::literal("a"), ValueTree::int()]);
        assert!(!is_enum(&v));
    }

    #[test]
    fn bounds_fold_across_conjunction() {
        let v = ValueTree::all_of(vec![
            ValueTree::int(),
            ValueTree::int().at_least(0.0),
            ValueTree::int().at_most(12.0),
            ValueTree::int().at_least(1.0),
        ]);
        let b = numeric_bounds(&v);
        assert_eq!(b.lower, Some(Bound::inclusive(1.0)));
        assert_eq!(b.upper, Some(Bound::inclusive(12.0)));
        assert!(numeric_bounds(&ValueTree::float()).is_empty());
    }

    #[test]
    fn first_pattern_wins() {
        let v = ValueTree::all_of(vec![
            ValueTree::string(),
            ValueTree::string().matching("^[A-Z]{2}$"),
            ValueTree::string().matching("^.*$"),
        ]);
        assert_eq!(pattern(&v), Some("^[A-Z]{2}$"));
        assert_eq!(pattern(&ValueTree::string()), None);
    }

    #[test]
    fn reference_walks_disjunction() {
        let v = ValueTree::any_of(vec![
            ValueTree::of(Kind::Bottom),
            ValueTree::named("#Money", Kind::Struct),
        ]);
        assert_eq!(find_reference(&v), Some(Reference::Named("#Money")));
        let time = ValueTree::time();
        assert_eq!(find_reference(&time), Some(Reference::Temporal));
        assert!(is_time(&time));
        assert_eq!(find_reference(&ValueTree::string()), None);
    }

    #[test]
    fn default_from_arm() {
        let v = ValueTree::any_of(vec![
            ValueTree::literal("draft").with_default("draft"),
            ValueTree::literal("active"),
        ]);
        assert_eq!(default_literal(&v).and_then(Literal::as_str), Some("draft"));
    }
}
