//! Ontology → schema mapping tables.
//!
//! Deterministic mappings from ontology names to schema identifiers, labels,
//! and paths, plus the catalog of recognized value types.

use std::collections::HashMap;

use serde::Serialize;

/// Sign constraint carried by a money value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoneyVariant {
    /// Any amount, including negatives.
    Unconstrained,
    /// Zero or more.
    NonNegative,
    /// Strictly more than zero.
    Positive,
}

/// How a recognized value-type reference renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTypeClass {
    /// A member of the money family.
    Money(MoneyVariant),
    /// The contact method type (single value renders specially).
    ContactMethod,
    /// Any other catalogued structured type.
    Structured,
}

/// Returns the value-type catalog, keyed by definition local name.
pub fn value_type_mappings() -> HashMap<&'static str, ValueTypeClass> {
    let mut m = HashMap::new();
    let money = ValueTypeClass::Money;
    m.insert("Money", money(MoneyVariant::Unconstrained));
    m.insert("NonNegativeMoney", money(MoneyVariant::NonNegative));
    m.insert("PositiveMoney", money(MoneyVariant::Positive));
    m.insert("ContactMethod", ValueTypeClass::ContactMethod);
    m.insert("Address", ValueTypeClass::Structured);
    m.insert("Document", ValueTypeClass::Structured);
    m.insert("Attachment", ValueTypeClass::Structured);
    m.insert("DateRange", ValueTypeClass::Structured);
    m.insert("EmergencyContact", ValueTypeClass::Structured);
    m.insert("GeoPoint", ValueTypeClass::Structured);
    m
}

pub use ui_ontology::to_snake_case;

/// Converts a snake_case string to PascalCase (e.g., "work_order" → "WorkOrder").
pub fn snake_to_pascal(s: &str) -> String {
    s.split('_').map(capitalize).collect()
}

/// Converts a snake_case string to kebab-case.
pub fn to_kebab_case(s: &str) -> String {
    s.replace('_', "-")
}

/// Capitalizes the first character of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let mut result = c.to_uppercase().to_string();
            result.push_str(chars.as_str());
            result
        }
    }
}

/// Turns an identifier into a display label ("pending_approval" →
/// "Pending Approval", "WorkOrder" → "Work Order").
pub fn humanize(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| match w {
            "id" => "ID".to_owned(),
            "ids" => "IDs".to_owned(),
            _ => capitalize(w),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Naive English plural of a display name.
pub fn pluralize(s: &str) -> String {
    let lower = s.to_lowercase();
    if lower.ends_with('y')
        && !["ay", "ey", "iy", "oy", "uy"].iter().any(|v| lower.ends_with(v))
    {
        format!("{}ies", &s[..s.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|e| lower.ends_with(e)) {
        format!("{s}es")
    } else {
        format!("{s}s")
    }
}

/// Extracts the local name of a definition path: the part after the last `.`
/// or `/`, with a leading `#` removed (`"common.#Money"` → `"Money"`).
pub fn local_name(path: &str) -> &str {
    let after_slash = path.rsplit('/').next().unwrap_or(path);
    let after_dot = after_slash.rsplit('.').next().unwrap_or(after_slash);
    after_dot.trim_start_matches('#')
}

/// Returns the stripped prefix and list-ness of an `_id` / `_ids` field name.
pub fn reference_prefix(field: &str) -> Option<(&str, bool)> {
    if let Some(prefix) = field.strip_suffix("_ids") {
        return (!prefix.is_empty()).then_some((prefix, true));
    }
    if let Some(prefix) = field.strip_suffix("_id") {
        return (!prefix.is_empty()).then_some((prefix, false));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("WorkOrder"), "work_order");
        assert_eq!(to_snake_case("Lease"), "lease");
        assert_eq!(to_snake_case("HVACUnit"), "hvac_unit");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn label_generation() {
        assert_eq!(humanize("pending_approval"), "Pending Approval");
        assert_eq!(humanize("WorkOrder"), "Work Order");
        assert_eq!(humanize("unit_id"), "Unit ID");
        assert_eq!(snake_to_pascal("payment_frequency"), "PaymentFrequency");
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("Lease"), "Leases");
        assert_eq!(pluralize("Property"), "Properties");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Day"), "Days");
    }

    #[test]
    fn local_name_extraction() {
        assert_eq!(local_name("#Money"), "Money");
        assert_eq!(local_name("common.#PositiveMoney"), "PositiveMoney");
        let qualified = "github.com/acme/schema/common.#Address";
        assert_eq!(local_name(qualified), "Address");
    }

    #[test]
    fn reference_suffixes() {
        assert_eq!(reference_prefix("owner_id"), Some(("owner", false)));
        assert_eq!(reference_prefix("tenant_ids"), Some(("tenant", true)));
        assert_eq!(reference_prefix("_id"), None);
        assert_eq!(reference_prefix("identity"), None);
    }
}
