//! Validation rules.

use crate::document::{CrossFieldRule, FieldDescriptor, FieldRule, FieldValidation, Validation};
use crate::mapping::MoneyVariant;
use crate::tables;

use super::is_ui_eligible;

fn format_limit(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn rules_for(f: &FieldDescriptor) -> Vec<FieldRule> {
    let label = &f.label;
    let mut rules = Vec::new();
    if f.required {
        rules.push(FieldRule::Required {
            message: format!("{label} is required"),
        });
    }

    let money_min = match f.money_variant {
        Some(MoneyVariant::Positive) => Some(1.0),
        Some(MoneyVariant::NonNegative) => Some(0.0),
        Some(MoneyVariant::Unconstrained) | None => None,
    };
    if let Some(value) = money_min {
        rules.push(FieldRule::Min {
            value,
            exclusive: false,
            message: format!("{label} must be at least {}", format_limit(value)),
        });
    } else if let Some(value) = f.min {
        let message = if f.exclusive_min {
            format!("{label} must be greater than {}", format_limit(value))
        } else {
            format!("{label} must be at least {}", format_limit(value))
        };
        rules.push(FieldRule::Min {
            value,
            exclusive: f.exclusive_min,
            message,
        });
    }
    if let Some(value) = f.max {
        let message = if f.exclusive_max {
            format!("{label} must be less than {}", format_limit(value))
        } else {
            format!("{label} must be at most {}", format_limit(value))
        };
        rules.push(FieldRule::Max {
            value,
            exclusive: f.exclusive_max,
            message,
        });
    }
    if let Some(pattern) = &f.pattern {
        rules.push(FieldRule::Pattern {
            pattern: pattern.clone(),
            message: format!("{label} has an invalid format"),
        });
    }
    if let Some(value) = f.min_items {
        let noun = if value == 1 { "item" } else { "items" };
        rules.push(FieldRule::MinItems {
            value,
            message: format!("{label} needs at least {value} {noun}"),
        });
    }
    rules
}

/// Builds field rules for every UI-eligible field and cross-field rules from
/// the conditional-constraint table.
#[must_use]
pub fn build_validation(entity: &str, fields: &[FieldDescriptor]) -> Validation {
    let field_rules = fields
        .iter()
        .filter(|f| is_ui_eligible(f))
        .filter_map(|f| {
            let rules = rules_for(f);
            (!rules.is_empty()).then(|| FieldValidation {
                field: f.name.clone(),
                rules,
            })
        })
        .collect();

    let mut cross_field = Vec::new();
    for constraint in tables::conditional_constraints(entity) {
        let when = constraint.condition();
        for required in constraint.require {
            let Some(target) = fields.iter().find(|f| f.name == *required) else {
                continue;
            };
            cross_field.push(CrossFieldRule {
                message: format!("{} is required when {}", target.label, when.describe()),
                when: when.clone(),
                require: target.name.clone(),
            });
        }
    }

    Validation {
        fields: field_rules,
        cross_field,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::FieldType;

    fn money(name: &str, variant: MoneyVariant) -> FieldDescriptor {
        let mut f = FieldDescriptor::new(name, name.to_owned(), FieldType::Money, false);
        f.money_variant = Some(variant);
        f
    }

    fn min_of(v: &Validation, field: &str) -> Option<f64> {
        v.fields
            .iter()
            .find(|fv| fv.field == field)?
            .rules
            .iter()
            .find_map(|r| match r {
                FieldRule::Min { value, .. } => Some(*value),
                _ => None,
            })
    }

    #[test]
    fn money_sign_rules() {
        let fields = vec![
            money("rent_amount", MoneyVariant::Positive),
            money("security_deposit", MoneyVariant::NonNegative),
            money("adjustment", MoneyVariant::Unconstrained),
        ];
        let v = build_validation("Lease", &fields);
        assert_eq!(min_of(&v, "rent_amount"), Some(1.0));
        assert_eq!(min_of(&v, "security_deposit"), Some(0.0));
        assert_eq!(min_of(&v, "adjustment"), None);
    }

    #[test]
    fn cross_field_rules_from_constraint_table() {
        let fields = vec![
            FieldDescriptor::new("status", "Status".to_owned(), FieldType::Enum, true),
            FieldDescriptor::new(
                "termination_reason",
                "Termination Reason".to_owned(),
                FieldType::Text,
                false,
            ),
        ];
        let v = build_validation("Lease", &fields);
        assert_eq!(v.cross_field.len(), 1);
        let rule = &v.cross_field[0];
        assert_eq!(rule.require, "termination_reason");
        let expected = "Termination Reason is required when status is terminated";
        assert_eq!(rule.message, expected);
    }

    #[test]
    fn bounds_and_lists() {
        let mut months = FieldDescriptor::new(
            "renewal_term_months",
            "Renewal Term Months".to_owned(),
            FieldType::Integer,
            false,
        );
        months.min = Some(1.0);
        months.max = Some(60.0);
        let tenants_label = "Tenants".to_owned();
        let mut tenants =
            FieldDescriptor::new("tenant_ids", tenants_label, FieldType::EntityRefList, true);
        tenants.min_items = Some(1);
        let v = build_validation("Lease", &[months, tenants]);
        assert_eq!(v.fields.len(), 2);
        assert_eq!(v.fields[0].rules.len(), 2);
        assert!(matches!(
            &v.fields[1].rules[1],
            FieldRule::MinItems { value: 1, message } if message == "Tenants needs at least 1 item"
        ));
    }
}
