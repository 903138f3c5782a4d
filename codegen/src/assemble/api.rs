//! API bindings.

use ui_ontology::{Operation, OperationKind};

use crate::document::{ApiBindings, Endpoint, HttpMethod};
use crate::mapping::{pluralize, to_kebab_case};

/// Conventional base path for an entity missing from the operation catalog.
#[must_use]
pub fn conventional_base_path(api_prefix: &str, entity_id: &str) -> String {
    format!("{api_prefix}/{}", to_kebab_case(&pluralize(entity_id)))
}

/// Resource base path: the first catalogued one, else the convention.
#[must_use]
pub fn base_path(operations: &[&Operation], api_prefix: &str, entity_id: &str) -> String {
    operations
        .first()
        .map(|op| op.base_path.clone())
        .unwrap_or_else(|| conventional_base_path(api_prefix, entity_id))
}

fn endpoint(op: &Operation) -> Endpoint {
    let base = &op.base_path;
    let (method, path) = match op.kind {
        OperationKind::Create => (HttpMethod::Post, base.clone()),
        OperationKind::Get => (HttpMethod::Get, format!("{base}/{{id}}")),
        OperationKind::List => (HttpMethod::Get, base.clone()),
        OperationKind::Update => (HttpMethod::Patch, format!("{base}/{{id}}")),
        OperationKind::Delete => (HttpMethod::Delete, format!("{base}/{{id}}")),
        OperationKind::Transition => {
            let segment = op
                .path
                .clone()
                .or_else(|| op.target_state.as_deref().map(to_kebab_case))
                .unwrap_or_default();
            return Endpoint {
                path: format!("{base}/{{id}}/{segment}"),
                operation: segment,
                method: HttpMethod::Post,
                target_state: op.target_state.clone(),
            };
        }
    };
    Endpoint {
        operation: op.kind.as_str().to_owned(),
        method,
        path,
        target_state: None,
    }
}

/// Builds the API bindings: non-custom CRUD endpoints first, then non-custom
/// transitions, each in catalog order.
#[must_use]
pub fn build_api(operations: &[&Operation], api_prefix: &str, entity_id: &str) -> ApiBindings {
    let generated = || operations.iter().copied().filter(|op| !op.custom);
    let crud = generated().filter(|op| op.kind != OperationKind::Transition);
    let transitions = generated().filter(|op| op.kind == OperationKind::Transition);
    ApiBindings {
        base_path: base_path(operations, api_prefix, entity_id),
        endpoints: crud.chain(transitions).map(endpoint).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui_ontology::sample::common::{crud, transition};

    #[test]
    fn custom_operations_are_excluded() {
        let mut ops = crud("leasing", "Lease", "/api/leases");
        let approve = transition("leasing", "Lease", "/api/leases", "approve", "active", &[]);
        ops.insert(0, approve);
        let mut renew = transition("leasing", "Lease", "/api/leases", "renew", "active", &[]);
        renew.custom = true;
        ops.push(renew);
        let refs: Vec<&Operation> = ops.iter().collect();

        let api = build_api(&refs, "/api", "lease");
        assert_eq!(api.base_path, "/api/leases");
        assert_eq!(api.endpoints.len(), 6);
        assert_eq!(api.endpoints[0].operation, "create");
        assert_eq!(api.endpoints[3].method, HttpMethod::Patch);
        assert_eq!(api.endpoints[5].path, "/api/leases/{id}/approve");
        assert!(api.endpoints.iter().all(|e| e.operation != "renew"));
    }

    #[test]
    fn uncatalogued_entities_get_convention() {
        let api = build_api(&[], "/api", "work_order");
        assert_eq!(api.base_path, "/api/work-orders");
        assert!(api.endpoints.is_empty());
    }
}
