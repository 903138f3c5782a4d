//! Status coloring and state-machine actions.

use std::collections::BTreeMap;

use ui_ontology::{Operation, OperationKind};

use crate::document::{
    ActionVariant, Endpoint, FieldDescriptor, HttpMethod, StateMachineBlock, StatusBlock,
    StatusColor, TransitionDescriptor,
};
use crate::loader::StateGraph;
use crate::mapping::{humanize, to_kebab_case};
use crate::tables;

const STATUS_FIELD: &str = "status";

/// States in lifecycle order: the status enum's declaration order first,
/// then any remaining graph states sorted.
fn ordered_states(graph: &StateGraph, status: Option<&FieldDescriptor>) -> Vec<String> {
    let declared = status.map_or(&[][..], |f| f.enum_values.as_slice());
    let mut states: Vec<String> = Vec::new();
    for state in declared.iter().map(String::as_str).chain(graph.states()) {
        if graph.contains(state) && !states.iter().any(|s| s == state) {
            states.push(state.to_owned());
        }
    }
    states
}

fn color(graph: &StateGraph, state: &str) -> StatusColor {
    if let Some(c) = tables::curated_color(state) {
        return c;
    }
    if graph.is_terminal(state) || graph.is_initial(state) {
        StatusColor::Gray
    } else {
        StatusColor::Blue
    }
}

/// Builds the status badge block.
#[must_use]
pub fn build_status(graph: &StateGraph, status: Option<&FieldDescriptor>) -> StatusBlock {
    let states = ordered_states(graph, status);
    let colors: BTreeMap<String, StatusColor> = states
        .iter()
        .map(|s| (s.clone(), color(graph, s)))
        .collect();
    StatusBlock {
        field: STATUS_FIELD.to_owned(),
        enum_ref: status.and_then(|f| f.enum_ref.clone()),
        colors,
        initial: states
            .iter()
            .filter(|s| graph.is_initial(s))
            .cloned()
            .collect(),
        terminal: states
            .iter()
            .filter(|s| graph.is_terminal(s))
            .cloned()
            .collect(),
    }
}

/// What transitions need to know about their entity.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// Entity name.
    pub entity: &'a str,
    /// Singular display name.
    pub display_name: &'a str,
    /// Resource base path.
    pub base_path: &'a str,
    /// The entity's catalogued operations.
    pub operations: &'a [&'a Operation],
}

impl TransitionContext<'_> {
    /// The catalogued transition into `target`: non-custom entries first.
    fn operation_for(&self, target: &str) -> Option<&Operation> {
        let matching = || {
            self.operations
                .iter()
                .copied()
                .filter(move |op| enters(op, target))
        };
        matching()
            .find(|op| !op.custom)
            .or_else(|| matching().next())
    }
}

fn enters(op: &Operation, target: &str) -> bool {
    op.kind == OperationKind::Transition && op.target_state.as_deref() == Some(target)
}

fn endpoint(ctx: &TransitionContext<'_>, target: &str, op: Option<&Operation>) -> Endpoint {
    let (base, segment) = match op {
        Some(op) => (
            op.base_path.clone(),
            op.path.clone().unwrap_or_else(|| to_kebab_case(target)),
        ),
        None => (ctx.base_path.to_owned(), to_kebab_case(target)),
    };
    Endpoint {
        path: format!("{base}/{{id}}/{segment}"),
        operation: segment,
        method: HttpMethod::Post,
        target_state: Some(target.to_owned()),
    }
}

fn confirm_message(ctx: &TransitionContext<'_>, label: &str, to: &str, terminal: bool) -> String {
    let mut message = format!(
        "{label} this {}? It will move to {}.",
        ctx.display_name.to_lowercase(),
        humanize(to)
    );
    if terminal {
        message.push_str(" This cannot be undone.");
    }
    message
}

fn transition(
    ctx: &TransitionContext<'_>,
    graph: &StateGraph,
    from: &str,
    to: &str,
) -> TransitionDescriptor {
    let label = tables::transition_label(from, to);
    let variant = tables::transition_variant(to);
    let confirm = variant == ActionVariant::Danger;
    let op = ctx.operation_for(to);

    let mut required_fields: Vec<String> = Vec::new();
    let from_op = op.map(|op| op.required_fields.as_slice()).unwrap_or_default();
    let from_table = tables::required_on_entering(ctx.entity, to);
    for field in from_op.iter().map(String::as_str).chain(from_table) {
        if !required_fields.iter().any(|f| f == field) {
            required_fields.push(field.to_owned());
        }
    }

    TransitionDescriptor {
        from: from.to_owned(),
        to: to.to_owned(),
        confirm_message: confirm.then(|| confirm_message(ctx, &label, to, graph.is_terminal(to))),
        label,
        variant,
        confirm,
        endpoint: endpoint(ctx, to, op),
        required_fields,
    }
}

/// Builds the state-machine block: every allowed transition, in lifecycle
/// order of source then target.
#[must_use]
pub fn build_state_machine(
    ctx: &TransitionContext<'_>,
    graph: &StateGraph,
    status: Option<&FieldDescriptor>,
) -> StateMachineBlock {
    let states = ordered_states(graph, status);
    let mut transitions = Vec::new();
    for from in &states {
        for to in &states {
            if graph.targets(from).any(|t| t == to.as_str()) {
                transitions.push(transition(ctx, graph, from, to));
            }
        }
    }
    StateMachineBlock {
        field: STATUS_FIELD.to_owned(),
        states,
        transitions,
    }
}
