//! Read-only queries over a graph state.
//!
//! Nothing here allocates more than the result it returns, and nothing here
//! mutates. Prerequisite checks look at direct predecessors only: in a chain
//! `A → B → C`, unlocking `C` needs `B` unlocked but not `A`.

use crate::types::{EdgeId, GraphState, NodeId, SkillEdge, SkillNode};

/// Find a node by id.
pub fn find_node<'a>(state: &'a GraphState, id: &NodeId) -> Option<&'a SkillNode> {
    state.nodes.iter().find(|n| &n.id == id)
}

/// Find an edge by id.
pub fn find_edge<'a>(state: &'a GraphState, id: &EdgeId) -> Option<&'a SkillEdge> {
    state.edges.iter().find(|e| &e.id == id)
}

/// Find a node by label, ignoring case and surrounding whitespace.
pub fn find_node_by_label<'a>(state: &'a GraphState, label: &str) -> Option<&'a SkillNode> {
    state.nodes.iter().find(|n| n.label_matches(label))
}

/// The currently selected node, if the selection points at one.
pub fn selected_node(state: &GraphState) -> Option<&SkillNode> {
    state.selected_id.as_ref().and_then(|id| find_node(state, id))
}

/// Sources of every edge pointing at `id`, in edge order.
pub fn incoming_of(state: &GraphState, id: &NodeId) -> Vec<NodeId> {
    state
        .edges
        .iter()
        .filter(|e| &e.target == id)
        .map(|e| e.source.clone())
        .collect()
}

/// Targets of every edge leaving `id`, in edge order.
pub fn outgoing_of(state: &GraphState, id: &NodeId) -> Vec<NodeId> {
    state
        .edges
        .iter()
        .filter(|e| &e.source == id)
        .map(|e| e.target.clone())
        .collect()
}

/// Direct predecessors of `id` that are missing or still locked.
pub fn blocking_prereqs(state: &GraphState, id: &NodeId) -> Vec<NodeId> {
    incoming_of(state, id)
        .into_iter()
        .filter(|pid| !find_node(state, pid).is_some_and(|n| n.unlocked))
        .collect()
}

/// Whether every direct predecessor of `id` exists and is unlocked.
///
/// Vacuously true for nodes without incoming edges.
pub fn prereqs_met(state: &GraphState, id: &NodeId) -> bool {
    state
        .edges
        .iter()
        .filter(|e| &e.target == id)
        .all(|e| find_node(state, &e.source).is_some_and(|n| n.unlocked))
}
