//! Structural validators for proposed edges.
//!
//! Two checks run in order when an edge is proposed:
//!
//! 1. [`check_edge_shape`]: self-loop, unknown endpoint, duplicate pair.
//! 2. [`would_create_cycle`]: reachability from target back to source.
//!
//! `would_create_cycle` makes no promise about self-loops; the shape check
//! has already rejected them by the time it runs.

use std::collections::{HashMap, HashSet};

use crate::selectors::find_node;
use crate::types::{GraphState, NodeId, RejectReason, SkillEdge};

/// Check the shape of a proposed edge against the current state.
///
/// Cycle detection is not part of this check.
pub fn check_edge_shape(
    state: &GraphState,
    source: &NodeId,
    target: &NodeId,
) -> Result<(), RejectReason> {
    if source == target {
        return Err(RejectReason::SelfLoop(source.clone()));
    }
    for endpoint in [source, target] {
        if find_node(state, endpoint).is_none() {
            return Err(RejectReason::UnknownEndpoint(endpoint.clone()));
        }
    }
    if state.edges.iter().any(|e| e.connects(source, target)) {
        return Err(RejectReason::DuplicateEdge {
            prerequisite: source.clone(),
            dependent: target.clone(),
        });
    }
    Ok(())
}

/// Whether adding `source → target` to `edges` would close a directed cycle.
///
/// Builds adjacency from the existing edges plus the proposed one, then runs
/// an iterative DFS from `target` looking for `source`. O(V+E).
pub fn would_create_cycle(edges: &[SkillEdge], source: &NodeId, target: &NodeId) -> bool {
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for edge in edges {
        adjacency.entry(&edge.source).or_default().push(&edge.target);
    }
    adjacency.entry(source).or_default().push(target);

    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut stack: Vec<&NodeId> = vec![target];

    while let Some(node) = stack.pop() {
        if node == source {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        if let Some(next) = adjacency.get(node) {
            stack.extend(next.iter().copied().filter(|n| !visited.contains(*n)));
        }
    }

    false
}

/// Whether the edge relation already contains a directed cycle.
///
/// Kahn's algorithm: if a topological drain cannot consume every node that
/// appears on an edge, whatever remains sits on a cycle.
pub fn has_cycle(edges: &[SkillEdge]) -> bool {
    let mut in_degree: HashMap<&NodeId, usize> = HashMap::new();
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();

    for edge in edges {
        in_degree.entry(&edge.source).or_insert(0);
        *in_degree.entry(&edge.target).or_insert(0) += 1;
        adjacency.entry(&edge.source).or_default().push(&edge.target);
    }

    let mut ready: Vec<&NodeId> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(n, _)| *n)
        .collect();
    let mut drained = 0usize;

    while let Some(node) = ready.pop() {
        drained += 1;
        for next in adjacency.get(node).into_iter().flatten() {
            if let Some(d) = in_degree.get_mut(next) {
                *d -= 1;
                if *d == 0 {
                    ready.push(*next);
                }
            }
        }
    }

    drained != in_degree.len()
}
