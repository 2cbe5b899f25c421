//! Graph state: the single value the engine transitions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use xxhash_rust::xxh64::xxh64;

use super::edge::{EdgeId, SkillEdge};
use super::node::{is_valid_label, NodeId, SkillNode};
use crate::validators::has_cycle;

/// Complete state of a skill graph.
///
/// Nodes and edges keep insertion order. The engine never mutates a state in
/// place; every transition produces a new value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphState {
    /// Nodes in insertion order.
    pub nodes: Vec<SkillNode>,
    /// Edges in insertion order.
    pub edges: Vec<SkillEdge>,
    /// Currently selected node, if any.
    #[serde(rename = "selectedId", default, skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<NodeId>,
}

/// A structural invariant that a graph state fails to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// Two nodes share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),
    /// Two edges share an id.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(EdgeId),
    /// A node label is empty or too long once trimmed.
    #[error("Invalid label on node {0}")]
    InvalidLabel(NodeId),
    /// A node position is NaN or infinite.
    #[error("Non-finite position on node {0}")]
    NonFinitePosition(NodeId),
    /// An edge references a node that does not exist.
    #[error("Edge {edge} references unknown node {node}")]
    DanglingEdge {
        /// Offending edge.
        edge: EdgeId,
        /// Missing endpoint.
        node: NodeId,
    },
    /// An edge points from a node to itself.
    #[error("Edge {0} is a self-loop")]
    SelfLoop(EdgeId),
    /// Two edges connect the same (source, target) pair.
    #[error("Edge {0} duplicates an existing (source, target) pair")]
    DuplicatePair(EdgeId),
    /// The edge relation contains a directed cycle.
    #[error("Edge relation contains a cycle")]
    Cycle,
}

impl GraphState {
    /// Create a state from parts.
    pub fn new(nodes: Vec<SkillNode>, edges: Vec<SkillEdge>, selected_id: Option<NodeId>) -> Self {
        Self {
            nodes,
            edges,
            selected_id,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check every structural invariant and report the first violation.
    ///
    /// The engine does not call this on each transition. It is a diagnostic
    /// for hosts and tests.
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(InvariantViolation::DuplicateNodeId(node.id.clone()));
            }
            if !is_valid_label(&node.label) {
                return Err(InvariantViolation::InvalidLabel(node.id.clone()));
            }
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(InvariantViolation::NonFinitePosition(node.id.clone()));
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        let mut pairs = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(InvariantViolation::DuplicateEdgeId(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint) {
                    return Err(InvariantViolation::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            if edge.source == edge.target {
                return Err(InvariantViolation::SelfLoop(edge.id.clone()));
            }
            if !pairs.insert((&edge.source, &edge.target)) {
                return Err(InvariantViolation::DuplicatePair(edge.id.clone()));
            }
        }

        if has_cycle(&self.edges) {
            return Err(InvariantViolation::Cycle);
        }

        Ok(())
    }

    /// Deterministic fingerprint of this state: 16 hex digits of the xxh64
    /// of its JSON form.
    ///
    /// Fields serialize in declaration order and lists in index order, so
    /// equal states always hash alike.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("{:016x}", xxh64(&bytes, 0)))
    }
}
