//! Id generation for new nodes and edges.
//!
//! The engine takes ids from an [`IdGenerator`] so tests can pin them.
//! Collisions are made improbable, not prevented.

use uuid::Uuid;

use crate::types::{EdgeId, NodeId};

/// Source of fresh node and edge ids.
pub trait IdGenerator {
    /// Produce a fresh node id.
    fn next_node_id(&mut self) -> NodeId;

    /// Produce a fresh edge id.
    fn next_edge_id(&mut self) -> EdgeId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_node_id(&mut self) -> NodeId {
        (**self).next_node_id()
    }

    fn next_edge_id(&mut self) -> EdgeId {
        (**self).next_edge_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_node_id(&mut self) -> NodeId {
        (**self).next_node_id()
    }

    fn next_edge_id(&mut self) -> EdgeId {
        (**self).next_edge_id()
    }
}

/// Short random ids: the first 8 hex digits of a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl RandomIds {
    fn short() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);
        id
    }
}

impl IdGenerator for RandomIds {
    fn next_node_id(&mut self) -> NodeId {
        NodeId::new(Self::short())
    }

    fn next_edge_id(&mut self) -> EdgeId {
        EdgeId::new(Self::short())
    }
}

/// Deterministic ids from per-kind counters: `node-1`, `node-2`, `edge-1`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    node_prefix: String,
    edge_prefix: String,
    next_node: u64,
    next_edge: u64,
}

impl SequentialIds {
    /// Counters starting at 1 with `node-` / `edge-` prefixes.
    pub fn new() -> Self {
        Self::with_prefixes("node-", "edge-")
    }

    /// Counters starting at 1 with custom prefixes.
    pub fn with_prefixes(node_prefix: impl Into<String>, edge_prefix: impl Into<String>) -> Self {
        Self {
            node_prefix: node_prefix.into(),
            edge_prefix: edge_prefix.into(),
            next_node: 1,
            next_edge: 1,
        }
    }

    /// Start both counters at `n` instead of 1.
    pub fn starting_at(mut self, n: u64) -> Self {
        self.next_node = n;
        self.next_edge = n;
        self
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}{}", self.node_prefix, self.next_node));
        self.next_node += 1;
        id
    }

    fn next_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::new(format!("{}{}", self.edge_prefix, self.next_edge));
        self.next_edge += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_counters_are_independent() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_node_id().as_str(), "node-1");
        assert_eq!(ids.next_node_id().as_str(), "node-2");
        assert_eq!(ids.next_edge_id().as_str(), "edge-1");
    }

    #[test]
    fn test_sequential_custom_start() {
        let mut ids = SequentialIds::with_prefixes("n", "e").starting_at(4);
        assert_eq!(ids.next_node_id().as_str(), "n4");
        assert_eq!(ids.next_edge_id().as_str(), "e4");
    }

    #[test]
    fn test_random_ids_are_short_and_distinct() {
        let mut ids = RandomIds;
        let a = ids.next_node_id();
        let b = ids.next_node_id();
        assert_eq!(a.as_str().len(), 8);
        assert_ne!(a, b);
    }
}
