//! Prerequisite edge types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// Unique identifier for a prerequisite edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Create an edge id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Prerequisite edge in the skill graph.
///
/// `target` depends on `source`: the source must be unlocked before the
/// target may be unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillEdge {
    /// Unique identifier.
    pub id: EdgeId,
    /// Prerequisite node.
    pub source: NodeId,
    /// Dependent node.
    pub target: NodeId,
}

impl SkillEdge {
    /// Create a new edge.
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether this edge connects `source` to `target` (direction matters).
    pub fn connects(&self, source: &NodeId, target: &NodeId) -> bool {
        &self.source == source && &self.target == target
    }

    /// Whether `node` is either endpoint of this edge.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connects_is_directional() {
        let e = SkillEdge::new("e1", "a", "b");
        assert!(e.connects(&"a".into(), &"b".into()));
        assert!(!e.connects(&"b".into(), &"a".into()));
    }

    #[test]
    fn test_touches_either_endpoint() {
        let e = SkillEdge::new("e1", "a", "b");
        assert!(e.touches(&"a".into()));
        assert!(e.touches(&"b".into()));
        assert!(!e.touches(&"c".into()));
    }
}
