//! Skill node types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum label length, in characters, after trimming.
pub const MAX_LABEL_CHARS: usize = 80;

/// Default position for nodes added without explicit coordinates.
pub const DEFAULT_POSITION: (f64, f64) = (100.0, 100.0);

/// Unique identifier for a skill node.
///
/// Serializes as a plain string so the wire format stays `"id": "n1"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A skill in the graph.
///
/// `x`/`y` are presentation coordinates. The engine never interprets them,
/// it only keeps them finite and carries them through persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    /// Unique identifier.
    pub id: NodeId,
    /// Display label (trimmed, 1–80 chars).
    pub label: String,
    /// Whether the skill has been unlocked.
    pub unlocked: bool,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl SkillNode {
    /// Create a locked node at the given position. The label is trimmed.
    pub fn new(id: impl Into<NodeId>, label: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            label: label.trim().to_string(),
            unlocked: false,
            x,
            y,
        }
    }

    /// Mark the node as unlocked.
    pub fn unlocked(mut self) -> Self {
        self.unlocked = true;
        self
    }

    /// Case-insensitive comparison of this node's label against `label`.
    ///
    /// Both sides are trimmed before comparing.
    pub fn label_matches(&self, label: &str) -> bool {
        self.label.trim().to_lowercase() == label.trim().to_lowercase()
    }
}

/// Check that a label is non-empty and within [`MAX_LABEL_CHARS`] once trimmed.
pub fn is_valid_label(label: &str) -> bool {
    let count = label.trim().chars().count();
    (1..=MAX_LABEL_CHARS).contains(&count)
}
