//! Default seed graph.

use crate::types::{GraphState, NodeId, SkillEdge, SkillNode};

/// Build a fresh copy of the seed graph.
///
/// HTML (unlocked) and CSS (locked) are both prerequisites of JS, which
/// starts selected.
pub fn seed_state() -> GraphState {
    GraphState::new(
        vec![
            SkillNode::new("n1", "HTML", 0.0, 0.0).unlocked(),
            SkillNode::new("n2", "CSS", 240.0, 0.0),
            SkillNode::new("n3", "JS", 120.0, 150.0),
        ],
        vec![
            SkillEdge::new("e1", "n1", "n3"),
            SkillEdge::new("e2", "n2", "n3"),
        ],
        Some(NodeId::new("n3")),
    )
}
