//! Core types for the skill graph.

pub mod node;
pub mod edge;
pub mod state;
pub mod intent;

pub use node::{NodeId, SkillNode, MAX_LABEL_CHARS, DEFAULT_POSITION, is_valid_label};
pub use edge::{EdgeId, SkillEdge};
pub use state::{GraphState, InvariantViolation};
pub use intent::{Intent, Outcome, RejectReason, Selection};
