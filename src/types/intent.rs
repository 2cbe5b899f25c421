//! Intents accepted by the engine and the outcomes it reports.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::edge::EdgeId;
use super::state::GraphState;

/// A request to change the graph.
///
/// Serialized as `{ "type": "ADD_NODE", "payload": { ... } }` so UI actions
/// can be forwarded without translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Append a new locked node and select it.
    AddNode {
        /// Label (trimmed before use).
        label: String,
        /// Horizontal position; defaults to 100.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        /// Vertical position; defaults to 100.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    /// Add a prerequisite edge `source → target`.
    AddEdge {
        /// Prerequisite node.
        source: NodeId,
        /// Dependent node.
        target: NodeId,
    },
    /// Update a node's position.
    MoveNode {
        /// Node to move.
        id: NodeId,
        /// New horizontal position.
        x: f64,
        /// New vertical position.
        y: f64,
    },
    /// Remove a node and every edge touching it.
    RemoveNode {
        /// Node to remove.
        id: NodeId,
    },
    /// Remove a single edge.
    RemoveEdge {
        /// Edge to remove.
        id: EdgeId,
    },
    /// Set or clear the selection. A missing payload clears it.
    Select(Selection),
    /// Flip a node's unlocked flag when its prerequisites are met.
    ToggleUnlock {
        /// Node to toggle.
        id: NodeId,
    },
    /// Replace the whole state.
    Load(GraphState),
}

impl Intent {
    /// Build an add-node intent at the default position.
    pub fn add_node(label: impl Into<String>) -> Self {
        Self::AddNode {
            label: label.into(),
            x: None,
            y: None,
        }
    }

    /// Build an add-node intent at an explicit position.
    pub fn add_node_at(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self::AddNode {
            label: label.into(),
            x: Some(x),
            y: Some(y),
        }
    }

    /// Build an add-edge intent.
    pub fn add_edge(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::AddEdge {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Build a move-node intent.
    pub fn move_node(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self::MoveNode { id: id.into(), x, y }
    }

    /// Build a remove-node intent.
    pub fn remove_node(id: impl Into<NodeId>) -> Self {
        Self::RemoveNode { id: id.into() }
    }

    /// Build a remove-edge intent.
    pub fn remove_edge(id: impl Into<EdgeId>) -> Self {
        Self::RemoveEdge { id: id.into() }
    }

    /// Build a select intent for a node.
    pub fn select(id: impl Into<NodeId>) -> Self {
        Self::Select(Selection { id: Some(id.into()) })
    }

    /// Build a select intent that clears the selection.
    pub fn deselect() -> Self {
        Self::Select(Selection::default())
    }

    /// Build a toggle-unlock intent.
    pub fn toggle_unlock(id: impl Into<NodeId>) -> Self {
        Self::ToggleUnlock { id: id.into() }
    }

    /// Short name of the intent kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddNode { .. } => "add_node",
            Self::AddEdge { .. } => "add_edge",
            Self::MoveNode { .. } => "move_node",
            Self::RemoveNode { .. } => "remove_node",
            Self::RemoveEdge { .. } => "remove_edge",
            Self::Select(_) => "select",
            Self::ToggleUnlock { .. } => "toggle_unlock",
            Self::Load(_) => "load",
        }
    }
}

/// Payload of a select intent.
///
/// Deserializes from an absent or `null` payload as an empty selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<SelectionPayload>")]
pub struct Selection {
    /// Node to select; `None` clears the selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
}

#[derive(Deserialize)]
struct SelectionPayload {
    #[serde(default)]
    id: Option<NodeId>,
}

impl From<Option<SelectionPayload>> for Selection {
    fn from(payload: Option<SelectionPayload>) -> Self {
        Self {
            id: payload.and_then(|p| p.id),
        }
    }
}

/// Why the engine refused an intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// A node with the same label (case-insensitive) already exists.
    #[error("A skill labelled {0:?} already exists")]
    DuplicateLabel(String),
    /// The trimmed label is empty or longer than 80 characters.
    #[error("Label must be 1-80 characters after trimming")]
    InvalidLabel,
    /// A coordinate is NaN or infinite.
    #[error("Position must be finite")]
    NonFinitePosition,
    /// The edge would connect a node to itself.
    #[error("Edge source and target are the same node: {0}")]
    SelfLoop(NodeId),
    /// The (source, target) pair already has an edge.
    #[error("Edge {prerequisite} -> {dependent} already exists")]
    DuplicateEdge {
        /// Prerequisite node.
        prerequisite: NodeId,
        /// Dependent node.
        dependent: NodeId,
    },
    /// An edge endpoint does not exist.
    #[error("Unknown node: {0}")]
    UnknownEndpoint(NodeId),
    /// Adding the edge would close a directed cycle.
    #[error("Edge {prerequisite} -> {dependent} would create a cycle")]
    WouldCreateCycle {
        /// Prerequisite node.
        prerequisite: NodeId,
        /// Dependent node.
        dependent: NodeId,
    },
    /// At least one direct predecessor is locked or missing.
    #[error("Prerequisites not met: {blocking:?}")]
    PrerequisitesNotMet {
        /// Predecessors that are locked or missing.
        blocking: Vec<NodeId>,
    },
    /// The id generator kept returning ids already in use.
    #[error("No unused {0} id after repeated draws")]
    IdsExhausted(&'static str),
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The intent changed the state.
    Applied,
    /// The intent was valid but had nothing to act on (unknown id).
    Unchanged,
    /// The intent was refused; the state is unchanged.
    Rejected(RejectReason),
}

impl Outcome {
    /// Whether the state changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Whether the intent was refused.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
