//! Versioned wire format and migration of untrusted input.
//!
//! Persisted shape (version 1):
//!
//! ```json
//! { "v": 1,
//!   "nodes": [{ "id": "n1", "label": "HTML", "unlocked": true, "x": 0, "y": 0 }],
//!   "edges": [{ "id": "e1", "source": "n1", "target": "n3" }],
//!   "selectedId": "n3" }
//! ```
//!
//! [`migrate`] is the only door through which external data reaches the
//! engine. It accepts the whole document or nothing. Unknown extra fields are
//! ignored; wrong types are never coerced. A new version gets a new tag and
//! an explicit step from the previous one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{is_valid_label, GraphState, NodeId, SkillEdge, SkillNode};

/// The only version tag currently recognized.
pub const SCHEMA_VERSION: u64 = 1;

/// Why a persisted document was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The document is not a JSON object.
    #[error("Persisted state is not an object")]
    NotAnObject,
    /// The `v` field is absent.
    #[error("Persisted state has no version tag")]
    MissingVersion,
    /// The `v` field is present but not a recognized version.
    #[error("Unsupported persisted state version: {0}")]
    UnsupportedVersion(String),
    /// A field is missing or has the wrong type.
    #[error("Malformed persisted state: {0}")]
    Shape(String),
    /// A required string field is empty.
    #[error("Empty {field} at {path}")]
    EmptyField {
        /// Location, e.g. `nodes[2]`.
        path: String,
        /// Field name.
        field: &'static str,
    },
    /// A node label is empty or longer than 80 characters after trimming.
    #[error("Invalid label at {0}")]
    InvalidLabel(String),
    /// A node coordinate is NaN or infinite.
    #[error("Non-finite coordinate at {0}")]
    NonFiniteCoordinate(String),
}

#[derive(Deserialize)]
struct RawStateV1 {
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    #[serde(rename = "selectedId", default, deserialize_with = "present_string")]
    selected_id: Option<String>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    label: String,
    unlocked: bool,
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    target: String,
}

/// An optional field that, when present, must be a string (`null` is refused).
fn present_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    String::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
struct PersistedV1<'a> {
    v: u64,
    nodes: &'a [SkillNode],
    edges: &'a [SkillEdge],
    #[serde(rename = "selectedId", skip_serializing_if = "Option::is_none")]
    selected_id: Option<&'a NodeId>,
}

/// Validate untrusted input and extract a graph state.
///
/// Returns `None` on any failure. See [`try_migrate`] for the reason.
pub fn migrate(raw: &Value) -> Option<GraphState> {
    try_migrate(raw).ok()
}

/// Parse a JSON string and migrate it. Unparsable text yields `None`.
pub fn migrate_str(raw: &str) -> Option<GraphState> {
    serde_json::from_str::<Value>(raw).ok().and_then(|v| migrate(&v))
}

/// Validate untrusted input and extract a graph state, reporting why it
/// was refused.
pub fn try_migrate(raw: &Value) -> Result<GraphState, MigrationError> {
    let object = raw.as_object().ok_or(MigrationError::NotAnObject)?;
    let version = object.get("v").ok_or(MigrationError::MissingVersion)?;
    if version.as_f64() != Some(SCHEMA_VERSION as f64) {
        return Err(MigrationError::UnsupportedVersion(version.to_string()));
    }

    let state = RawStateV1::deserialize(raw).map_err(|e| MigrationError::Shape(e.to_string()))?;

    let mut nodes = Vec::with_capacity(state.nodes.len());
    for (i, raw) in state.nodes.into_iter().enumerate() {
        let path = format!("nodes[{i}]");
        if raw.id.is_empty() {
            return Err(MigrationError::EmptyField { path, field: "id" });
        }
        if !is_valid_label(&raw.label) {
            return Err(MigrationError::InvalidLabel(path));
        }
        if !raw.x.is_finite() || !raw.y.is_finite() {
            return Err(MigrationError::NonFiniteCoordinate(path));
        }
        let mut node = SkillNode::new(raw.id, &raw.label, raw.x, raw.y);
        node.unlocked = raw.unlocked;
        nodes.push(node);
    }

    let mut edges = Vec::with_capacity(state.edges.len());
    for (i, raw) in state.edges.into_iter().enumerate() {
        let path = format!("edges[{i}]");
        for (field, value) in [("id", &raw.id), ("source", &raw.source), ("target", &raw.target)] {
            if value.is_empty() {
                return Err(MigrationError::EmptyField { path, field });
            }
        }
        edges.push(SkillEdge::new(raw.id, raw.source, raw.target));
    }

    Ok(GraphState::new(nodes, edges, state.selected_id.map(NodeId::new)))
}

/// Build the version-tagged persisted document for `state`.
pub fn to_persisted(state: &GraphState) -> Result<Value, serde_json::Error> {
    serde_json::to_value(persisted_view(state))
}

/// Serialize the version-tagged persisted document for `state` to a string.
pub fn to_persisted_string(state: &GraphState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&persisted_view(state))
}

fn persisted_view(state: &GraphState) -> PersistedV1<'_> {
    PersistedV1 {
        v: SCHEMA_VERSION,
        nodes: &state.nodes,
        edges: &state.edges,
        selected_id: state.selected_id.as_ref(),
    }
}
