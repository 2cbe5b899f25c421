//! # skill-graph-kernel
//!
//! Invariant-enforcing state engine for skill prerequisite graphs.
//!
//! A skill graph is a set of skills (nodes), each locked or unlocked, joined
//! by prerequisite edges (`source → target`: target depends on source).
//!
//! ## Core Contract
//!
//! 1. Every mutation is an [`Intent`] passed through the pure [`apply`] /
//!    [`transition`] function, which returns a new [`GraphState`]
//! 2. Illegal intents leave the state unchanged; [`Outcome`] says why
//! 3. Persisted state is version-tagged and re-enters only through
//!    [`schema::migrate`], which accepts a whole document or nothing
//!
//! ## Architecture
//!
//! ```text
//! UI gesture → Intent → engine::apply → GraphState → Persistence → KeyValueStore
//!                          ↓                              ↑
//!                 selectors / validators           schema::migrate
//! ```
//!
//! ## Invariants
//!
//! - Node ids and edge ids are unique
//! - No self-loops, no duplicate `(source, target)` pairs
//! - The edge relation stays acyclic
//! - Removing a node removes its edges and clears a matching selection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod ids;
pub mod selectors;
pub mod validators;
pub mod engine;
pub mod seed;
pub mod schema;
pub mod store;
pub mod persistence;
pub mod telemetry;

// Re-exports
pub use types::{
    EdgeId, GraphState, Intent, InvariantViolation, NodeId, Outcome, RejectReason, Selection,
    SkillEdge, SkillNode,
};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use selectors::{
    blocking_prereqs, find_edge, find_node, find_node_by_label, incoming_of, outgoing_of,
    prereqs_met, selected_node,
};
pub use validators::{check_edge_shape, has_cycle, would_create_cycle};
pub use engine::{apply, create_initial_state, transition, SkillGraph, Transition};
pub use seed::seed_state;
pub use schema::{migrate, migrate_str, to_persisted, try_migrate, MigrationError, SCHEMA_VERSION};
pub use store::{FileStore, InMemoryStore, KeyValueStore, StoreError};
pub use persistence::{Persistence, PersistenceConfig, PersistenceError, DEFAULT_STORAGE_KEY};
pub use telemetry::{init_tracing, LogFormat};
