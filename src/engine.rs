//! State engine: the only place a graph state changes.
//!
//! [`apply`] is a pure function from `(state, intent)` to a new state plus an
//! [`Outcome`]. Refused intents return a value-identical copy of the input.
//! [`SkillGraph`] owns one state and feeds every applied change to an
//! optional persistence port.
//!
//! ## Transition rules
//!
//! | Intent | Refused when |
//! |--------|--------------|
//! | add-node | label empty/over 80 chars, duplicate label, non-finite position |
//! | add-edge | self-loop, unknown endpoint, duplicate pair, would close a cycle |
//! | move-node | non-finite position |
//! | toggle-unlock | a direct predecessor is locked or missing |
//!
//! Unknown ids on move/remove/toggle are tolerated and report
//! [`Outcome::Unchanged`].

use tracing::{debug, info};

use crate::ids::{IdGenerator, RandomIds};
use crate::persistence::Persistence;
use crate::seed::seed_state;
use crate::selectors::{blocking_prereqs, find_edge, find_node, prereqs_met};
use crate::store::{InMemoryStore, KeyValueStore};
use crate::types::{
    is_valid_label, EdgeId, GraphState, Intent, NodeId, Outcome, RejectReason, Selection,
    SkillEdge, SkillNode, DEFAULT_POSITION,
};
use crate::validators::{check_edge_shape, would_create_cycle};

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The next state. Equal to the input unless `outcome` is `Applied`.
    pub state: GraphState,
    /// What happened.
    pub outcome: Outcome,
}

impl Transition {
    fn applied(state: GraphState) -> Self {
        Self {
            state,
            outcome: Outcome::Applied,
        }
    }

    fn unchanged(state: &GraphState) -> Self {
        Self {
            state: state.clone(),
            outcome: Outcome::Unchanged,
        }
    }

    fn rejected(state: &GraphState, reason: RejectReason) -> Self {
        Self {
            state: state.clone(),
            outcome: Outcome::Rejected(reason),
        }
    }
}

/// Apply one intent and return the next state. Refusals are silent.
pub fn transition<G: IdGenerator>(state: &GraphState, intent: Intent, ids: &mut G) -> GraphState {
    apply(state, intent, ids).state
}

/// Apply one intent and report what happened.
pub fn apply<G: IdGenerator>(state: &GraphState, intent: Intent, ids: &mut G) -> Transition {
    let kind = intent.kind();
    let result = match intent {
        Intent::AddNode { label, x, y } => add_node(state, &label, x, y, ids),
        Intent::AddEdge { source, target } => {
            if let Err(reason) = check_edge_shape(state, &source, &target) {
                Transition::rejected(state, reason)
            } else if would_create_cycle(&state.edges, &source, &target) {
                Transition::rejected(state, RejectReason::WouldCreateCycle {
                    prerequisite: source,
                    dependent: target,
                })
            } else {
                match fresh_edge_id(state, ids) {
                    Some(id) => {
                        let mut next = state.clone();
                        next.edges.push(SkillEdge::new(id, source, target));
                        Transition::applied(next)
                    }
                    None => Transition::rejected(state, RejectReason::IdsExhausted("edge")),
                }
            }
        }
        Intent::MoveNode { id, x, y } => {
            if !x.is_finite() || !y.is_finite() {
                Transition::rejected(state, RejectReason::NonFinitePosition)
            } else if find_node(state, &id).is_none() {
                Transition::unchanged(state)
            } else {
                let mut next = state.clone();
                for node in next.nodes.iter_mut().filter(|n| n.id == id) {
                    node.x = x;
                    node.y = y;
                }
                Transition::applied(next)
            }
        }
        Intent::RemoveNode { id } => {
            let mut next = state.clone();
            next.nodes.retain(|n| n.id != id);
            next.edges.retain(|e| !e.touches(&id));
            if next.selected_id.as_ref() == Some(&id) {
                next.selected_id = None;
            }
            if next == *state {
                Transition::unchanged(state)
            } else {
                Transition::applied(next)
            }
        }
        Intent::RemoveEdge { id } => {
            if !state.edges.iter().any(|e| e.id == id) {
                Transition::unchanged(state)
            } else {
                let mut next = state.clone();
                next.edges.retain(|e| e.id != id);
                Transition::applied(next)
            }
        }
        Intent::Select(Selection { id }) => {
            let mut next = state.clone();
            next.selected_id = id;
            Transition::applied(next)
        }
        Intent::ToggleUnlock { id } => {
            if !prereqs_met(state, &id) {
                let blocking = blocking_prereqs(state, &id);
                Transition::rejected(state, RejectReason::PrerequisitesNotMet { blocking })
            } else if find_node(state, &id).is_none() {
                Transition::unchanged(state)
            } else {
                let mut next = state.clone();
                for node in next.nodes.iter_mut().filter(|n| n.id == id) {
                    node.unlocked = !node.unlocked;
                }
                Transition::applied(next)
            }
        }
        Intent::Load(loaded) => Transition::applied(loaded),
    };

    if let Outcome::Rejected(reason) = &result.outcome {
        debug!(intent = kind, reason = %reason, "intent rejected");
    }

    result
}

fn add_node<G: IdGenerator>(
    state: &GraphState,
    label: &str,
    x: Option<f64>,
    y: Option<f64>,
    ids: &mut G,
) -> Transition {
    let label = label.trim();
    if !is_valid_label(label) {
        return Transition::rejected(state, RejectReason::InvalidLabel);
    }
    if state.nodes.iter().any(|n| n.label_matches(label)) {
        return Transition::rejected(state, RejectReason::DuplicateLabel(label.to_string()));
    }
    let x = x.unwrap_or(DEFAULT_POSITION.0);
    let y = y.unwrap_or(DEFAULT_POSITION.1);
    if !x.is_finite() || !y.is_finite() {
        return Transition::rejected(state, RejectReason::NonFinitePosition);
    }

    let Some(id) = fresh_node_id(state, ids) else {
        return Transition::rejected(state, RejectReason::IdsExhausted("node"));
    };
    let node = SkillNode::new(id, label, x, y);
    let mut next = state.clone();
    next.selected_id = Some(node.id.clone());
    next.nodes.push(node);
    Transition::applied(next)
}

/// Draws allowed before giving up on finding an unused id.
const MAX_ID_DRAWS: usize = 1024;

/// Next generated node id not already held by a node in `state`.
///
/// A restarted counter-based generator walks past ids left by earlier
/// sessions instead of reusing them.
fn fresh_node_id<G: IdGenerator>(state: &GraphState, ids: &mut G) -> Option<NodeId> {
    (0..MAX_ID_DRAWS)
        .map(|_| ids.next_node_id())
        .find(|id| find_node(state, id).is_none())
}

fn fresh_edge_id<G: IdGenerator>(state: &GraphState, ids: &mut G) -> Option<EdgeId> {
    (0..MAX_ID_DRAWS)
        .map(|_| ids.next_edge_id())
        .find(|id| find_edge(state, id).is_none())
}

/// Build the starting state.
///
/// Uses the persisted state when `persistence` is given and it loads and
/// migrates cleanly; otherwise a fresh seed graph.
pub fn create_initial_state<S: KeyValueStore>(persistence: Option<&Persistence<S>>) -> GraphState {
    match persistence.and_then(Persistence::load) {
        Some(state) => state,
        None => {
            if persistence.is_some() {
                info!("no usable persisted state, starting from seed graph");
            }
            seed_state()
        }
    }
}

/// A skill graph with its own state, id source and optional persistence.
pub struct SkillGraph<G: IdGenerator = RandomIds, S: KeyValueStore = InMemoryStore> {
    state: GraphState,
    ids: G,
    persistence: Option<Persistence<S>>,
}

impl<G: IdGenerator> SkillGraph<G, InMemoryStore> {
    /// Create an unpersisted graph starting from `state`.
    pub fn new(state: GraphState, ids: G) -> Self {
        Self {
            state,
            ids,
            persistence: None,
        }
    }

    /// Create an unpersisted graph starting from the seed graph.
    pub fn seeded(ids: G) -> Self {
        Self::new(seed_state(), ids)
    }
}

impl<G: IdGenerator, S: KeyValueStore> SkillGraph<G, S> {
    /// Create a graph backed by `persistence`.
    ///
    /// The starting state comes from [`create_initial_state`].
    pub fn with_persistence(persistence: Persistence<S>, ids: G) -> Self {
        let state = create_initial_state(Some(&persistence));
        Self {
            state,
            ids,
            persistence: Some(persistence),
        }
    }

    /// Current state.
    pub fn state(&self) -> &GraphState {
        &self.state
    }

    /// The persistence port, if any.
    pub fn persistence(&self) -> Option<&Persistence<S>> {
        self.persistence.as_ref()
    }

    /// Apply one intent and return the resulting state.
    pub fn dispatch(&mut self, intent: Intent) -> &GraphState {
        self.dispatch_with_outcome(intent);
        &self.state
    }

    /// Apply one intent and report what happened.
    ///
    /// Applied changes are saved through the persistence port; save failures
    /// are logged and do not affect the outcome.
    pub fn dispatch_with_outcome(&mut self, intent: Intent) -> Outcome {
        let Transition { state, outcome } = apply(&self.state, intent, &mut self.ids);
        if outcome.is_applied() {
            self.state = state;
            if let Some(persistence) = &self.persistence {
                persistence.save(&self.state);
            }
        }
        outcome
    }

    /// Replace the state with a fresh seed graph.
    pub fn reset(&mut self) -> &GraphState {
        self.dispatch(Intent::Load(seed_state()))
    }

    /// Consume the graph and return its state.
    pub fn into_state(self) -> GraphState {
        self.state
    }
}
