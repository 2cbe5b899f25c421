//! Golden tests for the skill graph engine.
//!
//! These tests drive the engine through intents only and check the
//! observable state after each step.

use skill_graph_kernel::{
    apply, find_node, seed_state, transition, GraphState, Intent, NodeId, Outcome,
    RejectReason, SequentialIds, SkillEdge, SkillGraph, SkillNode,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn chain(ids: &[&str]) -> GraphState {
    let nodes = ids
        .iter()
        .map(|id| SkillNode::new(*id, &id.to_uppercase(), 0.0, 0.0))
        .collect();
    let edges = ids
        .windows(2)
        .enumerate()
        .map(|(i, w)| SkillEdge::new(format!("e{}", i + 1), w[0], w[1]))
        .collect();
    GraphState::new(nodes, edges, None)
}

fn step(state: &GraphState, intent: Intent) -> GraphState {
    transition(state, intent, &mut SequentialIds::new())
}

fn is_unlocked(state: &GraphState, id: &str) -> bool {
    find_node(state, &NodeId::from(id)).is_some_and(|n| n.unlocked)
}

// ─────────────────────────────────────────────────────────────────────────────
// END-TO-END SCENARIO
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_seed_unlock_sequence() {
    let mut graph = SkillGraph::seeded(SequentialIds::new());

    // JS needs CSS, which is still locked
    let outcome = graph.dispatch_with_outcome(Intent::toggle_unlock("n3"));
    assert!(outcome.is_rejected());
    assert_eq!(graph.state(), &seed_state());

    assert!(graph.dispatch_with_outcome(Intent::toggle_unlock("n2")).is_applied());
    assert!(is_unlocked(graph.state(), "n2"));

    assert!(graph.dispatch_with_outcome(Intent::toggle_unlock("n3")).is_applied());
    assert!(is_unlocked(graph.state(), "n3"));
}

#[test]
fn test_build_tree_from_scratch() {
    let mut graph = SkillGraph::new(GraphState::default(), SequentialIds::new());

    graph.dispatch(Intent::add_node("Rust"));
    graph.dispatch(Intent::add_node_at("Async", 200.0, 50.0));
    graph.dispatch(Intent::add_node("Tokio"));
    graph.dispatch(Intent::add_edge("node-1", "node-2"));
    graph.dispatch(Intent::add_edge("node-2", "node-3"));

    let state = graph.state();
    assert_eq!(state.node_count(), 3);
    assert_eq!(state.edge_count(), 2);
    assert_eq!(state.selected_id, Some(NodeId::from("node-3")));
    assert_eq!(
        state.edges.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
        vec!["edge-1", "edge-2"]
    );
    assert_eq!(state.verify_invariants(), Ok(()));
}

// ─────────────────────────────────────────────────────────────────────────────
// ACYCLICITY
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_closing_chain_is_rejected() {
    let s = chain(&["a", "b", "c"]);
    let t = apply(&s, Intent::add_edge("c", "a"), &mut SequentialIds::new());
    assert_eq!(t.state, s);
    assert_eq!(
        t.outcome,
        Outcome::Rejected(RejectReason::WouldCreateCycle {
            prerequisite: "c".into(),
            dependent: "a".into()
        })
    );
}

#[test]
fn test_back_edge_on_single_edge_is_rejected() {
    let s = chain(&["a", "b"]);
    assert_eq!(step(&s, Intent::add_edge("b", "a")), s);
}

#[test]
fn test_diamond_is_allowed() {
    let mut graph = SkillGraph::new(chain(&["a", "b", "d"]), SequentialIds::new());
    graph.dispatch(Intent::add_node("C"));
    graph.dispatch(Intent::add_edge("a", "node-1"));
    graph.dispatch(Intent::add_edge("node-1", "d"));

    let s = graph.state();
    assert_eq!(s.edge_count(), 4);
    assert_eq!(s.verify_invariants(), Ok(()));
}

// ─────────────────────────────────────────────────────────────────────────────
// EDGE SHAPE
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_self_loop_always_rejected() {
    for s in [seed_state(), chain(&["x"]), chain(&["a", "b", "c"])] {
        let id = s.nodes[0].id.clone();
        assert_eq!(step(&s, Intent::add_edge(id.clone(), id)), s);
    }
}

#[test]
fn test_duplicate_edge_added_once() {
    let s = step(&seed_state(), Intent::add_edge("n1", "n2"));
    let s = step(&s, Intent::add_edge("n1", "n2"));
    let count = s
        .edges
        .iter()
        .filter(|e| e.connects(&"n1".into(), &"n2".into()))
        .count();
    assert_eq!(count, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// NODES
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_label_uniqueness_case_insensitive() {
    let s = step(&seed_state(), Intent::add_node("html"));
    assert_eq!(s.node_count(), 3);

    let s = step(&seed_state(), Intent::add_node("  css  "));
    assert_eq!(s.node_count(), 3);
}

#[test]
fn test_cascade_delete() {
    // a → x → b, plus an unrelated a → b edge that must survive
    let mut s = chain(&["a", "x", "b"]);
    s.edges.push(SkillEdge::new("keep", "a", "b"));
    s.selected_id = Some("x".into());

    let s = step(&s, Intent::remove_node("x"));
    assert_eq!(s.edges, vec![SkillEdge::new("keep", "a", "b")]);
    assert_eq!(s.selected_id, None);
    assert!(find_node(&s, &"x".into()).is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// PREREQUISITE GATING
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_gating_uses_direct_predecessors_only() {
    // a → b → c; unlock b while a is locked is refused, but if b is forced
    // unlocked, c only looks at b.
    let mut s = chain(&["a", "b", "c"]);
    assert_eq!(step(&s, Intent::toggle_unlock("b")), s);

    s.nodes[1].unlocked = true;
    let s = step(&s, Intent::toggle_unlock("c"));
    assert!(is_unlocked(&s, "c"));
    assert!(!is_unlocked(&s, "a"));
}

#[test]
fn test_toggle_unknown_root_is_unchanged() {
    let s = seed_state();
    let t = apply(&s, Intent::toggle_unlock("ghost"), &mut SequentialIds::new());
    assert_eq!(t.outcome, Outcome::Unchanged);
    assert_eq!(t.state, s);
}

#[test]
fn test_missing_predecessor_blocks_unlock() {
    let mut s = chain(&["a"]);
    s.edges.push(SkillEdge::new("e9", "ghost", "a"));
    assert_eq!(step(&s, Intent::toggle_unlock("a")), s);
}

// ─────────────────────────────────────────────────────────────────────────────
// LOAD
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_load_is_idempotent() {
    let target = chain(&["p", "q"]);
    let once = step(&seed_state(), Intent::Load(target.clone()));
    let twice = step(&once, Intent::Load(target.clone()));
    assert_eq!(once, target);
    assert_eq!(twice, target);
}

#[test]
fn test_intents_round_trip_from_ui_json() {
    let raw = r#"[
        { "type": "ADD_NODE", "payload": { "label": "React", "x": 10, "y": 20 } },
        { "type": "ADD_EDGE", "payload": { "source": "n3", "target": "node-1" } },
        { "type": "SELECT" },
        { "type": "SELECT", "payload": { "id": "n1" } },
        { "type": "MOVE_NODE", "payload": { "id": "n1", "x": 5, "y": 5 } }
    ]"#;
    let intents: Vec<Intent> = serde_json::from_str(raw).unwrap();

    let mut graph = SkillGraph::seeded(SequentialIds::new());
    for intent in intents {
        graph.dispatch(intent);
    }

    let state = graph.state();
    assert_eq!(state.node_count(), 4);
    assert_eq!(state.edge_count(), 3);
    assert_eq!(state.selected_id, Some(NodeId::from("n1")));
    let n1 = find_node(state, &"n1".into()).unwrap();
    assert_eq!((n1.x, n1.y), (5.0, 5.0));
}
