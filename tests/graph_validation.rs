// tests/graph_validation.rs

use zinc::dag::{TaskGraph, TaskSpec};
use zinc::errors::ZincError;
use zinc::types::FailurePolicy;
use zinc_test_utils::builders::{GraphBuilder, noop};

#[test]
fn test_valid_graph_exposes_structure_in_plan_order() {
    let graph = GraphBuilder::new()
        .fatal("root", &[])
        .advisory("a", &["root"])
        .fatal("b", &["root", "a"])
        .build();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.tasks().collect::<Vec<_>>(), vec!["root", "a", "b"]);
    assert_eq!(graph.roots(), vec!["root"]);
    assert_eq!(graph.dependencies_of("b"), ["root".to_string(), "a".to_string()]);
    assert_eq!(graph.dependents_of("a"), ["b".to_string()]);

    let downstream = graph.transitive_dependents("root");
    assert!(downstream.contains("a"));
    assert!(downstream.contains("b"));
    assert_eq!(downstream.len(), 2);
}

#[test]
fn test_cycle_returns_dag_cycle_error() {
    let specs = GraphBuilder::new()
        .fatal("root", &[])
        .fatal("a", &["root", "b"])
        .fatal("b", &["a"])
        .specs();

    match TaskGraph::new(specs) {
        Err(ZincError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('a') || msg.contains('b'));
        }
        other => panic!("expected DagCycle, got {other:?}"),
    }
}

#[test]
fn test_unknown_dependency_is_rejected() {
    let specs = GraphBuilder::new()
        .fatal("root", &[])
        .fatal("a", &["missing"])
        .specs();

    match TaskGraph::new(specs) {
        Err(ZincError::InvalidGraph(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("missing"));
        }
        other => panic!("expected InvalidGraph, got {other:?}"),
    }
}

#[test]
fn test_self_dependency_is_rejected() {
    let specs = vec![
        TaskSpec::new("root", noop("root"), FailurePolicy::Fatal),
        TaskSpec::new("a", noop("a"), FailurePolicy::Fatal).after("a"),
    ];

    match TaskGraph::new(specs) {
        Err(ZincError::InvalidGraph(msg)) => assert!(msg.contains("cannot depend on itself")),
        other => panic!("expected InvalidGraph, got {other:?}"),
    }
}

#[test]
fn test_duplicate_names_are_rejected() {
    let specs = GraphBuilder::new()
        .fatal("root", &[])
        .fatal("a", &["root"])
        .advisory("a", &["root"])
        .specs();

    match TaskGraph::new(specs) {
        Err(ZincError::InvalidGraph(msg)) => assert!(msg.contains("more than once")),
        other => panic!("expected InvalidGraph, got {other:?}"),
    }
}

#[test]
fn test_multiple_roots_are_rejected() {
    let specs = GraphBuilder::new()
        .fatal("root", &[])
        .fatal("other-root", &[])
        .specs();

    match TaskGraph::new(specs) {
        Err(ZincError::InvalidGraph(msg)) => assert!(msg.contains("exactly one root")),
        other => panic!("expected InvalidGraph, got {other:?}"),
    }
}

#[test]
fn test_advisory_root_is_rejected() {
    let specs = GraphBuilder::new()
        .advisory("root", &[])
        .fatal("a", &["root"])
        .specs();

    match TaskGraph::new(specs) {
        Err(ZincError::InvalidGraph(msg)) => assert!(msg.contains("fatal")),
        other => panic!("expected InvalidGraph, got {other:?}"),
    }
}

#[test]
fn test_empty_graph_is_rejected() {
    assert!(matches!(
        TaskGraph::new(Vec::new()),
        Err(ZincError::InvalidGraph(_))
    ));
}
