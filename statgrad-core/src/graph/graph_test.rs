use super::*;
use crate::error::ErrorKind;
use crate::ops::arithmetic::{AddOp, NegOp};
use crate::ops::reduction::{ReduceParams, VarianceParams};
use crate::utils::testing::{check_array_near, create_test_array};
use std::collections::HashMap;

#[test]
fn test_variables_and_constants() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let y = g.new_variable_with_shape("y", &[2, 3]);
    let c = g.constant("c", create_test_array(vec![1.0, 2.0], vec![2]));

    assert_eq!(g.num_variables(), 3);
    assert_eq!(g.variable(x).unwrap().name(), "x");
    assert_eq!(g.shape_hint(x), None);
    assert_eq!(g.shape_hint(y), Some(&[2usize, 3][..]));
    assert_eq!(g.shape_hint(c), Some(&[2usize][..]));
    assert!(g.variable(c).unwrap().value().is_some());
    assert_eq!(x.to_string(), "v0");
}

#[test]
fn test_graph_ids_are_unique() {
    let a = Graph::<f64>::new();
    let b = Graph::<f64>::new();
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_apply_registers_output_and_infers_shape() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2, 3]);
    let v = g
        .variance(x, VarianceParams::new(ReduceParams::along(&[1]), true))
        .unwrap();
    let node = g.producer(v).unwrap();
    assert_eq!(g.node(node).unwrap().inputs(), &[x]);
    assert_eq!(g.node(node).unwrap().output(), Some(v));
    assert_eq!(g.shape_hint(v), Some(&[2usize][..]));
    assert_eq!(g.variable(v).unwrap().name(), format!("var_{}", node.index()));
}

#[test]
fn test_invalid_axes_leave_no_shape_hint() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[4]);
    let v = g
        .variance(x, VarianceParams::new(ReduceParams::along(&[3]), false))
        .unwrap();
    assert_eq!(g.shape_hint(v), None);
}

#[test]
fn test_register_output_twice() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let node = g.add_node(Arc::new(NegOp), &[x]).unwrap();
    let out = g.new_variable("out");
    let other = g.new_variable("other");
    g.register_output(node, out).unwrap();
    match g.register_output(node, other) {
        Err(StatGradError::OutputAlreadyRegistered { node: n, existing }) => {
            assert_eq!(n, node);
            assert_eq!(existing, out);
        }
        res => panic!("Expected OutputAlreadyRegistered, got {:?}", res),
    }
}

#[test]
fn test_variable_produced_once() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let first = g.add_node(Arc::new(NegOp), &[x]).unwrap();
    let second = g.add_node(Arc::new(NegOp), &[x]).unwrap();
    let out = g.new_variable("out");
    g.register_output(first, out).unwrap();
    assert_eq!(
        g.register_output(second, out),
        Err(StatGradError::VariableAlreadyProduced { var: out })
    );

    let c = g.constant("c", Array::scalar(1.0));
    let third = g.add_node(Arc::new(NegOp), &[x]).unwrap();
    assert_eq!(
        g.register_output(third, c),
        Err(StatGradError::VariableAlreadyProduced { var: c })
    );
}

#[test]
fn test_add_node_checks_inputs() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let err = g.add_node(Arc::new(AddOp), &[x]).unwrap_err();
    assert!(matches!(err, StatGradError::ArityMismatch { expected: 2, actual: 1, .. }));
    assert_eq!(err.kind(), ErrorKind::Graph);

    let out_of_range = VarId {
        graph: g.id(),
        index: 42,
    };
    assert_eq!(
        g.add_node(Arc::new(NegOp), &[out_of_range]),
        Err(StatGradError::UnknownVariable { var: out_of_range })
    );
    let missing_node = NodeId {
        graph: g.id(),
        index: 7,
    };
    assert!(g.register_output(missing_node, x).is_err());
}

#[test]
fn test_handles_from_another_graph_are_rejected() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2]);
    let neg = g.neg(x).unwrap();

    // Same indices, different graph
    let mut other = Graph::<f64>::new();
    let y = other.new_variable_with_shape("y", &[3]);
    assert_eq!(x.index(), y.index());
    assert_ne!(x, y);
    assert_eq!(x.graph_id(), g.id());

    assert_eq!(
        other.add_node(Arc::new(NegOp), &[x]),
        Err(StatGradError::UnknownVariable { var: x })
    );
    assert!(other.variable(x).is_err());
    assert_eq!(other.shape_hint(x), None);
    let node = g.producer(neg).unwrap();
    assert!(matches!(
        other.node(node),
        Err(StatGradError::UnknownNode { .. })
    ));
    assert!(other.register_output(node, y).is_err());
    assert_eq!(other.num_nodes(), 0);
}

#[test]
fn test_producer_of_placeholder_is_unresolved() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let err = g.producer(x).unwrap_err();
    assert_eq!(err, StatGradError::UnresolvedVariable { var: x });
    assert_eq!(err.kind(), ErrorKind::UnresolvedVariable);
}

#[test]
fn test_evaluate_with_feeds_and_memoization() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[4]);
    let m = g.mean(x, ReduceParams::all().keep_dims(true)).unwrap();
    let centered = g.sub(x, m).unwrap();
    let sq = g.mul(centered, centered).unwrap();
    let total = g.sum(sq, ReduceParams::all()).unwrap();

    let mut feeds = HashMap::new();
    feeds.insert(x, create_test_array(vec![1.0, 2.0, 3.0, 4.0], vec![4]));
    let value = g.evaluate(total, &feeds).unwrap();
    check_array_near(&value, &[], &[5.0], 1e-12);

    let both = g.evaluate_many(&[m, total], &feeds).unwrap();
    check_array_near(&both[0], &[1], &[2.5], 1e-12);
    check_array_near(&both[1], &[], &[5.0], 1e-12);
}

#[test]
fn test_evaluate_unbound_placeholder() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let y = g.neg(x).unwrap();
    let err = g.evaluate(y, &HashMap::new()).unwrap_err();
    assert_eq!(
        err,
        StatGradError::UnboundVariable {
            var: x,
            name: "x".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::InvalidMode);
}

#[test]
fn test_evaluate_feed_shape_checked_against_hint() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[3]);
    let y = g.neg(x).unwrap();
    let mut feeds = HashMap::new();
    feeds.insert(x, create_test_array(vec![1.0, 2.0], vec![2]));
    assert!(matches!(
        g.evaluate(y, &feeds),
        Err(StatGradError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_evaluate_detects_cycle() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let y = g.new_variable("y");
    let node = g.add_node(Arc::new(AddOp), &[x, y]).unwrap();
    g.register_output(node, y).unwrap();
    let mut feeds = HashMap::new();
    feeds.insert(x, Array::scalar(1.0));
    assert_eq!(g.evaluate(y, &feeds), Err(StatGradError::CycleDetected));
}

#[test]
fn test_differentiate_node_without_output() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let node = g.add_node(Arc::new(NegOp), &[x]).unwrap();
    let grad = g.new_variable("g");
    assert!(matches!(
        g.differentiate_node(node, grad),
        Err(StatGradError::InternalError(_))
    ));
}
