use super::*;
use crate::error::ErrorKind;
use crate::ops::reduction::{reduction_operator, ReduceParams};
use crate::utils::testing::{check_array_near, create_test_array};
use std::collections::HashMap;

fn one_to_four() -> Array<f64> {
    create_test_array(vec![1.0, 2.0, 3.0, 4.0], vec![4])
}

#[test]
fn test_eager_forward() {
    let biased = VarianceParams::new(ReduceParams::all(), false);
    let var = VarianceOp::eager(one_to_four(), biased.clone());
    let std = StdOp::eager(one_to_four(), biased);
    assert_eq!(var.kind(), ExecKind::Eager);
    assert_eq!(var.op_identity(), OpIdentity::VARIANCE);
    assert_eq!(std.op_identity(), OpIdentity::STD);
    assert_eq!(var.output(), None);
    check_array_near(&var.forward().unwrap(), &[], &[1.25], 1e-12);
    check_array_near(&std.forward().unwrap(), &[], &[1.1180339887], 1e-9);
}

#[test]
fn test_eager_keep_dims() {
    let x = create_test_array(vec![1.0, 2.0, 3.0, 4.0, 6.0, 8.0], vec![2, 3]);
    let kept = VarianceParams::new(ReduceParams::along(&[1]).keep_dims(true), true);
    let dropped = VarianceParams::new(ReduceParams::along(&[1]), true);
    assert_eq!(StdOp::eager(x.clone(), kept).forward().unwrap().shape(), &[2, 1]);
    assert_eq!(StdOp::eager(x, dropped).forward().unwrap().shape(), &[2]);
}

#[test]
fn test_eager_construction_defers_axis_errors() {
    let params = VarianceParams::new(ReduceParams::along(&[3]), true);
    let node = VarianceOp::eager(one_to_four(), params);
    let err = node.forward().unwrap_err();
    assert!(matches!(err, StatGradError::InvalidAxis { axis: 3, rank: 1 }));
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_eager_arity_checked_at_forward() {
    let node = OperatorNode::eager(
        Arc::new(VarianceOp::default()),
        vec![one_to_four(), one_to_four()],
    );
    assert!(matches!(
        node.forward(),
        Err(StatGradError::ArityMismatch { expected: 1, actual: 2, .. })
    ));
}

#[test]
fn test_eager_differentiate_is_invalid_mode() {
    let mut g = Graph::<f64>::new();
    let upstream = g.new_variable("g");
    let node = StdOp::eager(one_to_four(), VarianceParams::default());
    match node.differentiate(&mut g, upstream) {
        Err(StatGradError::InvalidMode { mode, .. }) => assert_eq!(mode, ExecKind::Eager),
        other => panic!("Expected InvalidMode, got {:?}", other),
    }
}

#[test]
fn test_symbolic_forward_is_invalid_mode() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let node = VarianceOp::symbolic(&mut g, x, VarianceParams::default()).unwrap();
    assert_eq!(node.kind(), ExecKind::Symbolic);
    let err = node.forward().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMode);
    assert!(matches!(
        err,
        StatGradError::InvalidMode {
            mode: ExecKind::Symbolic,
            ..
        }
    ));
}

#[test]
fn test_symbolic_registers_output() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2, 5]);
    let params = VarianceParams::new(ReduceParams::along(&[1]).keep_dims(true), true);
    let node = StdOp::symbolic(&mut g, x, params).unwrap();
    let out = node.output().unwrap();
    assert_eq!(g.shape_hint(out), Some(&[2usize, 1][..]));
    match node.mode() {
        ExecMode::Symbolic { node: id, inputs, .. } => {
            assert_eq!(g.producer(out).unwrap(), *id);
            assert_eq!(inputs, &vec![x]);
        }
        other => panic!("Expected symbolic mode, got {:?}", other),
    }
}

#[test]
fn test_symbolic_differentiate_returns_one_gradient_per_input() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[4]);
    let node = VarianceOp::symbolic(&mut g, x, VarianceParams::default()).unwrap();
    let upstream = g.constant("up", Array::scalar(1.0));
    let grads = node.differentiate(&mut g, upstream).unwrap();
    assert_eq!(grads.len(), 1);

    let mut feeds = HashMap::new();
    feeds.insert(x, one_to_four());
    check_array_near(
        &g.evaluate(grads[0], &feeds).unwrap(),
        &[4],
        &[-1.0, -1.0 / 3.0, 1.0 / 3.0, 1.0],
        1e-12,
    );
}

#[test]
fn test_differentiate_in_foreign_graph() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let node = VarianceOp::symbolic(&mut g, x, VarianceParams::default()).unwrap();
    let mut other = Graph::<f64>::new();
    let upstream = other.new_variable("g");
    assert!(matches!(
        node.differentiate(&mut other, upstream),
        Err(StatGradError::InvalidMode { .. })
    ));
}

#[test]
fn test_non_differentiable_inputs_get_zeros() {
    let mut g = Graph::<f64>::new();
    let a = g.new_variable("a");
    let like = g.new_variable("like");
    let node = OperatorNode::symbolic(
        &mut g,
        Arc::new(crate::ops::view::BroadcastLikeOp),
        &[a, like],
    )
    .unwrap();
    let upstream = g.new_variable("up");
    let grads = node.differentiate(&mut g, upstream).unwrap();

    let mut feeds = HashMap::new();
    feeds.insert(a, Array::scalar(1.0));
    feeds.insert(like, Array::zeros(&[2]));
    feeds.insert(upstream, create_test_array(vec![3.0, 4.0], vec![2]));
    let values = g.evaluate_many(&grads, &feeds).unwrap();
    check_array_near(&values[0], &[], &[7.0], 1e-12);
    check_array_near(&values[1], &[2], &[0.0, 0.0], 0.0);
}

#[test]
fn test_nodes_built_from_registry_identity() {
    let params = VarianceParams::new(ReduceParams::all(), false);
    for name in ["sum", "mean", "var", "std"] {
        let id = OpIdentity::from_name(name).unwrap();
        let op = reduction_operator::<f64>(id, params.clone()).unwrap();
        let node = OperatorNode::eager(op, vec![one_to_four()]);
        assert_eq!(node.op_identity(), id);
        let expected = match name {
            "sum" => 10.0,
            "mean" => 2.5,
            "var" => 1.25,
            _ => 1.25f64.sqrt(),
        };
        check_array_near(&node.forward().unwrap(), &[], &[expected], 1e-12);
    }
    assert!(matches!(
        reduction_operator::<f64>(OpIdentity::ADD, params),
        Err(StatGradError::UnknownOperator(_))
    ));
}
