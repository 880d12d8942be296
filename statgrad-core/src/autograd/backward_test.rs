use super::*;
use crate::array::Array;
use crate::error::ErrorKind;
use crate::ops::reduction::moments::{std_backward, variance_backward};
use crate::ops::reduction::{ReduceParams, VarianceParams};
use crate::utils::testing::{check_array_near, create_test_array};
use std::collections::HashMap;

fn sample() -> Array<f64> {
    create_test_array(vec![0.5, -1.0, 2.0, 3.5, 1.0, 0.0], vec![2, 3])
}

#[test]
fn test_shared_consumers_accumulate() {
    let params = VarianceParams::new(ReduceParams::along(&[0]), true);
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2, 3]);
    let s = g.std(x, params.clone()).unwrap();
    let v = g.variance(x, params.clone()).unwrap();
    let total = g.add(s, v).unwrap();
    let dx = g.gradients(total, None, &[x]).unwrap()[0];

    let mut feeds = HashMap::new();
    feeds.insert(x, sample());
    let ones = Array::ones(&[3]);
    let expected = std_backward(&sample(), &ones, &params)
        .unwrap()
        .add(&variance_backward(&sample(), &ones, &params).unwrap())
        .unwrap();
    check_array_near(
        &g.evaluate(dx, &feeds).unwrap(),
        &[2, 3],
        &expected.to_f64_vec(),
        1e-12,
    );
}

#[test]
fn test_variable_used_twice_by_one_node() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2]);
    let sq = g.mul(x, x).unwrap();
    let dx = g.gradients(sq, None, &[x]).unwrap()[0];
    let mut feeds = HashMap::new();
    feeds.insert(x, create_test_array(vec![3.0, -1.5], vec![2]));
    check_array_near(&g.evaluate(dx, &feeds).unwrap(), &[2], &[6.0, -3.0], 1e-12);
}

#[test]
fn test_gradient_of_chain_of_reductions() {
    // std over rows of the per-column variances
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2, 3]);
    let v = g
        .variance(x, VarianceParams::new(ReduceParams::along(&[0]), false))
        .unwrap();
    let s = g.std(v, VarianceParams::default()).unwrap();
    let dx = g.gradients(s, None, &[x]).unwrap()[0];

    let mut feeds = HashMap::new();
    feeds.insert(x, sample());
    let v_val = g.evaluate(v, &feeds).unwrap();
    let ds_dv = std_backward(&v_val, &Array::scalar(1.0), &VarianceParams::default()).unwrap();
    let expected = variance_backward(
        &sample(),
        &ds_dv,
        &VarianceParams::new(ReduceParams::along(&[0]), false),
    )
    .unwrap();
    check_array_near(
        &g.evaluate(dx, &feeds).unwrap(),
        &[2, 3],
        &expected.to_f64_vec(),
        1e-12,
    );
}

#[test]
fn test_seed_defaults_to_ones() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[3]);
    let y = g.scale(x, 4.0).unwrap();
    let dx = g.gradients(y, None, &[x]).unwrap()[0];
    let mut feeds = HashMap::new();
    feeds.insert(x, create_test_array(vec![1.0, 2.0, 3.0], vec![3]));
    check_array_near(&g.evaluate(dx, &feeds).unwrap(), &[3], &[4.0; 3], 1e-12);
}

#[test]
fn test_unreachable_wrt_gets_zeros() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2]);
    let unrelated = g.new_variable_with_shape("u", &[3]);
    let y = g.neg(x).unwrap();
    let grads = g.gradients(y, None, &[x, unrelated]).unwrap();
    let mut feeds = HashMap::new();
    feeds.insert(x, create_test_array(vec![1.0, 2.0], vec![2]));
    feeds.insert(unrelated, create_test_array(vec![1.0, 2.0, 3.0], vec![3]));
    let values = g.evaluate_many(&grads, &feeds).unwrap();
    check_array_near(&values[0], &[2], &[-1.0, -1.0], 1e-12);
    check_array_near(&values[1], &[3], &[0.0; 3], 0.0);
}

#[test]
fn test_target_must_be_produced() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable("x");
    let err = g.gradients(x, None, &[x]).unwrap_err();
    assert_eq!(err, StatGradError::UnresolvedVariable { var: x });
    assert_eq!(err.kind(), ErrorKind::UnresolvedVariable);
}

#[test]
fn test_each_node_differentiated_once() {
    // y = a + a + a built as a chain; the shared input must not multiply the
    // number of backward nodes
    let mut g = Graph::<f64>::new();
    let a = g.new_variable_with_shape("a", &[]);
    let b = g.add(a, a).unwrap();
    let c = g.add(b, a).unwrap();
    let before = g.num_nodes();
    let da = g.gradients(c, None, &[a]).unwrap()[0];
    // ones_like seed plus two accumulations into `a`
    assert_eq!(g.num_nodes() - before, 3);
    let mut feeds = HashMap::new();
    feeds.insert(a, Array::scalar(2.0));
    check_array_near(&g.evaluate(da, &feeds).unwrap(), &[], &[3.0], 1e-12);
}
