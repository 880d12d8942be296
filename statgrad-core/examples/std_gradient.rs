//! Standard deviation in both modes: eager evaluation, then a symbolic graph
//! whose gradient is built, evaluated and checked against finite differences.
//!
//! Run with `RUST_LOG=debug` to see graph construction and traversal.

use statgrad_core::autograd::check_grad;
use statgrad_core::{Array, Graph, ReduceParams, StatGradError, StdOp, VarianceParams};
use std::collections::HashMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = Array::new(vec![1.0, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0], vec![2, 4])?;
    let params = VarianceParams::new(ReduceParams::along(&[1]), true);

    // --- Eager ---
    let std = StdOp::eager(data.clone(), params.clone()).forward()?;
    println!("eager std per row: {:?} (shape {:?})", std.data(), std.shape());

    // --- Symbolic ---
    let mut graph = Graph::<f64>::new();
    let x = graph.new_variable_with_shape("x", &[2, 4]);
    let node = StdOp::symbolic(&mut graph, x, params)?;
    let out = node.output().ok_or_else(|| {
        StatGradError::InternalError("symbolic node without output".to_string())
    })?;
    let upstream = graph.constant("upstream", Array::ones(&[2]));
    let grads = node.differentiate(&mut graph, upstream)?;
    println!(
        "graph {} holds {} nodes after differentiation",
        graph.id(),
        graph.num_nodes()
    );

    let mut feeds = HashMap::new();
    feeds.insert(x, data);
    let dx = graph.evaluate(grads[0], &feeds)?;
    println!("d std / dx: {:?}", dx.data());

    check_grad(&mut graph, out, &[x], &feeds, &Array::ones(&[2]), 1e-6, 1e-6)?;
    println!("finite-difference check passed");
    Ok(())
}
