use crate::error::StatGradError;
use crate::graph::{Graph, NodeId, VarId};
use crate::types::Element;
use log::trace;
use std::collections::HashSet;

/// Builds a topological order of the nodes `target` depends on.
///
/// Every node appears after the producers of all its inputs, so walking the
/// list backwards visits each node after all of its consumers. Leaves
/// (placeholders and constants) contribute no node.
///
/// # Errors
/// `CycleDetected` if a variable depends on itself.
pub(crate) fn build_topo<T: Element>(
    graph: &Graph<T>,
    target: VarId,
) -> Result<Vec<NodeId>, StatGradError> {
    let mut sorted = Vec::new();
    let mut visited: HashSet<VarId> = HashSet::new();
    let mut on_path: HashSet<VarId> = HashSet::new();
    let mut stack = vec![(target, false)];

    while let Some((var, expanded)) = stack.pop() {
        let producer = graph.variable(var)?.producer();
        if expanded {
            on_path.remove(&var);
            if let Some(node) = producer {
                trace!("build_topo: {} <- {}", node, var);
                sorted.push(node);
            }
            continue;
        }
        if visited.contains(&var) {
            if on_path.contains(&var) {
                return Err(StatGradError::CycleDetected);
            }
            continue;
        }
        visited.insert(var);

        let Some(node) = producer else {
            continue;
        };
        on_path.insert(var);
        stack.push((var, true));
        for &input in graph.node(node)?.inputs().iter().rev() {
            if on_path.contains(&input) {
                return Err(StatGradError::CycleDetected);
            }
            if !visited.contains(&input) {
                stack.push((input, false));
            }
        }
    }
    Ok(sorted)
}
