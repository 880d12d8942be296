use super::graph::build_topo;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::types::Element;
use log::{debug, trace, warn};
use std::collections::HashMap;

impl<T: Element> Graph<T> {
    /// Reverse-mode differentiation of `target` with respect to `wrt`.
    ///
    /// The gradient sub-graph is appended to this graph and one variable per
    /// `wrt` entry is returned. Nothing is evaluated.
    ///
    /// * `seed` is dL/d`target`; `None` means ones shaped like `target`.
    /// * Each node `target` depends on is differentiated exactly once, with the
    ///   sum (as `add` nodes) of the gradients flowing from all its consumers.
    /// * A `wrt` variable with no path to `target` gets `zeros_like`.
    ///
    /// # Errors
    /// `UnresolvedVariable` if no node produces `target`, `CycleDetected` for
    /// cyclic dependencies, and any error from a backward rule.
    pub fn gradients(
        &mut self,
        target: VarId,
        seed: Option<VarId>,
        wrt: &[VarId],
    ) -> Result<Vec<VarId>, StatGradError> {
        self.producer(target)?;
        let order = build_topo(self, target)?;
        debug!(
            "gradients of {} w.r.t. {:?}: {} nodes to differentiate",
            target,
            wrt,
            order.len()
        );

        let seed = match seed {
            Some(seed) => {
                self.variable(seed)?;
                seed
            }
            None => self.ones_like(target)?,
        };

        let mut grads: HashMap<VarId, VarId> = HashMap::new();
        grads.insert(target, seed);

        for &node in order.iter().rev() {
            let output = match self.node(node)?.output() {
                Some(output) => output,
                None => continue,
            };
            let grad_output = match grads.get(&output) {
                Some(&g) => g,
                None => {
                    trace!("no gradient reaches {} ({}), skipping", output, node);
                    continue;
                }
            };
            let inputs = self.node(node)?.inputs().to_vec();
            let input_grads = self.differentiate_node(node, grad_output)?;
            for (input, grad) in inputs.into_iter().zip(input_grads) {
                let Some(grad) = grad else {
                    continue;
                };
                let accumulated = match grads.get(&input) {
                    Some(&existing) => {
                        trace!("accumulating gradient of {}", input);
                        self.add(existing, grad)?
                    }
                    None => grad,
                };
                grads.insert(input, accumulated);
            }
        }

        wrt.iter()
            .map(|&w| match grads.get(&w) {
                Some(&g) => Ok(g),
                None => {
                    warn!(
                        "{} is not reachable from {}; its gradient is zero",
                        w, target
                    );
                    self.zeros_like(w)
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
