//! Minimal reference interpreter for graphs.
//!
//! Values come from constants and from `feeds` (arrays supplied for
//! placeholder variables); every other variable is computed from its producer.
//! Each variable is computed at most once per call. There is no scheduling,
//! fusion or memory planning.

use super::{Graph, VarId};
use crate::array::Array;
use crate::error::StatGradError;
use crate::types::Element;
use log::debug;
use std::collections::{HashMap, HashSet};

impl<T: Element> Graph<T> {
    /// Computes the value of `var`.
    ///
    /// # Errors
    /// * `UnboundVariable` if a placeholder reached by the computation is not fed.
    /// * `ShapeMismatch` if a feed contradicts the variable's shape hint.
    /// * `CycleDetected` if `var` depends on itself.
    /// * Any error raised by an operator kernel.
    pub fn evaluate(
        &self,
        var: VarId,
        feeds: &HashMap<VarId, Array<T>>,
    ) -> Result<Array<T>, StatGradError> {
        let mut cache = HashMap::new();
        self.evaluate_cached(var, feeds, &mut cache)
    }

    /// Computes several variables, sharing intermediate results.
    pub fn evaluate_many(
        &self,
        vars: &[VarId],
        feeds: &HashMap<VarId, Array<T>>,
    ) -> Result<Vec<Array<T>>, StatGradError> {
        let mut cache = HashMap::new();
        vars.iter()
            .map(|&var| self.evaluate_cached(var, feeds, &mut cache))
            .collect()
    }

    fn leaf_value(
        &self,
        var: VarId,
        feeds: &HashMap<VarId, Array<T>>,
    ) -> Result<Option<Array<T>>, StatGradError> {
        let variable = self.variable(var)?;
        if let Some(fed) = feeds.get(&var) {
            if let Some(hint) = variable.shape_hint() {
                if hint != fed.shape() {
                    return Err(StatGradError::ShapeMismatch {
                        expected: hint.to_vec(),
                        actual: fed.shape().to_vec(),
                        operation: format!("feed for {} ('{}')", var, variable.name()),
                    });
                }
            }
            return Ok(Some(fed.clone()));
        }
        if let Some(value) = variable.value() {
            return Ok(Some(value.clone()));
        }
        if variable.producer().is_none() {
            return Err(StatGradError::UnboundVariable {
                var,
                name: variable.name().to_string(),
            });
        }
        Ok(None)
    }

    fn evaluate_cached(
        &self,
        target: VarId,
        feeds: &HashMap<VarId, Array<T>>,
        cache: &mut HashMap<VarId, Array<T>>,
    ) -> Result<Array<T>, StatGradError> {
        let mut stack = vec![(target, false)];
        let mut visiting = HashSet::new();
        let mut computed = 0usize;

        while let Some((var, expanded)) = stack.pop() {
            if cache.contains_key(&var) {
                continue;
            }
            let node_id = if expanded {
                self.producer(var)?
            } else {
                if let Some(value) = self.leaf_value(var, feeds)? {
                    cache.insert(var, value);
                    continue;
                }
                if !visiting.insert(var) {
                    return Err(StatGradError::CycleDetected);
                }
                let node = self.node(self.producer(var)?)?;
                stack.push((var, true));
                for &input in node.inputs().iter().rev() {
                    if !cache.contains_key(&input) {
                        stack.push((input, false));
                    }
                }
                continue;
            };

            let node = self.node(node_id)?;
            let value = {
                let args = node
                    .inputs()
                    .iter()
                    .map(|input| {
                        cache.get(input).ok_or_else(|| {
                            StatGradError::InternalError(format!(
                                "input {} of {} evaluated out of order",
                                input, node_id
                            ))
                        })
                    })
                    .collect::<Result<Vec<&Array<T>>, StatGradError>>()?;
                node.op().compute(&args)?
            };
            visiting.remove(&var);
            cache.insert(var, value);
            computed += 1;
        }

        debug!(
            "evaluated {} in graph {} ({} nodes computed)",
            target, self.id, computed
        );
        cache.get(&target).cloned().ok_or_else(|| {
            StatGradError::InternalError(format!("{} missing after evaluation", target))
        })
    }
}
