use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::types::Element;
use std::fmt::Debug;

/// A kernel that can run eagerly on arrays and differentiate itself symbolically.
///
/// Implementors hold only their construction parameters. They never own inputs:
/// eager inputs live in an [`OperatorNode`](crate::ops::node::OperatorNode), symbolic
/// inputs are variables of a [`Graph`].
///
/// The `Debug + Send + Sync` bounds let a kernel be shared behind an `Arc` by every
/// graph node that applies it.
pub trait Operator<T: Element>: Debug + Send + Sync {
    /// Stable identity of the kernel.
    fn identity(&self) -> OpIdentity;

    /// Number of inputs the kernel consumes.
    fn arity(&self) -> usize {
        1
    }

    /// Computes the output for concrete inputs.
    ///
    /// `inputs.len()` equals [`Operator::arity`]; callers check this before calling.
    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError>;

    /// Predicts the output shape from the (possibly unknown) input shapes.
    ///
    /// Returns `None` when the shape cannot be determined statically. This never
    /// fails: invalid axes simply yield no hint, the evaluation will report them.
    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        let _ = input_shapes;
        None
    }

    /// Appends the gradient sub-graph of this kernel to `graph`.
    ///
    /// Given the variables of the node's `inputs`, its `output` and the upstream
    /// gradient `grad_output` (same shape as `output`), returns one entry per input:
    /// the variable holding dL/dInput_i, or `None` for inputs that do not carry a
    /// gradient (shape references, for instance).
    ///
    /// Implementations only add nodes; they never evaluate anything.
    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError>;
}

/// Fails with `ArityMismatch` unless `actual` inputs match what `op` consumes.
pub(crate) fn check_arity<T: Element>(
    op: &dyn Operator<T>,
    actual: usize,
) -> Result<(), StatGradError> {
    if op.arity() != actual {
        return Err(StatGradError::ArityMismatch {
            operation: op.identity().name().to_string(),
            expected: op.arity(),
            actual,
        });
    }
    Ok(())
}

/// Fetches the single input of a unary kernel.
pub(crate) fn unary_input<'a, T: Element>(
    name: &str,
    inputs: &[&'a Array<T>],
) -> Result<&'a Array<T>, StatGradError> {
    match inputs {
        [x] => Ok(x),
        _ => Err(StatGradError::ArityMismatch {
            operation: name.to_string(),
            expected: 1,
            actual: inputs.len(),
        }),
    }
}

/// Fetches both inputs of a binary kernel.
pub(crate) fn binary_inputs<'a, T: Element>(
    name: &str,
    inputs: &[&'a Array<T>],
) -> Result<(&'a Array<T>, &'a Array<T>), StatGradError> {
    match inputs {
        [a, b] => Ok((a, b)),
        _ => Err(StatGradError::ArityMismatch {
            operation: name.to_string(),
            expected: 2,
            actual: inputs.len(),
        }),
    }
}

/// Same as [`unary_input`] / [`binary_inputs`] but for variable ids in `backward`.
pub(crate) fn input_vars<const N: usize>(
    name: &str,
    inputs: &[VarId],
) -> Result<[VarId; N], StatGradError> {
    <[VarId; N]>::try_from(inputs).map_err(|_| StatGradError::ArityMismatch {
        operation: name.to_string(),
        expected: N,
        actual: inputs.len(),
    })
}
