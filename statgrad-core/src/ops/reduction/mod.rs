//! Reduction operators: sum, mean, variance and standard deviation.
//!
//! Every reduction is parameterized by a [`ReduceParams`] axis set; the variance
//! family adds the bias-correction flag through [`VarianceParams`].

mod mean;
pub mod moments;
mod params;
mod std_dev;
mod sum;
pub(crate) mod utils;
mod variance;

pub use mean::{mean_axes, MeanOp};
pub use params::{ReduceParams, VarianceParams};
pub use std_dev::StdOp;
pub use sum::{sum_axes, SumOp};
pub use variance::VarianceOp;

use crate::error::StatGradError;
use crate::ops::identity::OpIdentity;
use crate::ops::operator::Operator;
use crate::types::Element;
use std::sync::Arc;

/// Builds the reduction kernel registered under `identity`.
///
/// Accumulations only read the axis part of `params`.
///
/// # Errors
/// `UnknownOperator` if `identity` does not name a reduction.
pub fn reduction_operator<T: Element>(
    identity: OpIdentity,
    params: VarianceParams,
) -> Result<Arc<dyn Operator<T>>, StatGradError> {
    let op: Arc<dyn Operator<T>> = match identity {
        OpIdentity::SUM => Arc::new(SumOp::new(params.reduce().clone())),
        OpIdentity::MEAN => Arc::new(MeanOp::new(params.reduce().clone())),
        OpIdentity::VARIANCE => Arc::new(VarianceOp::new(params)),
        OpIdentity::STD => Arc::new(StdOp::new(params)),
        other => {
            return Err(StatGradError::UnknownOperator(format!(
                "{} is not a reduction",
                other
            )))
        }
    };
    Ok(op)
}
