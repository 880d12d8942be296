use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Defines the possible data types for Array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}

/// Scalar types an [`Array`](crate::Array) can hold.
///
/// Reductions and their gradients need real arithmetic (`sqrt`, division by
/// element counts), so only floating-point types qualify.
pub trait Element: Float + FromPrimitive + Debug + Default + Send + Sync + 'static {
    const DTYPE: DType;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}
