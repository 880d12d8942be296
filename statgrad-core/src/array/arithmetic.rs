use crate::array::utils::{broadcast_shapes, broadcast_source_offset, index_to_coord};
use crate::array::Array;
use crate::error::StatGradError;
use crate::types::Element;

impl<T: Element> Array<T> {
    /// Applies a binary element-wise function with NumPy broadcasting.
    fn broadcast_binary<F>(&self, other: &Array<T>, f: F) -> Result<Array<T>, StatGradError>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape() == other.shape() {
            let data = self
                .data()
                .iter()
                .zip(other.data())
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Ok(Array::from_parts(data, self.shape().to_vec()));
        }

        let out_shape = broadcast_shapes(self.shape(), other.shape())?;
        let numel: usize = out_shape.iter().product();
        let a_data = self.data();
        let b_data = other.data();
        let data = (0..numel)
            .map(|i| {
                let coord = index_to_coord(i, &out_shape);
                let a = a_data[broadcast_source_offset(&coord, self.shape())];
                let b = b_data[broadcast_source_offset(&coord, other.shape())];
                f(a, b)
            })
            .collect();
        Ok(Array::from_parts(data, out_shape))
    }

    pub fn add(&self, other: &Array<T>) -> Result<Array<T>, StatGradError> {
        self.broadcast_binary(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Array<T>) -> Result<Array<T>, StatGradError> {
        self.broadcast_binary(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Array<T>) -> Result<Array<T>, StatGradError> {
        self.broadcast_binary(other, |a, b| a * b)
    }

    /// Element-wise division.
    ///
    /// # Errors
    /// `NumericDomain` if any divisor is zero; no infinities are produced.
    pub fn div(&self, other: &Array<T>) -> Result<Array<T>, StatGradError> {
        if other.data().iter().any(|x| x.is_zero()) {
            return Err(StatGradError::numeric_domain("div", "division by zero"));
        }
        self.broadcast_binary(other, |a, b| a / b)
    }

    pub fn neg(&self) -> Array<T> {
        self.map(|x| -x)
    }

    pub fn scale(&self, factor: T) -> Array<T> {
        self.map(|x| x * factor)
    }

    /// Element-wise square root.
    ///
    /// # Errors
    /// `NumericDomain` on negative input.
    pub fn sqrt(&self) -> Result<Array<T>, StatGradError> {
        if let Some(x) = self.data().iter().find(|x| **x < T::zero()) {
            return Err(StatGradError::numeric_domain(
                "sqrt",
                format!("cannot compute sqrt of negative number {:?}", x),
            ));
        }
        Ok(self.map(|x| x.sqrt()))
    }

    /// Element-wise `1 / (2 x)`, the derivative of `sqrt` expressed through its output.
    ///
    /// # Errors
    /// `NumericDomain` if any element is zero.
    pub fn half_reciprocal(&self) -> Result<Array<T>, StatGradError> {
        if self.data().iter().any(|x| x.is_zero()) {
            return Err(StatGradError::numeric_domain(
                "half_reciprocal",
                "1 / (2x) is undefined at x = 0",
            ));
        }
        let two = T::one() + T::one();
        Ok(self.map(|x| T::one() / (two * x)))
    }
}

#[cfg(test)]
#[path = "arithmetic_test.rs"]
mod tests;
