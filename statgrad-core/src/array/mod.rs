// src/array/mod.rs

use crate::error::StatGradError;
use crate::types::{DType, Element};
use std::sync::Arc;

mod arithmetic;
mod broadcast;
pub mod create;
pub mod utils;

use utils::calculate_strides;

/// Represents an immutable multi-dimensional array of floating-point values.
///
/// The flattened row-major buffer lives behind an `Arc`:
/// 1.  **Cheap clones:** operators borrow or clone arrays without copying data.
/// 2.  **Read-only sharing:** an `Array` is `Send + Sync` and can be handed to
///     several threads evaluating independent operators.
///
/// Every operation returns a new `Array`; none mutates its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    data: Arc<Vec<T>>,
    shape: Vec<usize>,
}

impl<T: Element> Array<T> {
    /// Creates a new Array from row-major data and a shape.
    ///
    /// # Errors
    /// Returns `StatGradError::ArrayCreationError` if the length of `data` does not match
    /// the number of elements described by `shape`.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, StatGradError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(StatGradError::ArrayCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Array {
            data: Arc::new(data),
            shape,
        })
    }

    /// Creates a rank-0 array holding a single value.
    pub fn scalar(value: T) -> Self {
        Array {
            data: Arc::new(vec![value]),
            shape: vec![],
        }
    }

    /// Returns the data type (`DType`) of the array elements.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements in the array.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn strides(&self) -> Vec<usize> {
        calculate_strides(&self.shape)
    }

    /// Row-major view of the elements.
    pub fn data(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.as_ref().clone()
    }

    /// Elements widened to `f64`, used by gradient checking and tests.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|x| x.to_f64().unwrap_or(f64::NAN))
            .collect()
    }

    /// Returns the element at the given coordinates.
    pub fn get(&self, index: &[usize]) -> Result<T, StatGradError> {
        if index.len() != self.rank() || index.iter().zip(&self.shape).any(|(&i, &d)| i >= d) {
            return Err(StatGradError::IndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape.clone(),
            });
        }
        let offset: usize = index
            .iter()
            .zip(self.strides().iter())
            .map(|(i, s)| i * s)
            .sum();
        Ok(self.data[offset])
    }

    /// Returns the single element of a one-element array (any rank).
    pub fn item(&self) -> Result<T, StatGradError> {
        if self.numel() != 1 {
            return Err(StatGradError::ShapeMismatch {
                expected: vec![],
                actual: self.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(self.data[0])
    }

    /// Returns an array with the same data and a new shape. The buffer is shared.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Self, StatGradError> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(StatGradError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: shape,
                operation: "reshape".to_string(),
            });
        }
        Ok(Array {
            data: Arc::clone(&self.data),
            shape,
        })
    }

    /// Applies `f` to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Array {
            data: Arc::new(self.data.iter().map(|&x| f(x)).collect()),
            shape: self.shape.clone(),
        }
    }

    /// Builds an array from data already known to match `shape`.
    pub(crate) fn from_parts(data: Vec<T>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Array {
            data: Arc::new(data),
            shape,
        }
    }
}

#[cfg(test)]
#[path = "array_test.rs"]
mod tests;
