use crate::array::utils::{broadcast_shapes, broadcast_source_offset, index_to_coord};
use crate::array::Array;
use crate::error::StatGradError;
use crate::types::Element;

impl<T: Element> Array<T> {
    /// Expands the array to `target_shape` following broadcasting rules.
    pub fn broadcast_to(&self, target_shape: &[usize]) -> Result<Array<T>, StatGradError> {
        if self.shape() == target_shape {
            return Ok(self.clone());
        }
        let compatible = broadcast_shapes(self.shape(), target_shape)
            .map(|s| s == target_shape)
            .unwrap_or(false);
        if !compatible {
            return Err(StatGradError::BroadcastError {
                shape1: self.shape().to_vec(),
                shape2: target_shape.to_vec(),
            });
        }
        let numel: usize = target_shape.iter().product();
        let data = (0..numel)
            .map(|i| {
                let coord = index_to_coord(i, target_shape);
                self.data()[broadcast_source_offset(&coord, self.shape())]
            })
            .collect();
        Ok(Array::from_parts(data, target_shape.to_vec()))
    }

    /// Reduces the array to `target_shape` by summing along broadcast dimensions.
    ///
    /// This is the adjoint of [`Array::broadcast_to`]: it is how gradients flow back
    /// through an implicitly broadcast operand.
    pub fn sum_to_shape(&self, target_shape: &[usize]) -> Result<Array<T>, StatGradError> {
        if self.shape() == target_shape {
            return Ok(self.clone());
        }
        let compatible = broadcast_shapes(target_shape, self.shape())
            .map(|s| s == self.shape())
            .unwrap_or(false);
        if !compatible {
            return Err(StatGradError::BroadcastError {
                shape1: self.shape().to_vec(),
                shape2: target_shape.to_vec(),
            });
        }
        let out_numel: usize = target_shape.iter().product();
        let mut data = vec![T::zero(); out_numel];
        for (i, &value) in self.data().iter().enumerate() {
            let coord = index_to_coord(i, self.shape());
            let offset = broadcast_source_offset(&coord, target_shape);
            data[offset] = data[offset] + value;
        }
        Ok(Array::from_parts(data, target_shape.to_vec()))
    }
}
