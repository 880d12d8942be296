// src/array/create.rs

use crate::array::Array;
use crate::error::StatGradError;
use crate::types::Element;
use rand::Rng;
use rand_distr::StandardNormal;

fn from_f64<T: Element>(value: f64) -> Result<T, StatGradError> {
    T::from_f64(value).ok_or_else(|| {
        StatGradError::InternalError(format!("Cannot represent {} in the element type", value))
    })
}

impl<T: Element> Array<T> {
    /// Creates a new array filled with zeros with the specified shape.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    /// Creates a new array filled with ones with the specified shape.
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }

    /// Creates a new array filled with a specific value with the specified shape.
    pub fn full(shape: &[usize], value: T) -> Self {
        let numel = shape.iter().product();
        Array::from_parts(vec![value; numel], shape.to_vec())
    }

    pub fn zeros_like(other: &Array<T>) -> Self {
        Self::zeros(other.shape())
    }

    pub fn ones_like(other: &Array<T>) -> Self {
        Self::ones(other.shape())
    }

    /// Uniform samples in `[0, 1)` drawn from the thread-local generator.
    pub fn rand(shape: &[usize]) -> Result<Self, StatGradError> {
        let mut rng = rand::thread_rng();
        Self::rand_with(shape, 0.0, 1.0, &mut rng)
    }

    /// Uniform samples in `[low, high)` drawn from `rng`.
    ///
    /// # Errors
    /// `NumericDomain` unless `low < high` with a finite width.
    pub fn rand_with<R: Rng>(
        shape: &[usize],
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Result<Self, StatGradError> {
        if !(low < high && (high - low).is_finite()) {
            return Err(StatGradError::numeric_domain(
                "rand_with",
                format!("empty or unbounded sampling range [{}, {})", low, high),
            ));
        }
        let numel: usize = shape.iter().product();
        let data = (0..numel)
            .map(|_| from_f64::<T>(rng.gen_range(low..high)))
            .collect::<Result<Vec<T>, _>>()?;
        Array::new(data, shape.to_vec())
    }

    /// Standard-normal samples drawn from the thread-local generator.
    pub fn randn(shape: &[usize]) -> Result<Self, StatGradError> {
        let mut rng = rand::thread_rng();
        Self::randn_with(shape, &mut rng)
    }

    pub fn randn_with<R: Rng>(shape: &[usize], rng: &mut R) -> Result<Self, StatGradError> {
        let numel: usize = shape.iter().product();
        let data = (0..numel)
            .map(|_| from_f64::<T>(rng.sample::<f64, _>(StandardNormal)))
            .collect::<Result<Vec<T>, _>>()?;
        Array::new(data, shape.to_vec())
    }
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
