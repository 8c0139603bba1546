//! Multi-layer perceptron implementation.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::Activation;
use crate::simulation::error::{Error, Result};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Number of scalar parameters in a dense layer, weights plus one bias per output.
    #[inline]
    pub const fn param_count(input_size: usize, output_size: usize) -> usize {
        input_size * output_size + output_size
    }

    /// Builds a layer from a flat slice: row-major weights first, then biases.
    ///
    /// The slice must hold exactly [`Mlp::param_count`] values.
    pub fn from_flat(input_size: usize, output_size: usize, params: &[f32]) -> Result<Self> {
        let expected = Self::param_count(input_size, output_size);
        if params.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: params.len(),
            });
        }
        let (weights, biases) = params.split_at(input_size * output_size);
        Ok(Self {
            weights: Array2::from_shape_vec((output_size, input_size), weights.to_vec())?,
            biases: Array1::from_vec(biases.to_vec()),
        })
    }

    /// Input width of this layer.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Output width of this layer.
    pub fn output_size(&self) -> usize {
        self.biases.len()
    }

    /// Performs forward pass with the given activation.
    #[inline]
    pub fn forward(&self, inputs: ArrayView1<f32>, activation: Activation) -> Array1<f32> {
        let mut output = self.weights.dot(&inputs);
        output += &self.biases;

        if activation == Activation::Tanh {
            output.mapv_inplace(f32::tanh);
        }
        output
    }

    /// Appends weights (row-major) then biases to `flat`.
    pub fn flatten_into(&self, flat: &mut Vec<f32>) {
        flat.extend(self.weights.iter().copied());
        flat.extend(self.biases.iter().copied());
    }
}
