//! Neural network implementation for eater brains.
//!
//! A brain is a fully connected feed-forward network rebuilt from a genome's flat
//! weight vector. The flat layout is fixed: for each consecutive layer pair, in
//! order from the input side, the row-major weight matrix (`next × prev`) followed
//! by the `next` biases.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

pub mod mlp;

pub use mlp::Mlp;

use super::error::{Error, Result};

/// Activation applied after every layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Raw weighted sums, no nonlinearity.
    #[default]
    Identity,
    /// Hyperbolic tangent.
    Tanh,
}

/// Number of scalar parameters (weights plus biases) for a topology.
///
/// For layer sizes `[n0, n1, ..., nk]` this is the sum of `ni * ni+1 + ni+1`
/// over consecutive pairs.
pub fn weights_count(layer_sizes: &[usize]) -> usize {
    layer_sizes
        .windows(2)
        .map(|pair| Mlp::param_count(pair[0], pair[1]))
        .sum()
}

/// Checks that a topology has an input, at least one hidden and an output layer,
/// none of them empty.
pub fn validate_topology(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 3 {
        return Err(Error::NoHiddenLayers);
    }
    if let Some(index) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(Error::ZeroLayerSize { index });
    }
    Ok(())
}

/// A multi-layer perceptron neural network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
    /// Activation used between and after layers.
    pub activation: Activation,
}

impl Brain {
    /// Rebuilds a network from a flat weight vector.
    ///
    /// Fails with [`Error::DimensionMismatch`] unless `flat_weights` holds exactly
    /// [`weights_count`] values; nothing is truncated or padded.
    pub fn from_weights(
        layer_sizes: &[usize],
        flat_weights: &[f32],
        activation: Activation,
    ) -> Result<Self> {
        validate_topology(layer_sizes)?;

        let expected = weights_count(layer_sizes);
        if flat_weights.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: flat_weights.len(),
            });
        }

        let mut layers = Vec::with_capacity(layer_sizes.len() - 1);
        let mut offset = 0;
        for pair in layer_sizes.windows(2) {
            let count = Mlp::param_count(pair[0], pair[1]);
            layers.push(Mlp::from_flat(
                pair[0],
                pair[1],
                &flat_weights[offset..offset + count],
            )?);
            offset += count;
        }

        Ok(Self { layers, activation })
    }

    /// Size of the input layer.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Mlp::input_size)
    }

    /// Size of the output layer.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Mlp::output_size)
    }

    /// Layer sizes from input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![self.input_size()];
        sizes.extend(self.layers.iter().map(Mlp::output_size));
        sizes
    }

    /// Runs a forward pass through all layers.
    ///
    /// `inputs` must already have the input layer's length.
    #[inline]
    pub fn think(&self, inputs: ArrayView1<f32>) -> Array1<f32> {
        let mut layers = self.layers.iter();
        let Some(first) = layers.next() else {
            return inputs.to_owned();
        };

        let mut output = first.forward(inputs, self.activation);
        for layer in layers {
            output = layer.forward(output.view(), self.activation);
        }
        output
    }

    /// Checked forward pass over a plain slice.
    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        if inputs.len() != self.input_size() {
            return Err(Error::InputMismatch {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }
        Ok(self.think(ArrayView1::from(inputs)).to_vec())
    }

    /// Flattens all weights and biases into a single vector, in load order.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(weights_count(&self.layer_sizes()));
        for layer in &self.layers {
            layer.flatten_into(&mut flat);
        }
        flat
    }

    /// Turns the network into a standalone callable.
    pub fn into_fn(self) -> impl Fn(&[f32]) -> Result<Vec<f32>> {
        move |inputs| self.evaluate(inputs)
    }
}
