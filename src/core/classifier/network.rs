// src/core/classifier/network.rs
//
// Forward inference for a sigmoid multi-layer perceptron.

use super::weights::WeightSet;
use crate::core::analysis::DetectionWindow;
use crate::error::{Result, WhistlerError};

/// Label reported for windows without a whistler
pub const NO_WHISTLER: usize = 0;

/// Logistic function, evaluated without overflow for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Activations recorded during one forward pass
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// Input to each layer with the bias unit `1.0` at index 0
    pub layer_inputs: Vec<Vec<f64>>,
    /// Output layer activations, no bias unit
    pub output: Vec<f64>,
}

impl ForwardPass {
    /// Zero-based index of the strongest output unit; the first one wins ties
    pub fn label(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.output.iter().enumerate() {
            if v > self.output[best] {
                best = i;
            }
        }
        best
    }
}

/// Fixed-weight whistler classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    weights: WeightSet,
}

impl Classifier {
    pub fn new(weights: WeightSet) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    /// Length of the flattened image the first layer expects
    pub fn input_len(&self) -> usize {
        self.weights.input_len()
    }

    /// Class of a detection window. 0 means no whistler, anything else is a
    /// whistler sub-class.
    pub fn predict(&self, window: &DetectionWindow) -> Result<usize> {
        let input = window.flatten_column_major();
        Ok(self.forward(&input)?.label())
    }

    pub fn forward(&self, input: &[f64]) -> Result<ForwardPass> {
        if input.len() != self.input_len() {
            return Err(WhistlerError::InputShape {
                expected: self.input_len(),
                got: input.len(),
            });
        }

        let layers = self.weights.layers();
        let mut layer_inputs = Vec::with_capacity(layers.len());
        let mut activation = input.to_vec();

        for layer in layers {
            let augmented = with_bias(&activation);
            activation = layer
                .weights()
                .iter()
                .map(|row| sigmoid(dot(row, &augmented)))
                .collect();
            layer_inputs.push(augmented);
        }

        Ok(ForwardPass {
            layer_inputs,
            output: activation,
        })
    }
}

fn with_bias(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(1.0);
    out.extend_from_slice(values);
    out
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
