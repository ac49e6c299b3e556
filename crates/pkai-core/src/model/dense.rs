use super::predictor::{PredictionError, Predictor};
use crate::engine::encoder::EncodedInput;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DenseNetworkError {
    #[error("A network needs at least one layer")]
    NoLayers,
    #[error("Layer {layer} has {weights_rows} weight rows but {bias_len} bias values")]
    BiasLength {
        layer: usize,
        weights_rows: usize,
        bias_len: usize,
    },
    #[error("Layer {layer} expects {expected} inputs but the previous layer produces {found}")]
    LayerShape {
        layer: usize,
        expected: usize,
        found: usize,
    },
    #[error("The output layer must produce a single value, not {0}")]
    OutputWidth(usize),
}

/// One affine layer: `y = W x + b`, with `W` of shape (outputs, inputs).
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    pub weights: DMatrix<f32>,
    pub bias: DVector<f32>,
}

impl DenseLayer {
    pub fn new(weights: DMatrix<f32>, bias: DVector<f32>) -> Self {
        Self { weights, bias }
    }

    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    pub fn outputs(&self) -> usize {
        self.weights.nrows()
    }
}

/// A feed-forward regressor with ReLU after every layer but the last.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Builds a network, checking that consecutive layers chain and that the
    /// last layer has a single output.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, DenseNetworkError> {
        let Some(last) = layers.last() else {
            return Err(DenseNetworkError::NoLayers);
        };
        if last.outputs() != 1 {
            return Err(DenseNetworkError::OutputWidth(last.outputs()));
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.bias.len() != layer.outputs() {
                return Err(DenseNetworkError::BiasLength {
                    layer: i,
                    weights_rows: layer.outputs(),
                    bias_len: layer.bias.len(),
                });
            }
            if i > 0 && layer.inputs() != layers[i - 1].outputs() {
                return Err(DenseNetworkError::LayerShape {
                    layer: i,
                    expected: layer.inputs(),
                    found: layers[i - 1].outputs(),
                });
            }
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    fn forward(&self, input: &[f32]) -> f32 {
        let mut activation = DVector::from_column_slice(input);
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            activation = &layer.weights * activation + &layer.bias;
            if i < last {
                activation.apply(|v| *v = v.max(0.0));
            }
        }
        activation[0]
    }
}

impl Predictor for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.layers[0].inputs()
    }

    fn predict(&self, input: &EncodedInput) -> Result<f64, PredictionError> {
        if input.len() != self.input_dim() {
            return Err(PredictionError::DimensionMismatch {
                expected: self.input_dim(),
                found: input.len(),
            });
        }
        Ok(self.forward(input.as_slice()) as f64)
    }
}
