use crate::util::{InShape, OutDim};
use serde::{Deserialize, Serialize};

fn default_input_scale() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    /// Shape of a single input, `[channels, height, width]`.
    pub in_shape: Vec<usize>,

    /// The number of actions.
    pub out_dim: i64,

    /// Multiplied to the input before the first convolution.
    #[serde(default = "default_input_scale")]
    pub input_scale: f64,
}

impl CnnConfig {
    /// Creates configuration of the network.
    pub fn new(in_shape: Vec<usize>, out_dim: i64) -> Self {
        Self {
            in_shape,
            out_dim,
            input_scale: default_input_scale(),
        }
    }

    /// Sets the scale of the input.
    pub fn input_scale(mut self, v: f64) -> Self {
        self.input_scale = v;
        self
    }
}

impl OutDim for CnnConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, v: i64) {
        self.out_dim = v;
    }
}

impl InShape for CnnConfig {
    fn get_in_shape(&self) -> Vec<usize> {
        self.in_shape.clone()
    }
}
