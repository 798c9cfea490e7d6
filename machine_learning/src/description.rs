use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    arch::{Sequential, activations::ActFn, layers::Dense},
};

/// A human-writable description of a trained `Sequential`, used to produce artifacts from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescription {
    pub layers: Vec<LayerDescription>,
}

/// A dense layer with its trained parameters. `weights` holds one row per input feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDescription {
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_fn: Option<String>,
}

impl ModelDescription {
    /// Builds the described model.
    ///
    /// # Returns
    /// The model or an error if any layer is ragged, mis-sized or names an unknown activation.
    pub fn build(&self) -> Result<Sequential> {
        let layers = self
            .layers
            .iter()
            .map(LayerDescription::build)
            .collect::<Result<Vec<_>>>()?;

        Sequential::new(layers)
    }
}

impl LayerDescription {
    fn build(&self) -> Result<Dense> {
        let n_in = self.weights.len();
        let n_out = self.weights.first().map_or(0, Vec::len);

        if let Some(row) = self.weights.iter().find(|row| row.len() != n_out) {
            return Err(MlErr::SizeMismatch {
                a: "weight row",
                b: "first weight row",
                got: row.len(),
                expected: n_out,
            });
        }

        let weights = Array2::from_shape_vec((n_in, n_out), self.weights.concat())?;
        let biases = Array1::from_vec(self.biases.clone());
        let act_fn = self
            .act_fn
            .as_deref()
            .map(str::parse::<ActFn>)
            .transpose()?;

        Dense::new(weights, biases, act_fn)
    }
}
