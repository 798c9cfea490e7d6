use ndarray::{Array1, Array2, ArrayView2, Axis};

use super::layers::Dense;
use crate::{MlErr, Result};

/// A sequential model: information flows forward through its layers, each layer's output being
/// the next one's input.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance or an error if there are no layers or adjacent layers have
    /// incompatible dimensions.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        let layers: Vec<_> = layers.into_iter().collect();

        if layers.is_empty() {
            return Err(MlErr::EmptyModel);
        }

        for pair in layers.windows(2) {
            let (_, prev_out) = pair[0].dim();
            let (next_in, _) = pair[1].dim();

            if prev_out != next_in {
                return Err(MlErr::SizeMismatch {
                    a: "layer output",
                    b: "next layer input",
                    got: next_in,
                    expected: prev_out,
                });
            }
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Returns the amount of parameters in the model.
    pub fn size(&self) -> usize {
        self.layers.iter().map(Dense::size).sum()
    }

    /// Returns the amount of features the model expects per sample.
    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.dim().0)
    }

    /// Returns the amount of values the model outputs per sample.
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.dim().1)
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// The output of the last layer or an error if `x` doesn't fit the first layer.
    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.layers
            .iter()
            .try_fold(x.to_owned(), |a, layer| layer.forward(a.view()))
    }

    /// Predicts one scalar per sample.
    ///
    /// # Arguments
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// A vector with one prediction per row of `x`, or an error if the model doesn't output
    /// exactly one value per sample.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array1<f32>> {
        let y = self.forward(x)?;

        if y.ncols() != 1 {
            return Err(MlErr::SizeMismatch {
                a: "model output",
                b: "prediction",
                got: y.ncols(),
                expected: 1,
            });
        }

        Ok(y.index_axis_move(Axis(1), 0))
    }
}
