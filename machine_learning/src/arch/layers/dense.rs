use ndarray::{Array1, Array2, ArrayView2, linalg};

use crate::{MlErr, Result, arch::activations::ActFn};

/// A fully connected layer computing `act_fn(x · w + b)`.
#[derive(Clone, Debug)]
pub struct Dense {
    weights: Array2<f32>,
    biases: Array1<f32>,
    act_fn: Option<ActFn>,
}

impl Dense {
    /// Creates a new `Dense`.
    ///
    /// # Arguments
    /// * `weights` - The weight matrix, shaped `(n_in, n_out)`.
    /// * `biases` - The bias vector, of length `n_out`.
    /// * `act_fn` - The activation applied to the output, `None` for a linear layer.
    ///
    /// # Returns
    /// A new `Dense` instance or an error if the weights and biases disagree on `n_out`.
    pub fn new(weights: Array2<f32>, biases: Array1<f32>, act_fn: Option<ActFn>) -> Result<Self> {
        if weights.ncols() != biases.len() {
            return Err(MlErr::SizeMismatch {
                a: "weights",
                b: "biases",
                got: biases.len(),
                expected: weights.ncols(),
            });
        }

        Ok(Self {
            weights,
            biases,
            act_fn,
        })
    }

    /// Returns the `(n_in, n_out)` dimensions of this layer.
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    pub fn act_fn(&self) -> Option<&ActFn> {
        self.act_fn.as_ref()
    }

    /// Makes a forward pass through the layer.
    ///
    /// # Arguments
    /// * `x` - The input batch, one sample per row.
    ///
    /// # Returns
    /// The layer's output for each row or an error if `x` has the wrong amount of columns.
    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (n_in, n_out) = self.dim();

        if x.ncols() != n_in {
            return Err(MlErr::SizeMismatch {
                a: "input",
                b: "layer",
                got: x.ncols(),
                expected: n_in,
            });
        }

        let mut z = Array2::zeros((x.nrows(), n_out));
        linalg::general_mat_mul(1.0, &x, &self.weights, 0.0, &mut z);
        z += &self.biases;

        if let Some(act_fn) = &self.act_fn {
            z.mapv_inplace(|z| act_fn.f(z));
        }

        Ok(z)
    }
}
