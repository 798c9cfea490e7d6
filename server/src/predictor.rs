use machine_learning::{Result as MlResult, arch::Sequential};
use ndarray::{Array1, ArrayView2};

use crate::error::Result;

/// A loaded model the server can run inference with.
///
/// Implementors are shared read-only across every request handler.
pub trait Predictor: Send + Sync + 'static {
    /// Runs inference over `features`, one sample per row, returning one value per sample.
    fn predict(&self, features: ArrayView2<f32>) -> MlResult<Array1<f32>>;

    /// Tells whether the model is in memory and able to serve.
    fn is_loaded(&self) -> bool {
        true
    }
}

impl Predictor for Sequential {
    fn predict(&self, features: ArrayView2<f32>) -> MlResult<Array1<f32>> {
        Sequential::predict(self, features)
    }

    fn is_loaded(&self) -> bool {
        !self.layers().is_empty()
    }
}

/// Runs the model over the encoded features, failures are surfaced as `ServeErr::Inference`.
pub fn predict<P>(model: &P, features: ArrayView2<f32>) -> Result<Array1<f32>>
where
    P: Predictor + ?Sized,
{
    Ok(model.predict(features)?)
}
