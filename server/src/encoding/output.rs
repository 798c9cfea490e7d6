use ndarray::ArrayView1;
use serde_json::json;

use super::{JSON_CONTENT_TYPE, is_json};
use crate::error::{Result, ServeErr};

/// Converts a raw prediction to the integer served to clients.
///
/// The value is truncated toward zero, so `2.9` becomes `2` and `-2.9` becomes `-2`. Values beyond
/// the `i64` range saturate.
///
/// # Errors
/// Returns `ServeErr::InvalidPrediction` for `NaN` and infinities.
pub fn truncate(value: f32) -> Result<i64> {
    if !value.is_finite() {
        return Err(ServeErr::InvalidPrediction(format!("non-finite value {value}")));
    }

    Ok(value.trunc() as i64)
}

/// Encodes the first value of a prediction as `{"prediction": <integer>}`.
///
/// # Arguments
/// * `prediction` - The model's raw output.
/// * `accept` - The content type the response must be encoded in.
///
/// # Returns
/// The response payload along with its content type.
pub fn encode(prediction: ArrayView1<f32>, accept: &str) -> Result<(String, &'static str)> {
    if !is_json(accept) {
        return Err(ServeErr::UnsupportedAccept(accept.to_string()));
    }

    let first = prediction
        .first()
        .copied()
        .ok_or_else(|| ServeErr::InvalidPrediction("the model returned no values".into()))?;

    let payload = json!({ "prediction": truncate(first)? }).to_string();
    Ok((payload, JSON_CONTENT_TYPE))
}
