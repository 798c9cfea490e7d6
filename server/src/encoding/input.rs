use ndarray::{Array2, array};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::is_json;
use crate::error::{Result, ServeErr};

/// Amount of features the model is fed per request.
pub const NUM_FEATURES: usize = 3;

/// The request payload. Every field is optional and defaults to `0`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Features {
    pub floors: f32,
    pub lat: f32,
    pub long: f32,
}

impl Features {
    /// Returns the features as a single row, in `[floors, lat, long]` order.
    pub fn to_row(&self) -> Array2<f32> {
        array![[self.floors, self.lat, self.long]]
    }
}

/// Decodes a request body into the model's `1 x 3` feature matrix.
///
/// # Arguments
/// * `body` - The raw request body.
/// * `content_type` - The declared content type, if any.
///
/// # Errors
/// Returns `ServeErr::UnsupportedContentType` without looking at `body` if the content type isn't
/// JSON, and `ServeErr::MalformedPayload` if `body` isn't a JSON object or one of the fields
/// isn't a number.
pub fn decode(body: &[u8], content_type: Option<&str>) -> Result<Array2<f32>> {
    let content_type = content_type.unwrap_or_default();
    if !is_json(content_type) {
        return Err(ServeErr::UnsupportedContentType(content_type.to_string()));
    }

    let fields: Map<String, Value> =
        serde_json::from_slice(body).map_err(ServeErr::MalformedPayload)?;
    let features =
        Features::deserialize(Value::Object(fields)).map_err(ServeErr::MalformedPayload)?;

    Ok(features.to_row())
}
