//! Translation between HTTP payloads and the model's numeric inputs and outputs.

pub mod input;
pub mod output;

/// The only media type requests and responses are encoded in.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Tells whether a declared content type is JSON, ignoring parameters such as `charset`.
pub fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
}
