use std::{error::Error, fmt, io, path::PathBuf};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::warn;
use machine_learning::MlErr;
use serde_json::json;

/// The inference server's result type.
pub type Result<T> = std::result::Result<T, ServeErr>;

/// Failures across startup and request handling.
#[derive(Debug)]
pub enum ServeErr {
    Io(io::Error),
    Config {
        var: &'static str,
        value: String,
    },
    ModelNotFound {
        path: PathBuf,
    },
    LoadModel {
        path: PathBuf,
        source: MlErr,
    },
    UnsupportedContentType(String),
    MalformedPayload(serde_json::Error),
    Inference(MlErr),
    InvalidPrediction(String),
    UnsupportedAccept(String),
}

impl ServeErr {
    /// Returns the HTTP status a request failing with this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            ServeErr::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServeErr::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ServeErr::UnsupportedAccept(_) => StatusCode::NOT_ACCEPTABLE,
            ServeErr::Inference(_)
            | ServeErr::InvalidPrediction(_)
            | ServeErr::Io(_)
            | ServeErr::Config { .. }
            | ServeErr::ModelNotFound { .. }
            | ServeErr::LoadModel { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a stable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServeErr::Io(_) => "io",
            ServeErr::Config { .. } => "config",
            ServeErr::ModelNotFound { .. } => "model_not_found",
            ServeErr::LoadModel { .. } => "load_model",
            ServeErr::UnsupportedContentType(_) => "unsupported_content_type",
            ServeErr::MalformedPayload(_) => "malformed_payload",
            ServeErr::Inference(_) => "inference",
            ServeErr::InvalidPrediction(_) => "invalid_prediction",
            ServeErr::UnsupportedAccept(_) => "unsupported_accept",
        }
    }
}

impl fmt::Display for ServeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeErr::Io(e) => write!(f, "io error: {e}"),
            ServeErr::Config { var, value } => write!(f, "invalid value {value:?} for {var}"),
            ServeErr::ModelNotFound { path } => {
                write!(f, "Model file does not exist: {}", path.display())
            }
            ServeErr::LoadModel { path, source } => {
                write!(f, "failed to load model from {}: {source}", path.display())
            }
            ServeErr::UnsupportedContentType(ct) => write!(f, "Unsupported content type: {ct}"),
            ServeErr::MalformedPayload(e) => write!(f, "malformed payload: {e}"),
            ServeErr::Inference(e) => write!(f, "inference failed: {e}"),
            ServeErr::InvalidPrediction(msg) => write!(f, "invalid prediction: {msg}"),
            ServeErr::UnsupportedAccept(ct) => write!(f, "Unsupported accept type: {ct}"),
        }
    }
}

impl Error for ServeErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServeErr::Io(e) => Some(e),
            ServeErr::LoadModel { source, .. } => Some(source),
            ServeErr::MalformedPayload(e) => Some(e),
            ServeErr::Inference(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServeErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MlErr> for ServeErr {
    fn from(value: MlErr) -> Self {
        Self::Inference(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ServeErr> for io::Error {
    fn from(value: ServeErr) -> Self {
        match value {
            ServeErr::Io(e) => e,
            ServeErr::ModelNotFound { .. } => io::Error::new(io::ErrorKind::NotFound, value),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

impl IntoResponse for ServeErr {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(kind = self.kind(), status = status.as_u16(); "request failed: {self}");

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
