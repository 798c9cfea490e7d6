use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ndarray::ShapeError;
use safetensors::SafeTensorError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyModel,
    MissingTensor {
        name: String,
    },
    UnexpectedTensor {
        name: String,
    },
    InvalidDtype {
        name: String,
        got: String,
    },
    InvalidRank {
        name: String,
        got: usize,
        expected: usize,
    },
    InvalidActFn(String),
    InvalidArch(String),
    Shape(ShapeError),
    Artifact(SafeTensorError),
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::EmptyModel => write!(f, "The model must have at least one layer"),
            MlErr::MissingTensor { name } => write!(f, "The artifact is missing tensor {name}"),
            MlErr::UnexpectedTensor { name } => {
                write!(f, "The artifact has an unexpected tensor {name}")
            }
            MlErr::InvalidDtype { name, got } => {
                write!(f, "Tensor {name} has dtype {got}, expected F32")
            }
            MlErr::InvalidRank {
                name,
                got,
                expected,
            } => write!(f, "Tensor {name} has rank {got}, expected {expected}"),
            MlErr::InvalidActFn(s) => write!(f, "Unknown activation function {s:?}"),
            MlErr::InvalidArch(s) => write!(f, "Unsupported architecture {s:?}"),
            MlErr::Shape(e) => write!(f, "shape error: {e}"),
            MlErr::Artifact(e) => write!(f, "artifact error: {e}"),
            MlErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            MlErr::Artifact(e) => Some(e),
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<SafeTensorError> for MlErr {
    fn from(value: SafeTensorError) -> Self {
        Self::Artifact(value)
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
