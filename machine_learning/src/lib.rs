pub mod arch;
pub mod artifact;
pub mod description;
pub mod error;

pub use error::{MlErr, Result};
