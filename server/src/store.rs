use std::path::Path;

use log::info;
use machine_learning::{arch::Sequential, artifact};

use crate::error::{Result, ServeErr};

/// Name of the model artifact inside the model directory.
pub const MODEL_FILE: &str = "model.safetensors";

/// Loads the model artifact stored in `model_dir`.
///
/// # Arguments
/// * `model_dir` - The directory holding `MODEL_FILE`.
///
/// # Errors
/// Returns `ServeErr::ModelNotFound` carrying the attempted path if the artifact doesn't exist,
/// or `ServeErr::LoadModel` if it can't be deserialized.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Sequential> {
    let path = model_dir.as_ref().join(MODEL_FILE);

    if !path.exists() {
        return Err(ServeErr::ModelNotFound { path });
    }

    let model = match artifact::load(&path) {
        Ok(model) => model,
        Err(source) => return Err(ServeErr::LoadModel { path, source }),
    };

    info!(
        layers = model.layers().len(),
        params = model.size(),
        input_dim = model.input_dim();
        "model loaded successfully from {}",
        path.display()
    );

    Ok(model)
}
