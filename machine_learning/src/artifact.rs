//! Reading and writing `Sequential` models as `safetensors` artifacts.
//!
//! Each layer `i` is stored as two F32 tensors, `layers.{i}.weight` shaped `[n_in, n_out]` and
//! `layers.{i}.bias` shaped `[n_out]`. Activations live in the header metadata under
//! `layers.{i}.act_fn`, a layer without one is linear.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use ndarray::{Array1, Array2};
use safetensors::{Dtype, SafeTensors, tensor::TensorView};

use crate::{
    MlErr, Result,
    arch::{Sequential, activations::ActFn, layers::Dense},
};

/// Metadata key naming the model architecture.
pub const ARCH_KEY: &str = "arch";
/// The only architecture artifacts can currently hold.
pub const ARCH: &str = "sequential";

fn weight_name(i: usize) -> String {
    format!("layers.{i}.weight")
}

fn bias_name(i: usize) -> String {
    format!("layers.{i}.bias")
}

fn act_fn_key(i: usize) -> String {
    format!("layers.{i}.act_fn")
}

/// Reads a model artifact from disk.
///
/// # Arguments
/// * `path` - The artifact's path.
///
/// # Returns
/// The deserialized model or an error if the file can't be read or isn't a valid artifact.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Sequential> {
    let bytes = fs::read(path)?;
    from_bytes(&bytes)
}

/// Writes a model artifact to disk, replacing any previous file.
pub fn save<P: AsRef<Path>>(model: &Sequential, path: P) -> Result<()> {
    let bytes = to_bytes(model)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Deserializes a model from the raw bytes of an artifact.
///
/// Layers are read in order starting at `0` until no `layers.{i}.weight` tensor is found, any
/// tensor left unread after that is rejected.
pub fn from_bytes(bytes: &[u8]) -> Result<Sequential> {
    let (_, header) = SafeTensors::read_metadata(bytes)?;
    let metadata = header.metadata().clone().unwrap_or_default();

    if let Some(arch) = metadata.get(ARCH_KEY) {
        if arch != ARCH {
            return Err(MlErr::InvalidArch(arch.clone()));
        }
    }

    let tensors = SafeTensors::deserialize(bytes)?;
    let mut unread: HashSet<String> = tensors.names().into_iter().cloned().collect();
    let mut layers = Vec::new();

    for i in 0.. {
        let weight_name = weight_name(i);
        if !unread.remove(&weight_name) {
            break;
        }

        let bias_name = bias_name(i);
        if !unread.remove(&bias_name) {
            return Err(MlErr::MissingTensor { name: bias_name });
        }

        let weights = read_matrix(&tensors, &weight_name)?;
        let biases = read_vector(&tensors, &bias_name)?;
        let act_fn = metadata
            .get(&act_fn_key(i))
            .map(|s| s.parse::<ActFn>())
            .transpose()?;

        layers.push(Dense::new(weights, biases, act_fn)?);
    }

    if let Some(name) = unread.into_iter().min() {
        return Err(MlErr::UnexpectedTensor { name });
    }

    Sequential::new(layers)
}

/// Serializes a model into the raw bytes of an artifact.
pub fn to_bytes(model: &Sequential) -> Result<Vec<u8>> {
    let mut metadata = HashMap::from([(ARCH_KEY.to_string(), ARCH.to_string())]);
    let mut buffers = Vec::with_capacity(model.layers().len() * 2);

    for (i, layer) in model.layers().iter().enumerate() {
        let (n_in, n_out) = layer.dim();
        buffers.push((weight_name(i), vec![n_in, n_out], le_bytes(layer.weights().iter())));
        buffers.push((bias_name(i), vec![n_out], le_bytes(layer.biases().iter())));

        if let Some(act_fn) = layer.act_fn() {
            metadata.insert(act_fn_key(i), act_fn.to_string());
        }
    }

    let views = buffers
        .iter()
        .map(|(name, shape, data)| {
            let view = TensorView::new(Dtype::F32, shape.clone(), data)?;
            Ok((name.as_str(), view))
        })
        .collect::<Result<Vec<_>>>()?;

    let views = views.iter().map(|(name, view)| (*name, view));
    Ok(safetensors::serialize(views, &Some(metadata))?)
}

fn le_bytes<'a, I: Iterator<Item = &'a f32>>(values: I) -> Vec<u8> {
    values.flat_map(|v| v.to_le_bytes()).collect()
}

fn read_f32s(tensors: &SafeTensors, name: &str, rank: usize) -> Result<(Vec<usize>, Vec<f32>)> {
    let view = tensors.tensor(name)?;

    if view.dtype() != Dtype::F32 {
        return Err(MlErr::InvalidDtype {
            name: name.to_string(),
            got: format!("{:?}", view.dtype()),
        });
    }

    if view.shape().len() != rank {
        return Err(MlErr::InvalidRank {
            name: name.to_string(),
            got: view.shape().len(),
            expected: rank,
        });
    }

    let values = view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok((view.shape().to_vec(), values))
}

fn read_matrix(tensors: &SafeTensors, name: &str) -> Result<Array2<f32>> {
    let (shape, values) = read_f32s(tensors, name, 2)?;
    Ok(Array2::from_shape_vec((shape[0], shape[1]), values)?)
}

fn read_vector(tensors: &SafeTensors, name: &str) -> Result<Array1<f32>> {
    let (_, values) = read_f32s(tensors, name, 1)?;
    Ok(Array1::from_vec(values))
}
