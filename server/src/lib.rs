//! A single-model inference server.
//!
//! The model artifact is loaded once before the listener is bound, then shared read-only by the
//! `/ping` and `/invocations` handlers.

pub mod config;
pub mod encoding;
pub mod error;
pub mod predictor;
pub mod routes;
pub mod store;

use std::sync::Arc;

use log::info;
use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use error::{Result, ServeErr};
pub use predictor::Predictor;

/// Loads the model and serves it until a shutdown signal arrives.
///
/// Nothing is bound if loading fails, so a server without a model never becomes reachable.
///
/// # Arguments
/// * `config` - Where to listen and where to find the model.
///
/// # Errors
/// Returns the first startup or serving error, see `ServeErr`.
pub async fn run(config: ServerConfig) -> Result<()> {
    let model = store::load_model(&config.model_dir)?;

    let listener = TcpListener::bind(config.addr()).await?;
    info!("listening at {}", listener.local_addr()?);

    routes::serve(listener, Arc::new(model)).await?;
    info!("wrapping up, shutting down...");

    Ok(())
}
