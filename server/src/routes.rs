use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::{net::TcpListener, signal};

use crate::{
    encoding::{input, output},
    error::Result,
    predictor::{self, Predictor},
};

/// State shared by every handler: the read-only model loaded at startup.
pub struct AppState<P> {
    model: Arc<P>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

/// Builds the server's routes around an already loaded model.
///
/// * `GET /ping` - health check.
/// * `POST /invocations` - runs one prediction.
pub fn router<P: Predictor>(model: Arc<P>) -> Router {
    Router::new()
        .route("/ping", get(ping::<P>))
        .route("/invocations", post(invoke::<P>))
        .with_state(AppState { model })
}

/// Serves `model` on `listener` until ctrl-c is received.
pub async fn serve<P: Predictor>(listener: TcpListener, model: Arc<P>) -> Result<()> {
    axum::serve(listener, router(model))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("received SIGTERM"),
        Err(e) => warn!("failed to listen for ctrl-c, serving until killed: {e}"),
    }
}

async fn ping<P: Predictor>(
    State(state): State<AppState<P>>,
) -> (StatusCode, Json<HealthResponse>) {
    let status = if state.model.is_loaded() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    (status.status_code(), Json(HealthResponse { status }))
}

async fn invoke<P: Predictor>(
    State(state): State<AppState<P>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let features = input::decode(&body, content_type)?;
    let prediction = predictor::predict(state.model.as_ref(), features.view())?;
    let (payload, content_type) =
        output::encode(prediction.view(), content_type.unwrap_or_default())?;

    debug!("served prediction {payload} for features {}", features.row(0));

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], payload).into_response())
}
