use std::{path::Path, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use inference_server::{Predictor, ServeErr, ServerConfig, routes, store};
use machine_learning::{
    Result as MlResult,
    arch::{Sequential, layers::Dense},
    artifact,
};
use ndarray::{Array1, Array2, ArrayView2, array};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Always predicts `value`, reporting itself as loaded or not.
struct FixedModel {
    value: f32,
    loaded: bool,
}

impl Predictor for FixedModel {
    fn predict(&self, features: ArrayView2<f32>) -> MlResult<Array1<f32>> {
        Ok(Array1::from_elem(features.nrows(), self.value))
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

fn linear(weights: Array2<f32>, bias: f32) -> Sequential {
    let layer = Dense::new(weights, array![bias], None).unwrap();
    Sequential::new([layer]).unwrap()
}

/// Writes `model` as the artifact of a fresh model directory and loads it back like the server
/// does at startup.
fn load_from_disk(dir: &Path, model: &Sequential) -> Sequential {
    artifact::save(model, dir.join(store::MODEL_FILE)).unwrap();
    store::load_model(dir).unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, content_type, body)
}

fn ping() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/ping")
        .body(Body::empty())
        .unwrap()
}

fn invocation(content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::builder().method("POST").uri("/invocations");
    if let Some(content_type) = content_type {
        req = req.header(header::CONTENT_TYPE, content_type);
    }

    req.body(Body::from(body.to_string())).unwrap()
}

fn json_invocation(body: Value) -> Request<Body> {
    invocation(Some("application/json"), &body.to_string())
}

#[tokio::test]
async fn ping_reports_healthy_once_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let model = load_from_disk(dir.path(), &linear(array![[1.0], [0.0], [0.0]], 1.0));
    let app = routes::router(Arc::new(model));

    for _ in 0..3 {
        let (status, content_type, body) = call(app.clone(), ping()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, json!({ "status": "Healthy" }));
    }
}

#[tokio::test]
async fn ping_reports_unhealthy_without_model() {
    let app = routes::router(Arc::new(FixedModel {
        value: 0.0,
        loaded: false,
    }));

    let (status, _, body) = call(app, ping()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "Unhealthy" }));
}

#[tokio::test]
async fn invocation_returns_integer_prediction() {
    let dir = tempfile::tempdir().unwrap();
    // prediction = floors + 1, so [1, 47.6, -122.3] -> [2]
    let model = load_from_disk(dir.path(), &linear(array![[1.0], [0.0], [0.0]], 1.0));
    let app = routes::router(Arc::new(model));

    let req = json_invocation(json!({ "floors": 1, "lat": 47.6, "long": -122.3 }));
    let (status, content_type, body) = call(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, json!({ "prediction": 2 }));
}

#[tokio::test]
async fn invocation_defaults_missing_fields_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    // prediction = 100 * floors + lat + 10 * long
    let model = load_from_disk(dir.path(), &linear(array![[100.0], [1.0], [10.0]], 0.0));
    let app = routes::router(Arc::new(model));

    let cases = [
        (json!({}), 0),
        (json!({ "lat": 47.5 }), 47),
        (json!({ "floors": 2 }), 200),
        (json!({ "long": 3, "lat": 1 }), 31),
    ];

    for (payload, expected) in cases {
        let (status, _, body) = call(app.clone(), json_invocation(payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "prediction": expected }));
    }
}

#[tokio::test]
async fn invocation_truncates_toward_zero() {
    let app = routes::router(Arc::new(linear(array![[1.0], [0.0], [0.0]], 0.0)));

    for (floors, expected) in [(2.9, 2), (-2.9, -2), (0.5, 0)] {
        let req = json_invocation(json!({ "floors": floors }));
        let (status, _, body) = call(app.clone(), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "prediction": expected }));
    }
}

#[tokio::test]
async fn invocation_accepts_json_with_charset() {
    let app = routes::router(Arc::new(FixedModel {
        value: 7.0,
        loaded: true,
    }));

    let req = invocation(Some("application/json; charset=utf-8"), r#"{"floors": 1}"#);
    let (status, _, body) = call(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "prediction": 7 }));
}

#[tokio::test]
async fn invocation_rejects_unsupported_content_type() {
    let app = routes::router(Arc::new(FixedModel {
        value: 1.0,
        loaded: true,
    }));

    for content_type in [Some("text/csv"), None] {
        let req = invocation(content_type, r#"{"floors": 1}"#);
        let (status, _, body) = call(app.clone(), req).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let msg = body["error"].as_str().unwrap();
        assert!(msg.starts_with("Unsupported content type"), "{msg}");
    }
}

#[tokio::test]
async fn invocation_rejects_malformed_payload() {
    let app = routes::router(Arc::new(FixedModel {
        value: 1.0,
        loaded: true,
    }));

    for payload in [r#"{"floors": "two"}"#, "{", "[1, 2, 3]"] {
        let req = invocation(Some("application/json"), payload);
        let (status, _, body) = call(app.clone(), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn invocation_surfaces_inference_failures() {
    // Expects two features, requests carry three.
    let app = routes::router(Arc::new(linear(array![[1.0], [1.0]], 0.0)));

    let req = json_invocation(json!({ "floors": 1 }));
    let (status, _, body) = call(app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("inference failed"));
}

#[tokio::test]
async fn invocation_rejects_non_finite_prediction() {
    let app = routes::router(Arc::new(FixedModel {
        value: f32::NAN,
        loaded: true,
    }));

    let (status, _, _) = call(app, json_invocation(json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_routes_and_methods_are_left_to_the_router() {
    let app = routes::router(Arc::new(FixedModel {
        value: 1.0,
        loaded: true,
    }));

    let req = Request::builder()
        .method("GET")
        .uri("/invocations")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let req = Request::builder()
        .method("GET")
        .uri("/models")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = call(app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_model_prevents_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_dir: dir.path().to_path_buf(),
    };

    let err = inference_server::run(config).await.unwrap_err();

    match err {
        ServeErr::ModelNotFound { path } => {
            assert_eq!(path, dir.path().join(store::MODEL_FILE));
        }
        other => panic!("unexpected error: {other}"),
    }
}
