use axum::{body::Body, http, response::Response, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use study_buddy::api::{routes, ChatOptions};
use study_buddy::model::{GatewayError, LlmBackend};
use tower::util::ServiceExt;

#[derive(Clone, Default)]
struct FakeBackend {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl LlmBackend for FakeBackend {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.seen.lock().unwrap().push(prompt.to_string());
        // Simulate backend errors for specific topics to exercise error mapping
        if prompt.contains("offline") {
            return Err(GatewayError::Unreachable);
        }
        if prompt.contains("overloaded") {
            return Err(GatewayError::UpstreamStatus(503));
        }
        Ok("**Gravity** pulls things _down_.".to_string())
    }
}

fn test_router(backend: FakeBackend, clean_markdown: bool) -> Router {
    routes(backend, ChatOptions { clean_markdown }, None)
}

fn chat_request(body: Value) -> http::Request<Body> {
    http::Request::builder()
        .method(http::Method::POST)
        .uri("/api/chat")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn json_body(res: Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn chat_defaults_to_zero_shot() {
    let backend = FakeBackend::default();
    let app = test_router(backend.clone(), false);

    let res = app.oneshot(chat_request(json!({"message": "gravity"}))).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);
    let v = json_body(res).await;
    assert_eq!(
        v,
        json!({
            "response": "**Gravity** pulls things _down_.",
            "technique_used": "zero-shot",
            "status": "success"
        })
    );

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("You are a helpful study buddy. Help the student learn about: gravity"));
}

#[tokio::test]
async fn chat_echoes_unknown_technique_and_uses_generic_prompt() {
    let backend = FakeBackend::default();
    let app = test_router(backend.clone(), false);

    let res = app
        .oneshot(chat_request(json!({"message": "gravity", "technique": "socratic"})))
        .await
        .unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);
    assert_eq!(json_body(res).await["technique_used"], "socratic");
    assert_eq!(backend.seen.lock().unwrap()[0], "Help the student learn about: gravity");
}

#[tokio::test]
async fn chat_cleans_markdown_when_enabled() {
    let app = test_router(FakeBackend::default(), true);

    let res = app
        .oneshot(chat_request(json!({"message": "gravity", "technique": "few-shot"})))
        .await
        .unwrap();
    let v = json_body(res).await;
    assert_eq!(v["response"], "Gravity pulls things down.");
    assert_eq!(v["technique_used"], "few-shot");
}

#[tokio::test]
async fn chat_missing_message_is_bad_request() {
    let backend = FakeBackend::default();
    let app = test_router(backend.clone(), false);

    let res = app.oneshot(chat_request(json!({}))).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await, json!({"error": "No message provided"}));
    assert!(backend.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn chat_empty_message_is_bad_request() {
    let app = test_router(FakeBackend::default(), false);

    let res = app.oneshot(chat_request(json!({"message": ""}))).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert!(json_body(res).await.get("error").is_some());
}

#[tokio::test]
async fn chat_whitespace_message_is_forwarded() {
    let backend = FakeBackend::default();
    let app = test_router(backend.clone(), false);

    let res = app
        .oneshot(chat_request(json!({"message": "   ", "technique": "unknown"})))
        .await
        .unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);
    assert_eq!(json_body(res).await["status"], "success");
    assert_eq!(backend.seen.lock().unwrap()[0], "Help the student learn about:    ");
}

#[tokio::test]
async fn chat_malformed_body_is_bad_request() {
    let app = test_router(FakeBackend::default(), false);
    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri("/api/chat")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["error"].is_string());
}

#[tokio::test]
async fn chat_backend_unreachable_is_internal_error() {
    let app = test_router(FakeBackend::default(), false);

    let res = app.oneshot(chat_request(json!({"message": "offline topic"}))).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    let v = json_body(res).await;
    assert_eq!(v["status"], "error");
    assert!(v["error"].as_str().unwrap().contains("Could not connect"));
}

#[tokio::test]
async fn chat_backend_status_is_internal_error() {
    let app = test_router(FakeBackend::default(), false);

    let res = app.oneshot(chat_request(json!({"message": "overloaded"}))).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(res).await,
        json!({"error": "Ollama returned status code: 503", "status": "error"})
    );
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_router(FakeBackend::default(), false);
    let req = http::Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({"status": "healthy", "message": "Study Buddy backend is running"})
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_router(FakeBackend::default(), false);
    let req = http::Request::builder()
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_route_only_exists_with_a_recorder() {
    let metrics_req = || {
        http::Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap()
    };

    let without = test_router(FakeBackend::default(), false);
    let res = without.oneshot(metrics_req()).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let with = routes(FakeBackend::default(), ChatOptions::default(), Some(handle));
    let res = with.oneshot(metrics_req()).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);
}
