use crate::{
    error::{not_found, ApiError},
    model::LlmBackend,
    prompt::{build_prompt, Technique},
    util::clean_markdown,
    validate::{ChatRequest, ValidChat, Validator},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct ChatOptions {
    /// Run model output through `clean_markdown` before replying.
    pub clean_markdown: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub technique_used: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Clone)]
struct AppState {
    backend: Arc<dyn LlmBackend>,
    validator: Validator,
    options: ChatOptions,
    metrics: Option<PrometheusHandle>,
}

pub fn routes<B: LlmBackend>(
    backend: B,
    options: ChatOptions,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let expose_metrics = metrics.is_some();
    let state = AppState {
        backend: Arc::new(backend),
        validator: Validator,
        options,
        metrics,
    };

    let mut router = Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health));
    if expose_metrics {
        router = router.route("/metrics", get(render_metrics));
    }
    router.fallback(not_found).with_state(state)
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    let ValidChat { message, technique } = match state.validator.validate(req) {
        Ok(v) => v,
        Err(e) => {
            metrics::counter!("chat_requests_total", "technique" => "none", "outcome" => "invalid")
                .increment(1);
            return Err(e);
        }
    };

    let kind = Technique::from_name(&technique);
    tracing::info!(technique = %technique, message_len = message.len(), "chat request");
    let prompt = build_prompt(&message, &technique);

    match state.backend.generate(&prompt).await {
        Ok(text) => {
            metrics::counter!("chat_requests_total", "technique" => kind.name(), "outcome" => "success")
                .increment(1);
            let response = if state.options.clean_markdown { clean_markdown(&text) } else { text };
            Ok(Json(ChatResponse { response, technique_used: technique, status: "success" }))
        }
        Err(e) => {
            metrics::counter!("chat_requests_total", "technique" => kind.name(), "outcome" => "error")
                .increment(1);
            tracing::warn!(error = %e, "generate failed");
            Err(e.into())
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", message: "Study Buddy backend is running" })
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
