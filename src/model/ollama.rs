use super::{GatewayConfig, GatewayError, LlmBackend};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const EMPTY_RESPONSE: &str = "Sorry, I got an empty response.";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Forwards prompts to an Ollama-style `/api/generate` endpoint.
///
/// One attempt per call: no retries and no client-side timeout, so a call
/// runs until the server answers or the transport gives up.
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    cfg: GatewayConfig,
}

impl OllamaBackend {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self { client: Client::new(), cfg }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.cfg
    }
}

fn classify(e: reqwest::Error) -> GatewayError {
    if e.is_connect() {
        GatewayError::Unreachable
    } else {
        GatewayError::Internal(e.to_string())
    }
}

#[async_trait::async_trait]
impl LlmBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = GenerateRequest { model: &self.cfg.model, prompt, stream: false };
        tracing::debug!(model = %self.cfg.model, prompt_len = prompt.len(), "sending generate request");

        let t0 = Instant::now();
        let res = self.client.post(&self.cfg.endpoint).json(&body).send().await;
        metrics::histogram!("upstream_request_seconds").record(t0.elapsed().as_secs_f64());

        let res = res.map_err(classify)?;
        let status = res.status();
        if status != StatusCode::OK {
            tracing::debug!(%status, "upstream rejected generate request");
            return Err(GatewayError::UpstreamStatus(status.as_u16()));
        }

        let parsed: GenerateResponse = res.json().await.map_err(classify)?;
        Ok(parsed.response.unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }
}
