use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3";

/// Where the gateway sends prompts and which model it asks for.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Failure of a single generate call. The display text is what the client sees.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Could not connect to Ollama. Make sure Ollama is running.")]
    Unreachable,
    #[error("Ollama returned status code: {0}")]
    UpstreamStatus(u16),
    #[error("An error occurred: {0}")]
    Internal(String),
}

#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync + 'static {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}

pub mod ollama;
