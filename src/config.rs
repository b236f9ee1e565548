use clap::Parser;

use crate::model::GatewayConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "study-buddy", about = "Study Buddy backend relay")]
pub struct Config {
    #[arg(long, env, default_value = "0.0.0.0:5050")]
    pub bind_addr: String,
    /// Generate endpoint of the local inference server.
    #[arg(long, env = "OLLAMA_URL", default_value = crate::model::DEFAULT_ENDPOINT)]
    pub ollama_url: String,
    #[arg(long, env = "MODEL_NAME", default_value = crate::model::DEFAULT_MODEL)]
    pub model_name: String,
    /// Strip markdown decorations from model output before returning it.
    #[arg(long, env, default_value_t = false)]
    pub clean_markdown: bool,
    #[arg(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub metrics: bool,
}

impl Config {
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            endpoint: self.ollama_url.clone(),
            model: self.model_name.clone(),
        }
    }
}
