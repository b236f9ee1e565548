use study_buddy::{api, config::Config, model::ollama::OllamaBackend};
use dotenvy::dotenv;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, EnvFilter};
use std::net::SocketAddr;


#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
dotenv().ok();
let cfg = <Config as clap::Parser>::parse();


// logs
let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
fmt().with_env_filter(filter).init();


// metrics recorder, rendered on /metrics
let metrics = if cfg.metrics { Some(PrometheusBuilder::new().install_recorder()?) } else { None };


// inference gateway
let backend = OllamaBackend::new(cfg.gateway());
tracing::info!(endpoint = %backend.config().endpoint, model = %backend.config().model, "using inference server");


let options = api::ChatOptions { clean_markdown: cfg.clean_markdown };
let app = api::routes(backend, options, metrics);
let addr: SocketAddr = cfg.bind_addr.parse()?;


tracing::info!(%addr, "listening");
axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
Ok(())
}


async fn shutdown_signal() {
if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
}
tracing::info!("shutting down");
}
