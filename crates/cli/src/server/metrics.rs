use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dns_noise_domain::config::MetricsConfig;
use dns_noise_infrastructure::metrics::{render_prometheus, NoiseMetrics};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

async fn metrics_handler(State(metrics): State<NoiseMetrics>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], render_prometheus(&metrics))
}

pub fn metrics_router(path: &str, metrics: NoiseMetrics) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

/// Serves the registry until `shutdown` is cancelled.
pub async fn serve_metrics(
    config: &MetricsConfig,
    metrics: NoiseMetrics,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, path = %config.path, "Metrics listener started");

    axum::serve(listener, metrics_router(&config.path, metrics))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
