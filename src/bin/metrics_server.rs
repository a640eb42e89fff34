use habit_tracker::{
    app::shutdown_signal,
    config::{init_tracing, METRICS_DEFAULT_PORT, METRICS_PORT_VAR},
    metrics_router, MetricsState, ServerConfig,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let config = ServerConfig::from_env(METRICS_PORT_VAR, METRICS_DEFAULT_PORT);
    let app = metrics_router(MetricsState::default());

    let addr = config.addr();
    info!("metrics server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
