use crate::handlers;
use crate::metrics;
use crate::state::{AppState, MetricsState};
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::list_habits).post(handlers::add_habit))
        .route(
            "/api/habits/:id",
            patch(handlers::edit_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/habits/:id/reset", post(handlers::reset_habit))
        .route("/api/today", get(handlers::get_today))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn metrics_router(state: MetricsState) -> Router {
    Router::new()
        .route("/track", post(metrics::track))
        .route("/metrics", get(metrics::export))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down...");
}
