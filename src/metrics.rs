use crate::counter::EXPOSITION_CONTENT_TYPE;
use crate::errors::AppError;
use crate::models::TrackRequest;
use crate::state::MetricsState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
};
use tracing::debug;

/// Accepts any body; anything other than a JSON object carrying non-empty
/// `event` and `page` strings is rejected without touching the counter.
pub async fn track(
    State(state): State<MetricsState>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AppError> {
    let request: TrackRequest = serde_json::from_slice(&body).unwrap_or_default();
    let (event, page) = match (request.event.as_deref(), request.page.as_deref()) {
        (Some(event), Some(page)) if !event.is_empty() && !page.is_empty() => (event, page),
        _ => {
            debug!("rejected track request without event or page");
            return Err(AppError::bad_request("Missing event or page"));
        }
    };

    state.events.record(event, page);
    Ok((StatusCode::OK, "Event tracked"))
}

pub async fn export(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.events.export(),
    )
}
