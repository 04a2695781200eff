// HTTP request handlers
use crate::infrastructure::chunked_frames::stream_from_receiver;
use crate::infrastructure::frame::FrameMode;
use crate::infrastructure::http_response::frame_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Streams never tick faster than this
pub const MIN_STREAM_INTERVAL_MS: u64 = 50;

#[derive(Deserialize, Default)]
pub struct FrameQuery {
    pub pretty: Option<bool>,
    pub interval_ms: Option<u64>,
}

impl FrameQuery {
    fn mode(&self, state: &AppState) -> FrameMode {
        FrameMode::from_pretty(self.pretty.unwrap_or(state.settings.pretty))
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Apply a telemetry snapshot to the dashboard
pub async fn ingest_telemetry(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<Value>,
) -> StatusCode {
    state.streaming_service.ingest(&snapshot).await;
    tracing::debug!("Telemetry snapshot applied");
    StatusCode::NO_CONTENT
}

/// Current dashboard as a single frame
pub async fn get_dashboard(
    Query(query): Query<FrameQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let mode = query.mode(&state);

    match state.streaming_service.frame(mode).await {
        Ok(frame) => match frame_response(frame) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            tracing::error!("Error rendering dashboard frame: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Stream frames on an interval
pub async fn stream_dashboard(
    Query(query): Query<FrameQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let mode = query.mode(&state);
    let interval_ms = query
        .interval_ms
        .unwrap_or(state.settings.stream_interval_ms)
        .max(MIN_STREAM_INTERVAL_MS);

    tracing::debug!("Opening frame stream: {:?} every {}ms", mode, interval_ms);

    let rx = state
        .streaming_service
        .stream_frames(mode, Duration::from_millis(interval_ms));
    stream_from_receiver(rx)
}
