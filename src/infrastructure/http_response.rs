// HTTP response utilities for framed dashboard output
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use bytes::Bytes;

pub const FRAME_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Wrap one complete frame in a response
pub fn frame_response(frame: Bytes) -> Result<Response<Body>, StatusCode> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, HeaderValue::from(frame.len()))
        .body(Body::from(frame))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
