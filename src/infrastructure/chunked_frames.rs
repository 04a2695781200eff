// Chunked frame streaming utilities
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;

use crate::infrastructure::http_response::FRAME_CONTENT_TYPE;

/// Create a chunked response carrying one frame per chunk.
///
/// Frames are self-delimiting, so no length prefix is added.
pub fn chunked_frame_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = Bytes> + Send + 'static,
{
    let body = Body::from_stream(stream.map(Ok::<_, std::io::Error>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Helper to create a streaming response from a receiver
pub fn stream_from_receiver(mut rx: tokio::sync::mpsc::Receiver<Bytes>) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(frame) = rx.recv().await {
            yield frame;
        }
    };

    match chunked_frame_stream(stream) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
