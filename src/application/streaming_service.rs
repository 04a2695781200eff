// Streaming dashboard service - Serializes frames on demand or on an interval
use crate::application::dashboard_service::Dashboard;
use crate::infrastructure::frame::{FrameError, FrameMode};
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Frames buffered per stream before the producer waits on the client
const STREAM_QUEUE_DEPTH: usize = 4;

/// Shared handle to one dashboard. The mutex serializes updates against
/// frame rendering.
#[derive(Clone)]
pub struct StreamingDashboardService {
    dashboard: Arc<Mutex<Dashboard<'static>>>,
}

impl StreamingDashboardService {
    pub fn new(dashboard: Dashboard<'static>) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }

    /// Apply one telemetry snapshot.
    pub async fn ingest(&self, telemetry: &Value) {
        self.dashboard.lock().await.update(telemetry);
    }

    /// Render the current document as a single frame.
    pub async fn frame(&self, mode: FrameMode) -> Result<Bytes, FrameError> {
        let dashboard = self.dashboard.lock().await;
        let mut buffer = vec![0u8; dashboard.measure(mode)];
        let len = dashboard.serialize(&mut buffer, mode)?;
        buffer.truncate(len);
        Ok(Bytes::from(buffer))
    }

    /// Emit a frame every `interval` until the receiver is dropped.
    pub fn stream_frames(&self, mode: FrameMode, interval: Duration) -> mpsc::Receiver<Bytes> {
        let (tx, rx) = mpsc::channel(STREAM_QUEUE_DEPTH);
        let dashboard = self.dashboard.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Reused across ticks; grows only when the document does.
            let mut buffer: Vec<u8> = Vec::new();

            loop {
                ticker.tick().await;

                let frame = {
                    let dashboard = dashboard.lock().await;
                    let needed = dashboard.measure(mode);
                    if buffer.len() < needed {
                        buffer.resize(needed, 0);
                    }
                    match dashboard.serialize(&mut buffer, mode) {
                        Ok(len) => Bytes::copy_from_slice(&buffer[..len]),
                        Err(e) => {
                            tracing::error!("Failed to serialize dashboard frame: {}", e);
                            continue;
                        }
                    }
                };

                if tx.send(frame).await.is_err() {
                    tracing::debug!("Frame stream closed by client");
                    break;
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::{DashboardConfig, DatasetConfig, GroupConfig};
    use serde_json::json;

    fn leaked_config() -> &'static DashboardConfig {
        Box::leak(Box::new(DashboardConfig {
            title: Some("Stream".to_string()),
            groups: vec![GroupConfig {
                datasets: vec![DatasetConfig {
                    telemetry_key: Some("pressure.torr".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            actions: Vec::new(),
        }))
    }

    fn service() -> StreamingDashboardService {
        StreamingDashboardService::new(Dashboard::new(leaked_config()).unwrap())
    }

    #[tokio::test]
    async fn test_frame_reflects_ingested_snapshot() {
        let service = service();
        service.ingest(&json!({ "pressure": { "torr": 0.00042 } })).await;

        let frame = service.frame(FrameMode::Compact).await.unwrap();
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(text.starts_with("/*"));
        assert!(text.ends_with("*/\r\n\r\n"));
        assert!(text.contains("\"value\":\"0.00042\""));
    }

    #[tokio::test]
    async fn test_stream_emits_frames_until_dropped() {
        let service = service();
        let mut rx = service.stream_frames(FrameMode::Pretty, Duration::from_millis(10));

        let first = rx.recv().await.unwrap();
        assert!(first.ends_with(b"\n*/\r\n\r\n"));

        service.ingest(&json!({ "pressure": { "torr": 750 } })).await;
        let mut saw_update = false;
        for _ in 0..10 {
            let frame = rx.recv().await.unwrap();
            if std::str::from_utf8(&frame).unwrap().contains("\"750\"") {
                saw_update = true;
                break;
            }
        }
        assert!(saw_update);
        drop(rx);
    }
}
