// Application state for HTTP handlers
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::ServerSettings;

#[derive(Clone)]
pub struct AppState {
    pub streaming_service: StreamingDashboardService,
    pub settings: ServerSettings,
}
