// Application state for HTTP handlers
use crate::application::refresh_service::DashboardState;
use crate::application::report_source::ReportSource;
use crate::domain::slideshow::SlideShow;
use crate::infrastructure::config::UpstreamSettings;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub dashboard: Arc<DashboardState>,
    pub slides: Arc<Mutex<SlideShow>>,
    pub source: Arc<dyn ReportSource>,
    pub upstream: UpstreamSettings,
}
