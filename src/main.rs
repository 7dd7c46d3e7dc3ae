// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::application::refresh_service::{DashboardState, RefreshService};
use crate::application::slideshow_service::SlideshowService;
use crate::domain::chart::ChartRegistry;
use crate::domain::slideshow::SlideShow;
use crate::infrastructure::config::{load_server_config, load_widgets_config};
use crate::infrastructure::report_client::ReportClient;
use crate::presentation::app_state::AppState;
use crate::presentation::{handlers, proxy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let server_config = load_server_config()?;
    let widgets_config = load_widgets_config()?;

    // HTTP client shared by the refresh pipeline and the proxy relay
    let client = Arc::new(ReportClient::new(&server_config.upstream)?);

    // Shared state: dashboard snapshot, chart registry, slide deck
    let dashboard = Arc::new(DashboardState::new(ChartRegistry::with_defaults()));
    let slides = Arc::new(Mutex::new(SlideShow::new(server_config.slideshow.slides)));

    // Start the refresh pipeline and the auto-rotate driver
    RefreshService::new(dashboard.clone(), client.clone(), widgets_config).spawn_all();
    SlideshowService::new(
        slides.clone(),
        Duration::from_secs(server_config.slideshow.period_secs),
    )
    .spawn();

    let state = Arc::new(AppState {
        dashboard,
        slides,
        source: client,
        upstream: server_config.upstream.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(handlers::health_check))
        .route(
            "/api/category-performance",
            get(handlers::category_performance_sample),
        )
        .route("/api/team-punch", get(handlers::team_punch_sample))
        .route("/api/highlights", get(handlers::highlights_sample))
        .route("/api/state-franchise", get(proxy::state_franchise))
        .route(
            "/api/fr-registration-stats",
            get(proxy::fr_registration_stats),
        )
        .route(
            "/api/purchase-category-performance",
            get(proxy::purchase_category_performance),
        )
        .route(
            "/api/new-franchise-ytd-performance",
            get(proxy::new_franchise_ytd_performance),
        )
        .route(
            "/api/v1/account_report/whStockExpiryReport",
            get(proxy::wh_stock_expiry_report),
        )
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/slideshow", get(handlers::slideshow_state))
        .route("/api/slideshow/next", post(handlers::slideshow_next))
        .route("/api/slideshow/prev", post(handlers::slideshow_prev))
        .route("/api/slideshow/goto/:index", post(handlers::slideshow_goto))
        .route("/api/slideshow/resume", post(handlers::slideshow_resume))
        .route("/api/slideshow/toggle", post(handlers::slideshow_toggle))
        .fallback_service(ServeDir::new(&server_config.server.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server; walk up from the configured port if it is taken
    let mut port = server_config.server.port;
    let listener = loop {
        match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => break listener,
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::warn!("port {} is in use, trying {}", port, port + 1);
                port += 1;
            }
            Err(err) => return Err(err.into()),
        }
    };
    tracing::info!("TV dashboard on http://localhost:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
