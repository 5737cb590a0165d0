// Library exports for the binaries and tests
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::{
    announcements::AnnouncementService, formatter::AnnouncementFormatter, http::ReqwestClient,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: AnnouncementService,
    pub config: Arc<Config>,
}

/// Wire the production feed service from configuration.
pub fn build_feed(config: &Config) -> anyhow::Result<AnnouncementService> {
    let client = ReqwestClient::new(config.http_timeout)?;
    Ok(
        AnnouncementService::new(Arc::new(client), config.announcements_url.clone())
            .with_window_months(config.window_months)
            .with_formatter(AnnouncementFormatter::from_offset_minutes(
                config.display_utc_offset_minutes,
            )),
    )
}

pub fn app(state: AppState) -> Router {
    // The app only reads; no credentials travel with these requests.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route("/announcements", get(routes::announcements::list_announcements))
        .route("/announcements/recent", get(routes::announcements::recent_summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
