// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard_json, dashboard_page, health_check, list_artifacts};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// The JSON endpoints negotiate Brotli themselves, so only the HTML page
/// goes through `CompressionLayer`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page).layer(CompressionLayer::new()))
        .route("/healthz", get(health_check))
        .route("/api/dashboard", get(dashboard_json))
        .route("/api/artifacts", get(list_artifacts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
