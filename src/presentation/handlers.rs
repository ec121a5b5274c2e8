// HTTP request handlers
use crate::infrastructure::html_renderer::render_dashboard;
use crate::infrastructure::http_response::{accepts_brotli, html_response, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full dashboard as an HTML page
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dashboard = state.dashboard_service.get_dashboard().await;

    match html_response(render_dashboard(&dashboard)) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Full dashboard as JSON
pub async fn dashboard_json(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let dashboard = state.dashboard_service.get_dashboard().await;

    match json_response(&dashboard, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Which artifact files are present
pub async fn list_artifacts(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let statuses = state.dashboard_service.artifact_statuses().await;

    match json_response(&statuses, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::application::dashboard_service::DashboardService;
    use crate::infrastructure::config::DashboardSettings;
    use crate::infrastructure::csv_repository::CsvArtifactRepository;
    use crate::presentation::app_state::AppState;
    use crate::presentation::routes::build_router;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(dir: &Path) -> Router {
        let repository = Arc::new(CsvArtifactRepository::new(dir));
        let state = Arc::new(AppState {
            dashboard_service: DashboardService::new(repository, DashboardSettings::default()),
        });
        build_router(state)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(router(dir.path()), "/healthz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_empty_output_dir_renders_messages_only() {
        let dir = tempfile::tempdir().unwrap();

        let (status, body) = get(router(dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("rfm_with_clusters.csv não encontrado."));
        assert!(body.contains("tukey_results.csv não encontrado."));
        assert!(!body.contains("<svg"));

        let (status, body) = get(router(dir.path()), "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["tabs"].as_array().unwrap().len(), 3);
        assert_eq!(json["tabs"][1]["title"], "Tendência mensal");
        assert_eq!(json["tabs"][1]["sections"][0]["blocks"][0]["type"], "info");
    }

    #[tokio::test]
    async fn test_dashboard_json_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("monthly_events_trend.csv"),
            "Month,events,ma\n2024-02,20,15\nnot-a-date,5,5\n2024-01,10,10\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("anova_results.csv"),
            "metric,p_value\nmonetary,0.03\nrecency,0.2\nfrequency,0.001\n",
        )
        .unwrap();

        let (status, body) = get(router(dir.path()), "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        let chart = &json["tabs"][1]["sections"][0]["blocks"][0];
        assert_eq!(chart["type"], "line_chart");
        assert_eq!(chart["kind"], "multi_line");
        assert_eq!(chart["series"][0]["points"].as_array().unwrap().len(), 2);
        assert_eq!(chart["series"][1]["name"], "moving avg (6m)");

        let callout = &json["tabs"][2]["sections"][0]["blocks"][1];
        assert_eq!(callout["type"], "callout");
        assert!(callout["message"].as_str().unwrap().contains("0.001000"));

        let sidebar = json["sidebar"]["artifacts"].as_array().unwrap();
        assert_eq!(sidebar[2]["found"], true);
        assert_eq!(sidebar[0]["found"], false);
    }

    #[tokio::test]
    async fn test_json_is_brotli_when_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/api/artifacts")
                    .header(header::ACCEPT_ENCODING, "br")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }

    #[tokio::test]
    async fn test_list_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("executive_summary.csv"), "kpi,value\nusers,10\n").unwrap();

        let (status, body) = get(router(dir.path()), "/api/artifacts").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let statuses = json.as_array().unwrap();
        assert_eq!(statuses.len(), 7);
        assert_eq!(statuses[6]["file_name"], "executive_summary.csv");
        assert_eq!(statuses[6]["found"], true);
    }
}
