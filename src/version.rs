use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub ts: u64,
}

#[derive(Serialize)]
pub struct HealthInfo {
    pub ok: bool,
    pub moods: usize,
    pub fallback: String,
}

async fn get_version() -> Json<VersionInfo> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        ts: now,
    })
}

async fn get_health(State(state): State<AppState>) -> Json<HealthInfo> {
    Json(HealthInfo {
        ok: true,
        moods: state.table.len(),
        fallback: state.table.fallback().to_string(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/version", get(get_version))
        .route("/health", get(get_health))
}

#[cfg(test)]
mod tests {
    use crate::routes::build_router;
    use crate::routes::tests::{body_json, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_table_size() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = build_router(test_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["moods"], 9);
        assert_eq!(body["fallback"], "overwhelmed");
    }

    #[tokio::test]
    async fn version_reports_package() {
        let req = Request::builder()
            .uri("/version")
            .body(Body::empty())
            .unwrap();
        let body = body_json(build_router(test_state()).oneshot(req).await.unwrap()).await;
        assert_eq!(body["name"], "moodshift");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
