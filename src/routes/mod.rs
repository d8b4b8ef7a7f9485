//! HTTP route handlers
//!
//! - `shift` - mood shift and cosmic reading
//! - `catalog` - recommendations, articles, breathwork and check-in history
//!
//! `/health` and `/version` live in `crate::version`.

pub mod catalog;
pub mod shift;

use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

/// Full API router. CORS is layered on by the caller.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/shift", post(shift::post_shift))
        .route("/cosmic-today", get(shift::get_cosmic_today))
        .route("/api/recommendations", get(catalog::get_recommendations))
        .route("/api/articles", get(catalog::get_articles))
        .route("/api/breathwork", get(catalog::get_breathwork))
        .route("/api/moods", get(catalog::get_mood_history))
        .route("/api/moods/known", get(catalog::get_known_moods))
        .merge(crate::version::router())
        .with_state(state)
}
